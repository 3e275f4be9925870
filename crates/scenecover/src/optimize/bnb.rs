//! Best-first branch-and-bound with a greedy-seeded incumbent.
//!
//! Model
//! - Ranges with positive value are sorted by ascending unit price. A node at
//!   cursor `i` branches into "take order[i]" and "skip order[i]".
//! - Nodes live in an arena and store only their parent handle, cursor,
//!   accumulated cost/covered value and the range they took. The bound state
//!   (claimed bitset or offcut list) is rebuilt by replaying the path when a
//!   node is expanded; the selection is rebuilt the same way when a node
//!   becomes the incumbent.
//! - The queue pops the lowest bound first (ties: deeper cursor, then older
//!   node). A child is enqueued only if its bound is below the incumbent cost.
//!   Once a popped bound reaches the incumbent, every queued bound does too and
//!   the queue is dropped.
//! - The deadline is polled at every pop; expiry returns the incumbent as
//!   `Feasible`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::model::{Range, Universe};

use super::bound::{CoverBound, DiscreteBound, OffcutBound, Problem};
use super::greedy::GreedyOptimizer;
use super::types::{Deadline, SearchCfg, SearchStats, Selection, Status};
use super::Optimizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug)]
struct Node {
    parent: Option<NodeId>,
    cursor: usize,
    cost: f64,
    covered: f64,
    taken: Option<usize>,
}

#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    bound: f64,
    cursor: usize,
    id: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // `BinaryHeap` pops the greatest entry: lowest bound, deepest cursor, oldest id.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bound
            .total_cmp(&self.bound)
            .then(self.cursor.cmp(&other.cursor))
            .then(other.id.cmp(&self.id))
    }
}

/// Branch-and-bound optimizer, parameterized by its lower-bound flavor.
#[derive(Clone, Copy, Debug, Default)]
pub struct BnbOptimizer<B> {
    bound: B,
}

impl BnbOptimizer<DiscreteBound> {
    /// Element-bitset bound; works with any universe.
    pub fn discrete() -> Self {
        Self {
            bound: DiscreteBound,
        }
    }
}

impl BnbOptimizer<OffcutBound> {
    /// Offcut-polygon bound on area universes, element bound elsewhere.
    pub fn offcut() -> Self {
        Self {
            bound: OffcutBound::default(),
        }
    }
}

impl<B: CoverBound> BnbOptimizer<B> {
    pub fn with_bound(bound: B) -> Self {
        Self { bound }
    }
}

impl<B: CoverBound> Optimizer for BnbOptimizer<B> {
    fn tag(&self) -> &'static str {
        self.bound.tag()
    }

    fn optimize(&self, universe: &Universe, ranges: &[Range], cfg: &SearchCfg) -> Selection {
        let seed = GreedyOptimizer::run(universe, ranges, cfg);
        if seed.status != Status::Feasible {
            // Infeasible, or the empty selection already meets the target.
            return seed;
        }
        let problem = Problem::new(universe, ranges, cfg);
        let deadline = Deadline::after(cfg.time_limit);
        BnbRunner::new(&problem, &self.bound, seed).run(deadline)
    }
}

/// Search state carried across pops.
struct BnbRunner<'a, 'p, B: CoverBound> {
    p: &'a Problem<'p>,
    bound: &'a B,
    arena: Vec<Node>,
    heap: BinaryHeap<QueueEntry>,
    best: Selection,
    stats: SearchStats,
}

impl<'a, 'p, B: CoverBound> BnbRunner<'a, 'p, B> {
    fn new(p: &'a Problem<'p>, bound: &'a B, seed: Selection) -> Self {
        Self {
            p,
            bound,
            arena: Vec::new(),
            heap: BinaryHeap::new(),
            best: seed,
            stats: SearchStats::default(),
        }
    }

    fn run(mut self, deadline: Deadline) -> Selection {
        let root_state = self.bound.root(self.p);
        let root_bound = self.bound.lower_bound(self.p, &root_state, 0, 0.0, 0.0);
        self.push(
            Node {
                parent: None,
                cursor: 0,
                cost: 0.0,
                covered: 0.0,
                taken: None,
            },
            root_bound,
        );

        let mut timed_out = false;
        while let Some(entry) = self.heap.pop() {
            self.stats.nodes_popped += 1;
            if deadline.expired() {
                timed_out = true;
                tracing::debug!(popped = self.stats.nodes_popped, "deadline hit");
                break;
            }
            if entry.bound >= self.best.cost {
                self.stats.nodes_pruned += 1 + self.heap.len() as u64;
                self.heap.clear();
                break;
            }
            self.expand(entry.id);
        }

        let mut best = self.best;
        best.status = if timed_out {
            Status::Feasible
        } else {
            Status::Optimal
        };
        best.stats = self.stats;
        tracing::debug!(
            cost = best.cost,
            status = ?best.status,
            popped = self.stats.nodes_popped,
            arena = self.arena.len(),
            "branch-and-bound done"
        );
        best
    }

    fn expand(&mut self, id: NodeId) {
        let node = self.arena[id.0];
        if node.cursor >= self.p.order.len() {
            return;
        }
        let r = self.p.order[node.cursor];
        let next = node.cursor + 1;
        let state = self.replay(id);

        // Take. A take that covers nothing new is dominated by the skip.
        let mut taken = state.clone();
        let gain = self.bound.take(self.p, &mut taken, r);
        if gain > 0.0 {
            let child = Node {
                parent: Some(id),
                cursor: next,
                cost: node.cost + self.p.ranges[r].cost,
                covered: node.covered + gain,
                taken: Some(r),
            };
            if self.p.reached(child.covered) {
                if child.cost < self.best.cost {
                    self.improve(child);
                }
            } else {
                let lb = self
                    .bound
                    .lower_bound(self.p, &taken, next, child.cost, child.covered);
                self.push_or_prune(child, lb);
            }
        }

        // Skip.
        let lb = self
            .bound
            .lower_bound(self.p, &state, next, node.cost, node.covered);
        self.push_or_prune(
            Node {
                parent: Some(id),
                taken: None,
                cursor: next,
                ..node
            },
            lb,
        );
    }

    fn push(&mut self, node: Node, bound: f64) {
        let id = NodeId(self.arena.len());
        self.arena.push(node);
        self.heap.push(QueueEntry {
            bound,
            cursor: node.cursor,
            id,
        });
        self.stats.nodes_pushed += 1;
    }

    fn push_or_prune(&mut self, node: Node, bound: f64) {
        if bound < self.best.cost {
            self.push(node, bound);
        } else {
            self.stats.nodes_pruned += 1;
        }
    }

    /// Ranges taken on the path root → `id`, in order.
    fn path(&self, id: NodeId) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let n = &self.arena[c.0];
            if let Some(r) = n.taken {
                out.push(r);
            }
            cur = n.parent;
        }
        out.reverse();
        out
    }

    fn replay(&self, id: NodeId) -> B::State {
        let mut state = self.bound.root(self.p);
        for r in self.path(id) {
            self.bound.take(self.p, &mut state, r);
        }
        state
    }

    fn improve(&mut self, child: Node) {
        let mut ranges = child.parent.map(|p| self.path(p)).unwrap_or_default();
        ranges.extend(child.taken);
        tracing::debug!(
            from = self.best.cost,
            to = child.cost,
            picked = ranges.len(),
            "incumbent improved"
        );
        self.best.ranges = ranges;
        self.best.cost = child.cost;
        self.best.covered = child.covered;
        self.stats.incumbent_updates += 1;
    }
}
