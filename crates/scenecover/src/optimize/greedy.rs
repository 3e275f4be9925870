//! Greedy weighted set cover.

use crate::model::{CoverageElement, Range, Universe};

use super::types::{SearchCfg, Selection, Status};
use super::Optimizer;

/// Repeatedly take the range with the lowest `cost / uncovered element count`.
///
/// Ties go to the range that comes first in input order. The result is
/// `Feasible` (never proven optimal) unless the target is zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyOptimizer;

impl GreedyOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Greedy over `ranges`, returning indices into `ranges`.
    pub fn run(universe: &Universe, ranges: &[Range], cfg: &SearchCfg) -> Selection {
        let target = cfg.target_value(universe.total_value);
        if cfg.reached(0.0, target) {
            return Selection::empty(Status::Optimal);
        }

        // Own copies; zero-value ranges never help.
        let mut active: Vec<(usize, Vec<CoverageElement>)> = ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.value() > 0.0)
            .map(|(k, r)| (k, r.elements.clone()))
            .collect();
        let mut claimed = vec![false; universe.len()];
        let mut sel = Selection::empty(Status::Feasible);

        while !cfg.reached(sel.covered, target) {
            let mut best: Option<(usize, f64)> = None;
            for (pos, (k, elems)) in active.iter().enumerate() {
                let ratio = ranges[*k].cost / elems.len() as f64;
                if best.map_or(true, |(_, b)| ratio < b) {
                    best = Some((pos, ratio));
                }
            }
            let Some((pos, _)) = best else {
                tracing::debug!(covered = sel.covered, target, "greedy ran out of ranges");
                return Selection::infeasible();
            };
            let (k, elems) = active.remove(pos);
            let gain: f64 = elems.iter().map(|e| e.value).sum();
            if elems.is_empty() || gain <= 0.0 {
                return Selection::infeasible();
            }
            for e in &elems {
                claimed[e.id.0] = true;
            }
            sel.ranges.push(k);
            sel.cost += ranges[k].cost;
            sel.covered += gain;

            for (_, rest) in active.iter_mut() {
                rest.retain(|e| !claimed[e.id.0]);
            }
            active.retain(|(_, rest)| rest.iter().any(|e| e.value > 0.0));
        }
        tracing::debug!(picked = sel.ranges.len(), cost = sel.cost, "greedy done");
        sel
    }
}

impl Optimizer for GreedyOptimizer {
    fn tag(&self) -> &'static str {
        "greedy"
    }

    fn optimize(&self, universe: &Universe, ranges: &[Range], cfg: &SearchCfg) -> Selection {
        Self::run(universe, ranges, cfg)
    }
}
