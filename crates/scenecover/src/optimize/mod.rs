//! Optimizers: Universe + Ranges → selected ranges.
//!
//! Purpose
//! - `GreedyOptimizer`: fast weighted set-cover heuristic.
//! - `BnbOptimizer`: best-first, anytime branch-and-bound seeded with the
//!   greedy result, with two admissible bounds (`DiscreteBound`,
//!   `OffcutBound`).
//!
//! Outcomes
//! - `Status::Infeasible` when the target cannot be reached (including an
//!   empty catalog with a positive target). This is distinct from the empty
//!   zero-cost selection returned for a zero target.
//! - `Status::Feasible` for heuristic results and for searches cut short by
//!   the deadline; `Status::Optimal` once branch-and-bound drains its queue.

mod bnb;
mod bound;
mod greedy;
mod types;

pub use bnb::{BnbOptimizer, NodeId};
pub use bound::{CoverBound, DiscreteBound, OffcutBound, OffcutState, Problem};
pub use greedy::GreedyOptimizer;
pub use types::{Deadline, SearchCfg, SearchStats, Selection, Status};

use crate::model::{Range, Universe};

pub trait Optimizer {
    /// Short name used in reports and solver tags.
    fn tag(&self) -> &'static str;

    /// Select ranges covering `cfg.target_fraction` of `universe`.
    /// `Selection::ranges` index into `ranges`.
    fn optimize(&self, universe: &Universe, ranges: &[Range], cfg: &SearchCfg) -> Selection;
}

#[cfg(test)]
mod tests;
