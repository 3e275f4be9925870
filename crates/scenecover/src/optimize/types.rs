//! Search configuration, deadline, result and counters.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Outcome class of an optimizer run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Target reached and the search proved no cheaper selection exists.
    Optimal,
    /// Target reached, optimality not proven (heuristic or deadline).
    Feasible,
    /// No combination of ranges reaches the target.
    Infeasible,
}

/// Search configuration.
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    /// Fraction of `Universe::total_value` to cover, clamped to `[0, 1]`.
    pub target_fraction: f64,
    /// Wall-clock budget for branch-and-bound; `None` runs to completion.
    pub time_limit: Option<Duration>,
    /// Relative slack when comparing covered value against the target.
    pub value_eps: f64,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            target_fraction: 1.0,
            time_limit: None,
            value_eps: 1e-9,
        }
    }
}

impl SearchCfg {
    pub fn with_target(mut self, target_fraction: f64) -> Self {
        self.target_fraction = target_fraction;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Absolute value that must be covered.
    pub fn target_value(&self, total_value: f64) -> f64 {
        let f = if self.target_fraction.is_nan() {
            0.0
        } else {
            self.target_fraction.clamp(0.0, 1.0)
        };
        f * total_value
    }

    #[inline]
    pub fn reached(&self, covered: f64, target: f64) -> bool {
        covered >= target * (1.0 - self.value_eps)
    }
}

/// Wall-clock deadline, polled cooperatively.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn never() -> Self {
        Self { at: None }
    }

    /// Deadline `limit` from now (or never for `None`).
    pub fn after(limit: Option<Duration>) -> Self {
        Self {
            at: limit.map(|d| Instant::now() + d),
        }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Branch-and-bound counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes_popped: u64,
    pub nodes_pushed: u64,
    pub nodes_pruned: u64,
    pub incumbent_updates: u64,
}

/// Ranges chosen by an optimizer.
#[derive(Clone, Debug)]
pub struct Selection {
    /// Indices into the ranges slice handed to the optimizer.
    pub ranges: Vec<usize>,
    pub cost: f64,
    /// Model value covered by the selection.
    pub covered: f64,
    pub status: Status,
    pub stats: SearchStats,
}

impl Selection {
    pub fn empty(status: Status) -> Self {
        Self {
            ranges: Vec::new(),
            cost: 0.0,
            covered: 0.0,
            status,
            stats: SearchStats::default(),
        }
    }

    pub fn infeasible() -> Self {
        Self::empty(Status::Infeasible)
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.status != Status::Infeasible
    }

    #[inline]
    pub fn optimal(&self) -> bool {
        self.status == Status::Optimal
    }
}
