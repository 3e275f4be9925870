//! Lower bounds for branch-and-bound.
//!
//! Both flavors run the same relaxation: walk the remaining ranges in
//! ascending unit price and buy still-uncovered value at that range's unit
//! price, the last unit fractionally, until the target is met. An uncovered
//! unit is first met in the cheapest remaining range containing it, so no
//! completion can pay less for it. Running out before the target gives an
//! infinite bound.
//!
//! - `DiscreteBound`: uncovered value = elements not yet claimed (bitset).
//! - `OffcutBound`: uncovered value = area of the offcut polygons, clipped
//!   against each remaining footprint. Only sound when element values are
//!   areas (`ElementModel::Area`); on any other universe it runs the element
//!   relaxation instead.

use crate::geom2::{clip_cfg, difference_cfg, GeomCfg, Polygon};
use crate::model::{ElementModel, Range, Universe};

use super::types::SearchCfg;

/// Read-only search context shared by the runner and the bounds.
pub struct Problem<'a> {
    pub universe: &'a Universe,
    pub ranges: &'a [Range],
    /// Ranges with positive value, stable-sorted by ascending unit price.
    pub order: Vec<usize>,
    /// Unit price per range (indexed like `ranges`).
    pub price: Vec<f64>,
    /// Covered value that counts as reaching the target (slack applied).
    pub need: f64,
}

impl<'a> Problem<'a> {
    pub fn new(universe: &'a Universe, ranges: &'a [Range], cfg: &SearchCfg) -> Self {
        let price: Vec<f64> = ranges.iter().map(Range::unit_price).collect();
        let mut order: Vec<usize> = (0..ranges.len())
            .filter(|&k| price[k].is_finite())
            .collect();
        order.sort_by(|&a, &b| price[a].total_cmp(&price[b]));
        let need = cfg.target_value(universe.total_value) * (1.0 - cfg.value_eps);
        Self {
            universe,
            ranges,
            order,
            price,
            need,
        }
    }

    #[inline]
    pub fn reached(&self, covered: f64) -> bool {
        covered >= self.need
    }
}

/// Admissible lower bound plus the per-node state it needs.
pub trait CoverBound {
    type State: Clone;

    /// Optimizer tag for this flavor.
    fn tag(&self) -> &'static str;

    fn root(&self, p: &Problem<'_>) -> Self::State;

    /// Apply "take range `r`"; returns the model value newly covered.
    fn take(&self, p: &Problem<'_>, state: &mut Self::State, r: usize) -> f64;

    /// Lower bound on the total cost of any completion of `state` that uses
    /// only `p.order[cursor..]`; infinite when none reaches the target.
    fn lower_bound(
        &self,
        p: &Problem<'_>,
        state: &Self::State,
        cursor: usize,
        cost: f64,
        covered: f64,
    ) -> f64;
}

/// Claim the elements of `r` in `claimed`; returns the newly claimed value.
fn claim(p: &Problem<'_>, claimed: &mut [bool], r: usize) -> f64 {
    let mut gain = 0.0;
    for e in &p.ranges[r].elements {
        if !std::mem::replace(&mut claimed[e.id.0], true) {
            gain += p.universe.elements[e.id.0].value;
        }
    }
    gain
}

/// Fractional buying step shared by both flavors. Returns `Some(bound)` once
/// `value` at `price` closes the gap.
#[inline]
fn buy(p: &Problem<'_>, acc: &mut f64, bound: &mut f64, value: f64, price: f64) -> Option<f64> {
    let gap = p.need - *acc;
    if value >= gap {
        return Some(*bound + gap.max(0.0) * price);
    }
    *acc += value;
    *bound += value * price;
    None
}

/// Fractional relaxation over unclaimed elements.
fn element_bound(p: &Problem<'_>, claimed: &[bool], cursor: usize, cost: f64, covered: f64) -> f64 {
    if p.reached(covered) {
        return cost;
    }
    let mut seen = claimed.to_vec();
    let (mut acc, mut bound) = (covered, cost);
    for &r in &p.order[cursor..] {
        let price = p.price[r];
        for e in &p.ranges[r].elements {
            if std::mem::replace(&mut seen[e.id.0], true) {
                continue;
            }
            let value = p.universe.elements[e.id.0].value;
            if let Some(b) = buy(p, &mut acc, &mut bound, value, price) {
                return b;
            }
        }
    }
    f64::INFINITY
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DiscreteBound;

impl CoverBound for DiscreteBound {
    type State = Vec<bool>;

    fn tag(&self) -> &'static str {
        "bnb"
    }

    fn root(&self, p: &Problem<'_>) -> Vec<bool> {
        vec![false; p.universe.len()]
    }

    fn take(&self, p: &Problem<'_>, state: &mut Vec<bool>, r: usize) -> f64 {
        claim(p, state, r)
    }

    fn lower_bound(
        &self,
        p: &Problem<'_>,
        state: &Vec<bool>,
        cursor: usize,
        cost: f64,
        covered: f64,
    ) -> f64 {
        element_bound(p, state, cursor, cost, covered)
    }
}

/// Uncovered AOI remainder kept as explicit polygons.
#[derive(Clone, Debug)]
pub struct OffcutState {
    pub claimed: Vec<bool>,
    pub offcuts: Vec<Polygon>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OffcutBound {
    pub cfg: GeomCfg,
}

impl CoverBound for OffcutBound {
    type State = OffcutState;

    fn tag(&self) -> &'static str {
        "bnb-offcut"
    }

    fn root(&self, p: &Problem<'_>) -> OffcutState {
        OffcutState {
            claimed: vec![false; p.universe.len()],
            offcuts: vec![p.universe.aoi.clone()],
        }
    }

    fn take(&self, p: &Problem<'_>, state: &mut OffcutState, r: usize) -> f64 {
        if p.universe.model != ElementModel::Area {
            return claim(p, &mut state.claimed, r);
        }
        for piece in &p.ranges[r].footprint {
            state.offcuts = state
                .offcuts
                .iter()
                .flat_map(|o| difference_cfg(o, piece, &self.cfg))
                .collect();
        }
        claim(p, &mut state.claimed, r)
    }

    fn lower_bound(
        &self,
        p: &Problem<'_>,
        state: &OffcutState,
        cursor: usize,
        cost: f64,
        covered: f64,
    ) -> f64 {
        if p.universe.model != ElementModel::Area {
            return element_bound(p, &state.claimed, cursor, cost, covered);
        }
        if p.reached(covered) {
            return cost;
        }
        let mut left = state.offcuts.clone();
        let (mut acc, mut bound) = (covered, cost);
        for &r in &p.order[cursor..] {
            let price = p.price[r];
            for piece in &p.ranges[r].footprint {
                let mut gain = 0.0;
                let mut next = Vec::with_capacity(left.len());
                for o in &left {
                    let c = clip_cfg(o, piece, &self.cfg);
                    gain += c.inner_area();
                    next.extend(c.outer);
                }
                left = next;
                if let Some(b) = buy(p, &mut acc, &mut bound, gain, price) {
                    return b;
                }
            }
        }
        f64::INFINITY
    }
}
