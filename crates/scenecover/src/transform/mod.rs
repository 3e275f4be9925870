//! Transformers: (AOI, catalog) → Universe + Ranges.
//!
//! Purpose
//! - Turn geometry into the set-cover model an optimizer consumes. Candidates
//!   that do not touch the AOI are filtered first; each surviving candidate's
//!   footprint is its intersection with the AOI.
//!
//! Strategies
//! - `DiscreteTransformer`: grid cells of side `delta` as elements.
//! - `ContinuousTransformer`: exact planar subdivision of the AOI; pieces with
//!   the same owner set form one element.
//! - `OnlineTransformer` / `OnlineSession`: the same subdivision, built one
//!   candidate at a time, with a Universe available after every feed.
//!
//! Every strategy appends one residual element last: AOI value that no range
//! owns. It keeps `universe.total_value` close to the AOI area.

mod continuous;
mod discrete;
mod online;
mod subdivision;

pub use continuous::ContinuousTransformer;
pub use discrete::DiscreteTransformer;
pub use online::{OnlineSession, OnlineTransformer};
pub use subdivision::{Piece, Subdivision};

use serde::Serialize;

use crate::error::Result;
use crate::geom2::{clip_cfg, GeomCfg, Polygon};
use crate::model::{AreaOfInterest, CandidateItem, Range, Universe};

/// Counters and fractions describing one transform call.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub candidates_total: usize,
    pub candidates_kept: usize,
    pub candidates_filtered: usize,
    pub element_count: usize,
    /// Fraction of the AOI area not reached by any kept candidate.
    pub uncovered_fraction: f64,
}

/// Output of a transformer.
#[derive(Clone, Debug)]
pub struct Transformed {
    pub universe: Universe,
    pub ranges: Vec<Range>,
    pub diagnostics: Diagnostics,
}

pub trait Transformer {
    /// Short name used in reports and solver tags.
    fn tag(&self) -> &'static str;

    fn transform(&self, aoi: &AreaOfInterest, candidates: &[CandidateItem]) -> Result<Transformed>;
}

/// A kept candidate and its pieces inside the AOI.
#[derive(Clone, Debug)]
pub(crate) struct Footprint {
    pub candidate: usize,
    pub cost: f64,
    pub pieces: Vec<Polygon>,
}

/// Footprint of `candidate` if it touches `aoi`; `None` means filtered.
///
/// A candidate touching only the AOI boundary is kept with no pieces.
pub(crate) fn footprint(
    aoi: &Polygon,
    index: usize,
    candidate: &CandidateItem,
    cfg: &GeomCfg,
) -> Option<Footprint> {
    if !candidate.polygon.intersects_cfg(aoi, cfg) {
        return None;
    }
    Some(Footprint {
        candidate: index,
        cost: candidate.price,
        pieces: clip_cfg(&candidate.polygon, aoi, cfg).inner,
    })
}

pub(crate) fn footprints(aoi: &Polygon, candidates: &[CandidateItem], cfg: &GeomCfg) -> Vec<Footprint> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(k, c)| footprint(aoi, k, c, cfg))
        .collect()
}

pub(crate) fn empty_ranges(footprints: &[Footprint]) -> Vec<Range> {
    footprints
        .iter()
        .map(|f| Range::new(f.candidate, f.cost, f.pieces.clone()))
        .collect()
}

pub(crate) fn diagnostics(
    candidates_total: usize,
    ranges: &[Range],
    universe: &Universe,
    residual: f64,
) -> Diagnostics {
    let uncovered_fraction = if universe.aoi_area > 0.0 {
        (residual / universe.aoi_area).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Diagnostics {
        candidates_total,
        candidates_kept: ranges.len(),
        candidates_filtered: candidates_total - ranges.len(),
        element_count: universe.len(),
        uncovered_fraction,
    }
}
