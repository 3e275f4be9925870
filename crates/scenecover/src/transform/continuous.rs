use crate::error::Result;
use crate::geom2::GeomCfg;
use crate::model::{AreaOfInterest, CandidateItem};

use super::subdivision::Subdivision;
use super::{diagnostics, empty_ranges, footprints, Transformed, Transformer};

/// Exact elements from a planar subdivision of the AOI.
///
/// Pieces owned by the same set of candidates are merged into one element, so
/// the element count is bounded by the number of distinct owner sets rather
/// than by the number of fragments clipping produces.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContinuousTransformer {
    cfg: GeomCfg,
}

impl ContinuousTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cfg(mut self, cfg: GeomCfg) -> Self {
        self.cfg = cfg;
        self
    }
}

impl Transformer for ContinuousTransformer {
    fn tag(&self) -> &'static str {
        "continuous"
    }

    fn transform(&self, aoi: &AreaOfInterest, candidates: &[CandidateItem]) -> Result<Transformed> {
        let fps = footprints(&aoi.polygon, candidates, &self.cfg);
        let mut sub = Subdivision::new(&aoi.polygon, self.cfg);
        for (owner, f) in fps.iter().enumerate() {
            sub.insert(owner, &f.pieces);
        }
        let mut ranges = empty_ranges(&fps);
        let (universe, residual) = sub.build(&aoi.polygon, &mut ranges);
        tracing::debug!(
            pieces = sub.len(),
            elements = universe.len(),
            residual,
            "continuous universe built"
        );
        let diagnostics = diagnostics(candidates.len(), &ranges, &universe, residual);
        Ok(Transformed {
            universe,
            ranges,
            diagnostics,
        })
    }
}
