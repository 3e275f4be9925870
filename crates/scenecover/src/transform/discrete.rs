//! Grid-cell elements.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GeometryError, Result};
use crate::geom2::GeomCfg;
use crate::grid::{CellId, Discretizer, Mode};
use crate::model::{AreaOfInterest, CandidateItem, ElementId, Universe};

use super::{diagnostics, empty_ranges, footprints, Transformed, Transformer};

/// Elements are the AOI's aggressive grid cells that some candidate reaches,
/// each worth `delta²`.
///
/// The AOI's own `delta`, when set, takes precedence over the one given here.
#[derive(Clone, Copy, Debug)]
pub struct DiscreteTransformer {
    delta: f64,
    cfg: GeomCfg,
}

impl DiscreteTransformer {
    pub fn new(delta: f64) -> Result<Self> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(GeometryError::InvalidDelta(delta));
        }
        Ok(Self {
            delta,
            cfg: GeomCfg::default(),
        })
    }

    pub fn with_cfg(mut self, cfg: GeomCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }
}

impl Transformer for DiscreteTransformer {
    fn tag(&self) -> &'static str {
        "discrete"
    }

    fn transform(&self, aoi: &AreaOfInterest, candidates: &[CandidateItem]) -> Result<Transformed> {
        let delta = aoi.delta.unwrap_or(self.delta);
        let grid = Discretizer::new(delta, Mode::Aggressive)?.with_cfg(self.cfg);
        let aoi_cells = grid.discretize(&aoi.polygon);

        let fps = footprints(&aoi.polygon, candidates, &self.cfg);
        let cell_sets: Vec<BTreeSet<CellId>> = fps
            .iter()
            .map(|f| {
                f.pieces
                    .iter()
                    .flat_map(|piece| grid.discretize(piece))
                    .filter(|id| aoi_cells.contains(id))
                    .collect()
            })
            .collect();

        let reachable: BTreeSet<CellId> = cell_sets.iter().flatten().copied().collect();
        let index: BTreeMap<CellId, ElementId> = reachable
            .iter()
            .enumerate()
            .map(|(k, &id)| (id, ElementId(k)))
            .collect();

        let cell_value = grid.cell_area();
        let residual = (aoi.area() - reachable.len() as f64 * cell_value).max(0.0);
        let values = std::iter::repeat(cell_value)
            .take(reachable.len())
            .chain(std::iter::once(residual));
        let universe = Universe::new(aoi.polygon.clone(), values);

        let mut ranges = empty_ranges(&fps);
        for (range, cells) in ranges.iter_mut().zip(&cell_sets) {
            range.elements = cells
                .iter()
                .filter_map(|id| index.get(id))
                .map(|&e| universe.element(e))
                .collect();
        }

        tracing::debug!(
            delta,
            aoi_cells = aoi_cells.len(),
            reachable = reachable.len(),
            residual,
            "discrete universe built"
        );
        let diagnostics = diagnostics(candidates.len(), &ranges, &universe, residual);
        Ok(Transformed {
            universe,
            ranges,
            diagnostics,
        })
    }
}
