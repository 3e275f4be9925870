//! Transformer → Optimizer orchestration and the run report.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::Result;
use crate::geom2::{union_area, GeomCfg, Polygon};
use crate::model::{AreaOfInterest, CandidateItem};
use crate::optimize::{Optimizer, SearchCfg, SearchStats, Status};
use crate::transform::{Diagnostics, Transformer};

/// Per-query settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveCfg {
    pub search: SearchCfg,
    pub geom: GeomCfg,
}

impl SolveCfg {
    pub fn new(target_fraction: f64, time_limit: Option<Duration>) -> Self {
        Self {
            search: SearchCfg {
                target_fraction,
                time_limit,
                ..SearchCfg::default()
            },
            geom: GeomCfg::default(),
        }
    }
}

/// Everything one solve produced. Stages that did not run leave their fields
/// at the defaults (`None`, empty, zero).
#[derive(Clone, Debug, Default, Serialize)]
pub struct SolveReport {
    pub transformer: Option<String>,
    pub optimizer: Option<String>,
    pub target_fraction: f64,
    pub aoi_area: f64,
    pub diagnostics: Option<Diagnostics>,
    pub transform_secs: f64,
    pub optimize_secs: f64,
    /// Catalog indices of the chosen candidates.
    pub selected: Vec<usize>,
    pub selected_labels: Vec<String>,
    pub total_cost: f64,
    /// Covered share of the universe's total value.
    pub coverage_ratio: f64,
    /// Area of the union of the chosen footprints over the AOI area.
    pub geometric_coverage: f64,
    pub status: Option<Status>,
    pub optimal: bool,
    pub stats: Option<SearchStats>,
}

pub struct Solver {
    transformer: Option<Box<dyn Transformer>>,
    optimizer: Option<Box<dyn Optimizer>>,
}

impl Solver {
    pub fn new(
        transformer: Option<Box<dyn Transformer>>,
        optimizer: Option<Box<dyn Optimizer>>,
    ) -> Self {
        Self {
            transformer,
            optimizer,
        }
    }

    /// `"<transformer>::<optimizer>"`, with `none` for a missing stage.
    pub fn tag(&self) -> String {
        format!(
            "{}::{}",
            self.transformer.as_ref().map_or("none", |t| t.tag()),
            self.optimizer.as_ref().map_or("none", |o| o.tag())
        )
    }

    pub fn solve(
        &self,
        aoi: &AreaOfInterest,
        candidates: &[CandidateItem],
        cfg: &SolveCfg,
    ) -> Result<SolveReport> {
        let mut report = SolveReport {
            transformer: self.transformer.as_ref().map(|t| t.tag().to_string()),
            optimizer: self.optimizer.as_ref().map(|o| o.tag().to_string()),
            target_fraction: cfg.search.target_fraction,
            aoi_area: aoi.area(),
            ..SolveReport::default()
        };

        let Some(transformer) = &self.transformer else {
            tracing::warn!("no transformer configured; returning an empty report");
            return Ok(report);
        };
        let t0 = Instant::now();
        let model = transformer.transform(aoi, candidates)?;
        report.transform_secs = t0.elapsed().as_secs_f64();
        tracing::info!(
            transformer = transformer.tag(),
            secs = report.transform_secs,
            elements = model.universe.len(),
            ranges = model.ranges.len(),
            "transform finished"
        );
        report.diagnostics = Some(model.diagnostics.clone());

        let Some(optimizer) = &self.optimizer else {
            tracing::warn!("no optimizer configured; returning the transform report only");
            return Ok(report);
        };
        let t1 = Instant::now();
        let sel = optimizer.optimize(&model.universe, &model.ranges, &cfg.search);
        report.optimize_secs = t1.elapsed().as_secs_f64();
        tracing::info!(
            optimizer = optimizer.tag(),
            secs = report.optimize_secs,
            status = ?sel.status,
            cost = sel.cost,
            "optimize finished"
        );

        report.status = Some(sel.status);
        report.optimal = sel.optimal();
        report.stats = Some(sel.stats);
        if sel.is_feasible() {
            let chosen = &sel.ranges;
            report.selected = chosen.iter().map(|&r| model.ranges[r].candidate).collect();
            report.selected_labels = report
                .selected
                .iter()
                .filter_map(|&c| candidates[c].label.clone())
                .collect();
            report.total_cost = sel.cost;
            report.coverage_ratio = model.universe.coverage_ratio(&model.ranges, chosen);
            let footprints: Vec<Polygon> = chosen
                .iter()
                .flat_map(|&r| model.ranges[r].footprint.iter().cloned())
                .collect();
            if report.aoi_area > 0.0 {
                report.geometric_coverage = union_area(&footprints, &cfg.geom) / report.aoi_area;
            }
        }
        Ok(report)
    }
}
