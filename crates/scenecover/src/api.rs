//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI,
//!   benches and experiments. Breaking changes are allowed and expected.
//! - Prefer these re-exports for clarity and consistency across callers.

// Polygon kernel
pub use crate::geom2::{
    clip, difference, intersection, union, union_area, BBox, Boundary, Clip, GeomCfg, Point,
    Polygon,
};
// Grid
pub use crate::grid::{CellId, Discretizer, GridCell, Mode as GridMode};
// Model
pub use crate::model::{
    AreaOfInterest, CandidateItem, CoverageElement, ElementId, ElementModel, Range, Universe,
};
// Transformers
pub use crate::transform::{
    ContinuousTransformer, Diagnostics, DiscreteTransformer, OnlineSession, OnlineTransformer,
    Transformed, Transformer,
};
// Optimizers
pub use crate::optimize::{
    BnbOptimizer, CoverBound, Deadline, DiscreteBound, GreedyOptimizer, OffcutBound, Optimizer,
    SearchCfg, SearchStats, Selection, Status,
};
// Solver
pub use crate::solver::{SolveCfg, SolveReport, Solver};
// Random catalogs
pub use crate::gen::{
    draw_aoi, draw_catalog, draw_polygon, draw_scene, CatalogCfg, ReplayToken as GenReplay,
    ShapeCfg, VertexCount,
};
