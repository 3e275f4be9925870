//! Weighted geometric set cover over priced scene catalogs.
//!
//! Given an area of interest (AOI) and a catalog of priced candidate
//! polygons, pick candidates covering at least a target fraction of the AOI
//! at minimum total price.
//!
//! Layers (leaves first)
//! - `geom2`: polygon kernel (area, containment, overlap, clip, union).
//! - `grid`: polygon → grid cells, and the packed `CellId`.
//! - `model`: `CandidateItem`, `AreaOfInterest`, `Universe`, `Range`.
//! - `transform`: discrete, continuous and online Universe builders.
//! - `optimize`: greedy and branch-and-bound.
//! - `solver`: runs a transformer then an optimizer and reports.
//! - `gen`: seeded random AOIs and catalogs for tests and benchmarks.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; `api`
//!   collects the names callers usually need.

pub mod api;
pub mod error;
pub mod gen;
pub mod geom2;
pub mod grid;
pub mod model;
pub mod optimize;
pub mod solver;
pub mod transform;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GeometryError, Result};
pub use geom2::{GeomCfg, Polygon};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom2::{Boundary, GeomCfg, Point, Polygon};
    pub use crate::model::{AreaOfInterest, CandidateItem};
    pub use crate::optimize::{BnbOptimizer, GreedyOptimizer, Optimizer, SearchCfg, Status};
    pub use crate::solver::{SolveCfg, SolveReport, Solver};
    pub use crate::transform::{
        ContinuousTransformer, DiscreteTransformer, OnlineTransformer, Transformer,
    };
}
