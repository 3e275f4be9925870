//! 2D polygon kernel.
//!
//! Purpose
//! - One immutable `Polygon` value type with the primitives the coverage
//!   model needs: signed area, point containment, overlap/intersection
//!   predicates, clip into inner/outer pieces, difference and union.
//! - Numerically explicit: every tolerance lives in `GeomCfg`; the
//!   argument-free methods use `GeomCfg::default()`.
//!
//! Predicates
//! - `intersects`: any common point (touching edges count).
//! - `overlaps`: common area above `eps_area` (touching does not count).
//!   `union` merges only overlapping pairs.

mod clip;
mod polygon;
mod types;
mod util;

pub use clip::{
    clip, clip_cfg, difference, difference_cfg, intersection, intersection_area, union, union_area,
    union_cfg, Clip,
};
pub use polygon::Polygon;
pub use types::{BBox, Boundary, GeomCfg, Point};
