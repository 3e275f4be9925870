//! Basic 2D types and tolerances used by the polygon kernel.
//!
//! - `GeomCfg`: centralizes epsilons, the boundary policy and the union cap.
//! - `Boundary`: whether points on a polygon's edge count as contained.
//! - `BBox`: axis-aligned bounding box used for cheap rejection tests.

use nalgebra::Vector2;

/// Point in the plane. Alias kept so call sites read like the data model.
pub type Point = Vector2<f64>;

/// Membership policy for points lying on a polygon edge.
///
/// `Inclusive` is the default: a grid cell whose corner sits exactly on a
/// scene edge is still considered inside that scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    #[default]
    Inclusive,
    Exclusive,
}

/// Geometry configuration (tolerances).
///
/// Tolerances are absolute and tuned for coordinates of order 1e-3..1e3;
/// callers with extreme scales should rescale their inputs.
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Distance under which a point is treated as lying on an edge.
    pub eps_len: f64,
    /// Pieces with area at or below this are dropped from clip results.
    pub eps_area: f64,
    pub boundary: Boundary,
    /// Hard cap on pairwise merges performed by `union`.
    pub max_union_rounds: usize,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_len: 1e-9,
            eps_area: 1e-12,
            boundary: Boundary::Inclusive,
            max_union_rounds: 10_000,
        }
    }
}

/// Closed axis-aligned box `[min.x, max.x] × [min.y, max.y]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    /// Bounding box of a non-empty point set. Returns `None` for an empty slice.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut bb = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            bb.min.x = bb.min.x.min(p.x);
            bb.min.y = bb.min.y.min(p.y);
            bb.max.x = bb.max.x.max(p.x);
            bb.max.y = bb.max.y.max(p.y);
        }
        Some(bb)
    }

    /// Closed-box intersection test, enlarged by `eps` on every side.
    #[inline]
    pub fn intersects(&self, other: &BBox, eps: f64) -> bool {
        self.min.x <= other.max.x + eps
            && other.min.x <= self.max.x + eps
            && self.min.y <= other.max.y + eps
            && other.min.y <= self.max.y + eps
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Smallest box containing both.
    pub fn merge(&self, other: &BBox) -> BBox {
        BBox {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}
