//! Simple polygon value type (one closed ring, closure implicit).
//!
//! Purpose
//! - Single immutable `Polygon` shared by scenes, AOIs and grid cells; those
//!   types hold a `Polygon` by value instead of re-implementing polygon logic.
//!
//! Conventions
//! - Vertices are stored without a repeated closing vertex. Either winding is
//!   accepted; `signed_area` is positive for counterclockwise rings.
//! - Holes and self-intersections are out of scope and not validated.
//! - Text form is `[[x, y], [x, y], ...]` (parsed with `FromStr`, printed with
//!   `Display`).

use std::fmt;
use std::str::FromStr;

use crate::error::{GeometryError, Result};

use super::clip::intersection_area;
use super::types::{BBox, Boundary, GeomCfg, Point};
use super::util::{clean_ring, in_triangle, on_segment, orient, ring_signed_area, segments_intersect};

/// Duplicate/collinear tolerance applied when a polygon is constructed.
const CLEAN_EPS: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pts: Vec<Point>,
}

impl Polygon {
    /// Build from vertices, dropping repeated and collinear vertices.
    ///
    /// Fails with `TooFewVertices` when fewer than 3 distinct vertices remain.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(GeometryError::NonFinite { index });
        }
        let pts = clean_ring(&points, CLEAN_EPS);
        if pts.len() < 3 {
            return Err(GeometryError::TooFewVertices(pts.len()));
        }
        Ok(Self { pts })
    }

    /// Build from `[x, y]` pairs.
    pub fn from_xy(coords: &[[f64; 2]]) -> Result<Self> {
        Self::new(coords.iter().map(|c| Point::new(c[0], c[1])).collect())
    }

    /// Counterclockwise axis-aligned rectangle. Callers pass `x0 < x1`, `y0 < y1`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            pts: vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
        }
    }

    /// Wrap an already cleaned ring produced by the kernel itself.
    pub(crate) fn from_ring_unchecked(pts: Vec<Point>) -> Self {
        debug_assert!(pts.len() >= 3);
        Self { pts }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    /// Always false for a constructed polygon; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.pts.len();
        (0..n).map(move |i| (self.pts[i], self.pts[(i + 1) % n]))
    }

    /// Shoelace area, positive for counterclockwise winding.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        ring_signed_area(&self.pts)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Same ring with counterclockwise winding.
    pub fn to_ccw(&self) -> Polygon {
        if self.is_ccw() {
            self.clone()
        } else {
            let mut pts = self.pts.clone();
            pts.reverse();
            Polygon { pts }
        }
    }

    pub fn bbox(&self) -> BBox {
        // `pts` is never empty once constructed.
        BBox::of(&self.pts).unwrap_or(BBox {
            min: Point::zeros(),
            max: Point::zeros(),
        })
    }

    /// Area centroid; falls back to the vertex mean for degenerate rings.
    pub fn centroid(&self) -> Point {
        let a = self.signed_area();
        if a.abs() < 1e-300 {
            let sum = self.pts.iter().fold(Point::zeros(), |acc, p| acc + p);
            return sum / self.pts.len() as f64;
        }
        let mut c = Point::zeros();
        for (p, q) in self.edges() {
            let w = p.x * q.y - q.x * p.y;
            c += (p + q) * w;
        }
        c / (6.0 * a)
    }

    /// Convex iff every turn has the winding's sign (collinear turns allowed).
    pub fn is_convex(&self, eps: f64) -> bool {
        let sign = if self.is_ccw() { 1.0 } else { -1.0 };
        let n = self.pts.len();
        (0..n).all(|i| {
            let prev = self.pts[(i + n - 1) % n];
            let cur = self.pts[i];
            let next = self.pts[(i + 1) % n];
            sign * orient(prev, cur, next) >= -eps
        })
    }

    /// Point membership under the default configuration (boundary inclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.contains_cfg(p, &GeomCfg::default())
    }

    /// Even-odd ray test. Points within `cfg.eps_len` of an edge follow `cfg.boundary`.
    pub fn contains_cfg(&self, p: Point, cfg: &GeomCfg) -> bool {
        if self.edges().any(|(a, b)| on_segment(p, a, b, cfg.eps_len)) {
            return cfg.boundary == Boundary::Inclusive;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Any common point, boundary contact included.
    #[inline]
    pub fn intersects(&self, other: &Polygon) -> bool {
        self.intersects_cfg(other, &GeomCfg::default())
    }

    pub fn intersects_cfg(&self, other: &Polygon, cfg: &GeomCfg) -> bool {
        if !self.bbox().intersects(&other.bbox(), cfg.eps_len) {
            return false;
        }
        for (a, b) in self.edges() {
            for (c, d) in other.edges() {
                if segments_intersect(a, b, c, d, cfg.eps_len) {
                    return true;
                }
            }
        }
        // No edge contact: either disjoint or one ring strictly inside the other.
        let inclusive = GeomCfg {
            boundary: Boundary::Inclusive,
            ..*cfg
        };
        other.contains_cfg(self.pts[0], &inclusive) || self.contains_cfg(other.pts[0], &inclusive)
    }

    /// Proper interior overlap: the common area exceeds `eps_area`.
    /// Polygons that only share edges or vertices do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Polygon) -> bool {
        self.overlaps_cfg(other, &GeomCfg::default())
    }

    pub fn overlaps_cfg(&self, other: &Polygon, cfg: &GeomCfg) -> bool {
        if !self.bbox().intersects(&other.bbox(), 0.0) {
            return false;
        }
        intersection_area(self, other, cfg) > cfg.eps_area
    }

    /// Ear-clipping triangulation into counterclockwise triangles.
    ///
    /// Collinear leftovers are skipped. If no ear is found on a numerically
    /// degenerate remainder, the rest is fanned and a warning is logged.
    pub fn triangulate(&self) -> Vec<Polygon> {
        let ring = self.to_ccw().pts;
        let mut idx: Vec<usize> = (0..ring.len()).collect();
        let mut out = Vec::with_capacity(ring.len().saturating_sub(2));
        while idx.len() > 3 {
            let m = idx.len();
            let mut ear = None;
            for k in 0..m {
                let (ip, ic, inx) = (idx[(k + m - 1) % m], idx[k], idx[(k + 1) % m]);
                let (a, b, c) = (ring[ip], ring[ic], ring[inx]);
                if orient(a, b, c) <= 0.0 {
                    continue;
                }
                let blocked = idx
                    .iter()
                    .any(|&j| j != ip && j != ic && j != inx && in_triangle(ring[j], a, b, c));
                if !blocked {
                    ear = Some(k);
                    break;
                }
            }
            match ear {
                Some(k) => {
                    let (ip, ic, inx) = (idx[(k + m - 1) % m], idx[k], idx[(k + 1) % m]);
                    out.push(Polygon {
                        pts: vec![ring[ip], ring[ic], ring[inx]],
                    });
                    idx.remove(k);
                }
                None => {
                    if let Some(k) = (0..m).find(|&k| {
                        orient(ring[idx[(k + m - 1) % m]], ring[idx[k]], ring[idx[(k + 1) % m]])
                            .abs()
                            <= CLEAN_EPS
                    }) {
                        idx.remove(k);
                        continue;
                    }
                    tracing::warn!(vertices = m, "no ear found; fanning remainder");
                    for k in 1..m - 1 {
                        let (a, b, c) = (ring[idx[0]], ring[idx[k]], ring[idx[k + 1]]);
                        if orient(a, b, c) > 0.0 {
                            out.push(Polygon { pts: vec![a, b, c] });
                        }
                    }
                    return out;
                }
            }
        }
        if idx.len() == 3 && orient(ring[idx[0]], ring[idx[1]], ring[idx[2]]) > 0.0 {
            out.push(Polygon {
                pts: vec![ring[idx[0]], ring[idx[1]], ring[idx[2]]],
            });
        }
        out
    }

    /// Counterclockwise convex pieces covering the polygon: itself when convex,
    /// otherwise its triangulation.
    pub(crate) fn convex_parts(&self, cfg: &GeomCfg) -> Vec<Polygon> {
        if self.is_convex(cfg.eps_len) {
            vec![self.to_ccw()]
        } else {
            self.triangulate()
        }
    }
}

impl FromStr for Polygon {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        let coords: Vec<[f64; 2]> =
            serde_json::from_str(s.trim()).map_err(|e| GeometryError::Parse(e.to_string()))?;
        Polygon::from_xy(&coords)
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.pts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", p.x, p.y)?;
        }
        write!(f, "]")
    }
}
