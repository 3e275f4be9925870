//! Grid discretization and cell indexing.
//!
//! A `Discretizer` maps a polygon to the set of fixed-size grid cells it
//! covers under a `Mode`. Granularity is an explicit field, never ambient
//! state, so two discretizers with different `delta` can coexist.
//!
//! Cell ids pack two zig-zag mapped `i32` indices into one `u64`
//! (`yi` in the high half), so negative grid coordinates round-trip too.

use std::collections::BTreeSet;

use crate::error::{GeometryError, Result};
use crate::geom2::{intersection_area, GeomCfg, Polygon};

/// Index ratios this close to an integer snap to it before floor/ceil.
const SNAP_EPS: f64 = 1e-9;

/// Packed `(xi, yi)` grid index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub u64);

#[inline]
fn zigzag(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

#[inline]
fn unzigzag(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}

impl CellId {
    #[inline]
    pub fn encode(xi: i32, yi: i32) -> Self {
        CellId(((zigzag(yi) as u64) << 32) | zigzag(xi) as u64)
    }

    #[inline]
    pub fn decode(self) -> (i32, i32) {
        let xi = unzigzag(self.0 as u32);
        let yi = unzigzag((self.0 >> 32) as u32);
        (xi, yi)
    }
}

/// One square cell of side `delta` with lower-left corner `(xi·delta, yi·delta)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub xi: i32,
    pub yi: i32,
    pub delta: f64,
}

impl GridCell {
    pub fn from_id(id: CellId, delta: f64) -> Self {
        let (xi, yi) = id.decode();
        Self { xi, yi, delta }
    }

    #[inline]
    pub fn id(&self) -> CellId {
        CellId::encode(self.xi, self.yi)
    }

    pub fn polygon(&self) -> Polygon {
        let x = self.xi as f64 * self.delta;
        let y = self.yi as f64 * self.delta;
        Polygon::rect(x, y, x + self.delta, y + self.delta)
    }
}

/// Containment policy of a discretization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Only cells fully inside the polygon; never overstates coverage.
    Conservative,
    /// Every cell touching the polygon; never understates coverage.
    Aggressive,
}

/// Polygon → cell set mapping for one granularity and mode.
#[derive(Clone, Copy, Debug)]
pub struct Discretizer {
    delta: f64,
    mode: Mode,
    cfg: GeomCfg,
}

impl Discretizer {
    pub fn new(delta: f64, mode: Mode) -> Result<Self> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(GeometryError::InvalidDelta(delta));
        }
        Ok(Self {
            delta,
            mode,
            cfg: GeomCfg::default(),
        })
    }

    pub fn with_cfg(mut self, cfg: GeomCfg) -> Self {
        self.cfg = cfg;
        self
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Area of one cell.
    #[inline]
    pub fn cell_area(&self) -> f64 {
        self.delta * self.delta
    }

    pub fn cell(&self, id: CellId) -> GridCell {
        GridCell::from_id(id, self.delta)
    }

    /// Half-open index ranges `[x0, x1) × [y0, y1)` spanned by `polygon`.
    ///
    /// Conservative narrows the box (ceil for min, floor for max); aggressive
    /// widens it (floor for min, ceil for max).
    pub fn index_box(&self, polygon: &Polygon) -> (i32, i32, i32, i32) {
        let bb = polygon.bbox();
        let (lo, hi): (fn(f64) -> f64, fn(f64) -> f64) = match self.mode {
            Mode::Conservative => (f64::ceil, f64::floor),
            Mode::Aggressive => (f64::floor, f64::ceil),
        };
        let idx = |v: f64, round: fn(f64) -> f64| {
            let t = v / self.delta;
            let r = t.round();
            let t = if (t - r).abs() < SNAP_EPS { r } else { t };
            round(t).clamp(i32::MIN as f64, i32::MAX as f64) as i32
        };
        (
            idx(bb.min.x, lo),
            idx(bb.min.y, lo),
            idx(bb.max.x, hi),
            idx(bb.max.y, hi),
        )
    }

    /// Cells of `polygon` under this discretizer's mode, in id order.
    pub fn discretize(&self, polygon: &Polygon) -> BTreeSet<CellId> {
        let (x0, y0, x1, y1) = self.index_box(polygon);
        let full = self.cell_area() * (1.0 - 1e-9);
        let mut out = BTreeSet::new();
        for xi in x0..x1 {
            for yi in y0..y1 {
                let cell = GridCell {
                    xi,
                    yi,
                    delta: self.delta,
                };
                let poly = cell.polygon();
                let keep = match self.mode {
                    Mode::Conservative => intersection_area(&poly, polygon, &self.cfg) >= full,
                    Mode::Aggressive => poly.intersects_cfg(polygon, &self.cfg),
                };
                if keep {
                    out.insert(cell.id());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_known_values() {
        assert_eq!(CellId::encode(0, 0), CellId(0));
        assert_eq!(CellId::encode(1, 0), CellId(2));
        assert_eq!(CellId::encode(-1, 0), CellId(1));
        assert_eq!(CellId::encode(0, 1), CellId(2 << 32));
        assert_eq!(CellId::encode(i32::MIN, i32::MAX).decode(), (i32::MIN, i32::MAX));
    }

    #[test]
    fn rejects_bad_delta() {
        assert!(Discretizer::new(0.0, Mode::Aggressive).is_err());
        assert!(Discretizer::new(f64::NAN, Mode::Conservative).is_err());
    }

    #[test]
    fn unit_square_cells() {
        let sq = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let cons = Discretizer::new(0.25, Mode::Conservative).unwrap();
        let aggr = Discretizer::new(0.25, Mode::Aggressive).unwrap();
        assert_eq!(cons.discretize(&sq).len(), 16);
        assert_eq!(aggr.discretize(&sq).len(), 16);
    }

    #[test]
    fn off_grid_polygon_brackets_area() {
        let p = Polygon::from_xy(&[[0.05, 0.05], [0.95, 0.1], [0.8, 0.9], [0.1, 0.7]]).unwrap();
        let cons = Discretizer::new(0.1, Mode::Conservative).unwrap();
        let aggr = Discretizer::new(0.1, Mode::Aggressive).unwrap();
        let c = cons.discretize(&p);
        let a = aggr.discretize(&p);
        assert!(c.is_subset(&a));
        let cell = cons.cell_area();
        assert!(c.len() as f64 * cell <= p.area() + 1e-12);
        assert!(a.len() as f64 * cell >= p.area() - 1e-12);
    }

    #[test]
    fn negative_coordinates_are_supported() {
        let p = Polygon::rect(-1.0, -1.0, 0.0, 0.0);
        let d = Discretizer::new(0.5, Mode::Conservative).unwrap();
        let cells = d.discretize(&p);
        assert_eq!(cells.len(), 4);
        for id in cells {
            let cell = d.cell(id);
            assert!(cell.xi < 0 && cell.yi < 0);
            assert!(cell.polygon().area() > 0.0);
        }
    }

    #[test]
    fn cell_polygon_corner() {
        let cell = GridCell {
            xi: 3,
            yi: -2,
            delta: 0.5,
        };
        let p = cell.polygon();
        assert_eq!(p.vertices()[0].x, 1.5);
        assert_eq!(p.vertices()[0].y, -1.0);
        assert_eq!(GridCell::from_id(cell.id(), 0.5), cell);
    }

    proptest! {
        #[test]
        fn encode_decode_round_trip(xi in any::<i32>(), yi in any::<i32>()) {
            prop_assert_eq!(CellId::encode(xi, yi).decode(), (xi, yi));
        }

        #[test]
        fn conservative_subset_of_aggressive(
            x0 in -2.0f64..2.0,
            y0 in -2.0f64..2.0,
            w in 0.05f64..1.5,
            h in 0.05f64..1.5,
            skew in -0.3f64..0.3,
            delta in 0.1f64..0.5,
        ) {
            let p = Polygon::from_xy(&[
                [x0, y0],
                [x0 + w, y0 + skew],
                [x0 + w, y0 + h],
                [x0 - skew, y0 + h],
            ]).unwrap();
            let c = Discretizer::new(delta, Mode::Conservative).unwrap().discretize(&p);
            let a = Discretizer::new(delta, Mode::Aggressive).unwrap().discretize(&p);
            prop_assert!(c.is_subset(&a));
        }
    }
}
