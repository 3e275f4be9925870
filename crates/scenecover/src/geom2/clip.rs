//! Clipping, difference and union on simple polygons.
//!
//! Method
//! - Both operands are split into counterclockwise convex parts (the polygon
//!   itself when convex, else an ear-clipping triangulation).
//! - Convex ∩ convex: successive half-plane clipping against each clipper edge.
//! - Convex − convex: edge-by-edge offcut decomposition; the part of the
//!   subject right of edge k (and left of edges 0..k) is one outer piece.
//! - Output pieces are interior-disjoint and each is a simple convex ring,
//!   except where an operand is returned untouched.

use super::polygon::Polygon;
use super::types::{GeomCfg, Point};
use super::util::{clean_ring, cross, ring_signed_area};

/// Partition of a subject polygon by a clipper.
#[derive(Clone, Debug, Default)]
pub struct Clip {
    /// Pieces inside the clipper.
    pub inner: Vec<Polygon>,
    /// Pieces outside the clipper.
    pub outer: Vec<Polygon>,
}

impl Clip {
    pub fn inner_area(&self) -> f64 {
        self.inner.iter().map(Polygon::area).sum()
    }

    pub fn outer_area(&self) -> f64 {
        self.outer.iter().map(Polygon::area).sum()
    }
}

/// Split `a` into the pieces inside and outside `b` (default tolerances).
pub fn clip(a: &Polygon, b: &Polygon) -> Clip {
    clip_cfg(a, b, &GeomCfg::default())
}

pub fn clip_cfg(a: &Polygon, b: &Polygon, cfg: &GeomCfg) -> Clip {
    if !a.bbox().intersects(&b.bbox(), cfg.eps_len) {
        return Clip {
            inner: Vec::new(),
            outer: vec![a.clone()],
        };
    }
    let clipper = b.convex_parts(cfg);
    let mut inner = Vec::new();
    let mut outer = Vec::new();
    for part in a.convex_parts(cfg) {
        let part_box = part.bbox();
        let mut rest: Vec<Vec<Point>> = vec![part.vertices().to_vec()];
        for c in &clipper {
            if !part_box.intersects(&c.bbox(), cfg.eps_len) {
                continue;
            }
            if let Some(p) = convex_intersection(part.vertices(), c.vertices(), cfg) {
                inner.push(p);
            }
            rest = rest
                .into_iter()
                .flat_map(|r| convex_difference(&r, c.vertices(), cfg))
                .collect();
            if rest.is_empty() {
                break;
            }
        }
        outer.extend(rest.into_iter().filter_map(|r| finish_ring(&r, cfg)));
    }
    if inner.is_empty() {
        // Untouched: keep the original ring rather than its fragments.
        return Clip {
            inner,
            outer: vec![a.clone()],
        };
    }
    if outer.is_empty() {
        inner = vec![a.clone()];
    }
    Clip { inner, outer }
}

/// Pieces of `a` inside `b`.
pub fn intersection(a: &Polygon, b: &Polygon) -> Vec<Polygon> {
    clip(a, b).inner
}

/// Pieces of `a` outside `b`.
pub fn difference(a: &Polygon, b: &Polygon) -> Vec<Polygon> {
    difference_cfg(a, b, &GeomCfg::default())
}

pub fn difference_cfg(a: &Polygon, b: &Polygon, cfg: &GeomCfg) -> Vec<Polygon> {
    clip_cfg(a, b, cfg).outer
}

/// Area of `a ∩ b` without materializing the outer pieces.
pub fn intersection_area(a: &Polygon, b: &Polygon, cfg: &GeomCfg) -> f64 {
    if !a.bbox().intersects(&b.bbox(), cfg.eps_len) {
        return 0.0;
    }
    let clipper = b.convex_parts(cfg);
    let mut total = 0.0;
    for part in a.convex_parts(cfg) {
        for c in &clipper {
            if let Some(p) = convex_intersection(part.vertices(), c.vertices(), cfg) {
                total += p.area();
            }
        }
    }
    total
}

/// Merge polygons until no two pieces overlap (default tolerances).
pub fn union(polygons: &[Polygon]) -> Vec<Polygon> {
    union_cfg(polygons, &GeomCfg::default())
}

/// Repeatedly replace the first overlapping pair `(a, b)` by `a` plus the
/// pieces of `b` outside `a`, until no pair overlaps.
///
/// Each merge lowers the summed piece area by the pair's overlap (more than
/// `eps_area`), and that sum never drops below the true union area, so the
/// loop terminates; `max_union_rounds` caps it for degenerate numerics.
pub fn union_cfg(polygons: &[Polygon], cfg: &GeomCfg) -> Vec<Polygon> {
    let mut pieces: Vec<Polygon> = polygons.to_vec();
    let mut rounds = 0usize;
    while let Some((i, j)) = first_overlapping_pair(&pieces, cfg) {
        if rounds >= cfg.max_union_rounds {
            tracing::warn!(rounds, pieces = pieces.len(), "union round cap reached");
            break;
        }
        rounds += 1;
        // j > i, so index i stays valid after the removal.
        let b = pieces.swap_remove(j);
        let rest = difference_cfg(&b, &pieces[i], cfg);
        pieces.extend(rest);
    }
    pieces
}

/// Area covered by the union of `polygons`.
pub fn union_area(polygons: &[Polygon], cfg: &GeomCfg) -> f64 {
    union_cfg(polygons, cfg).iter().map(Polygon::area).sum()
}

fn first_overlapping_pair(pieces: &[Polygon], cfg: &GeomCfg) -> Option<(usize, usize)> {
    let boxes: Vec<_> = pieces.iter().map(Polygon::bbox).collect();
    for i in 0..pieces.len() {
        for j in (i + 1)..pieces.len() {
            if boxes[i].intersects(&boxes[j], 0.0) && pieces[i].overlaps_cfg(&pieces[j], cfg) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Keep the part of convex ring `pts` on one side of the directed line `s→e`.
///
/// Vertices within `eps` of the line are kept on both sides, so the two
/// halves share the cut edge.
fn clip_halfplane(pts: &[Point], s: Point, e: Point, keep_left: bool, eps: f64) -> Vec<Point> {
    let dir = e - s;
    let len = dir.norm();
    if len == 0.0 || pts.is_empty() {
        return pts.to_vec();
    }
    let side = if keep_left { 1.0 } else { -1.0 };
    let dist = |p: Point| side * cross(dir, p - s) / len;
    let n = pts.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        let dc = dist(cur);
        let dn = dist(next);
        if dc >= -eps {
            out.push(cur);
        }
        if (dc > eps && dn < -eps) || (dc < -eps && dn > eps) {
            let t = dc / (dc - dn);
            out.push(cur + (next - cur) * t);
        }
    }
    out
}

fn finish_ring(pts: &[Point], cfg: &GeomCfg) -> Option<Polygon> {
    let ring = clean_ring(pts, cfg.eps_len);
    if ring.len() < 3 || ring_signed_area(&ring).abs() <= cfg.eps_area {
        return None;
    }
    Some(Polygon::from_ring_unchecked(ring))
}

/// Convex subject ∩ convex counterclockwise clipper.
fn convex_intersection(subject: &[Point], clipper: &[Point], cfg: &GeomCfg) -> Option<Polygon> {
    let m = clipper.len();
    let mut out = subject.to_vec();
    for k in 0..m {
        out = clip_halfplane(&out, clipper[k], clipper[(k + 1) % m], true, cfg.eps_len);
        if out.len() < 3 {
            return None;
        }
    }
    finish_ring(&out, cfg)
}

/// Convex subject − convex counterclockwise clipper, as raw convex rings.
fn convex_difference(subject: &[Point], clipper: &[Point], cfg: &GeomCfg) -> Vec<Vec<Point>> {
    let m = clipper.len();
    let mut pieces = Vec::new();
    let mut rest = subject.to_vec();
    for k in 0..m {
        let (s, e) = (clipper[k], clipper[(k + 1) % m]);
        let outside = clip_halfplane(&rest, s, e, false, cfg.eps_len);
        if outside.len() >= 3 && ring_signed_area(&outside).abs() > cfg.eps_area {
            pieces.push(outside);
        }
        rest = clip_halfplane(&rest, s, e, true, cfg.eps_len);
        if rest.len() < 3 || ring_signed_area(&rest).abs() <= cfg.eps_area {
            break;
        }
    }
    pieces
}
