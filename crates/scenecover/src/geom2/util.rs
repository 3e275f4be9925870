use super::types::Point;

#[inline]
pub(crate) fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of triangle `abc`; positive when `a→b→c` turns left.
#[inline]
pub(crate) fn orient(a: Point, b: Point, c: Point) -> f64 {
    cross(b - a, c - a)
}

/// Distance from `p` to the closed segment `ab` is at most `eps`.
pub(crate) fn on_segment(p: Point, a: Point, b: Point, eps: f64) -> bool {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm() <= eps;
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (a + ab * t - p).norm() <= eps
}

/// Closed segments `ab` and `cd` share at least one point (touching counts).
pub(crate) fn segments_intersect(a: Point, b: Point, c: Point, d: Point, eps: f64) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);
    let straddles = |u: f64, v: f64| (u > eps && v < -eps) || (u < -eps && v > eps);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    on_segment(a, c, d, eps)
        || on_segment(b, c, d, eps)
        || on_segment(c, a, b, eps)
        || on_segment(d, a, b, eps)
}

/// Signed shoelace area of an open ring (closure implicit).
pub(crate) fn ring_signed_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        acc += cross(pts[i], pts[(i + 1) % n]);
    }
    0.5 * acc
}

/// Drop repeated vertices (including a repeated closing vertex), spikes and
/// collinear interior vertices. May return fewer than 3 points.
pub(crate) fn clean_ring(points: &[Point], eps: f64) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if pts.last().map_or(true, |q: &Point| (p - *q).norm() > eps) {
            pts.push(p);
        }
    }
    while pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() <= eps {
        pts.pop();
    }
    let mut changed = true;
    while changed && pts.len() >= 3 {
        changed = false;
        let n = pts.len();
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let cur = pts[i];
            let next = pts[(i + 1) % n];
            let scale = (next - prev).norm().max(1.0);
            if orient(prev, cur, next).abs() <= eps * scale {
                pts.remove(i);
                changed = true;
                break;
            }
        }
    }
    pts
}

/// Inclusive point-in-triangle test for a counterclockwise triangle.
#[inline]
pub(crate) fn in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0
}
