//! Seeded random AOIs and scene catalogs.
//!
//! Model
//! - Shapes start as regular n-gons of unit area, are scaled to the requested
//!   area, then stretched by `diag(0.8, 1.25)` and rotated at random three
//!   times (area preserving), and finally moved to a random position inside
//!   the region.
//! - Scene prices are `area × rate` with `rate` uniform in `price_per_area`.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG, so
//!   item `index` of a catalog can be redrawn on its own.

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom2::{BBox, Point, Polygon};
use crate::model::{AreaOfInterest, CandidateItem};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// Shape and placement parameters.
#[derive(Clone, Copy, Debug)]
pub struct ShapeCfg {
    pub vertex_count: VertexCount,
    /// Target polygon area.
    pub area: f64,
    /// Region the shape must fit in (it is placed fully inside when it fits).
    pub region: BBox,
}

/// Catalog parameters.
#[derive(Clone, Copy, Debug)]
pub struct CatalogCfg {
    pub shape: ShapeCfg,
    pub scenes: usize,
    /// Uniform range of the price per unit area.
    pub price_per_area: (f64, f64),
}

impl Default for CatalogCfg {
    fn default() -> Self {
        Self {
            shape: ShapeCfg {
                vertex_count: VertexCount::Uniform { min: 3, max: 9 },
                area: 0.5,
                region: BBox {
                    min: Point::new(0.0, 0.0),
                    max: Point::new(4.0, 4.0),
                },
            },
            scenes: 50,
            price_per_area: (1.0, 3.0),
        }
    }
}

/// Regular `n`-gon of unit area centred at the origin.
pub fn unit_polygon(n: usize) -> Vec<Point> {
    let n = n.max(3);
    let step = TAU / n as f64;
    // Area of the circumradius-1 n-gon is n/2·sin(2π/n).
    let scale = 1.0 / (0.5 * n as f64 * step.sin()).sqrt();
    (0..n)
        .map(|k| {
            let th = k as f64 * step;
            Point::new(th.cos(), th.sin()) * scale
        })
        .collect()
}

fn draw_shape(cfg: &ShapeCfg, rng: &mut StdRng) -> Polygon {
    let n = cfg.vertex_count.sample(rng);
    let s = cfg.area.max(0.0).sqrt();
    let mut pts: Vec<Point> = unit_polygon(n).into_iter().map(|p| p * s).collect();
    for _ in 0..3 {
        let th = rng.gen::<f64>() * 2.0 * PI;
        let (sin, cos) = th.sin_cos();
        for p in pts.iter_mut() {
            let (x, y) = (p.x * 0.8, p.y * 1.25);
            *p = Point::new(cos * x - sin * y, sin * x + cos * y);
        }
    }
    let bb = BBox::of(&pts).unwrap_or(cfg.region);
    let place = |lo: f64, hi: f64, span: f64, r: &mut StdRng| {
        let free = hi - lo - span;
        if free > 0.0 {
            lo + r.gen::<f64>() * free
        } else {
            lo
        }
    };
    let x = place(cfg.region.min.x, cfg.region.max.x, bb.width(), &mut *rng) - bb.min.x;
    let y = place(cfg.region.min.y, cfg.region.max.y, bb.height(), &mut *rng) - bb.min.y;
    let shift = Point::new(x, y);
    let pts: Vec<Point> = pts.into_iter().map(|p| p + shift).collect();
    // A regular polygon with n ≥ 3 never collapses under these maps.
    Polygon::new(pts).unwrap_or_else(|_| Polygon::rect(x, y, x + s, y + s))
}

/// Draw one random shape for `tok`.
pub fn draw_polygon(cfg: &ShapeCfg, tok: ReplayToken) -> Polygon {
    draw_shape(cfg, &mut tok.rng())
}

/// Scene `tok.index` of a catalog.
pub fn draw_scene(cfg: &CatalogCfg, tok: ReplayToken) -> CandidateItem {
    let mut rng = tok.rng();
    let polygon = draw_shape(&cfg.shape, &mut rng);
    let (lo, hi) = cfg.price_per_area;
    let rate = if hi > lo { rng.gen_range(lo..hi) } else { lo };
    let price = (polygon.area() * rate).max(0.0);
    CandidateItem {
        polygon,
        price,
        label: Some(format!("scene-{}", tok.index)),
    }
}

/// `cfg.scenes` scenes drawn with indices `0..scenes`.
pub fn draw_catalog(cfg: &CatalogCfg, seed: u64) -> Vec<CandidateItem> {
    (0..cfg.scenes as u64)
        .map(|i| draw_scene(cfg, ReplayToken::new(seed, i)))
        .collect()
}

/// An AOI drawn from its own token stream (index `u64::MAX`), so it never
/// repeats a scene of the same seed.
pub fn draw_aoi(cfg: &ShapeCfg, seed: u64) -> AreaOfInterest {
    AreaOfInterest::new(draw_polygon(cfg, ReplayToken::new(seed, u64::MAX)))
}
