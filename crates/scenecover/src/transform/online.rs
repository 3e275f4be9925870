//! Streaming variant of the continuous transformer.
//!
//! An `OnlineSession` owns the growing subdivision. Candidates are fed one at
//! a time (in catalog order; the feed count is the candidate index) and a
//! Universe can be taken at any point with `snapshot`.

use crate::error::Result;
use crate::geom2::{GeomCfg, Polygon};
use crate::model::{AreaOfInterest, CandidateItem};

use super::subdivision::Subdivision;
use super::{diagnostics, empty_ranges, footprint, Footprint, Transformed, Transformer};

#[derive(Clone, Debug)]
pub struct OnlineSession {
    aoi: Polygon,
    sub: Subdivision,
    kept: Vec<Footprint>,
    fed: usize,
    cfg: GeomCfg,
}

impl OnlineSession {
    pub fn new(aoi: &AreaOfInterest, cfg: GeomCfg) -> Self {
        Self {
            aoi: aoi.polygon.clone(),
            sub: Subdivision::new(&aoi.polygon, cfg),
            kept: Vec::new(),
            fed: 0,
            cfg,
        }
    }

    /// Add the next candidate. Returns `false` when it misses the AOI.
    pub fn feed(&mut self, candidate: &CandidateItem) -> bool {
        let index = self.fed;
        self.fed += 1;
        let Some(f) = footprint(&self.aoi, index, candidate, &self.cfg) else {
            return false;
        };
        self.sub.insert(self.kept.len(), &f.pieces);
        self.kept.push(f);
        true
    }

    /// Number of candidates fed so far (kept or not).
    pub fn fed(&self) -> usize {
        self.fed
    }

    pub fn subdivision(&self) -> &Subdivision {
        &self.sub
    }

    /// Universe and ranges for everything fed so far.
    pub fn snapshot(&self) -> Transformed {
        let mut ranges = empty_ranges(&self.kept);
        let (universe, residual) = self.sub.build(&self.aoi, &mut ranges);
        let diagnostics = diagnostics(self.fed, &ranges, &universe, residual);
        Transformed {
            universe,
            ranges,
            diagnostics,
        }
    }
}

/// `Transformer` facade that streams the whole catalog through a session.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnlineTransformer {
    cfg: GeomCfg,
}

impl OnlineTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cfg(mut self, cfg: GeomCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn session(&self, aoi: &AreaOfInterest) -> OnlineSession {
        OnlineSession::new(aoi, self.cfg)
    }
}

impl Transformer for OnlineTransformer {
    fn tag(&self) -> &'static str {
        "online"
    }

    fn transform(&self, aoi: &AreaOfInterest, candidates: &[CandidateItem]) -> Result<Transformed> {
        let mut session = self.session(aoi);
        let kept = candidates.iter().filter(|c| session.feed(c)).count();
        tracing::debug!(kept, pieces = session.subdivision().len(), "online feed finished");
        Ok(session.snapshot())
    }
}
