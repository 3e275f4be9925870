//! Planar subdivision of an AOI by candidate footprints.
//!
//! Invariant: the pieces are interior-disjoint and their union is the AOI
//! (up to dropped slivers below `eps_area`). Each piece records the sorted set
//! of owners (range positions) whose footprint contains it.

use std::collections::BTreeMap;

use crate::geom2::{clip_cfg, BBox, GeomCfg, Polygon};
use crate::model::{ElementModel, Range, Universe};

#[derive(Clone, Debug)]
pub struct Piece {
    pub polygon: Polygon,
    pub bbox: BBox,
    pub owners: Vec<usize>,
}

impl Piece {
    fn new(polygon: Polygon, owners: Vec<usize>) -> Self {
        let bbox = polygon.bbox();
        Self {
            polygon,
            bbox,
            owners,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Subdivision {
    pieces: Vec<Piece>,
    cfg: GeomCfg,
}

impl Subdivision {
    /// One piece covering the whole AOI, owned by nobody.
    pub fn new(aoi: &Polygon, cfg: GeomCfg) -> Self {
        Self {
            pieces: vec![Piece::new(aoi.clone(), Vec::new())],
            cfg,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Split every piece that `footprint` overlaps; the inner parts gain `owner`.
    ///
    /// Pieces whose boxes miss a footprint part are not clipped.
    pub fn insert(&mut self, owner: usize, footprint: &[Polygon]) {
        for part in footprint {
            let bb = part.bbox();
            let mut next = Vec::with_capacity(self.pieces.len() + 4);
            let mut split = 0usize;
            for piece in self.pieces.drain(..) {
                if !piece.bbox.intersects(&bb, self.cfg.eps_len)
                    || piece.owners.binary_search(&owner).is_ok()
                {
                    next.push(piece);
                    continue;
                }
                let c = clip_cfg(&piece.polygon, part, &self.cfg);
                if c.inner.is_empty() {
                    next.push(piece);
                    continue;
                }
                split += 1;
                let mut owners = piece.owners.clone();
                if let Err(at) = owners.binary_search(&owner) {
                    owners.insert(at, owner);
                }
                next.extend(c.outer.into_iter().map(|p| Piece::new(p, piece.owners.clone())));
                next.extend(c.inner.into_iter().map(|p| Piece::new(p, owners.clone())));
            }
            self.pieces = next;
            tracing::trace!(owner, split, pieces = self.pieces.len(), "footprint part inserted");
        }
    }

    /// Total area per owner set (in owner-set order) and the owner-less area.
    pub fn aggregate(&self) -> (Vec<(Vec<usize>, f64)>, f64) {
        let mut groups: BTreeMap<&[usize], f64> = BTreeMap::new();
        let mut residual = 0.0;
        for piece in &self.pieces {
            if piece.owners.is_empty() {
                residual += piece.polygon.area();
            } else {
                *groups.entry(piece.owners.as_slice()).or_insert(0.0) += piece.polygon.area();
            }
        }
        let groups = groups.into_iter().map(|(k, v)| (k.to_vec(), v)).collect();
        (groups, residual)
    }

    /// One element per owner set plus the residual element last; fills the
    /// elements of `ranges` (indexed by owner).
    pub(crate) fn build(&self, aoi: &Polygon, ranges: &mut [Range]) -> (Universe, f64) {
        let (groups, residual) = self.aggregate();
        let values = groups
            .iter()
            .map(|(_, v)| *v)
            .chain(std::iter::once(residual));
        let universe = Universe::new(aoi.clone(), values).with_model(ElementModel::Area);
        for (k, (owners, _)) in groups.iter().enumerate() {
            let e = universe.elements[k];
            for &o in owners {
                ranges[o].elements.push(e);
            }
        }
        (universe, residual)
    }
}
