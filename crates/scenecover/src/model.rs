//! Coverage model: catalog items, the AOI, and the Universe/Range pair an
//! optimizer consumes.
//!
//! Conventions
//! - `CandidateItem` and `AreaOfInterest` hold a `Polygon` by value plus
//!   their own metadata.
//! - Element ids are dense: `universe.elements[k].id == ElementId(k)`.
//! - Each `Range` owns its own copy of its elements, so an optimizer can strip
//!   claimed elements from one range without touching the others.

use crate::error::{GeometryError, Result};
use crate::geom2::Polygon;

/// A priced catalog polygon ("scene"/"product").
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateItem {
    pub polygon: Polygon,
    pub price: f64,
    pub label: Option<String>,
}

impl CandidateItem {
    /// Fails with `InvalidPrice` for negative or non-finite prices.
    pub fn new(polygon: Polygon, price: f64) -> Result<Self> {
        if !(price.is_finite() && price >= 0.0) {
            return Err(GeometryError::InvalidPrice(price));
        }
        Ok(Self {
            polygon,
            price,
            label: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Target region, optionally carrying its own grid granularity.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaOfInterest {
    pub polygon: Polygon,
    pub delta: Option<f64>,
}

impl AreaOfInterest {
    pub fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            delta: None,
        }
    }

    /// Attach a grid granularity. Fails with `InvalidDelta` unless `delta > 0`.
    pub fn with_delta(mut self, delta: f64) -> Result<Self> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(GeometryError::InvalidDelta(delta));
        }
        self.delta = Some(delta);
        Ok(self)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.polygon.area()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

/// Atomic unit of coverage value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverageElement {
    pub id: ElementId,
    pub value: f64,
}

/// One candidate's cost and the elements it can supply.
#[derive(Clone, Debug)]
pub struct Range {
    /// Index of the candidate in the caller's catalog.
    pub candidate: usize,
    pub cost: f64,
    pub elements: Vec<CoverageElement>,
    /// Candidate ∩ AOI, as interior-disjoint pieces.
    pub footprint: Vec<Polygon>,
}

impl Range {
    pub fn new(candidate: usize, cost: f64, footprint: Vec<Polygon>) -> Self {
        Self {
            candidate,
            cost,
            elements: Vec::new(),
            footprint,
        }
    }

    /// Sum of element values.
    pub fn value(&self) -> f64 {
        self.elements.iter().map(|e| e.value).sum()
    }

    /// `cost / value`; infinite for ranges without value.
    pub fn unit_price(&self) -> f64 {
        let v = self.value();
        if v > 0.0 {
            self.cost / v
        } else {
            f64::INFINITY
        }
    }
}

/// What element values measure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElementModel {
    /// Opaque weights: grid cells, hand-built instances.
    #[default]
    Weighted,
    /// Exact AOI area of disjoint pieces; value and area are interchangeable.
    Area,
}

/// All coverage elements of one AOI.
#[derive(Clone, Debug)]
pub struct Universe {
    pub elements: Vec<CoverageElement>,
    pub total_value: f64,
    pub aoi: Polygon,
    pub aoi_area: f64,
    pub model: ElementModel,
}

impl Universe {
    /// Build from `values`; element `k` gets `ElementId(k)`.
    pub fn new(aoi: Polygon, values: impl IntoIterator<Item = f64>) -> Self {
        let elements: Vec<CoverageElement> = values
            .into_iter()
            .enumerate()
            .map(|(k, value)| CoverageElement {
                id: ElementId(k),
                value,
            })
            .collect();
        let total_value = elements.iter().map(|e| e.value).sum();
        let aoi_area = aoi.area();
        Self {
            elements,
            total_value,
            aoi,
            aoi_area,
            model: ElementModel::Weighted,
        }
    }

    pub fn with_model(mut self, model: ElementModel) -> Self {
        self.model = model;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element `id` as a standalone copy, for handing to a `Range`.
    #[inline]
    pub fn element(&self, id: ElementId) -> CoverageElement {
        self.elements[id.0]
    }

    /// Value covered by the union of `selected` (indices into `ranges`).
    /// Shared elements count once.
    pub fn covered_value(&self, ranges: &[Range], selected: &[usize]) -> f64 {
        let mut seen = vec![false; self.elements.len()];
        let mut total = 0.0;
        for &r in selected {
            for e in &ranges[r].elements {
                if !std::mem::replace(&mut seen[e.id.0], true) {
                    total += self.elements[e.id.0].value;
                }
            }
        }
        total
    }

    /// `covered_value / total_value`; zero for an empty universe.
    pub fn coverage_ratio(&self, ranges: &[Range], selected: &[usize]) -> f64 {
        if self.total_value > 0.0 {
            self.covered_value(ranges, selected) / self.total_value
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::rect(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn rejects_bad_price_and_delta() {
        assert_eq!(
            CandidateItem::new(square(), -1.0),
            Err(GeometryError::InvalidPrice(-1.0))
        );
        assert!(CandidateItem::new(square(), f64::NAN).is_err());
        assert!(CandidateItem::new(square(), 0.0).is_ok());
        assert!(AreaOfInterest::new(square()).with_delta(0.0).is_err());
        assert_eq!(
            AreaOfInterest::new(square()).with_delta(0.5).unwrap().delta,
            Some(0.5)
        );
    }

    #[test]
    fn range_value_and_unit_price() {
        let u = Universe::new(square(), [0.25, 0.25, 0.5]);
        let mut r = Range::new(0, 3.0, vec![]);
        assert_eq!(r.unit_price(), f64::INFINITY);
        r.elements = vec![u.element(ElementId(0)), u.element(ElementId(2))];
        assert_eq!(r.value(), 0.75);
        assert_eq!(r.unit_price(), 4.0);
    }

    #[test]
    fn universes_default_to_weighted_elements() {
        let u = Universe::new(square(), [0.5, 0.5]);
        assert_eq!(u.model, ElementModel::Weighted);
        assert_eq!(u.with_model(ElementModel::Area).model, ElementModel::Area);
    }

    #[test]
    fn shared_elements_count_once() {
        let u = Universe::new(square(), [0.5, 0.5]);
        let mut a = Range::new(0, 1.0, vec![]);
        a.elements = vec![u.element(ElementId(0)), u.element(ElementId(1))];
        let mut b = Range::new(1, 1.0, vec![]);
        b.elements = vec![u.element(ElementId(1))];
        let ranges = [a, b];
        assert_eq!(u.covered_value(&ranges, &[1]), 0.5);
        assert_eq!(u.covered_value(&ranges, &[0, 1]), 1.0);
        assert_eq!(u.coverage_ratio(&ranges, &[]), 0.0);
        assert_eq!(u.coverage_ratio(&ranges, &[1, 0]), 1.0);
    }
}
