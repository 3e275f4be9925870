use std::time::Duration;

use proptest::prelude::*;

use super::*;
use crate::geom2::Polygon;
use crate::model::{AreaOfInterest, CandidateItem, ElementId, Range, Universe};
use crate::transform::{ContinuousTransformer, DiscreteTransformer, Transformer};

/// Abstract instance: element values plus `(element ids, cost)` per range.
fn instance(values: &[f64], sets: &[(&[usize], f64)]) -> (Universe, Vec<Range>) {
    let u = Universe::new(Polygon::rect(0.0, 0.0, 1.0, 1.0), values.iter().copied());
    let ranges = sets
        .iter()
        .enumerate()
        .map(|(k, (ids, cost))| {
            let mut r = Range::new(k, *cost, Vec::new());
            r.elements = ids.iter().map(|&i| u.element(ElementId(i))).collect();
            r
        })
        .collect();
    (u, ranges)
}

/// Greedy takes the 4-element range first and pays 7.3; the optimum is 6.6.
fn greedy_trap() -> (Universe, Vec<Range>) {
    instance(
        &[1.0; 6],
        &[(&[0, 1, 2, 3], 4.0), (&[0, 1, 2], 3.3), (&[3, 4, 5], 3.3)],
    )
}

fn rect_item(x0: f64, y0: f64, x1: f64, y1: f64, price: f64) -> CandidateItem {
    CandidateItem::new(Polygon::rect(x0, y0, x1, y1), price).unwrap()
}

fn optimizers() -> Vec<Box<dyn Optimizer>> {
    vec![
        Box::new(GreedyOptimizer::new()),
        Box::new(BnbOptimizer::discrete()),
        Box::new(BnbOptimizer::offcut()),
    ]
}

#[test]
fn zero_target_selects_nothing() {
    let (u, ranges) = greedy_trap();
    let cfg = SearchCfg::default().with_target(0.0);
    for opt in optimizers() {
        let sel = opt.optimize(&u, &ranges, &cfg);
        assert!(sel.ranges.is_empty(), "{}", opt.tag());
        assert_eq!(sel.cost, 0.0);
        assert_eq!(sel.status, Status::Optimal);
    }
}

#[test]
fn empty_catalog_is_infeasible() {
    let (u, _) = greedy_trap();
    let cfg = SearchCfg::default().with_target(0.5);
    for opt in optimizers() {
        let sel = opt.optimize(&u, &[], &cfg);
        assert_eq!(sel.status, Status::Infeasible, "{}", opt.tag());
        assert!(!sel.is_feasible());
    }
}

#[test]
fn unreachable_target_is_infeasible() {
    let (u, ranges) = instance(&[1.0, 1.0, 1.0], &[(&[0], 1.0), (&[1], 1.0), (&[], 0.0)]);
    let cfg = SearchCfg::default().with_target(0.9);
    assert_eq!(
        GreedyOptimizer::new().optimize(&u, &ranges, &cfg).status,
        Status::Infeasible
    );
    assert_eq!(
        BnbOptimizer::discrete().optimize(&u, &ranges, &cfg).status,
        Status::Infeasible
    );
    // Reachable with both ranges; the zero-value range is never picked.
    let cfg = SearchCfg::default().with_target(0.6);
    let sel = BnbOptimizer::discrete().optimize(&u, &ranges, &cfg);
    assert_eq!(sel.status, Status::Optimal);
    assert_eq!(sel.ranges, vec![0, 1]);
}

#[test]
fn greedy_ties_go_to_input_order() {
    let (u, ranges) = instance(&[1.0, 1.0], &[(&[0], 2.0), (&[1], 2.0), (&[0, 1], 4.0)]);
    let sel = GreedyOptimizer::new().optimize(&u, &ranges, &SearchCfg::default().with_target(0.5));
    assert_eq!(sel.ranges, vec![0]);
    assert_eq!(sel.status, Status::Feasible);
}

#[test]
fn bnb_beats_greedy_trap() {
    let (u, ranges) = greedy_trap();
    let cfg = SearchCfg::default();
    let g = GreedyOptimizer::new().optimize(&u, &ranges, &cfg);
    assert_eq!(g.ranges, vec![0, 2]);
    assert!((g.cost - 7.3).abs() < 1e-12);

    let b = BnbOptimizer::discrete().optimize(&u, &ranges, &cfg);
    assert!(b.optimal());
    let mut picked = b.ranges.clone();
    picked.sort_unstable();
    assert_eq!(picked, vec![1, 2]);
    assert!((b.cost - 6.6).abs() < 1e-12);
    assert!(b.stats.incumbent_updates >= 1);
    assert!(b.stats.nodes_popped >= 1);
    assert!((u.coverage_ratio(&ranges, &b.ranges) - 1.0).abs() < 1e-12);
}

#[test]
fn zero_deadline_returns_greedy_incumbent() {
    let (u, ranges) = greedy_trap();
    let cfg = SearchCfg::default().with_time_limit(Duration::ZERO);
    let sel = BnbOptimizer::discrete().optimize(&u, &ranges, &cfg);
    assert_eq!(sel.status, Status::Feasible);
    assert!(!sel.optimal());
    assert!((sel.cost - 7.3).abs() < 1e-12);
    assert_eq!(sel.stats.nodes_popped, 1);
}

#[test]
fn full_cover_beats_two_halves() {
    let aoi = AreaOfInterest::new(Polygon::rect(0.0, 0.0, 1.0, 1.0));
    let cands = vec![
        rect_item(0.0, 0.0, 0.5, 1.0, 6.0),
        rect_item(0.5, 0.0, 1.0, 1.0, 6.0),
        rect_item(0.0, 0.0, 1.0, 1.0, 10.0),
    ];
    let t = ContinuousTransformer::new().transform(&aoi, &cands).unwrap();
    for opt in [
        Box::new(BnbOptimizer::discrete()) as Box<dyn Optimizer>,
        Box::new(BnbOptimizer::offcut()),
    ] {
        let sel = opt.optimize(&t.universe, &t.ranges, &SearchCfg::default());
        assert!(sel.optimal(), "{}", opt.tag());
        assert_eq!(sel.ranges, vec![2]);
        assert!((sel.cost - 10.0).abs() < 1e-12);
    }
}

#[test]
fn offcut_and_discrete_bounds_agree_on_area_universes() {
    let aoi = AreaOfInterest::new(Polygon::rect(0.0, 0.0, 2.0, 1.0));
    let cands = vec![
        rect_item(0.0, 0.0, 0.8, 1.0, 3.0),
        rect_item(0.6, 0.0, 1.4, 1.0, 2.0),
        rect_item(1.2, 0.0, 2.0, 1.0, 3.0),
        rect_item(0.0, 0.0, 1.1, 1.0, 5.0),
        rect_item(0.9, 0.0, 2.0, 1.0, 5.5),
        rect_item(0.0, 0.5, 2.0, 1.0, 4.0),
    ];
    let t = ContinuousTransformer::new().transform(&aoi, &cands).unwrap();
    for target in [0.5, 0.8, 1.0] {
        let cfg = SearchCfg::default().with_target(target);
        let d = BnbOptimizer::discrete().optimize(&t.universe, &t.ranges, &cfg);
        let o = BnbOptimizer::offcut().optimize(&t.universe, &t.ranges, &cfg);
        assert!(d.optimal() && o.optimal());
        assert!((d.cost - o.cost).abs() < 1e-9, "target {target}: {} vs {}", d.cost, o.cost);
    }
}

#[test]
fn offcut_bound_on_cell_universe_keeps_optimality() {
    // Off-grid cells make total value (1.44) exceed the AOI area (1.0).
    let aoi = AreaOfInterest::new(Polygon::rect(0.0, 0.0, 1.0, 1.0));
    let cands = vec![
        rect_item(0.0, 0.0, 0.5, 1.0, 4.0),
        rect_item(0.5, 0.0, 1.0, 1.0, 5.0),
        rect_item(0.0, 0.0, 1.0, 1.0, 7.0),
    ];
    let t = DiscreteTransformer::new(0.3).unwrap().transform(&aoi, &cands).unwrap();
    assert!((t.universe.total_value - 1.44).abs() < 1e-9);

    let cfg = SearchCfg::default();
    let g = GreedyOptimizer::new().optimize(&t.universe, &t.ranges, &cfg);
    assert!((g.cost - 9.0).abs() < 1e-12);
    for opt in [
        Box::new(BnbOptimizer::discrete()) as Box<dyn Optimizer>,
        Box::new(BnbOptimizer::offcut()),
    ] {
        let sel = opt.optimize(&t.universe, &t.ranges, &cfg);
        assert!(sel.optimal(), "{}", opt.tag());
        assert_eq!(sel.ranges, vec![2], "{}", opt.tag());
        assert!((sel.cost - 7.0).abs() < 1e-12);
    }
}

#[test]
fn coverage_ratio_grows_with_selection() {
    let (u, ranges) = greedy_trap();
    let mut last = 0.0;
    let mut picked = Vec::new();
    for k in [1, 0, 2] {
        picked.push(k);
        let ratio = u.coverage_ratio(&ranges, &picked);
        assert!(ratio >= last);
        last = ratio;
    }
    assert_eq!(last, 1.0);
}

#[test]
fn deadline_semantics() {
    assert!(!Deadline::never().expired());
    assert!(!Deadline::after(None).expired());
    assert!(Deadline::after(Some(Duration::ZERO)).expired());
    assert!(!Deadline::after(Some(Duration::from_secs(3600))).expired());
}

/// Cheapest subset reaching `need`, by enumeration.
fn brute_force(u: &Universe, ranges: &[Range], cfg: &SearchCfg) -> Option<f64> {
    let target = cfg.target_value(u.total_value);
    let mut best: Option<f64> = None;
    for mask in 0u32..(1 << ranges.len()) {
        let picked: Vec<usize> = (0..ranges.len()).filter(|k| mask & (1 << k) != 0).collect();
        if !cfg.reached(u.covered_value(ranges, &picked), target) {
            continue;
        }
        let cost: f64 = picked.iter().map(|&k| ranges[k].cost).sum();
        if best.map_or(true, |b| cost < b) {
            best = Some(cost);
        }
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bnb_matches_enumeration(
        values in prop::collection::vec(0.5f64..2.0, 8),
        sets in prop::collection::vec(
            (prop::collection::btree_set(0usize..8, 0..5), 0.5f64..10.0),
            1..8,
        ),
        target in 0.2f64..1.0,
    ) {
        let sets: Vec<(Vec<usize>, f64)> =
            sets.into_iter().map(|(s, c)| (s.into_iter().collect(), c)).collect();
        let borrowed: Vec<(&[usize], f64)> = sets.iter().map(|(s, c)| (s.as_slice(), *c)).collect();
        let (u, ranges) = instance(&values, &borrowed);
        let cfg = SearchCfg::default().with_target(target);

        let g = GreedyOptimizer::new().optimize(&u, &ranges, &cfg);
        let b = BnbOptimizer::discrete().optimize(&u, &ranges, &cfg);
        let o = BnbOptimizer::offcut().optimize(&u, &ranges, &cfg);
        match brute_force(&u, &ranges, &cfg) {
            None => {
                prop_assert_eq!(g.status, Status::Infeasible);
                prop_assert_eq!(b.status, Status::Infeasible);
                prop_assert_eq!(o.status, Status::Infeasible);
            }
            Some(opt) => {
                prop_assert_eq!(b.status, Status::Optimal);
                prop_assert!((b.cost - opt).abs() < 1e-9, "bnb {} vs enumeration {}", b.cost, opt);
                prop_assert_eq!(o.status, Status::Optimal);
                prop_assert!((o.cost - opt).abs() < 1e-9, "offcut {} vs enumeration {}", o.cost, opt);
                prop_assert!(g.cost >= b.cost - 1e-9);
                let covered = u.covered_value(&ranges, &b.ranges);
                prop_assert!(cfg.reached(covered, cfg.target_value(u.total_value)));
            }
        }
    }
}
