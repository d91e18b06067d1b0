//! Property tests for the allocation policies against exhaustive
//! enumeration.

use proptest::prelude::*;
use u_knapsack::alloc::{solve, AllocConfig, AllocProblem, AllocRunner, SearchPolicy};
use u_knapsack::catalog::ResourceCatalog;

/// Every count vector in `[0, max_count]^n` that serves `target` exactly
/// within `max_cost`, in lexicographic order, with its cost.
fn feasible(catalog: &ResourceCatalog, target: i64, max_count: i64, max_cost: i64) -> Vec<(Vec<i64>, i64)> {
    let caps = catalog.capacities();
    let costs = catalog.cost_coefficients();
    let n = caps.len();
    let mut out = Vec::new();
    let mut counts = vec![0i64; n];
    loop {
        let cap: i64 = counts.iter().zip(&caps).map(|(x, w)| x * w).sum();
        let cost: i64 = counts.iter().zip(&costs).map(|(x, c)| x * c).sum();
        if cap == target && cost <= max_cost {
            out.push((counts.clone(), cost));
        }
        // odometer with the last index fastest, so output is lexicographic
        let mut i = n;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            counts[i] += 1;
            if counts[i] <= max_count {
                break;
            }
            counts[i] = 0;
        }
    }
}

fn catalog_strategy() -> impl Strategy<Value = ResourceCatalog> {
    prop::collection::vec((1i64..=6, 0u32..=30), 1..=3).prop_map(|types| {
        let mut builder = ResourceCatalog::builder();
        for (capacity, cost) in types {
            builder = builder.add_type(capacity, cost as f64);
        }
        builder.build().unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn find_all_matches_enumeration(
        catalog in catalog_strategy(),
        target in 0i64..=20,
        max_count in 0i64..=6,
        max_cost in 0i64..=200,
    ) {
        let set = solve(&catalog, target, max_count, max_cost, SearchPolicy::FindAll).unwrap();
        let found: Vec<(Vec<i64>, i64)> =
            set.iter().map(|a| (a.counts.clone(), a.total_cost)).collect();
        prop_assert_eq!(found, feasible(&catalog, target, max_count, max_cost));

        let caps = catalog.capacities();
        for a in &set {
            prop_assert!(a.counts.iter().all(|&x| x >= 0));
            let cap: i64 = a.counts.iter().zip(&caps).map(|(x, w)| x * w).sum();
            prop_assert_eq!(cap, target);
            prop_assert_eq!(a.total_capacity(), target);
        }
    }

    #[test]
    fn find_one_is_optimal(
        catalog in catalog_strategy(),
        target in 0i64..=20,
        max_count in 0i64..=6,
    ) {
        let all = feasible(&catalog, target, max_count, 99_999);
        let set = solve(&catalog, target, max_count, 99_999, SearchPolicy::FindOne).unwrap();
        match all.iter().map(|(_, c)| *c).min() {
            None => prop_assert!(set.is_empty()),
            Some(min) => {
                prop_assert_eq!(set.len(), 1);
                prop_assert_eq!(set.get(0).unwrap().total_cost(), min);
            }
        }
    }

    #[test]
    fn find_all_optimal_is_min_cost_subset(
        catalog in catalog_strategy(),
        target in 0i64..=20,
        max_count in 0i64..=6,
    ) {
        let all = feasible(&catalog, target, max_count, 99_999);
        let set = solve(&catalog, target, max_count, 99_999, SearchPolicy::FindAllOptimal).unwrap();
        let expected: Vec<Vec<i64>> = match all.iter().map(|(_, c)| *c).min() {
            None => vec![],
            Some(min) => all.iter().filter(|(_, c)| *c == min).map(|(x, _)| x.clone()).collect(),
        };
        let found: Vec<Vec<i64>> = set.iter().map(|a| a.counts.clone()).collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn solve_is_deterministic(
        catalog in catalog_strategy(),
        target in 0i64..=20,
    ) {
        for policy in [SearchPolicy::FindOne, SearchPolicy::FindAllOptimal, SearchPolicy::FindAll] {
            let a = solve(&catalog, target, 5, 99_999, policy).unwrap();
            let b = solve(&catalog, target, 5, 99_999, policy).unwrap();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn raising_max_count_keeps_solutions(
        catalog in catalog_strategy(),
        target in 0i64..=20,
        max_count in 0i64..=5,
    ) {
        let low = solve(&catalog, target, max_count, 99_999, SearchPolicy::FindAll).unwrap();
        let high = solve(&catalog, target, max_count + 1, 99_999, SearchPolicy::FindAll).unwrap();
        for a in &low {
            prop_assert!(high.iter().any(|b| b.counts == a.counts));
        }
    }

    #[test]
    fn zero_node_budget_always_aborts(
        catalog in catalog_strategy(),
        target in 0i64..=20,
    ) {
        let config = AllocConfig::default().with_max_nodes(0);
        let err = AllocRunner::run(&AllocProblem::new(catalog, target), &config).unwrap_err();
        prop_assert!(err.is_aborted());
    }
}

#[test]
fn vehicle_example_is_optimal() {
    let catalog = ResourceCatalog::builder()
        .add_type(2, 50.0)
        .add_type(7, 71.0)
        .add_type(3, 20.0)
        .build()
        .unwrap();
    let all = feasible(&catalog, 14, 50, 99_999);
    let cheapest = all.iter().map(|(_, c)| *c).min().unwrap();

    let set = solve(&catalog, 14, 50, 99_999, SearchPolicy::FindOne).unwrap();
    let best = set.get(0).unwrap();
    assert_eq!(best.total_capacity(), 14);
    assert_eq!(best.total_cost(), cheapest);
}
