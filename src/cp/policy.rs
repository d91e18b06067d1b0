//! Enumeration policies built on [`SearchEngine::next_solution`].
//!
//! - [`SearchPolicy::FindOne`]: branch-and-bound; every solution tightens
//!   the objective cut strictly, so the last one found is optimal once the
//!   tree is exhausted.
//! - [`SearchPolicy::FindAllOptimal`]: two passes. The first establishes
//!   the optimal objective as `FindOne` does, the second re-searches with
//!   the objective fixed to that value and accepts every solution.
//! - [`SearchPolicy::FindAll`]: no objective cut; every solution is
//!   accepted.
//!
//! A policy that exhausts the tree without a solution accepts nothing.
//! Running out of budget is reported as [`Error::Aborted`].

use super::engine::{LeafSolution, SearchBudget, SearchEngine, SearchEvent, SearchStats};
use super::model::{LinearModel, ObjectiveSense};
use crate::error::{Error, Result};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which solutions a solve reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchPolicy {
    /// A single optimal solution.
    #[default]
    FindOne,
    /// Every optimal solution, without duplicates.
    FindAllOptimal,
    /// Every feasible solution within the ceilings.
    FindAll,
}

/// Summary of a policy run. Accepted solutions are delivered through the
/// callback given to [`run_policy`].
#[derive(Debug, Clone, Default)]
pub struct PolicyOutcome {
    /// Best objective value seen, if any solution exists.
    pub optimum: Option<i64>,
    /// Whether the search proved `optimum` optimal (or proved there is
    /// no solution).
    pub proven_optimal: bool,
    /// Number of solutions handed to the callback.
    pub accepted: usize,
    /// Combined search counters of all passes.
    pub stats: SearchStats,
}

/// Runs `policy` on `model`, calling `accept` for every accepted solution
/// in discovery order.
///
/// With `stop_after_first`, `FindOne` returns the first feasible solution
/// without proving optimality; the flag is ignored by the other policies.
pub fn run_policy<F>(
    model: &LinearModel,
    policy: SearchPolicy,
    budget: &SearchBudget,
    stop_after_first: bool,
    mut accept: F,
) -> Result<PolicyOutcome>
where
    F: FnMut(LeafSolution),
{
    match policy {
        SearchPolicy::FindOne => {
            let incumbent = branch_and_bound(model, budget.clone(), stop_after_first)?;
            let optimum = incumbent.best.as_ref().map(|leaf| leaf.objective);
            let accepted = usize::from(incumbent.best.is_some());
            if let Some(best) = incumbent.best {
                accept(best);
            }
            Ok(PolicyOutcome {
                optimum,
                proven_optimal: incumbent.proven,
                accepted,
                stats: incumbent.stats,
            })
        }
        SearchPolicy::FindAllOptimal => {
            let incumbent = branch_and_bound(model, budget.clone(), false)?;
            let mut stats = incumbent.stats;
            let Some(best) = incumbent.best else {
                return Ok(PolicyOutcome {
                    optimum: None,
                    proven_optimal: true,
                    accepted: 0,
                    stats,
                });
            };
            let optimum = best.objective;
            log::debug!("{}: optimum {optimum} established, collecting ties", model.name);

            let rest = budget.remaining(stats.nodes, Duration::from_millis(stats.elapsed_ms));
            let mut engine = SearchEngine::new(model, rest)?;
            engine.restrict_objective(optimum, optimum);
            let accepted = drain(&mut engine, &mut accept);
            stats.absorb(&engine.stats());
            let accepted = accepted.map_err(|found| aborted(&stats, found))?;
            Ok(PolicyOutcome {
                optimum: Some(optimum),
                proven_optimal: true,
                accepted,
                stats,
            })
        }
        SearchPolicy::FindAll => {
            let mut engine = SearchEngine::new(model, budget.clone())?;
            let mut optimum: Option<i64> = None;
            let accepted = drain(&mut engine, |leaf: LeafSolution| {
                if optimum.map_or(true, |o| model.sense.improves(leaf.objective, o)) {
                    optimum = Some(leaf.objective);
                }
                accept(leaf);
            });
            let stats = engine.stats();
            let accepted = accepted.map_err(|found| aborted(&stats, found))?;
            Ok(PolicyOutcome {
                optimum,
                proven_optimal: true,
                accepted,
                stats,
            })
        }
    }
}

struct Incumbent {
    best: Option<LeafSolution>,
    stats: SearchStats,
    proven: bool,
}

fn branch_and_bound(
    model: &LinearModel,
    budget: SearchBudget,
    stop_after_first: bool,
) -> Result<Incumbent> {
    let mut engine = SearchEngine::new(model, budget)?;
    let mut best: Option<LeafSolution> = None;
    loop {
        match engine.next_solution() {
            SearchEvent::Solution(leaf) => {
                log::debug!("{}: incumbent objective {}", model.name, leaf.objective);
                engine.bound_objective(strict_cut(model.sense, leaf.objective));
                best = Some(leaf);
                if stop_after_first {
                    return Ok(Incumbent {
                        best,
                        stats: engine.stats(),
                        proven: false,
                    });
                }
            }
            SearchEvent::Exhausted => {
                return Ok(Incumbent {
                    best,
                    stats: engine.stats(),
                    proven: true,
                });
            }
            SearchEvent::Aborted => {
                return Err(aborted(&engine.stats(), usize::from(best.is_some())));
            }
        }
    }
}

/// Feeds every remaining solution to `accept`. Returns the count, or the
/// count so far as `Err` when the budget runs out.
fn drain<F>(engine: &mut SearchEngine, mut accept: F) -> std::result::Result<usize, usize>
where
    F: FnMut(LeafSolution),
{
    let mut accepted = 0;
    loop {
        match engine.next_solution() {
            SearchEvent::Solution(leaf) => {
                accept(leaf);
                accepted += 1;
            }
            SearchEvent::Exhausted => return Ok(accepted),
            SearchEvent::Aborted => return Err(accepted),
        }
    }
}

/// The objective cut that admits only strict improvements on `objective`.
fn strict_cut(sense: ObjectiveSense, objective: i64) -> i64 {
    match sense {
        ObjectiveSense::Minimize => objective.saturating_sub(1),
        ObjectiveSense::Maximize => objective.saturating_add(1),
    }
}

fn aborted(stats: &SearchStats, solutions_found: usize) -> Error {
    Error::Aborted {
        nodes: stats.nodes,
        solutions_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::CapacityRelation;

    fn model(weights: &[i64], coefs: &[i64], target: i64) -> LinearModel {
        let mut m = LinearModel::new("policy", ObjectiveSense::Minimize, 99_999);
        for (&w, &c) in weights.iter().zip(coefs) {
            m.add_term(w, c, 50);
        }
        m.set_capacity(CapacityRelation::Exactly(target));
        m
    }

    fn collect(m: &LinearModel, policy: SearchPolicy) -> (Vec<LeafSolution>, PolicyOutcome) {
        let mut found = Vec::new();
        let outcome = run_policy(m, policy, &SearchBudget::unlimited(), false, |leaf| {
            found.push(leaf)
        })
        .unwrap();
        (found, outcome)
    }

    #[test]
    fn test_find_one() {
        let m = model(&[2, 7, 3], &[50, 71, 20], 14);
        let (found, outcome) = collect(&m, SearchPolicy::FindOne);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].counts, vec![1, 0, 4]);
        assert_eq!(outcome.optimum, Some(130));
        assert!(outcome.proven_optimal);
    }

    #[test]
    fn test_stop_after_first() {
        let m = model(&[2, 7, 3], &[50, 71, 20], 14);
        let mut found = Vec::new();
        let outcome = run_policy(
            &m,
            SearchPolicy::FindOne,
            &SearchBudget::unlimited(),
            true,
            |leaf| found.push(leaf),
        )
        .unwrap();
        assert_eq!(found[0].counts, vec![0, 2, 0]);
        assert!(!outcome.proven_optimal);
    }

    #[test]
    fn test_find_all_optimal_ties() {
        // 2a + 3b + 6c == 6 at unit cost 1 each: only (0,0,1) costs 1
        let m = model(&[2, 3, 6], &[1, 1, 1], 6);
        let (found, outcome) = collect(&m, SearchPolicy::FindAllOptimal);
        assert_eq!(outcome.optimum, Some(1));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].counts, vec![0, 0, 1]);

        // equal costs per unit of capacity produce ties
        let m = model(&[1, 2], &[1, 2], 4);
        let (found, outcome) = collect(&m, SearchPolicy::FindAllOptimal);
        assert_eq!(outcome.optimum, Some(4));
        let counts: Vec<Vec<i64>> = found.into_iter().map(|l| l.counts).collect();
        assert_eq!(counts, vec![vec![0, 2], vec![2, 1], vec![4, 0]]);
    }

    #[test]
    fn test_find_all() {
        let m = model(&[2, 7, 3], &[50, 71, 20], 14);
        let (found, outcome) = collect(&m, SearchPolicy::FindAll);
        assert_eq!(found.len(), 5);
        assert_eq!(outcome.accepted, 5);
        assert_eq!(outcome.optimum, Some(130));
    }

    #[test]
    fn test_no_solution_is_not_an_error() {
        let m = model(&[5, 5], &[1, 1], 3);
        for policy in [
            SearchPolicy::FindOne,
            SearchPolicy::FindAllOptimal,
            SearchPolicy::FindAll,
        ] {
            let (found, outcome) = collect(&m, policy);
            assert!(found.is_empty());
            assert_eq!(outcome.optimum, None);
        }
    }

    #[test]
    fn test_zero_budget_aborts() {
        let m = model(&[2, 7, 3], &[50, 71, 20], 14);
        let budget = SearchBudget::unlimited().with_max_nodes(0);
        for policy in [
            SearchPolicy::FindOne,
            SearchPolicy::FindAllOptimal,
            SearchPolicy::FindAll,
        ] {
            let err = run_policy(&m, policy, &budget, false, |_| {}).unwrap_err();
            assert_eq!(
                err,
                Error::Aborted {
                    nodes: 0,
                    solutions_found: 0
                }
            );
        }
    }

    #[test]
    fn test_strict_cut() {
        assert_eq!(strict_cut(ObjectiveSense::Minimize, 10), 9);
        assert_eq!(strict_cut(ObjectiveSense::Maximize, 10), 11);
        assert_eq!(strict_cut(ObjectiveSense::Maximize, i64::MAX), i64::MAX);
    }
}
