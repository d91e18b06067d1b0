//! Allocation solve loop.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::AllocConfig;
use super::types::{AllocProblem, Assignment, SolutionSet, SolutionSink};
use crate::catalog::ResourceCatalog;
use crate::cp::{run_policy, SearchPolicy, SearchStats};
use crate::error::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of an allocation solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocResult {
    /// Accepted assignments in discovery order.
    pub solutions: SolutionSet,

    /// Policy that produced the solutions.
    pub policy: SearchPolicy,

    /// Lowest cost found, if any assignment exists.
    pub optimal_cost: Option<i64>,

    /// Whether the search proved `optimal_cost` (or infeasibility).
    pub proven_optimal: bool,

    /// Search counters across all passes.
    pub stats: SearchStats,
}

impl AllocResult {
    /// The cheapest accepted assignment.
    pub fn best(&self) -> Option<&Assignment> {
        self.solutions.cheapest()
    }

    /// Whether any assignment meets the target within the ceilings.
    pub fn is_feasible(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// Executes allocation solves.
pub struct AllocRunner;

impl AllocRunner {
    /// Solves one problem.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_knapsack::alloc::{AllocConfig, AllocProblem, AllocRunner};
    /// use u_knapsack::catalog::ResourceCatalog;
    ///
    /// let catalog = ResourceCatalog::builder()
    ///     .add_type(2, 50.0)
    ///     .add_type(7, 71.0)
    ///     .add_type(3, 20.0)
    ///     .build()
    ///     .unwrap();
    /// let result = AllocRunner::run(&AllocProblem::new(catalog, 14), &AllocConfig::default()).unwrap();
    /// let best = result.best().unwrap();
    /// assert_eq!(best.counts, vec![1, 0, 4]);
    /// assert_eq!(best.total_cost(), 130);
    /// ```
    pub fn run(problem: &AllocProblem, config: &AllocConfig) -> Result<AllocResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Solves one problem with an optional cancellation token.
    pub fn run_with_cancel(
        problem: &AllocProblem,
        config: &AllocConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AllocResult> {
        let model = problem.build_model(config)?;
        log::debug!(
            "allocating capacity {} over {} resource types ({:?})",
            problem.target,
            problem.catalog.len(),
            config.policy
        );

        let mut sink = match config.policy {
            SearchPolicy::FindAllOptimal => SolutionSink::deduplicating(),
            SearchPolicy::FindOne | SearchPolicy::FindAll => SolutionSink::new(),
        };
        let outcome = run_policy(
            &model,
            config.policy,
            &config.budget(cancel),
            config.stop_after_first,
            |leaf| {
                sink.accept(Assignment::from_leaf(leaf, &problem.catalog));
            },
        )?;

        let solutions = sink.finish();
        log::debug!(
            "{} assignments, optimum {:?}, {} nodes in {} ms",
            solutions.len(),
            outcome.optimum,
            outcome.stats.nodes,
            outcome.stats.elapsed_ms
        );
        Ok(AllocResult {
            solutions,
            policy: config.policy,
            optimal_cost: outcome.optimum,
            proven_optimal: outcome.proven_optimal,
            stats: outcome.stats,
        })
    }

    /// Solves independent problems with the same configuration, each on
    /// its own engine. With the `parallel` feature the problems run on
    /// the rayon thread pool.
    pub fn run_batch(problems: &[AllocProblem], config: &AllocConfig) -> Vec<Result<AllocResult>> {
        #[cfg(feature = "parallel")]
        {
            problems.par_iter().map(|p| Self::run(p, config)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            problems.iter().map(|p| Self::run(p, config)).collect()
        }
    }
}

/// Solves the inverted problem and returns only the solution set.
///
/// An empty set means no assignment serves `target` within `max_count`
/// units per type and `max_cost`.
pub fn solve(
    catalog: &ResourceCatalog,
    target: i64,
    max_count: i64,
    max_cost: i64,
    policy: SearchPolicy,
) -> Result<SolutionSet> {
    let config = AllocConfig::default()
        .with_max_count(max_count)
        .with_max_cost(max_cost)
        .with_policy(policy);
    let problem = AllocProblem::new(catalog.clone(), target);
    AllocRunner::run(&problem, &config).map(|r| r.solutions)
}
