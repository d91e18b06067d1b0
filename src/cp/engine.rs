//! Resumable backtracking search over a [`LinearModel`].
//!
//! # Algorithm
//!
//! The engine is an explicit state machine:
//!
//! 1. `Propagating`: run the weighted-sum propagator to a fixed point.
//!    A conflict moves to `Backtrack`; all counts fixed moves to
//!    `Solution`; otherwise `Branching`.
//! 2. `Branching`: pick the lowest-index count variable with more than
//!    one value (lexicographic, lower bound first), push the alternative
//!    `x_i >= low + 1` as a choice point, commit `x_i == low`.
//! 3. `Solution`: report the collapsed assignment, then continue as a
//!    forced `Backtrack` so the next call resumes the enumeration.
//! 4. `Backtrack`: restore the most recent choice point and commit its
//!    alternative, or stop at `Exhausted` when the stack is empty.
//!
//! The node budget, time limit and cancellation flag are checked once per
//! `Propagating` step; running out moves to `Aborted`, which is distinct
//! from `Exhausted`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::model::{LinearModel, ObjectiveSense};
use super::propagator::{Propagation, WeightedSumPropagator};
use super::variables::Domains;
use crate::error::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Limits on how much work one search may do.
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    /// Maximum number of propagation nodes.
    pub max_nodes: Option<u64>,
    /// Maximum wall-clock time.
    pub time_limit: Option<Duration>,
    /// External cancellation flag.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchBudget {
    /// No limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The budget left after `used` nodes and `elapsed` time.
    pub fn remaining(&self, used: u64, elapsed: Duration) -> Self {
        Self {
            max_nodes: self.max_nodes.map(|n| n.saturating_sub(used)),
            time_limit: self.time_limit.map(|t| t.saturating_sub(elapsed)),
            cancel: self.cancel.clone(),
        }
    }
}

/// State of the search state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Propagating,
    Branching,
    Solution,
    Backtrack,
    /// No further solutions exist.
    Exhausted,
    /// The budget ran out.
    Aborted,
}

impl SearchState {
    /// Whether the search cannot produce more solutions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Exhausted | SearchState::Aborted)
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Propagation nodes visited.
    pub nodes: u64,
    /// Choice points restored.
    pub backtracks: u64,
    /// Branches pruned by propagation.
    pub conflicts: u64,
    /// Solutions reported.
    pub solutions: u64,
    /// Deepest choice-point stack.
    pub max_depth: usize,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

impl SearchStats {
    /// Adds the counters of another search (sequential passes).
    pub fn absorb(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.backtracks += other.backtracks;
        self.conflicts += other.conflicts;
        self.solutions += other.solutions;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.elapsed_ms += other.elapsed_ms;
    }
}

/// A fully assigned leaf of the search tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSolution {
    /// Value of each count variable.
    pub counts: Vec<i64>,
    /// Weighted capacity sum.
    pub capacity: i64,
    /// Objective value.
    pub objective: i64,
}

/// Result of one [`SearchEngine::next_solution`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Solution(LeafSolution),
    Exhausted,
    Aborted,
}

#[derive(Debug, Clone)]
struct ChoicePoint {
    saved: Domains,
    var: usize,
    min: i64,
}

/// Depth-first search engine with an explicit choice-point stack.
///
/// Not shareable across threads while searching; independent problems
/// use independent engines.
///
/// # Examples
///
/// ```
/// use u_knapsack::cp::{
///     CapacityRelation, LinearModel, ObjectiveSense, SearchBudget, SearchEngine, SearchEvent,
/// };
///
/// let mut model = LinearModel::new("demo", ObjectiveSense::Minimize, 1_000);
/// model.add_term(2, 3, 10);
/// model.add_term(3, 4, 10);
/// model.set_capacity(CapacityRelation::Exactly(6));
///
/// let mut engine = SearchEngine::new(&model, SearchBudget::unlimited()).unwrap();
/// let mut found = Vec::new();
/// while let SearchEvent::Solution(leaf) = engine.next_solution() {
///     found.push(leaf.counts);
/// }
/// assert_eq!(found, vec![vec![0, 2], vec![3, 0]]);
/// ```
#[derive(Debug)]
pub struct SearchEngine {
    propagator: WeightedSumPropagator,
    weights: Vec<i64>,
    coefficients: Vec<i64>,
    sense: ObjectiveSense,
    domains: Domains,
    stack: Vec<ChoicePoint>,
    state: SearchState,
    objective_bound: Option<i64>,
    budget: SearchBudget,
    started: Option<Instant>,
    stats: SearchStats,
}

impl SearchEngine {
    /// Creates an engine positioned at the root of the model's search tree.
    pub fn new(model: &LinearModel, budget: SearchBudget) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            propagator: WeightedSumPropagator::new(model),
            weights: model.weights(),
            coefficients: model.coefficients(),
            sense: model.sense,
            domains: model.initial_domains(),
            stack: Vec::new(),
            state: SearchState::Propagating,
            objective_bound: None,
            budget,
            started: None,
            stats: SearchStats::default(),
        })
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Current variable bounds.
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Search counters so far.
    pub fn stats(&self) -> SearchStats {
        let mut stats = self.stats;
        stats.elapsed_ms = self.elapsed().as_millis() as u64;
        stats
    }

    /// Time since the first [`next_solution`](Self::next_solution) call.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Branch-and-bound cut: from now on only solutions with
    /// `objective <= bound` (minimize) or `objective >= bound` (maximize)
    /// are reported. The cut is re-applied at every propagation node, so
    /// pending choice points inherit it.
    pub fn bound_objective(&mut self, bound: i64) {
        self.objective_bound = Some(match (self.sense, self.objective_bound) {
            (ObjectiveSense::Minimize, Some(b)) => b.min(bound),
            (ObjectiveSense::Maximize, Some(b)) => b.max(bound),
            (_, None) => bound,
        });
    }

    /// Restricts the objective to `[min, max]` on the current node and on
    /// every pending choice point.
    pub fn restrict_objective(&mut self, min: i64, max: i64) {
        for domains in std::iter::once(&mut self.domains)
            .chain(self.stack.iter_mut().map(|cp| &mut cp.saved))
        {
            domains.objective.tighten_min(min);
            domains.objective.tighten_max(max);
        }
    }

    /// Resumes the search and returns the next solution or a terminal
    /// event.
    pub fn next_solution(&mut self) -> SearchEvent {
        let started = *self.started.get_or_insert_with(Instant::now);
        loop {
            match self.state {
                SearchState::Propagating => {
                    if self.budget_exceeded(started) {
                        log::debug!(
                            "search aborted after {} nodes ({} solutions)",
                            self.stats.nodes,
                            self.stats.solutions
                        );
                        self.state = SearchState::Aborted;
                        continue;
                    }
                    self.stats.nodes += 1;
                    self.apply_objective_bound();
                    self.state = match self.propagator.propagate_to_fixpoint(&mut self.domains) {
                        Propagation::Infeasible(conflict) => {
                            log::trace!("depth {}: pruned by {:?}", self.stack.len(), conflict);
                            self.stats.conflicts += 1;
                            SearchState::Backtrack
                        }
                        _ if self.domains.all_counts_fixed() => SearchState::Solution,
                        _ => SearchState::Branching,
                    };
                }
                SearchState::Branching => {
                    let Some(var) = self.domains.first_unfixed() else {
                        self.state = SearchState::Solution;
                        continue;
                    };
                    let low = self.domains.counts[var].min;
                    self.stack.push(ChoicePoint {
                        saved: self.domains.clone(),
                        var,
                        min: low + 1,
                    });
                    self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
                    self.domains.counts[var].max = low;
                    self.state = SearchState::Propagating;
                }
                SearchState::Solution => {
                    self.state = SearchState::Backtrack;
                    if let Some(leaf) = self.materialize() {
                        self.stats.solutions += 1;
                        log::trace!(
                            "solution {}: counts={:?} objective={}",
                            self.stats.solutions,
                            leaf.counts,
                            leaf.objective
                        );
                        return SearchEvent::Solution(leaf);
                    }
                }
                SearchState::Backtrack => match self.stack.pop() {
                    Some(cp) => {
                        self.stats.backtracks += 1;
                        self.domains = cp.saved;
                        self.domains.counts[cp.var].min = cp.min;
                        self.state = SearchState::Propagating;
                    }
                    None => self.state = SearchState::Exhausted,
                },
                SearchState::Exhausted => return SearchEvent::Exhausted,
                SearchState::Aborted => return SearchEvent::Aborted,
            }
        }
    }

    fn budget_exceeded(&self, started: Instant) -> bool {
        if let Some(max) = self.budget.max_nodes {
            if self.stats.nodes >= max {
                return true;
            }
        }
        if let Some(limit) = self.budget.time_limit {
            if started.elapsed() >= limit {
                return true;
            }
        }
        self.budget
            .cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    fn apply_objective_bound(&mut self) {
        if let Some(bound) = self.objective_bound {
            match self.sense {
                ObjectiveSense::Minimize => self.domains.objective.tighten_max(bound),
                ObjectiveSense::Maximize => self.domains.objective.tighten_min(bound),
            };
        }
    }

    fn materialize(&self) -> Option<LeafSolution> {
        let counts = self.domains.count_values()?;
        let capacity = dot(&self.weights, &counts)?;
        let objective = dot(&self.coefficients, &counts)?;
        let (lo, hi) = self.propagator.capacity_window();
        debug_assert!(lo <= capacity && capacity <= hi);
        debug_assert_eq!(self.domains.objective.value(), Some(objective));
        Some(LeafSolution {
            counts,
            capacity,
            objective,
        })
    }
}

impl Iterator for SearchEngine {
    type Item = LeafSolution;

    /// Yields solutions until `Exhausted` or `Aborted`; check
    /// [`SearchEngine::state`] afterwards to tell them apart.
    fn next(&mut self) -> Option<LeafSolution> {
        match self.next_solution() {
            SearchEvent::Solution(leaf) => Some(leaf),
            SearchEvent::Exhausted | SearchEvent::Aborted => None,
        }
    }
}

fn dot(coefs: &[i64], counts: &[i64]) -> Option<i64> {
    coefs
        .iter()
        .zip(counts)
        .try_fold(0i64, |acc, (&k, &x)| acc.checked_add(k.checked_mul(x)?))
}
