//! Constraint Programming (CP) engine for weighted-sum models.
//!
//! Solves exactly one constraint shape: bounded integer count variables
//! linked by a linear capacity relation and a linear objective.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`], [`Domains`]: bounded integer domains
//! - **Model**: [`LinearModel`]: weights, objective coefficients, capacity relation
//! - **Propagator**: [`WeightedSumPropagator`]: bounds consistency on both sums
//! - **Engine**: [`SearchEngine`]: resumable depth-first search with an
//!   explicit choice-point stack and a node/time budget
//! - **Policies**: [`run_policy`] with [`SearchPolicy`]: single optimum,
//!   all optima, or all solutions, built on [`SearchEngine::next_solution`]
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod engine;
mod model;
mod policy;
mod propagator;
mod variables;

pub use engine::{
    LeafSolution, SearchBudget, SearchEngine, SearchEvent, SearchState, SearchStats,
};
pub use model::{CapacityRelation, LinearModel, LinearTerm, ObjectiveSense};
pub use policy::{run_policy, PolicyOutcome, SearchPolicy};
pub use propagator::{Conflict, Propagation, WeightedSumPropagator};
pub use variables::{Domains, IntVar};
