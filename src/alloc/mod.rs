//! Inverted knapsack: serve a capacity target at minimum cost.
//!
//! Chooses a non-negative integer count per resource type so that the
//! total capacity equals the target (or, with surplus allowed, meets it)
//! and the total cost is minimal. Depending on the [`SearchPolicy`], a
//! solve reports one optimum, every optimum, or every feasible
//! assignment within the count and cost ceilings.
//!
//! # Example
//!
//! ```
//! use u_knapsack::alloc::{solve, SearchPolicy};
//! use u_knapsack::catalog::ResourceCatalog;
//!
//! let catalog = ResourceCatalog::builder()
//!     .add_type(2, 50.0)
//!     .add_type(7, 71.0)
//!     .add_type(3, 20.0)
//!     .build()
//!     .unwrap();
//! let all = solve(&catalog, 14, 50, 99_999, SearchPolicy::FindAll).unwrap();
//! assert_eq!(all.len(), 5);
//! assert!(all.iter().all(|a| a.total_capacity() == 14));
//! ```

mod config;
mod runner;
mod types;

pub use crate::cp::SearchPolicy;
pub use config::AllocConfig;
pub use runner::{solve, AllocResult, AllocRunner};
pub use types::{AllocProblem, Assignment, SolutionSet, SolutionSink};
