//! Capacity allocation over discrete resource types.
//!
//! Given a catalog of resource types, each contributing a fixed capacity
//! and a fixed cost per unit, chooses a non-negative integer count per
//! type:
//!
//! - **Inverted knapsack** ([`alloc`]): serve a capacity target exactly
//!   (or at least) at minimum cost. Reports a single optimum, every
//!   optimum, or every feasible assignment.
//! - **Forward knapsack** ([`knapsack`]): maximize total value with the
//!   total weight inside a window.
//!
//! Both run on the same constraint engine ([`cp`]): bounded integer
//! domains, a bounds-consistent weighted-sum propagator, and a resumable
//! depth-first search with branch-and-bound and a node/time budget.
//!
//! # Architecture
//!
//! The engine is single-threaded and deterministic: identical inputs give
//! identical solution sets in the same order. Independent problems can be
//! solved concurrently on separate engines (see the `parallel` feature).
//!
//! # Feature Flags
//!
//! - `serde`: serialization of catalogs, configs and results
//! - `parallel`: batch solving on the rayon thread pool
//! - `wasm`: JavaScript bindings

pub mod alloc;
pub mod catalog;
pub mod cp;
pub mod error;
pub mod knapsack;
pub mod report;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
