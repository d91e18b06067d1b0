//! Forward knapsack: maximize packed value under a weight window.
//!
//! The dual of [`crate::alloc`]: the same weighted-sum engine, with the
//! capacity relation turned into a window on the total weight and the
//! objective maximized instead of minimized.
//!
//! # References
//!
//! Martello & Toth (1990), "Knapsack Problems: Algorithms and Computer
//! Implementations", ch. 3 (bounded knapsack)

mod config;
mod runner;
mod types;

pub use config::KnapsackConfig;
pub use runner::{KnapsackResult, KnapsackRunner, Packing};
pub use types::{Item, KnapsackWindow};
