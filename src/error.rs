//! Error types for u-knapsack.

use thiserror::Error;

/// Result type alias for u-knapsack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the solve entry points.
///
/// Branch infeasibility is not an error: a search that proves no
/// assignment exists returns an empty solution set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The resource catalog is empty or contains an invalid type.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration or problem parameters are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The node or time budget ran out before the search completed.
    #[error("Search aborted after {nodes} nodes ({solutions_found} solutions found)")]
    Aborted {
        /// Nodes explored before the budget was exceeded.
        nodes: u64,
        /// Solutions accepted before the abort.
        solutions_found: usize,
    },
}

impl Error {
    /// Whether this error was caused by the search budget.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted { .. })
    }
}
