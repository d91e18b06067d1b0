//! Allocation solve configuration.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::cp::{SearchBudget, SearchPolicy};
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`AllocRunner`](super::AllocRunner).
///
/// # Examples
///
/// ```
/// use u_knapsack::alloc::{AllocConfig, SearchPolicy};
///
/// let config = AllocConfig::default()
///     .with_policy(SearchPolicy::FindAllOptimal)
///     .with_max_count(20)
///     .with_max_nodes(100_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocConfig {
    /// Largest count per resource type. Bounds the search tree.
    pub max_count: i64,

    /// Largest total cost considered.
    pub max_cost: i64,

    /// Which solutions to report.
    pub policy: SearchPolicy,

    /// Accept capacity above the target (`>=`) instead of requiring an
    /// exact match.
    pub allow_surplus: bool,

    /// For `FindOne`: return the first feasible assignment without
    /// proving optimality.
    pub stop_after_first: bool,

    /// Node budget. `None` = no limit.
    pub max_nodes: Option<u64>,

    /// Wall-clock budget in milliseconds. `None` = no limit.
    pub time_limit_ms: Option<u64>,
}

impl Default for AllocConfig {
    fn default() -> Self {
        Self {
            max_count: 50,
            max_cost: 99_999,
            policy: SearchPolicy::default(),
            allow_surplus: false,
            stop_after_first: false,
            max_nodes: None,
            time_limit_ms: None,
        }
    }
}

impl AllocConfig {
    pub fn with_max_count(mut self, n: i64) -> Self {
        self.max_count = n;
        self
    }

    pub fn with_max_cost(mut self, cost: i64) -> Self {
        self.max_cost = cost;
        self
    }

    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_surplus(mut self, allow: bool) -> Self {
        self.allow_surplus = allow;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_count < 0 {
            return Err(Error::InvalidConfig(format!(
                "max_count must be non-negative, got {}",
                self.max_count
            )));
        }
        if self.max_cost < 0 {
            return Err(Error::InvalidConfig(format!(
                "max_cost must be non-negative, got {}",
                self.max_cost
            )));
        }
        Ok(())
    }

    /// The search budget described by this configuration.
    pub fn budget(&self, cancel: Option<Arc<AtomicBool>>) -> SearchBudget {
        SearchBudget {
            max_nodes: self.max_nodes,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            cancel,
        }
    }
}
