//! Forward knapsack configuration.

use std::time::Duration;

use crate::cp::SearchBudget;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`KnapsackRunner`](super::KnapsackRunner).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KnapsackConfig {
    /// Largest count per item. The window further caps each item at
    /// `max / weight`.
    pub max_count: i64,

    /// Upper bound of the total value variable.
    pub max_value: i64,

    /// Node budget. `None` = no limit.
    pub max_nodes: Option<u64>,

    /// Wall-clock budget in milliseconds. `None` = no limit.
    pub time_limit_ms: Option<u64>,
}

impl Default for KnapsackConfig {
    fn default() -> Self {
        Self {
            max_count: 50,
            max_value: 9_999,
            max_nodes: None,
            time_limit_ms: None,
        }
    }
}

impl KnapsackConfig {
    pub fn with_max_count(mut self, n: i64) -> Self {
        self.max_count = n;
        self
    }

    pub fn with_max_value(mut self, value: i64) -> Self {
        self.max_value = value;
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
        if self.max_value < 0 {
            return Err(Error::InvalidConfig(format!(
                "max_value must be non-negative, got {}",
                self.max_value
            )));
        }
        Ok(())
    }

    pub(crate) fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_nodes: self.max_nodes,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            cancel: None,
        }
    }
}
