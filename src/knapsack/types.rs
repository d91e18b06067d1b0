//! Forward knapsack items and capacity window.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An item kind that can be packed any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Display label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Weight (volume) of one unit. Must be at least 1.
    pub weight: i64,
    /// Value (energy) of one unit. Must be non-negative.
    pub value: i64,
}

impl Item {
    pub fn new(weight: i64, value: i64) -> Self {
        Self {
            name: String::new(),
            weight,
            value,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Allowed range `[min, max]` of the total packed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnapsackWindow {
    pub min: i64,
    pub max: i64,
}

impl KnapsackWindow {
    /// Total weight in `[0, limit]`.
    pub fn at_most(limit: i64) -> Self {
        Self { min: 0, max: limit }
    }

    /// Total weight in `[min, max]`.
    pub fn between(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Total weight in `[min - 1, max + 1]`, clamped at zero.
    pub fn around(min: i64, max: i64) -> Self {
        Self {
            min: min.saturating_sub(1).max(0),
            max: max.saturating_add(1),
        }
    }
}
