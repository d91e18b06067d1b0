//! Forward knapsack solve loop.

use super::config::KnapsackConfig;
use super::types::{Item, KnapsackWindow};
use crate::cp::{run_policy, CapacityRelation, LinearModel, ObjectiveSense, SearchPolicy, SearchStats};
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The best packing found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Packing {
    /// Count per item, in input order.
    pub counts: Vec<i64>,
    /// Total value.
    pub value: i64,
    /// Total weight.
    pub weight: i64,
}

/// Result of a forward knapsack solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnapsackResult {
    /// Best packing, or `None` when no count vector fits the window.
    pub best: Option<Packing>,
    /// Whether the search proved `best` optimal.
    pub proven_optimal: bool,
    /// Search counters.
    pub stats: SearchStats,
}

/// Executes forward knapsack solves: maximize total value with the total
/// weight inside a window.
pub struct KnapsackRunner;

impl KnapsackRunner {
    /// # Examples
    ///
    /// ```
    /// use u_knapsack::knapsack::{Item, KnapsackConfig, KnapsackRunner, KnapsackWindow};
    ///
    /// let items = vec![Item::new(3, 4), Item::new(4, 6)];
    /// let result =
    ///     KnapsackRunner::run(&items, KnapsackWindow::at_most(10), &KnapsackConfig::default())
    ///         .unwrap();
    /// let best = result.best.unwrap();
    /// assert_eq!(best.value, 14);
    /// assert_eq!(best.counts, vec![2, 1]);
    /// ```
    pub fn run(items: &[Item], window: KnapsackWindow, config: &KnapsackConfig) -> Result<KnapsackResult> {
        let model = Self::build_model(items, window, config)?;
        log::debug!(
            "packing {} items into weight window [{}, {}]",
            items.len(),
            window.min,
            window.max
        );

        let mut best = None;
        let outcome = run_policy(
            &model,
            SearchPolicy::FindOne,
            &config.budget(),
            false,
            |leaf| {
                best = Some(Packing {
                    counts: leaf.counts,
                    value: leaf.objective,
                    weight: leaf.capacity,
                });
            },
        )?;

        log::debug!(
            "best value {:?} after {} nodes",
            outcome.optimum,
            outcome.stats.nodes
        );
        Ok(KnapsackResult {
            best,
            proven_optimal: outcome.proven_optimal,
            stats: outcome.stats,
        })
    }

    fn build_model(items: &[Item], window: KnapsackWindow, config: &KnapsackConfig) -> Result<LinearModel> {
        config.validate()?;
        if items.is_empty() {
            return Err(Error::InvalidCatalog("no items".into()));
        }
        if window.min < 0 || window.min > window.max {
            return Err(Error::InvalidConfig(format!(
                "weight window [{}, {}] is empty or negative",
                window.min, window.max
            )));
        }

        let mut model = LinearModel::new("knapsack", ObjectiveSense::Maximize, config.max_value);
        for (i, item) in items.iter().enumerate() {
            if item.weight < 1 || item.value < 0 {
                return Err(Error::InvalidCatalog(format!(
                    "item {i}: weight must be at least 1 and value non-negative"
                )));
            }
            model.add_term(item.weight, item.value, config.max_count.min(window.max / item.weight));
        }
        model.set_capacity(CapacityRelation::Between(window.min, window.max));
        model.validate()?;
        Ok(model)
    }
}
