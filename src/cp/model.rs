//! CP model definition.

use super::variables::{Domains, IntVar};
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relation between the weighted capacity sum and the requested capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CapacityRelation {
    /// `sum(w_i * x_i) == target`.
    Exactly(i64),
    /// `sum(w_i * x_i) >= target`.
    AtLeast(i64),
    /// `sum(w_i * x_i) <= limit`.
    AtMost(i64),
    /// `lo <= sum(w_i * x_i) <= hi`.
    Between(i64, i64),
}

impl Default for CapacityRelation {
    fn default() -> Self {
        CapacityRelation::Exactly(0)
    }
}

impl CapacityRelation {
    /// The `[lo, hi]` window on the weighted sum, given the largest sum
    /// the variable bounds can reach.
    pub fn window(&self, reachable_max: i64) -> (i64, i64) {
        match *self {
            CapacityRelation::Exactly(t) => (t, t),
            CapacityRelation::AtLeast(t) => (t, reachable_max.max(t)),
            CapacityRelation::AtMost(l) => (0, l),
            CapacityRelation::Between(lo, hi) => (lo, hi),
        }
    }
}

/// Direction of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectiveSense {
    /// Lower objective is better (total cost).
    #[default]
    Minimize,
    /// Higher objective is better (total value).
    Maximize,
}

impl ObjectiveSense {
    /// Whether `candidate` strictly improves on `incumbent`.
    pub fn improves(&self, candidate: i64, incumbent: i64) -> bool {
        match self {
            ObjectiveSense::Minimize => candidate < incumbent,
            ObjectiveSense::Maximize => candidate > incumbent,
        }
    }
}

/// A single linear term: one count variable with its capacity weight,
/// objective coefficient and upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearTerm {
    /// Capacity contributed by one unit.
    pub weight: i64,
    /// Objective contribution of one unit.
    pub coefficient: i64,
    /// Largest allowed count.
    pub max_count: i64,
}

/// A weighted-sum model: `n` bounded count variables, one capacity
/// relation over `sum(weight_i * x_i)` and an objective variable linked
/// by `objective == sum(coefficient_i * x_i)`.
///
/// # Examples
///
/// ```
/// use u_knapsack::cp::{CapacityRelation, LinearModel, ObjectiveSense};
///
/// let mut model = LinearModel::new("inverted", ObjectiveSense::Minimize, 99_999);
/// model.add_term(2, 50, 50);
/// model.add_term(7, 71, 50);
/// model.set_capacity(CapacityRelation::Exactly(14));
/// assert!(model.validate().is_ok());
/// assert_eq!(model.capacity_window(), (14, 14));
/// ```
#[derive(Debug, Clone)]
pub struct LinearModel {
    /// Model name.
    pub name: String,
    /// Terms, in variable order.
    pub terms: Vec<LinearTerm>,
    /// Capacity relation.
    pub capacity: CapacityRelation,
    /// Objective direction.
    pub sense: ObjectiveSense,
    /// Upper bound of the objective variable.
    pub max_objective: i64,
}

impl LinearModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>, sense: ObjectiveSense, max_objective: i64) -> Self {
        Self {
            name: name.into(),
            terms: Vec::new(),
            capacity: CapacityRelation::default(),
            sense,
            max_objective,
        }
    }

    /// Adds a count variable; returns its index.
    pub fn add_term(&mut self, weight: i64, coefficient: i64, max_count: i64) -> usize {
        self.terms.push(LinearTerm {
            weight,
            coefficient,
            max_count,
        });
        self.terms.len() - 1
    }

    /// Sets the capacity relation.
    pub fn set_capacity(&mut self, relation: CapacityRelation) {
        self.capacity = relation;
    }

    /// Number of count variables.
    pub fn var_count(&self) -> usize {
        self.terms.len()
    }

    /// Capacity weights in variable order.
    pub fn weights(&self) -> Vec<i64> {
        self.terms.iter().map(|t| t.weight).collect()
    }

    /// Objective coefficients in variable order.
    pub fn coefficients(&self) -> Vec<i64> {
        self.terms.iter().map(|t| t.coefficient).collect()
    }

    /// Largest weighted sum the count bounds allow (saturating).
    pub fn reachable_capacity(&self) -> i64 {
        self.terms
            .iter()
            .fold(0i64, |acc, t| {
                acc.saturating_add(t.weight.saturating_mul(t.max_count))
            })
    }

    /// The `[lo, hi]` window on the weighted capacity sum.
    pub fn capacity_window(&self) -> (i64, i64) {
        self.capacity.window(self.reachable_capacity())
    }

    /// Initial variable bounds.
    pub fn initial_domains(&self) -> Domains {
        Domains {
            counts: self
                .terms
                .iter()
                .enumerate()
                .map(|(i, t)| IntVar::new(format!("count{i}"), 0, t.max_count))
                .collect(),
            objective: IntVar::new("objective", 0, self.max_objective),
        }
    }

    /// Validates the model.
    ///
    /// Besides range checks, verifies that every weighted sum the
    /// propagator can form fits in `i64`.
    pub fn validate(&self) -> Result<()> {
        if self.terms.is_empty() {
            return Err(Error::InvalidConfig(format!("{}: model has no variables", self.name)));
        }
        if self.max_objective < 0 {
            return Err(Error::InvalidConfig(format!(
                "{}: objective ceiling must be non-negative, got {}",
                self.name, self.max_objective
            )));
        }
        for (i, t) in self.terms.iter().enumerate() {
            if t.weight < 1 {
                return Err(Error::InvalidConfig(format!(
                    "{}: term {i} weight must be at least 1, got {}",
                    self.name, t.weight
                )));
            }
            if t.coefficient < 0 {
                return Err(Error::InvalidConfig(format!(
                    "{}: term {i} coefficient must be non-negative, got {}",
                    self.name, t.coefficient
                )));
            }
            if t.max_count < 0 {
                return Err(Error::InvalidConfig(format!(
                    "{}: term {i} count ceiling must be non-negative, got {}",
                    self.name, t.max_count
                )));
            }
        }

        let overflow = || Error::InvalidConfig(format!("{}: weighted sum overflows i64", self.name));
        let mut capacity_sum = 0i64;
        let mut objective_sum = 0i64;
        for t in &self.terms {
            let w = t.weight.checked_mul(t.max_count).ok_or_else(overflow)?;
            let c = t.coefficient.checked_mul(t.max_count).ok_or_else(overflow)?;
            capacity_sum = capacity_sum.checked_add(w).ok_or_else(overflow)?;
            objective_sum = objective_sum.checked_add(c).ok_or_else(overflow)?;
        }

        let (lo, hi) = self.capacity.window(capacity_sum);
        if lo < 0 || lo > hi {
            return Err(Error::InvalidConfig(format!(
                "{}: capacity window [{lo}, {hi}] is empty or negative",
                self.name
            )));
        }
        Ok(())
    }
}
