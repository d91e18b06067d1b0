//! Allocation problem, assignments and the solution sink.

use std::collections::HashSet;

use crate::catalog::ResourceCatalog;
use crate::cp::{CapacityRelation, LeafSolution, LinearModel, ObjectiveSense};
use crate::error::{Error, Result};

use super::config::AllocConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An inverted-knapsack instance: serve exactly `target` capacity (the
/// group size) from the catalog at minimum cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocProblem {
    /// Resource types, in branching order.
    pub catalog: ResourceCatalog,
    /// Capacity to serve.
    pub target: i64,
}

impl AllocProblem {
    pub fn new(catalog: ResourceCatalog, target: i64) -> Self {
        Self { catalog, target }
    }

    /// Builds the weighted-sum model for this problem.
    pub fn build_model(&self, config: &AllocConfig) -> Result<LinearModel> {
        if self.target < 0 {
            return Err(Error::InvalidConfig(format!(
                "target capacity must be non-negative, got {}",
                self.target
            )));
        }
        config.validate()?;

        let mut model = LinearModel::new("inverted knapsack", ObjectiveSense::Minimize, config.max_cost);
        for resource in &self.catalog {
            model.add_term(
                resource.unit_capacity,
                resource.cost_coefficient(),
                config.max_count,
            );
        }
        model.set_capacity(if config.allow_surplus {
            CapacityRelation::AtLeast(self.target)
        } else {
            CapacityRelation::Exactly(self.target)
        });
        model.validate()?;
        Ok(model)
    }
}

/// A concrete count per resource type together with its realized
/// capacity and cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    /// Discovery index within its solution set.
    pub index: usize,
    /// Count per resource type, in catalog order.
    pub counts: Vec<i64>,
    /// `count * unit_cost` per resource type.
    pub type_costs: Vec<f64>,
    /// `sum(count * unit_capacity)`.
    pub capacity: i64,
    /// `sum(count * round(unit_cost))`.
    pub total_cost: i64,
}

impl Assignment {
    /// Materializes a search leaf against the catalog it was solved for.
    pub fn from_leaf(leaf: LeafSolution, catalog: &ResourceCatalog) -> Self {
        let type_costs = leaf
            .counts
            .iter()
            .zip(catalog)
            .map(|(&n, t)| n as f64 * t.unit_cost)
            .collect();
        Self {
            index: 0,
            counts: leaf.counts,
            type_costs,
            capacity: leaf.capacity,
            total_cost: leaf.objective,
        }
    }

    /// Count for the resource type at `index`.
    pub fn count(&self, index: usize) -> Option<i64> {
        self.counts.get(index).copied()
    }

    /// Cost spent on the resource type at `index`.
    pub fn type_cost(&self, index: usize) -> Option<f64> {
        self.type_costs.get(index).copied()
    }

    /// Total integer cost.
    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    /// Total capacity served.
    pub fn total_capacity(&self) -> i64 {
        self.capacity
    }

    /// Number of units across all types.
    pub fn units(&self) -> i64 {
        self.counts.iter().sum()
    }
}

/// Accepted assignments in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolutionSet {
    assignments: Vec<Assignment>,
}

impl SolutionSet {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assignment with discovery index `index`.
    pub fn get(&self, index: usize) -> Option<&Assignment> {
        self.assignments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    /// The cheapest assignment; the earliest one on ties.
    pub fn cheapest(&self) -> Option<&Assignment> {
        self.assignments.iter().min_by_key(|a| (a.total_cost, a.index))
    }

    /// Lowest total cost in the set.
    pub fn min_cost(&self) -> Option<i64> {
        self.assignments.iter().map(|a| a.total_cost).min()
    }

    pub fn as_slice(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn into_vec(self) -> Vec<Assignment> {
        self.assignments
    }
}

impl IntoIterator for SolutionSet {
    type Item = Assignment;
    type IntoIter = std::vec::IntoIter<Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Append-only collector that numbers accepted assignments from 0.
///
/// A plain sink keeps every assignment; a deduplicating sink drops an
/// assignment whose count vector was already accepted.
#[derive(Debug, Default)]
pub struct SolutionSink {
    set: SolutionSet,
    seen: Option<HashSet<Vec<i64>>>,
}

impl SolutionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that collapses duplicates by count vector.
    pub fn deduplicating() -> Self {
        Self {
            set: SolutionSet::default(),
            seen: Some(HashSet::new()),
        }
    }

    /// Appends `assignment` and returns its index, or `None` if it was a
    /// duplicate.
    pub fn accept(&mut self, mut assignment: Assignment) -> Option<usize> {
        if let Some(seen) = &mut self.seen {
            if !seen.insert(assignment.counts.clone()) {
                return None;
            }
        }
        let index = self.set.assignments.len();
        assignment.index = index;
        self.set.assignments.push(assignment);
        Some(index)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Hands the collected set to the caller.
    pub fn finish(self) -> SolutionSet {
        self.set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceType;

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::builder()
            .add(ResourceType::new(2, 50.0))
            .add(ResourceType::new(7, 71.0))
            .add(ResourceType::new(3, 20.4))
            .build()
            .unwrap()
    }

    fn assignment(counts: Vec<i64>, total_cost: i64) -> Assignment {
        Assignment {
            index: 0,
            counts,
            type_costs: vec![],
            capacity: 0,
            total_cost,
        }
    }

    #[test]
    fn test_build_model() {
        let problem = AllocProblem::new(catalog(), 14);
        let model = problem.build_model(&AllocConfig::default()).unwrap();
        assert_eq!(model.weights(), vec![2, 7, 3]);
        assert_eq!(model.coefficients(), vec![50, 71, 20]);
        assert_eq!(model.capacity_window(), (14, 14));
        assert_eq!(model.max_objective, 99_999);

        let surplus = problem
            .build_model(&AllocConfig::default().with_surplus(true))
            .unwrap();
        assert_eq!(surplus.capacity, CapacityRelation::AtLeast(14));
    }

    #[test]
    fn test_negative_target_rejected() {
        let problem = AllocProblem::new(catalog(), -3);
        assert!(matches!(
            problem.build_model(&AllocConfig::default()),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_leaf() {
        let leaf = LeafSolution {
            counts: vec![1, 0, 4],
            capacity: 14,
            objective: 130,
        };
        let a = Assignment::from_leaf(leaf, &catalog());
        assert_eq!(a.count(2), Some(4));
        assert_eq!(a.count(3), None);
        assert!((a.type_cost(0).unwrap() - 50.0).abs() < 1e-9);
        assert!((a.type_cost(2).unwrap() - 81.6).abs() < 1e-9);
        assert_eq!(a.total_cost(), 130);
        assert_eq!(a.total_capacity(), 14);
        assert_eq!(a.units(), 5);
    }

    #[test]
    fn test_sink_indices() {
        let mut sink = SolutionSink::new();
        assert_eq!(sink.accept(assignment(vec![1, 0], 5)), Some(0));
        assert_eq!(sink.accept(assignment(vec![1, 0], 5)), Some(1));
        let set = sink.finish();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().index, 1);
    }

    #[test]
    fn test_sink_dedup() {
        let mut sink = SolutionSink::deduplicating();
        assert_eq!(sink.accept(assignment(vec![1, 0], 5)), Some(0));
        assert_eq!(sink.accept(assignment(vec![1, 0], 5)), None);
        assert_eq!(sink.accept(assignment(vec![0, 1], 5)), Some(1));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_cheapest() {
        let mut sink = SolutionSink::new();
        sink.accept(assignment(vec![0, 2], 142));
        sink.accept(assignment(vec![1, 0], 130));
        sink.accept(assignment(vec![3, 1], 130));
        let set = sink.finish();
        assert_eq!(set.cheapest().unwrap().index, 1);
        assert_eq!(set.min_cost(), Some(130));
        assert!(SolutionSet::default().cheapest().is_none());
    }
}
