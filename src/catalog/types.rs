//! Resource type records and the ordered catalog.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A kind of resource that serves part of the demand.
///
/// Each unit contributes `unit_capacity` to the served total and costs
/// `unit_cost`. For vehicles, the capacity is the number of free seats
/// (the driver is not counted).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceType {
    /// Display label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Capacity of one unit. Must be at least 1.
    pub unit_capacity: i64,
    /// Cost of one unit. Must be finite and non-negative.
    pub unit_cost: f64,
}

impl ResourceType {
    /// Creates an unnamed resource type.
    pub fn new(unit_capacity: i64, unit_cost: f64) -> Self {
        Self {
            name: String::new(),
            unit_capacity,
            unit_cost,
        }
    }

    /// Sets the display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Integer cost coefficient used by the search (nearest integer).
    pub fn cost_coefficient(&self) -> i64 {
        self.unit_cost.round() as i64
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.unit_capacity < 1 {
            return Err(Error::InvalidCatalog(format!(
                "type {index}: unit capacity must be at least 1, got {}",
                self.unit_capacity
            )));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            return Err(Error::InvalidCatalog(format!(
                "type {index}: unit cost must be finite and non-negative, got {}",
                self.unit_cost
            )));
        }
        if self.unit_cost.round() > i64::MAX as f64 {
            return Err(Error::InvalidCatalog(format!(
                "type {index}: unit cost {} exceeds the integer range",
                self.unit_cost
            )));
        }
        Ok(())
    }
}

/// An ordered, validated list of resource types.
///
/// Order is significant: the index of a type is the index of its count
/// variable and fixes the branching order of the search.
///
/// # Examples
///
/// ```
/// use u_knapsack::catalog::{ResourceCatalog, ResourceType};
///
/// let catalog = ResourceCatalog::builder()
///     .add(ResourceType::new(2, 50.0))
///     .add(ResourceType::new(7, 71.0))
///     .add(ResourceType::new(3, 20.0))
///     .build()
///     .unwrap();
/// assert_eq!(catalog.len(), 3);
/// assert_eq!(catalog.capacities(), vec![2, 7, 3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<ResourceType>", into = "Vec<ResourceType>"))]
pub struct ResourceCatalog {
    types: Vec<ResourceType>,
}

impl ResourceCatalog {
    /// Validates and wraps a list of resource types.
    pub fn new(types: Vec<ResourceType>) -> Result<Self> {
        if types.is_empty() {
            return Err(Error::InvalidCatalog("catalog is empty".into()));
        }
        for (i, t) in types.iter().enumerate() {
            t.validate(i)?;
        }
        Ok(Self { types })
    }

    /// Starts an empty builder.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Number of resource types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resource type at `index`.
    pub fn get(&self, index: usize) -> Option<&ResourceType> {
        self.types.get(index)
    }

    /// Iterates over the types in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceType> {
        self.types.iter()
    }

    /// Unit capacities in catalog order.
    pub fn capacities(&self) -> Vec<i64> {
        self.types.iter().map(|t| t.unit_capacity).collect()
    }

    /// Integer cost coefficients in catalog order.
    pub fn cost_coefficients(&self) -> Vec<i64> {
        self.types.iter().map(ResourceType::cost_coefficient).collect()
    }

    /// Unit costs in catalog order.
    pub fn unit_costs(&self) -> Vec<f64> {
        self.types.iter().map(|t| t.unit_cost).collect()
    }
}

impl TryFrom<Vec<ResourceType>> for ResourceCatalog {
    type Error = Error;

    fn try_from(types: Vec<ResourceType>) -> Result<Self> {
        Self::new(types)
    }
}

impl From<ResourceCatalog> for Vec<ResourceType> {
    fn from(catalog: ResourceCatalog) -> Self {
        catalog.types
    }
}

impl<'a> IntoIterator for &'a ResourceCatalog {
    type Item = &'a ResourceType;
    type IntoIter = std::slice::Iter<'a, ResourceType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

/// Incremental catalog construction; validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    types: Vec<ResourceType>,
}

impl CatalogBuilder {
    /// Appends a resource type.
    pub fn add(mut self, resource: ResourceType) -> Self {
        self.types.push(resource);
        self
    }

    /// Appends an unnamed resource type.
    pub fn add_type(self, unit_capacity: i64, unit_cost: f64) -> Self {
        self.add(ResourceType::new(unit_capacity, unit_cost))
    }

    /// Validates and returns the catalog.
    pub fn build(self) -> Result<ResourceCatalog> {
        ResourceCatalog::new(self.types)
    }
}
