//! Core type definitions for the knapsack question generator
//!
//! This module establishes the data model shared by every solver and
//! analyzer: items, validated instances, solutions, and the solver trait
//! that separates the exact dynamic program from the enumeration oracle.
//!
//! # Invariants
//! - An `Instance` always has `capacity > 0`, at least one item, unique item
//!   ids, and strictly positive weights and rewards.
//! - An `Instance` is immutable once constructed; its fields are private.
//! - A `Solution` produced by any `KnapsackSolver` satisfies
//!   `used_weight <= capacity` and `achieved_reward == Σ reward(selected)`.

use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// Item identifier, unique within one instance
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised by the algorithm layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnapsackError {
    /// Malformed solver input; indicates a caller configuration bug
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),
}

/// Type alias for algorithm-layer results
pub type KnapsackResult<T> = Result<T, KnapsackError>;

/// A selectable item with a weight cost and a reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, unique within the owning instance
    pub id: ItemId,

    /// Capacity consumed when selected (>= 1)
    pub weight: u64,

    /// Value gained when selected (>= 1)
    pub reward: u64,

    /// Display colour; no algorithm reads it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Item {
    pub fn new(id: u32, weight: u64, reward: u64) -> Self {
        Self {
            id: ItemId(id),
            weight,
            reward,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Reward-to-weight ratio
    #[inline]
    pub fn density(&self) -> f64 {
        self.reward as f64 / self.weight as f64
    }
}

/// Checks the per-item preconditions every solver relies on.
pub fn validate_items(items: &[Item]) -> KnapsackResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.weight == 0 {
            return Err(KnapsackError::InvalidInstance(format!(
                "item {} has non-positive weight",
                item.id
            )));
        }
        if !seen.insert(item.id) {
            return Err(KnapsackError::InvalidInstance(format!(
                "duplicate item id {}",
                item.id
            )));
        }
    }
    Ok(())
}

/// A knapsack question: an ordered item list and a capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstanceRepr")]
pub struct Instance {
    items: Vec<Item>,
    capacity: u64,
}

#[derive(Deserialize)]
struct InstanceRepr {
    items: Vec<Item>,
    capacity: u64,
}

impl TryFrom<InstanceRepr> for Instance {
    type Error = KnapsackError;

    fn try_from(repr: InstanceRepr) -> Result<Self, Self::Error> {
        Instance::new(repr.items, repr.capacity)
    }
}

impl Instance {
    /// Builds a validated instance.
    pub fn new(items: Vec<Item>, capacity: u64) -> KnapsackResult<Self> {
        if capacity == 0 {
            return Err(KnapsackError::InvalidInstance(
                "capacity must be positive".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(KnapsackError::InvalidInstance(
                "instance has no items".to_string(),
            ));
        }
        validate_items(&items)?;
        if let Some(item) = items.iter().find(|item| item.reward == 0) {
            return Err(KnapsackError::InvalidInstance(format!(
                "item {} has non-positive reward",
                item.id
            )));
        }

        Ok(Self { items, capacity })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item weights, saturating at `u64::MAX`
    pub fn total_weight(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |total, item| total.saturating_add(item.weight))
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// One optimal (or candidate) selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Solution {
    pub selected_ids: BTreeSet<ItemId>,
    pub achieved_reward: u64,
    pub used_weight: u64,
}

impl Solution {
    /// Builds a solution from the items at `indices`.
    pub fn from_indices(items: &[Item], indices: impl IntoIterator<Item = usize>) -> Self {
        let mut solution = Self::default();
        for index in indices {
            let item = &items[index];
            solution.selected_ids.insert(item.id);
            solution.achieved_reward = solution.achieved_reward.saturating_add(item.reward);
            solution.used_weight = solution.used_weight.saturating_add(item.weight);
        }
        solution
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.selected_ids.contains(&id)
    }
}

/// Solver seam: anything that maps items and a capacity to an optimal subset
///
/// # Guarantees
/// - `achieved_reward` is maximal among all feasible subsets
/// - `used_weight <= capacity`
/// - Deterministic for identical inputs
pub trait KnapsackSolver: Debug + Send + Sync {
    /// Returns the solver's descriptive name
    fn name(&self) -> &'static str;

    /// Solves the raw item list against `capacity`.
    ///
    /// Inputs the solver cannot represent (total weight or reward beyond
    /// `u64`, a DP table above `MAX_TABLE_CELLS`, too many items for brute
    /// force) yield `InvalidInstance` rather than a panic.
    fn solve(&self, items: &[Item], capacity: u64) -> KnapsackResult<Solution>;

    /// Solves a validated instance
    fn solve_instance(&self, instance: &Instance) -> KnapsackResult<Solution> {
        self.solve(instance.items(), instance.capacity())
    }
}
