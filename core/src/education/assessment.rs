//! # Difficulty Assessment
//!
//! Quantifies how hard a solved knapsack instance is for a human solver.
//! Four signals are computed once per finalized instance/solution pair:
//!
//! 1. **Dominance count**: items removable because another item is lighter
//!    and at least as rewarding. More dominance means an easier puzzle.
//! 2. **Slack ratio**: `capacity / Σ weights`. Close to 1 is tight; well
//!    above 1 means most items trivially fit.
//! 3. **Optimality gap**: reward margin between the optimal subset and the
//!    best other feasible subset. A small gap leaves little room for error.
//! 4. **Density variance**: population variance of `reward / weight`. Low
//!    variance means items look alike, which makes the choice harder.
//!
//! ## Complexity Characteristics
//!
//! - Dominance: O(n²)
//! - Slack ratio and density variance: O(n)
//! - Optimality gap and uniqueness: O(min(2^n, budget) · n)
//!
//! The gap and the uniqueness check enumerate at most `budget` subsets.
//! Beyond `log2(budget)` items they are approximations and report
//! `exact = false`.

use serde::{Deserialize, Serialize};

use crate::algorithm::knapsack::enumeration::{mask_of, Enumerated, SubsetEnumerator};
use crate::algorithm::knapsack::remove_dominated;
use crate::algorithm::traits::{Instance, Item, Solution};

/// Difficulty signals of one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyMetrics {
    /// Items dominated by another item
    pub dominance_count: usize,

    /// Capacity divided by total item weight
    pub slack_ratio: f64,

    /// Optimal reward minus best other feasible reward
    pub optimality_gap: u64,

    /// Population variance of reward/weight
    pub density_variance: f64,

    /// Whether the gap enumeration covered every subset
    pub exact: bool,
}

/// Computes `DifficultyMetrics` and the uniqueness predicate
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyAnalyzer {
    enumerator: SubsetEnumerator,
}

impl DifficultyAnalyzer {
    pub fn new(enumeration_budget: usize) -> Self {
        Self {
            enumerator: SubsetEnumerator::new(enumeration_budget),
        }
    }

    /// Analyzer that enumerates every subset of an `item_count`-item
    /// instance, up to `MAX_EXHAUSTIVE_ITEMS` items.
    pub fn covering(&self, item_count: usize) -> Self {
        Self {
            enumerator: self.enumerator.covering(item_count),
        }
    }

    /// Full metric record for a solved instance
    pub fn analyze(&self, instance: &Instance, solution: &Solution) -> DifficultyMetrics {
        let gap = self.optimality_gap(instance, solution);

        DifficultyMetrics {
            dominance_count: remove_dominated(instance.items()).removed,
            slack_ratio: slack_ratio(instance),
            optimality_gap: gap.value,
            density_variance: density_variance(instance.items()),
            exact: gap.exact,
        }
    }

    /// `best - second best`, where second best ranges over feasible subsets
    /// other than the one `solution` selects.
    pub fn optimality_gap(&self, instance: &Instance, solution: &Solution) -> Enumerated<u64> {
        let items = instance.items();
        let runner_up = self
            .enumerator
            .runner_up(items, instance.capacity(), mask_of(items, solution));

        Enumerated {
            value: solution
                .achieved_reward
                .saturating_sub(runner_up.value.unwrap_or(0)),
            exact: runner_up.exact,
            visited: runner_up.visited,
        }
    }

    /// True iff exactly one feasible subset reaches the optimal reward.
    pub fn has_unique_solution(&self, instance: &Instance, solution: &Solution) -> Enumerated<bool> {
        let counted = self.optimal_subset_count(instance, solution);
        Enumerated {
            value: counted.value == 1,
            exact: counted.exact,
            visited: counted.visited,
        }
    }

    /// Number of feasible subsets reaching `solution.achieved_reward`
    pub fn optimal_subset_count(&self, instance: &Instance, solution: &Solution) -> Enumerated<usize> {
        self.enumerator
            .count_optimal(instance.items(), instance.capacity(), solution.achieved_reward)
    }
}

/// `capacity / Σ weights`
pub fn slack_ratio(instance: &Instance) -> f64 {
    instance.capacity() as f64 / instance.total_weight() as f64
}

/// Population variance of item densities; 0 for an empty list.
pub fn density_variance(items: &[Item]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    let n = items.len() as f64;
    let mean = items.iter().map(Item::density).sum::<f64>() / n;
    items
        .iter()
        .map(|item| {
            let delta = item.density() - mean;
            delta * delta
        })
        .sum::<f64>()
        / n
}
