//! Bounded exhaustive subset enumeration
//!
//! Subsets are visited as bitmasks `0, 1, 2, ...` where bit `i` selects item
//! `i`. Enumeration stops after `budget` masks, so results are exact only
//! while `2^n <= budget`; every result carries an `exact` flag saying whether
//! the whole power set was covered.

use crate::algorithm::traits::{
    validate_items, Item, KnapsackError, KnapsackResult, KnapsackSolver, Solution,
};

/// Default number of subsets visited per query (exact up to 10 items)
pub const DEFAULT_ENUMERATION_BUDGET: usize = 1024;

/// Largest instance the brute-force oracle accepts
pub const MAX_BRUTE_FORCE_ITEMS: usize = 20;

/// Item count up to which `covering` widens the budget to the full power set
pub const MAX_EXHAUSTIVE_ITEMS: usize = 12;

/// A value computed by enumeration, with its coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enumerated<T> {
    pub value: T,

    /// Whether all `2^n` subsets were visited
    pub exact: bool,

    /// Number of masks visited
    pub visited: usize,
}

/// Budget-capped power-set walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetEnumerator {
    budget: usize,
}

impl Default for SubsetEnumerator {
    fn default() -> Self {
        Self::new(DEFAULT_ENUMERATION_BUDGET)
    }
}

impl SubsetEnumerator {
    pub fn new(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Enumerator whose budget covers all `2^item_count` subsets, for
    /// `item_count <= MAX_EXHAUSTIVE_ITEMS`. Larger counts keep the
    /// configured budget.
    pub fn covering(&self, item_count: usize) -> Self {
        if item_count <= MAX_EXHAUSTIVE_ITEMS {
            Self::new(self.budget.max(1usize << item_count))
        } else {
            *self
        }
    }

    /// Whether an `item_count`-item power set fits in the budget.
    pub fn is_exact_for(&self, item_count: usize) -> bool {
        item_count < 64 && (1u128 << item_count) <= self.budget as u128
    }

    fn mask_limit(&self, item_count: usize) -> u64 {
        if item_count >= 63 {
            self.budget as u64
        } else {
            (1u64 << item_count).min(self.budget as u64)
        }
    }

    fn walk<F>(&self, items: &[Item], mut visit: F) -> (bool, usize)
    where
        F: FnMut(u64, u64, u64),
    {
        let limit = self.mask_limit(items.len());
        for mask in 0..limit {
            let (weight, reward) = subset_totals(items, mask);
            visit(mask, weight, reward);
        }
        (self.is_exact_for(items.len()), limit as usize)
    }

    /// Counts feasible subsets whose reward equals `best_reward`.
    pub fn count_optimal(&self, items: &[Item], capacity: u64, best_reward: u64) -> Enumerated<usize> {
        let mut count = 0;
        let (exact, visited) = self.walk(items, |_, weight, reward| {
            if weight <= capacity && reward == best_reward {
                count += 1;
            }
        });
        Enumerated { value: count, exact, visited }
    }

    /// Best reward over feasible subsets other than `excluded_mask`.
    ///
    /// The empty subset is feasible, so for two or more items this is
    /// always `Some` under an exact walk.
    pub fn runner_up(&self, items: &[Item], capacity: u64, excluded_mask: u64) -> Enumerated<Option<u64>> {
        let mut best: Option<u64> = None;
        let (exact, visited) = self.walk(items, |mask, weight, reward| {
            if mask != excluded_mask && weight <= capacity {
                best = Some(best.map_or(reward, |current| current.max(reward)));
            }
        });
        Enumerated { value: best, exact, visited }
    }

    /// Lowest-mask feasible subset of maximal reward among those visited.
    pub fn best(&self, items: &[Item], capacity: u64) -> Enumerated<u64> {
        let mut best_mask = 0u64;
        let mut best_reward = 0u64;
        let (exact, visited) = self.walk(items, |mask, weight, reward| {
            if weight <= capacity && reward > best_reward {
                best_mask = mask;
                best_reward = reward;
            }
        });
        Enumerated { value: best_mask, exact, visited }
    }
}

/// Total weight and reward of the subset encoded by `mask`, saturating at
/// `u64::MAX`.
pub fn subset_totals(items: &[Item], mask: u64) -> (u64, u64) {
    items
        .iter()
        .take(64)
        .enumerate()
        .filter(|(i, _)| mask & (1u64 << i) != 0)
        .fold((0, 0), |(weight, reward), (_, item)| {
            (weight.saturating_add(item.weight), reward.saturating_add(item.reward))
        })
}

/// Bitmask of the items a solution selects.
pub fn mask_of(items: &[Item], solution: &Solution) -> u64 {
    items
        .iter()
        .take(64)
        .enumerate()
        .filter(|(_, item)| solution.contains(item.id))
        .fold(0u64, |mask, (i, _)| mask | (1u64 << i))
}

/// Indices of the items selected by `mask`.
pub fn mask_indices(item_count: usize, mask: u64) -> impl Iterator<Item = usize> {
    (0..item_count.min(64)).filter(move |i| mask & (1u64 << i) != 0)
}

/// Exhaustive solver used as a correctness oracle
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSolver;

impl KnapsackSolver for BruteForceSolver {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn solve(&self, items: &[Item], capacity: u64) -> KnapsackResult<Solution> {
        validate_items(items)?;
        if items.len() > MAX_BRUTE_FORCE_ITEMS {
            return Err(KnapsackError::InvalidInstance(format!(
                "brute force supports at most {} items, got {}",
                MAX_BRUTE_FORCE_ITEMS,
                items.len()
            )));
        }

        let enumerator = SubsetEnumerator::new(1usize << items.len());
        let best = enumerator.best(items, capacity);
        Ok(Solution::from_indices(
            items,
            mask_indices(items.len(), best.value),
        ))
    }
}
