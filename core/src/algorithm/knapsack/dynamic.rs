//! Exact 0-1 knapsack solver by dynamic programming
//!
//! Fills a `(n + 1) × (W + 1)` table where `table[i][w]` is the best reward
//! reachable with the first `i` items and capacity `w`, then backtracks from
//! `table[n][W]` to recover one optimal subset.
//!
//! # Complexity
//! - Time: O(n · W)
//! - Space: O(n · W)
//!
//! `W` is clamped to `min(capacity, Σ weights)`: any capacity at or above the
//! total weight admits every item, so the table beyond that width is constant.
//! Instances whose table would exceed `MAX_TABLE_CELLS`, or whose total
//! weight or reward does not fit in a `u64`, are rejected as invalid.

use log::trace;

use crate::algorithm::traits::{
    validate_items, Item, KnapsackError, KnapsackResult, KnapsackSolver, Solution,
};

/// Upper bound on `(n + 1) × (W + 1)`
pub const MAX_TABLE_CELLS: u64 = 1 << 26;

fn checked_total(items: &[Item], field: fn(&Item) -> u64, name: &str) -> KnapsackResult<u64> {
    items
        .iter()
        .try_fold(0u64, |total, item| total.checked_add(field(item)))
        .ok_or_else(|| KnapsackError::InvalidInstance(format!("total {} overflows u64", name)))
}

/// Dynamic-programming solver
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSolver;

impl ExactSolver {
    pub fn new() -> Self {
        Self
    }

    fn build_table(items: &[Item], width: usize) -> Vec<Vec<u64>> {
        let mut table = vec![vec![0u64; width + 1]; items.len() + 1];

        for (i, item) in items.iter().enumerate() {
            let weight = item.weight as usize;
            for w in 0..=width {
                let skip = table[i][w];
                table[i + 1][w] = if weight <= w {
                    skip.max(table[i][w - weight] + item.reward)
                } else {
                    skip
                };
            }
        }

        table
    }

    /// Walks back from the last row. An item is taken only when the table
    /// value changes, so on ties the later-indexed item is left out.
    fn backtrack(items: &[Item], table: &[Vec<u64>], width: usize) -> Vec<usize> {
        let mut selected = Vec::new();
        let mut w = width;

        for i in (1..=items.len()).rev() {
            if table[i][w] != table[i - 1][w] {
                selected.push(i - 1);
                w -= items[i - 1].weight as usize;
            }
        }

        selected.reverse();
        selected
    }
}

impl KnapsackSolver for ExactSolver {
    fn name(&self) -> &'static str {
        "dynamic-programming"
    }

    fn solve(&self, items: &[Item], capacity: u64) -> KnapsackResult<Solution> {
        validate_items(items)?;

        let total_weight = checked_total(items, |item| item.weight, "weight")?;
        // Rewards in the table never exceed this sum
        checked_total(items, |item| item.reward, "reward")?;

        let width = capacity.min(total_weight);
        let cells = (items.len() as u64 + 1).saturating_mul(width.saturating_add(1));
        if cells > MAX_TABLE_CELLS {
            return Err(KnapsackError::InvalidInstance(format!(
                "dp table of {} cells exceeds the limit of {}",
                cells, MAX_TABLE_CELLS
            )));
        }
        let width = width as usize;

        let table = Self::build_table(items, width);
        let selected = Self::backtrack(items, &table, width);
        let solution = Solution::from_indices(items, selected);

        trace!(
            "dp solve: n={} capacity={} width={} reward={} weight={}",
            items.len(),
            capacity,
            width,
            solution.achieved_reward,
            solution.used_weight
        );

        Ok(solution)
    }
}
