//! Pairwise item dominance
//!
//! Item `a` dominates `b` when it is no heavier, no less rewarding, and
//! strictly better on at least one of the two. A dominated item is never
//! needed by a rational solver while its dominator is still available.

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::Item;

/// Outcome of `remove_dominated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominanceReport {
    /// Items no other item dominates, in input order
    pub kept: Vec<Item>,

    /// Number of items dropped
    pub removed: usize,
}

/// True iff `a` dominates `b`.
pub fn dominates(a: &Item, b: &Item) -> bool {
    let no_worse = a.weight <= b.weight && a.reward >= b.reward;
    let strictly_better = a.weight < b.weight || a.reward > b.reward;
    no_worse && strictly_better
}

/// Drops every item dominated by some other item in the set. O(n²).
pub fn remove_dominated(items: &[Item]) -> DominanceReport {
    let kept: Vec<Item> = items
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !items
                .iter()
                .enumerate()
                .any(|(j, other)| *i != j && dominates(other, candidate))
        })
        .map(|(_, item)| item.clone())
        .collect();

    DominanceReport {
        removed: items.len() - kept.len(),
        kept,
    }
}
