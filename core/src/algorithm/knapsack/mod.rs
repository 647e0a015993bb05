//! 0-1 knapsack solving, dominance analysis and subset enumeration

pub mod dynamic;
pub mod dominance;
pub mod enumeration;

pub use self::dynamic::ExactSolver;
pub use self::dominance::{dominates, remove_dominated, DominanceReport};
pub use self::enumeration::{
    BruteForceSolver, Enumerated, SubsetEnumerator, DEFAULT_ENUMERATION_BUDGET,
    MAX_EXHAUSTIVE_ITEMS,
};
