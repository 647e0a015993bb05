//! Knapsack algorithm layer
//! Exact solving, dominance analysis and deterministic randomness

pub mod traits;
pub mod sequence;
pub mod knapsack;

pub use self::traits::*;
pub use self::sequence::DeterministicSequence;
pub use self::knapsack::*;
