//! Solution correctness verification
//!
//! Checks a `Solution` against the `Instance` it claims to solve:
//! every selected id exists, the reported totals match the selected items,
//! and the selection fits. `verify_optimality` additionally compares the
//! reward against an independent solver.

use thiserror::Error;

use crate::algorithm::traits::{Instance, ItemId, KnapsackError, KnapsackSolver, Solution};

/// Verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Selected item {0} is not part of the instance")]
    UnknownItem(ItemId),

    #[error("Reported reward {reported} but selected items sum to {actual}")]
    RewardMismatch { reported: u64, actual: u64 },

    #[error("Reported weight {reported} but selected items sum to {actual}")]
    WeightMismatch { reported: u64, actual: u64 },

    #[error("Used weight {used} exceeds capacity {capacity}")]
    OverCapacity { used: u64, capacity: u64 },

    #[error("Reward {reported} is below the optimum {optimum} found by {oracle}")]
    Suboptimal {
        reported: u64,
        optimum: u64,
        oracle: &'static str,
    },

    #[error("Oracle failed: {0}")]
    Oracle(#[from] KnapsackError),
}

/// Checks internal consistency and feasibility of `solution`.
pub fn verify_solution(instance: &Instance, solution: &Solution) -> Result<(), VerificationError> {
    let mut reward = 0u64;
    let mut weight = 0u64;

    for &id in &solution.selected_ids {
        let item = instance.item(id).ok_or(VerificationError::UnknownItem(id))?;
        reward += item.reward;
        weight += item.weight;
    }

    if reward != solution.achieved_reward {
        return Err(VerificationError::RewardMismatch {
            reported: solution.achieved_reward,
            actual: reward,
        });
    }
    if weight != solution.used_weight {
        return Err(VerificationError::WeightMismatch {
            reported: solution.used_weight,
            actual: weight,
        });
    }
    if weight > instance.capacity() {
        return Err(VerificationError::OverCapacity {
            used: weight,
            capacity: instance.capacity(),
        });
    }

    Ok(())
}

/// `verify_solution` plus a reward comparison against `oracle`.
pub fn verify_optimality(
    instance: &Instance,
    solution: &Solution,
    oracle: &dyn KnapsackSolver,
) -> Result<(), VerificationError> {
    verify_solution(instance, solution)?;

    let reference = oracle.solve_instance(instance)?;
    if solution.achieved_reward < reference.achieved_reward {
        return Err(VerificationError::Suboptimal {
            reported: solution.achieved_reward,
            optimum: reference.achieved_reward,
            oracle: oracle.name(),
        });
    }

    Ok(())
}
