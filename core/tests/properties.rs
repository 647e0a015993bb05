//! Property-based tests for the solver, dominance and sequence contracts.

use proptest::prelude::*;

use knapsack_core::algorithm::knapsack::{dominates, remove_dominated, BruteForceSolver};
use knapsack_core::education::synthesis::InstanceSynthesizer;
use knapsack_core::education::DominanceShape;
use knapsack_core::validation::verify_optimality;
use knapsack_core::{
    DeterministicSequence, DifficultyLevel, ExactSolver, GeneratorConfig, Instance, Item,
    KnapsackSolver,
};

/// Strategy: up to 12 items with small positive weights and rewards.
fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((1..=15u64, 1..=30u64), 0..=12).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (weight, reward))| Item::new(i as u32, weight, reward))
            .collect()
    })
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (1..=20u64, 1..=20u64).prop_map(|(weight, reward)| Item::new(0, weight, reward))
}

proptest! {
    // 1. DP reward equals the brute-force maximum
    #[test]
    fn solver_is_optimal(items in items_strategy(), capacity in 0..=80u64) {
        let exact = ExactSolver.solve(&items, capacity).unwrap();
        let oracle = BruteForceSolver.solve(&items, capacity).unwrap();
        prop_assert_eq!(exact.achieved_reward, oracle.achieved_reward);
    }

    // 2. Returned selection always fits
    #[test]
    fn solver_is_feasible(items in items_strategy(), capacity in 0..=80u64) {
        let solution = ExactSolver.solve(&items, capacity).unwrap();
        prop_assert!(solution.used_weight <= capacity);

        let reward: u64 = items
            .iter()
            .filter(|item| solution.contains(item.id))
            .map(|item| item.reward)
            .sum();
        prop_assert_eq!(reward, solution.achieved_reward);
    }

    // 3. Solutions of validated instances pass full verification
    #[test]
    fn solver_output_verifies(items in items_strategy(), capacity in 1..=80u64) {
        prop_assume!(!items.is_empty());
        let instance = Instance::new(items, capacity).unwrap();
        let solution = ExactSolver.solve_instance(&instance).unwrap();
        prop_assert!(verify_optimality(&instance, &solution, &BruteForceSolver).is_ok());
    }

    // 4. Dominance is antisymmetric
    #[test]
    fn dominance_antisymmetric(a in item_strategy(), b in item_strategy()) {
        prop_assert!(!(dominates(&a, &b) && dominates(&b, &a)));
    }

    // 5. Removal never drops more than it could and keeps an undominated set
    #[test]
    fn remove_dominated_is_consistent(items in items_strategy()) {
        let report = remove_dominated(&items);
        prop_assert_eq!(report.kept.len() + report.removed, items.len());
        for a in &report.kept {
            for b in &items {
                prop_assert!(!dominates(b, a));
            }
        }
    }

    // 6. Equal seeds give equal streams
    #[test]
    fn sequence_deterministic(seed in any::<u32>()) {
        let mut a = DeterministicSequence::new(seed);
        let mut b = DeterministicSequence::new(seed);
        for _ in 0..1000 {
            prop_assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    // 7. range() respects its inclusive bounds
    #[test]
    fn sequence_range_bounds(seed in any::<u32>(), low in 0..100u64, width in 0..50u64) {
        let mut sequence = DeterministicSequence::new(seed);
        for _ in 0..100 {
            let value = sequence.range(low, low + width);
            prop_assert!(value >= low && value <= low + width);
        }
    }

    // 8. A full-shape chain of 3 items always has dominance
    #[test]
    fn full_chain_has_dominance(
        seed in any::<u32>(),
        weight_min in 1..=20u64,
        weight_width in 0..=20u64,
        reward_min in 1..=20u64,
        reward_width in 0..=20u64,
    ) {
        let config = GeneratorConfig::new(3, DifficultyLevel::Easy)
            .with_weight_range(weight_min, weight_min + weight_width)
            .with_reward_range(reward_min, reward_min + reward_width);
        let mut sequence = DeterministicSequence::new(seed);
        let items = InstanceSynthesizer.synthesize_items(&config, DominanceShape::Full, &mut sequence);
        prop_assert!(remove_dominated(&items).removed >= 1);
    }
}
