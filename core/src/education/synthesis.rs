//! Candidate instance synthesis
//!
//! Builds the item list for one generation attempt according to the
//! dominance shape of the requested tier, then calibrates the capacity
//! against the total weight. All randomness comes from the caller's
//! `DeterministicSequence`.
//!
//! # Dominance shapes
//! - `Full`: a chain with strictly increasing weight and non-increasing
//!   reward by index, so every item dominates all later ones.
//! - `Partial`: the first half (rounded up) is such a chain, the rest is
//!   drawn uniformly from the configured ranges.
//! - `None`: every item is drawn uniformly.

use log::trace;

use crate::algorithm::sequence::DeterministicSequence;
use crate::algorithm::traits::Item;
use crate::education::config::{DominanceShape, GeneratorConfig, DEFAULT_SLACK_RATIO};

/// Display colours attached to items. No algorithm reads them.
pub const COLOR_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#9a6324",
];

/// Items plus calibrated capacity, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub items: Vec<Item>,
    pub capacity: u64,
    pub shape: DominanceShape,
}

/// Stateless item-set builder
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceSynthesizer;

impl InstanceSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Items for `config` in its tier's shape, with calibrated capacity.
    pub fn synthesize(&self, config: &GeneratorConfig, sequence: &mut DeterministicSequence) -> Candidate {
        let shape = config.dominance_shape();
        let items = self.synthesize_items(config, shape, sequence);
        let capacity = calibrate_capacity(&items, config.target_slack_ratio);

        trace!(
            "synthesized {:?} candidate: n={} capacity={}",
            shape,
            items.len(),
            capacity
        );

        Candidate { items, capacity, shape }
    }

    /// Builds `config.item_count` items in the given shape.
    pub fn synthesize_items(
        &self,
        config: &GeneratorConfig,
        shape: DominanceShape,
        sequence: &mut DeterministicSequence,
    ) -> Vec<Item> {
        let n = config.item_count;
        let chain_len = match shape {
            DominanceShape::Full => n,
            DominanceShape::Partial => (n + 1) / 2,
            DominanceShape::None => 0,
        };

        let mut items = chain_items(config, chain_len, sequence);
        items.extend((chain_len..n).map(|index| random_item(config, index, sequence)));

        for item in &mut items {
            item.color = sequence.choice(&COLOR_PALETTE).map(|color| color.to_string());
        }

        items
    }
}

/// `floor(Σ weights × ratio)`, ratio defaulting to 0.7.
pub fn calibrate_capacity(items: &[Item], target_slack_ratio: Option<f64>) -> u64 {
    let ratio = target_slack_ratio.unwrap_or(DEFAULT_SLACK_RATIO);
    let total_weight: u64 = items.iter().map(|item| item.weight).sum();
    (total_weight as f64 * ratio).floor() as u64
}

/// Dominance chain of `len` items with ids `0..len`.
///
/// Weights rise by at least 1 per step, rewards never rise, so item `i`
/// dominates every item `j > i`. The chain is placed at a random offset
/// inside the ranges when they are wide enough; otherwise weights step past
/// the configured maximum rather than lose strictness.
fn chain_items(config: &GeneratorConfig, len: usize, sequence: &mut DeterministicSequence) -> Vec<Item> {
    if len == 0 {
        return Vec::new();
    }

    let (weight_min, weight_max) = config.weight_range;
    let (reward_min, reward_max) = config.reward_range;
    let steps = (len - 1) as u64;

    let weight_span = weight_max - weight_min;
    let weight_step = if steps == 0 { 1 } else { (weight_span / steps).max(1) };
    let weight_slack = weight_span.saturating_sub(weight_step * steps);
    let first_weight = sequence.range(weight_min, weight_min + weight_slack);

    let reward_span = reward_max - reward_min;
    let reward_step = if steps == 0 { 0 } else { (reward_span / steps).max(1) };
    let top_floor = (reward_min + reward_step * steps).min(reward_max);
    let first_reward = sequence.range(top_floor, reward_max);

    (0..len)
        .map(|index| {
            let i = index as u64;
            let weight = first_weight + i * weight_step;
            let reward = first_reward.saturating_sub(i * reward_step).max(1);
            Item::new(index as u32, weight, reward)
        })
        .collect()
}

fn random_item(config: &GeneratorConfig, index: usize, sequence: &mut DeterministicSequence) -> Item {
    let (weight_min, weight_max) = config.weight_range;
    let (reward_min, reward_max) = config.reward_range;
    let weight = sequence.range(weight_min, weight_max);
    let reward = sequence.range(reward_min, reward_max);
    Item::new(index as u32, weight, reward)
}
