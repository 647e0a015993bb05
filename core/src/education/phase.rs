//! # Phase Sets
//!
//! A phase (introductory, calibration, assessment) is a batch of questions
//! spread across difficulty tiers. The builder splits the requested count
//! over the phase's tier mix, derives each question's seed from the base
//! seed and the question's ordinal, and aggregates the metrics of the
//! resulting set.
//!
//! ## Fallback policy
//!
//! When a question exhausts its attempts, it is retried exactly once with
//! the uniqueness requirement dropped and a perturbed seed. A second failure
//! aborts the whole set.
//!
//! ## Parallelism
//!
//! Questions share nothing but the read-only builder, so `build_parallel`
//! fans them out over rayon and returns the same set as `build`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::education::config::{DifficultyLevel, GeneratorConfig, GeneratorSettings};
use crate::education::exercise::{GeneratedQuestion, GenerationError, QuestionGenerator};

/// Multiplier applied to the ordinal when deriving per-question seeds
pub const SEED_STRIDE: u32 = 7919;

/// XOR mask applied to a seed for the relaxed fallback attempt
pub const FALLBACK_SEED_MASK: u32 = 0x9E37_79B9;

/// Phase set error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhaseSetError {
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    #[error("Question {index} could not be generated: {source}")]
    Generation {
        index: usize,
        source: GenerationError,
    },
}

/// Type alias for phase set results
pub type PhaseSetResult<T> = Result<T, PhaseSetError>;

/// Study phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Introductory,
    Calibration,
    Assessment,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Self::Introductory, Self::Calibration, Self::Assessment];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Introductory => "introductory",
            Self::Calibration => "calibration",
            Self::Assessment => "assessment",
        }
    }

    /// Relative weight of each tier in this phase
    pub fn tier_mix(self) -> [(DifficultyLevel, u32); 3] {
        use DifficultyLevel::*;
        match self {
            Self::Introductory => [(Easy, 3), (Medium, 2), (Hard, 0)],
            Self::Calibration => [(Easy, 1), (Medium, 1), (Hard, 1)],
            Self::Assessment => [(Easy, 1), (Medium, 2), (Hard, 2)],
        }
    }

    /// Item count used by every question of this phase
    pub fn item_count(self) -> usize {
        match self {
            Self::Introductory => 4,
            Self::Calibration => 5,
            Self::Assessment => 6,
        }
    }

    /// Generator configuration for one question of this phase
    pub fn base_config(self, level: DifficultyLevel) -> GeneratorConfig {
        GeneratorConfig::new(self.item_count(), level)
            .with_weight_range(1, 10)
            .with_reward_range(1, 20)
            .with_unique_solution(true)
    }

    /// Question count per tier, largest-remainder split of `count`.
    ///
    /// Leftover questions go to the tiers with the largest fractional
    /// quota; ties favour the easier tier.
    pub fn tier_counts(self, count: usize) -> Vec<(DifficultyLevel, usize)> {
        let mix = self.tier_mix();
        let total_weight: usize = mix.iter().map(|&(_, w)| w as usize).sum();

        let mut counts: Vec<(DifficultyLevel, usize, usize)> = mix
            .iter()
            .map(|&(level, w)| {
                let scaled = count * w as usize;
                (level, scaled / total_weight, scaled % total_weight)
            })
            .collect();

        let assigned: usize = counts.iter().map(|&(_, quota, _)| quota).sum();
        let mut order: Vec<usize> = (0..counts.len()).collect();
        order.sort_by(|&a, &b| counts[b].2.cmp(&counts[a].2).then(a.cmp(&b)));
        for &index in order.iter().take(count - assigned) {
            counts[index].1 += 1;
        }

        counts.into_iter().map(|(level, quota, _)| (level, quota)).collect()
    }

    /// Tier of each question, in ordinal order (easier tiers first)
    pub fn plan(self, count: usize) -> Vec<DifficultyLevel> {
        self.tier_counts(count)
            .into_iter()
            .flat_map(|(level, n)| std::iter::repeat(level).take(n))
            .collect()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = PhaseSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "introductory" | "intro" => Ok(Self::Introductory),
            "calibration" => Ok(Self::Calibration),
            "assessment" => Ok(Self::Assessment),
            _ => Err(PhaseSetError::UnknownPhase(s.to_string())),
        }
    }
}

/// Summary over a phase set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: usize,

    /// Questions per tier; every tier present, possibly 0
    pub counts: BTreeMap<DifficultyLevel, usize>,

    pub mean_dominance_count: f64,
    pub mean_slack_ratio: f64,
    pub mean_optimality_gap: f64,
    pub mean_density_variance: f64,

    /// Questions produced by the relaxed fallback
    pub relaxed_count: usize,

    /// Whether every metric record came from a full enumeration
    pub all_exact: bool,
}

impl AggregateStats {
    pub fn from_questions(questions: &[GeneratedQuestion]) -> Self {
        let mut counts: BTreeMap<DifficultyLevel, usize> =
            DifficultyLevel::ALL.iter().map(|&level| (level, 0)).collect();
        for question in questions {
            *counts.entry(question.difficulty_level).or_insert(0) += 1;
        }

        let mean = |field: fn(&GeneratedQuestion) -> f64| -> f64 {
            if questions.is_empty() {
                0.0
            } else {
                questions.iter().map(field).sum::<f64>() / questions.len() as f64
            }
        };

        Self {
            total: questions.len(),
            counts,
            mean_dominance_count: mean(|q| q.metrics.dominance_count as f64),
            mean_slack_ratio: mean(|q| q.metrics.slack_ratio),
            mean_optimality_gap: mean(|q| q.metrics.optimality_gap as f64),
            mean_density_variance: mean(|q| q.metrics.density_variance),
            relaxed_count: questions
                .iter()
                .filter(|q| !q.generation.unique_solution_required)
                .count(),
            all_exact: questions.iter().all(|q| q.metrics.exact),
        }
    }
}

/// Questions of one phase plus their aggregate statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSet {
    pub phase: Phase,
    pub base_seed: u32,
    pub questions: Vec<GeneratedQuestion>,
    pub stats: AggregateStats,
}

impl PhaseSet {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds phase sets from a base seed
#[derive(Debug, Clone, Default)]
pub struct PhaseSetBuilder {
    generator: QuestionGenerator,
}

impl PhaseSetBuilder {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            generator: QuestionGenerator::new(settings),
        }
    }

    /// Seed of the question at `index`
    pub fn question_seed(base_seed: u32, index: usize) -> u32 {
        base_seed.wrapping_add((index as u32).wrapping_mul(SEED_STRIDE))
    }

    /// Seed of the relaxed retry for a question seeded with `seed`
    pub fn fallback_seed(seed: u32) -> u32 {
        seed ^ FALLBACK_SEED_MASK
    }

    /// Generates `count` questions sequentially.
    pub fn build(&self, phase: Phase, count: usize, base_seed: u32) -> PhaseSetResult<PhaseSet> {
        let questions = phase
            .plan(count)
            .into_iter()
            .enumerate()
            .map(|(index, level)| self.generate_one(phase, index, level, base_seed))
            .collect::<PhaseSetResult<Vec<_>>>()?;

        Ok(self.assemble(phase, base_seed, questions))
    }

    /// Same set as `build`, generated on the rayon pool. When several
    /// questions fail, which failure is reported is unspecified.
    pub fn build_parallel(&self, phase: Phase, count: usize, base_seed: u32) -> PhaseSetResult<PhaseSet> {
        let questions = phase
            .plan(count)
            .into_par_iter()
            .enumerate()
            .map(|(index, level)| self.generate_one(phase, index, level, base_seed))
            .collect::<PhaseSetResult<Vec<_>>>()?;

        Ok(self.assemble(phase, base_seed, questions))
    }

    fn generate_one(
        &self,
        phase: Phase,
        index: usize,
        level: DifficultyLevel,
        base_seed: u32,
    ) -> PhaseSetResult<GeneratedQuestion> {
        let config = phase.base_config(level);
        let id = format!("{}-{:02}", phase, index + 1);
        self.generate_with_fallback(index, &id, &config, Self::question_seed(base_seed, index))
    }

    /// Generates question `index` from `config`. On `GenerationExhausted` it
    /// retries once with the relaxed config and `fallback_seed(seed)`; any
    /// other failure, or a failed retry, is reported for `index`.
    pub fn generate_with_fallback(
        &self,
        index: usize,
        id: &str,
        config: &GeneratorConfig,
        seed: u32,
    ) -> PhaseSetResult<GeneratedQuestion> {
        match self.generator.generate(id, config, seed) {
            Err(GenerationError::GenerationExhausted { attempts, last_rejection }) => {
                warn!(
                    "{}: exhausted {} attempts ({}); retrying without uniqueness",
                    id, attempts, last_rejection
                );
                self.generator
                    .generate(id, &config.relaxed(), Self::fallback_seed(seed))
                    .map_err(|source| PhaseSetError::Generation { index, source })
            }
            result => result.map_err(|source| PhaseSetError::Generation { index, source }),
        }
    }

    fn assemble(&self, phase: Phase, base_seed: u32, questions: Vec<GeneratedQuestion>) -> PhaseSet {
        let stats = AggregateStats::from_questions(&questions);
        info!(
            "{} phase set: {} questions (seed {}, {} relaxed)",
            phase, stats.total, base_seed, stats.relaxed_count
        );

        PhaseSet {
            phase,
            base_seed,
            questions,
            stats,
        }
    }
}

/// `generatePhaseSet(phaseName, count, seed)` with default settings
pub fn generate_phase_set(phase_name: &str, count: usize, seed: u32) -> PhaseSetResult<PhaseSet> {
    let phase: Phase = phase_name.parse()?;
    PhaseSetBuilder::default().build(phase, count, seed)
}
