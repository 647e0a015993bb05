//! Question Generation Framework
//!
//! Produces one knapsack question per call through a bounded
//! generate-and-test loop. Each attempt walks a small state machine:
//!
//! ```text
//! Synthesizing -> Solving -> Validating -> Done
//!                    |            |
//!                    +-> Retrying <+
//!                          |
//!                          +-> Synthesizing (next attempt)
//! ```
//!
//! A candidate is rejected when no item fits (infeasible), when its solution
//! fails verification, or, if uniqueness is required, when more than one
//! feasible subset reaches the optimal reward. Rejections advance the same
//! `DeterministicSequence`, so every retry sees fresh items while the whole
//! run stays reproducible from the seed. After `max_attempts` rejections the
//! generator fails with `GenerationExhausted`.
//!
//! Uniqueness and the optimality gap are computed over every subset of the
//! candidate; the configured enumeration budget is widened as needed.

use std::collections::BTreeSet;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::knapsack::ExactSolver;
use crate::algorithm::sequence::DeterministicSequence;
use crate::algorithm::traits::{Instance, ItemId, KnapsackError, KnapsackSolver, Solution};
use crate::education::assessment::{DifficultyAnalyzer, DifficultyMetrics};
use crate::education::config::{ConfigError, DifficultyLevel, GeneratorConfig, GeneratorSettings};
use crate::education::synthesis::InstanceSynthesizer;
use crate::validation::correctness::verify_solution;

/// Why a candidate was discarded. Recovered by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no item fits capacity {capacity}")]
    InfeasibleInstance { capacity: u64 },

    #[error("{count} subsets reach the optimal reward")]
    NonUniqueSolution { count: usize },

    #[error("solution failed verification: {0}")]
    VerificationFailed(String),
}

/// Question generation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    InvalidInstance(#[from] KnapsackError),

    #[error("Generation exhausted after {attempts} attempts; last rejection: {last_rejection}")]
    GenerationExhausted {
        attempts: usize,
        last_rejection: Rejection,
    },
}

/// Type alias for generation results
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Generation state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationState {
    Synthesizing,
    Solving,
    Validating,
    Retrying,
    Done,
}

impl GenerationState {
    /// Legal transitions of the attempt loop
    pub fn can_advance_to(self, next: GenerationState) -> bool {
        use GenerationState::*;
        matches!(
            (self, next),
            (Synthesizing, Solving)
                | (Solving, Validating)
                | (Solving, Retrying)
                | (Validating, Done)
                | (Validating, Retrying)
                | (Retrying, Synthesizing)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == GenerationState::Done
    }
}

/// Current state plus attempt counter
#[derive(Debug, Clone, Copy)]
struct Progress {
    state: GenerationState,
    attempt: usize,
}

impl Progress {
    fn start() -> Self {
        Self {
            state: GenerationState::Synthesizing,
            attempt: 1,
        }
    }

    fn advance(&mut self, next: GenerationState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!("attempt {}: {:?} -> {:?}", self.attempt, self.state, next);
        if next == GenerationState::Synthesizing {
            self.attempt += 1;
        }
        self.state = next;
    }
}

/// How the question came to be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Seed the sequence was constructed from
    pub seed: u32,

    /// Attempts consumed, including the accepted one
    pub attempts: usize,

    /// Whether a unique optimum was enforced
    pub unique_solution_required: bool,
}

/// One generated question, immutable once returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: String,
    pub instance: Instance,
    pub selected_ids: BTreeSet<ItemId>,
    pub achieved_reward: u64,
    pub used_weight: u64,
    pub difficulty_level: DifficultyLevel,
    pub metrics: DifficultyMetrics,
    pub explanation: String,
    pub generation: GenerationMetadata,
}

/// Accepted candidate awaiting metrics
struct Accepted {
    instance: Instance,
    solution: Solution,
}

/// Synthesize -> solve -> validate loop for single questions
#[derive(Debug, Clone, Default)]
pub struct QuestionGenerator {
    synthesizer: InstanceSynthesizer,
    solver: ExactSolver,
    analyzer: DifficultyAnalyzer,
    settings: GeneratorSettings,
}

impl QuestionGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            synthesizer: InstanceSynthesizer::new(),
            solver: ExactSolver::new(),
            analyzer: DifficultyAnalyzer::new(settings.enumeration_budget),
            settings,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generates one question from `config`, reproducibly from `seed`.
    ///
    /// # Errors
    /// - `InvalidConfig` when `config` fails validation (not retried)
    /// - `InvalidInstance` when synthesis produced malformed input (not retried)
    /// - `GenerationExhausted` when every attempt was rejected
    pub fn generate(
        &self,
        id: impl Into<String>,
        config: &GeneratorConfig,
        seed: u32,
    ) -> GenerationResult<GeneratedQuestion> {
        config.validate()?;

        let id = id.into();
        let max_attempts = self.settings.max_attempts.max(1);
        let mut sequence = DeterministicSequence::new(seed);
        let mut progress = Progress::start();

        loop {
            match self.attempt(config, &mut sequence, &mut progress)? {
                Ok(accepted) => {
                    progress.advance(GenerationState::Done);
                    return Ok(self.finish(id, config, seed, progress.attempt, accepted));
                }
                Err(rejection) => {
                    debug!(
                        "question {}: attempt {}/{} rejected: {}",
                        id, progress.attempt, max_attempts, rejection
                    );
                    progress.advance(GenerationState::Retrying);

                    if progress.attempt >= max_attempts {
                        return Err(GenerationError::GenerationExhausted {
                            attempts: progress.attempt,
                            last_rejection: rejection,
                        });
                    }
                    progress.advance(GenerationState::Synthesizing);
                }
            }
        }
    }

    /// Runs one attempt up to acceptance or rejection. Fatal errors are the
    /// outer `Err`; rejections are the inner one.
    fn attempt(
        &self,
        config: &GeneratorConfig,
        sequence: &mut DeterministicSequence,
        progress: &mut Progress,
    ) -> GenerationResult<Result<Accepted, Rejection>> {
        let candidate = self.synthesizer.synthesize(config, sequence);
        progress.advance(GenerationState::Solving);

        if candidate.capacity == 0 {
            return Ok(Err(Rejection::InfeasibleInstance { capacity: 0 }));
        }

        let instance = Instance::new(candidate.items, candidate.capacity)?;
        let solution = self.solver.solve_instance(&instance)?;
        progress.advance(GenerationState::Validating);

        if solution.is_empty() {
            return Ok(Err(Rejection::InfeasibleInstance {
                capacity: instance.capacity(),
            }));
        }

        if let Err(error) = verify_solution(&instance, &solution) {
            return Ok(Err(Rejection::VerificationFailed(error.to_string())));
        }

        if config.require_unique_solution {
            let optimal = self
                .analyzer
                .covering(instance.len())
                .optimal_subset_count(&instance, &solution);
            if optimal.value != 1 {
                return Ok(Err(Rejection::NonUniqueSolution {
                    count: optimal.value,
                }));
            }
        }

        Ok(Ok(Accepted { instance, solution }))
    }

    fn finish(
        &self,
        id: String,
        config: &GeneratorConfig,
        seed: u32,
        attempts: usize,
        accepted: Accepted,
    ) -> GeneratedQuestion {
        let Accepted { instance, solution } = accepted;
        let metrics = self.analyzer.covering(instance.len()).analyze(&instance, &solution);
        let explanation = explain(&instance, &solution, &metrics);

        GeneratedQuestion {
            id,
            selected_ids: solution.selected_ids,
            achieved_reward: solution.achieved_reward,
            used_weight: solution.used_weight,
            difficulty_level: config.difficulty_level,
            metrics,
            explanation,
            generation: GenerationMetadata {
                seed,
                attempts,
                unique_solution_required: config.require_unique_solution,
            },
            instance,
        }
    }
}

/// `generateQuestion(id, config, seed)` with default settings
pub fn generate_question(
    id: impl Into<String>,
    config: &GeneratorConfig,
    seed: u32,
) -> GenerationResult<GeneratedQuestion> {
    QuestionGenerator::default().generate(id, config, seed)
}

/// Human-readable account of the optimal selection
fn explain(instance: &Instance, solution: &Solution, metrics: &DifficultyMetrics) -> String {
    let ids: Vec<String> = solution.selected_ids.iter().map(ItemId::to_string).collect();
    let noun = if ids.len() == 1 { "item" } else { "items" };

    let mut text = format!(
        "The best selection is {} {}: total weight {} of capacity {}, reward {}.",
        noun,
        join_words(&ids),
        solution.used_weight,
        instance.capacity(),
        solution.achieved_reward
    );

    if metrics.optimality_gap == 0 {
        text.push_str(" Another selection earns the same reward.");
    } else {
        text.push_str(&format!(
            " The next best selection earns {} less.",
            metrics.optimality_gap
        ));
    }

    if metrics.dominance_count > 0 {
        text.push_str(&format!(
            " {} of the {} items can be ruled out because another item is lighter and at least as rewarding.",
            metrics.dominance_count,
            instance.len()
        ));
    }

    text
}

fn join_words(words: &[String]) -> String {
    match words {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy_config() -> GeneratorConfig {
        GeneratorConfig::new(4, DifficultyLevel::Easy)
            .with_weight_range(2, 9)
            .with_reward_range(4, 20)
    }

    #[test]
    fn test_state_transitions() {
        use GenerationState::*;
        assert!(Synthesizing.can_advance_to(Solving));
        assert!(Solving.can_advance_to(Retrying));
        assert!(Validating.can_advance_to(Done));
        assert!(Retrying.can_advance_to(Synthesizing));
        assert!(!Done.can_advance_to(Synthesizing));
        assert!(!Synthesizing.can_advance_to(Done));
        assert!(Done.is_terminal());
    }

    #[test]
    fn test_generate_easy_question() {
        let question = generate_question("q-1", &easy_config(), 2024).unwrap();

        assert_eq!(question.id, "q-1");
        assert_eq!(question.instance.len(), 4);
        assert!(!question.selected_ids.is_empty());
        assert!(question.used_weight <= question.instance.capacity());
        assert!(question.metrics.dominance_count >= 1);
        assert!(question.metrics.optimality_gap > 0);
        assert!(question.generation.attempts >= 1);
        assert!(question.explanation.contains("best selection"));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = GeneratorConfig::new(5, DifficultyLevel::Hard);
        let first = generate_question("a", &config, 77).unwrap();
        let second = generate_question("a", &config, 77).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_not_retried() {
        let config = GeneratorConfig::new(1, DifficultyLevel::Easy);
        assert!(matches!(
            generate_question("bad", &config, 1),
            Err(GenerationError::InvalidConfig(ConfigError::ItemCount(1)))
        ));
    }

    #[test]
    fn test_impossible_config_exhausts() {
        let config = GeneratorConfig::new(2, DifficultyLevel::Hard)
            .with_weight_range(50, 60)
            .with_slack_ratio(0.1);
        let generator = QuestionGenerator::new(GeneratorSettings {
            max_attempts: 7,
            ..GeneratorSettings::default()
        });

        match generator.generate("never", &config, 5) {
            Err(GenerationError::GenerationExhausted {
                attempts,
                last_rejection,
            }) => {
                assert_eq!(attempts, 7);
                assert!(matches!(last_rejection, Rejection::InfeasibleInstance { .. }));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_join_words() {
        let words: Vec<String> = ["#0", "#1", "#2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_words(&words), "#0, #1 and #2");
        assert_eq!(join_words(&words[..1]), "#0");
        assert_eq!(join_words(&[]), "");
    }

    #[test]
    fn test_explanation_mentions_totals() {
        let instance = Instance::new(
            vec![
                crate::algorithm::traits::Item::new(0, 3, 12),
                crate::algorithm::traits::Item::new(1, 4, 10),
                crate::algorithm::traits::Item::new(2, 2, 8),
            ],
            6,
        )
        .unwrap();
        let solution = ExactSolver.solve_instance(&instance).unwrap();
        let metrics = DifficultyAnalyzer::default().analyze(&instance, &solution);
        let text = explain(&instance, &solution, &metrics);

        assert!(text.contains("items #0 and #2"));
        assert!(text.contains("total weight 5 of capacity 6, reward 20"));
    }
}
