//! Deterministic knapsack question generator
//!
//! Synthesizes small 0-1 knapsack instances for a requested difficulty,
//! solves them exactly, checks that the optimum is unique and scores how
//! hard each instance is. Everything is reproducible from an integer seed.
//!
//! ```no_run
//! use knapsack_core::{generate_phase_set, generate_question, DifficultyLevel, GeneratorConfig};
//!
//! let config = GeneratorConfig::new(5, DifficultyLevel::Medium);
//! let question = generate_question("q-1", &config, 42)?;
//! println!("{}", question.explanation);
//!
//! let set = generate_phase_set("assessment", 10, 7)?;
//! println!("{}", set.to_json_pretty()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod algorithm;
pub mod education;
pub mod validation;

pub use crate::algorithm::{
    DeterministicSequence, ExactSolver, Instance, Item, ItemId, KnapsackError, KnapsackSolver,
    Solution,
};
pub use crate::education::{
    generate_phase_set, generate_question, AggregateStats, DifficultyAnalyzer, DifficultyLevel,
    DifficultyMetrics, GeneratedQuestion, GenerationError, GeneratorConfig, GeneratorSettings,
    Phase, PhaseSet, PhaseSetBuilder, PhaseSetError, QuestionGenerator,
};
