//! Question generation layer
//!
//! Synthesis, difficulty assessment, the per-question retry loop and
//! phase-level batching.

pub mod config;
pub mod assessment;
pub mod synthesis;
pub mod exercise;
pub mod phase;

pub use self::config::{
    ConfigError, DifficultyLevel, DominanceShape, GeneratorConfig, GeneratorSettings,
};
pub use self::assessment::{DifficultyAnalyzer, DifficultyMetrics};
pub use self::synthesis::{Candidate, InstanceSynthesizer};
pub use self::exercise::{
    generate_question, GeneratedQuestion, GenerationError, GenerationMetadata,
    GenerationResult, GenerationState, QuestionGenerator, Rejection,
};
pub use self::phase::{
    generate_phase_set, AggregateStats, Phase, PhaseSet, PhaseSetBuilder, PhaseSetError,
    PhaseSetResult,
};
