//! Generator configuration
//!
//! `GeneratorConfig` is the caller-supplied, read-only description of one
//! question: item count, value ranges, calibration ratio, difficulty tier and
//! the uniqueness requirement. `GeneratorSettings` holds the two tuning
//! constants of the retry loop and can be overridden from the environment:
//!
//! - `KNAPSACK_MAX_ATTEMPTS` (default 50)
//! - `KNAPSACK_ENUMERATION_BUDGET` (default 1024)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::knapsack::{DEFAULT_ENUMERATION_BUDGET, MAX_EXHAUSTIVE_ITEMS};

/// Largest item count a configuration may request; generated questions are
/// always checked over their full power set
pub const MAX_ITEM_COUNT: usize = MAX_EXHAUSTIVE_ITEMS;

/// Upper bound on configured weights and rewards; keeps the DP table small
pub const MAX_RANGE_VALUE: u64 = 10_000;

/// Capacity / total weight used when no target ratio is configured
pub const DEFAULT_SLACK_RATIO: f64 = 0.7;

/// Attempt ceiling of the generation loop
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

pub const MAX_ATTEMPTS_ENV: &str = "KNAPSACK_MAX_ATTEMPTS";
pub const ENUMERATION_BUDGET_ENV: &str = "KNAPSACK_ENUMERATION_BUDGET";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Item count {0} outside supported range 2..={}", MAX_ITEM_COUNT)]
    ItemCount(usize),

    #[error("Invalid {name} range [{min}, {max}]")]
    Range { name: &'static str, min: u64, max: u64 },

    #[error("Slack ratio must be finite and positive, got {0}")]
    SlackRatio(f64),

    #[error("Unknown difficulty level: {0}")]
    UnknownDifficulty(String),
}

/// Difficulty tier of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Engineered dominance structure for this tier
    pub fn dominance_shape(self) -> DominanceShape {
        match self {
            Self::Easy => DominanceShape::Full,
            Self::Medium => DominanceShape::Partial,
            Self::Hard => DominanceShape::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// How much dominance the synthesizer builds into an item set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DominanceShape {
    /// Complete dominance chain; the best item is obvious
    Full,

    /// Chain over the first half, random items after
    Partial,

    /// Every item random
    None,
}

/// Caller-supplied description of one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub item_count: usize,

    /// Inclusive `[min, max]` item weight
    pub weight_range: (u64, u64),

    /// Inclusive `[min, max]` item reward
    pub reward_range: (u64, u64),

    /// Capacity / total weight; `DEFAULT_SLACK_RATIO` when absent
    #[serde(default)]
    pub target_slack_ratio: Option<f64>,

    pub difficulty_level: DifficultyLevel,

    #[serde(default = "default_require_unique")]
    pub require_unique_solution: bool,
}

fn default_require_unique() -> bool {
    true
}

impl GeneratorConfig {
    pub fn new(item_count: usize, difficulty_level: DifficultyLevel) -> Self {
        Self {
            item_count,
            weight_range: (1, 10),
            reward_range: (1, 20),
            target_slack_ratio: None,
            difficulty_level,
            require_unique_solution: true,
        }
    }

    pub fn with_weight_range(mut self, min: u64, max: u64) -> Self {
        self.weight_range = (min, max);
        self
    }

    pub fn with_reward_range(mut self, min: u64, max: u64) -> Self {
        self.reward_range = (min, max);
        self
    }

    pub fn with_slack_ratio(mut self, ratio: f64) -> Self {
        self.target_slack_ratio = Some(ratio);
        self
    }

    pub fn with_unique_solution(mut self, required: bool) -> Self {
        self.require_unique_solution = required;
        self
    }

    /// Copy with the uniqueness requirement dropped
    pub fn relaxed(&self) -> Self {
        self.clone().with_unique_solution(false)
    }

    pub fn slack_ratio(&self) -> f64 {
        self.target_slack_ratio.unwrap_or(DEFAULT_SLACK_RATIO)
    }

    pub fn dominance_shape(&self) -> DominanceShape {
        self.difficulty_level.dominance_shape()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_ITEM_COUNT).contains(&self.item_count) {
            return Err(ConfigError::ItemCount(self.item_count));
        }
        validate_range("weight", self.weight_range)?;
        validate_range("reward", self.reward_range)?;
        if let Some(ratio) = self.target_slack_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(ConfigError::SlackRatio(ratio));
            }
        }
        Ok(())
    }
}

fn validate_range(name: &'static str, (min, max): (u64, u64)) -> Result<(), ConfigError> {
    if min == 0 || min > max || max > MAX_RANGE_VALUE {
        return Err(ConfigError::Range { name, min, max });
    }
    Ok(())
}

/// Tuning constants of the generation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Attempts before `GenerationExhausted`
    pub max_attempts: usize,

    /// Subsets visited per uniqueness / runner-up query. The generator
    /// raises it to the full power set of each candidate.
    pub enumeration_budget: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            enumeration_budget: DEFAULT_ENUMERATION_BUDGET,
        }
    }
}

impl GeneratorSettings {
    /// Defaults overridden by `KNAPSACK_MAX_ATTEMPTS` and
    /// `KNAPSACK_ENUMERATION_BUDGET`. Absent, unparsable or zero values keep
    /// the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: env_positive(MAX_ATTEMPTS_ENV).unwrap_or(defaults.max_attempts),
            enumeration_budget: env_positive(ENUMERATION_BUDGET_ENV)
                .unwrap_or(defaults.enumeration_budget),
        }
    }
}

fn env_positive(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&value| value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mapping() {
        assert_eq!(DifficultyLevel::Easy.dominance_shape(), DominanceShape::Full);
        assert_eq!(DifficultyLevel::Medium.dominance_shape(), DominanceShape::Partial);
        assert_eq!(DifficultyLevel::Hard.dominance_shape(), DominanceShape::None);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Hard);
        assert_eq!(" easy ".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Easy);
        assert!("extreme".parse::<DifficultyLevel>().is_err());
    }

    #[test]
    fn test_validate_item_count() {
        assert!(GeneratorConfig::new(2, DifficultyLevel::Easy).validate().is_ok());
        assert_eq!(
            GeneratorConfig::new(1, DifficultyLevel::Easy).validate(),
            Err(ConfigError::ItemCount(1))
        );
        assert!(GeneratorConfig::new(13, DifficultyLevel::Easy).validate().is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let inverted = GeneratorConfig::new(4, DifficultyLevel::Hard).with_weight_range(9, 3);
        assert!(matches!(inverted.validate(), Err(ConfigError::Range { name: "weight", .. })));

        let zero = GeneratorConfig::new(4, DifficultyLevel::Hard).with_reward_range(0, 3);
        assert!(matches!(zero.validate(), Err(ConfigError::Range { name: "reward", .. })));

        let huge = GeneratorConfig::new(4, DifficultyLevel::Hard)
            .with_weight_range(1, MAX_RANGE_VALUE + 1);
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_validate_slack_ratio() {
        let config = GeneratorConfig::new(4, DifficultyLevel::Medium);
        assert!(config.clone().with_slack_ratio(0.0).validate().is_err());
        assert!(config.clone().with_slack_ratio(f64::NAN).validate().is_err());
        assert!(config.clone().with_slack_ratio(0.5).validate().is_ok());
        assert_eq!(config.slack_ratio(), DEFAULT_SLACK_RATIO);
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{
            "item_count": 5,
            "weight_range": [2, 9],
            "reward_range": [3, 15],
            "difficulty_level": "medium"
        }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.weight_range, (2, 9));
        assert!(config.require_unique_solution);
        assert!(config.target_slack_ratio.is_none());
        assert_eq!(config.difficulty_level, DifficultyLevel::Medium);
    }

    #[test]
    fn test_relaxed_drops_uniqueness() {
        let config = GeneratorConfig::new(4, DifficultyLevel::Hard);
        assert!(!config.relaxed().require_unique_solution);
        assert!(config.require_unique_solution);
    }

    #[test]
    fn test_default_settings() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.max_attempts, 50);
        assert_eq!(settings.enumeration_budget, 1024);
    }
}
