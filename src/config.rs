// Configuration module for reading Engine.toml
// Every tunable of the move-selection engine lives here

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::AiPersonality;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub search: SearchConfig,
    pub reactive: ReactiveConfig,
    pub estimator: EstimatorConfig,
    pub evaluator: EvaluatorConfig,
}

/// Minimax search constants for the Hard tier
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Plies searched below each root candidate
    pub depth: u8,
    /// Base score of a forced win; remaining depth is added on top
    pub win_score: i32,
}

/// Easy/Medium move selection constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReactiveConfig {
    /// How many columns nearest the centre get extra weight on Easy
    pub center_columns: usize,
    /// Number of times each centre column is entered into the Easy pool
    pub center_weight: usize,
}

/// Win-probability estimator constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub max_simulations: usize,
    pub max_simulations_per_column: usize,
    pub max_rollout_plies: usize,

    // Light line-scan weights for the fast estimate
    pub four_weight: i32,
    pub three_weight: i32,
    pub two_weight: i32,

    // probability = scale_center + diff / scale_divisor * scale_factor
    pub scale_center: f64,
    pub scale_divisor: f64,
    pub scale_factor: f64,
    pub min_probability: f64,
    pub max_probability: f64,
}

/// Weight tables for every evaluator personality
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EvaluatorConfig {
    /// How many columns nearest the centre earn `center_bonus`
    pub center_columns: usize,
    pub balanced: PersonalityWeights,
    pub aggressive: PersonalityWeights,
    pub defensive: PersonalityWeights,
    pub tricky: PersonalityWeights,
}

impl EvaluatorConfig {
    /// Gets the weight table for a personality
    pub fn for_personality(&self, personality: AiPersonality) -> &PersonalityWeights {
        match personality {
            AiPersonality::Balanced => &self.balanced,
            AiPersonality::Aggressive => &self.aggressive,
            AiPersonality::Defensive => &self.defensive,
            AiPersonality::Tricky => &self.tricky,
        }
    }
}

/// Window weights indexed by `count - 1` for a five-cell window holding
/// `count` pieces of one side and no pieces of the other
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PersonalityWeights {
    pub ai: [i32; 5],
    pub opponent: [i32; 5],
    /// Per AI piece in the centre columns
    pub center_bonus: i32,
    /// Per AI piece in the outermost columns
    pub edge_bonus: i32,
    /// Per-window perturbation drawn from -window_jitter..=window_jitter
    #[serde(default)]
    pub window_jitter: i32,
    /// Final perturbation as a percentage of the unperturbed total
    #[serde(default)]
    pub score_jitter_percent: i32,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Engine.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Engine.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Engine.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Engine.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                depth: 5,
                win_score: 100_000,
            },
            reactive: ReactiveConfig {
                center_columns: 4,
                center_weight: 3,
            },
            estimator: EstimatorConfig {
                max_simulations: 100,
                max_simulations_per_column: 20,
                max_rollout_plies: 50,
                four_weight: 100,
                three_weight: 20,
                two_weight: 5,
                scale_center: 50.0,
                scale_divisor: 100.0,
                scale_factor: 10.0,
                min_probability: 5.0,
                max_probability: 95.0,
            },
            evaluator: EvaluatorConfig {
                center_columns: 4,
                balanced: PersonalityWeights {
                    ai: [5, 50, 500, 5_000, 100_000],
                    opponent: [-4, -40, -400, -4_000, -80_000],
                    center_bonus: 1,
                    edge_bonus: 0,
                    window_jitter: 0,
                    score_jitter_percent: 0,
                },
                aggressive: PersonalityWeights {
                    ai: [8, 80, 800, 8_000, 150_000],
                    opponent: [-2, -20, -200, -3_000, -80_000],
                    center_bonus: 2,
                    edge_bonus: 0,
                    window_jitter: 0,
                    score_jitter_percent: 0,
                },
                defensive: PersonalityWeights {
                    ai: [3, 30, 300, 3_000, 100_000],
                    opponent: [-6, -65, -650, -6_500, -120_000],
                    center_bonus: 0,
                    edge_bonus: 0,
                    window_jitter: 0,
                    score_jitter_percent: 0,
                },
                tricky: PersonalityWeights {
                    ai: [4, 45, 450, 4_500, 90_000],
                    opponent: [-3, -36, -360, -3_600, -72_000],
                    center_bonus: 0,
                    edge_bonus: 5,
                    window_jitter: 3,
                    score_jitter_percent: 10,
                },
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Engine.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }

    /// Validates configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Validation("search.depth must be > 0".into()));
        }
        if self.search.win_score <= 0 {
            return Err(ConfigError::Validation(
                "search.win_score must be > 0".into(),
            ));
        }
        if self.evaluator.center_columns > crate::board::COLUMNS {
            return Err(ConfigError::Validation(
                "evaluator.center_columns must not exceed the column count".into(),
            ));
        }
        if self.reactive.center_weight == 0 {
            return Err(ConfigError::Validation(
                "reactive.center_weight must be > 0".into(),
            ));
        }
        if self.estimator.max_simulations == 0 || self.estimator.max_simulations_per_column == 0 {
            return Err(ConfigError::Validation(
                "estimator simulation caps must be > 0".into(),
            ));
        }
        if self.estimator.scale_divisor == 0.0 {
            return Err(ConfigError::Validation(
                "estimator.scale_divisor must be non-zero".into(),
            ));
        }
        if self.estimator.min_probability > self.estimator.max_probability {
            return Err(ConfigError::Validation(
                "estimator.min_probability must not exceed max_probability".into(),
            ));
        }
        for personality in AiPersonality::all() {
            let weights = self.evaluator.for_personality(personality);
            if weights.window_jitter < 0 || weights.score_jitter_percent < 0 {
                return Err(ConfigError::Validation(format!(
                    "evaluator.{} jitter must be >= 0",
                    personality.as_str()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.search.depth, 5);
        assert_eq!(config.evaluator.balanced.ai[4], 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_toml_can_be_parsed() {
        // This test ensures Engine.toml is valid and can be parsed
        let result = Config::from_file("Engine.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Engine.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Engine.toml").expect("Engine.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        assert_eq!(file_config.search, hardcoded_config.search);
        assert_eq!(file_config.reactive, hardcoded_config.reactive);
        assert_eq!(file_config.estimator, hardcoded_config.estimator);
        assert_eq!(
            file_config.evaluator.center_columns,
            hardcoded_config.evaluator.center_columns
        );
        assert_eq!(file_config.evaluator.balanced, hardcoded_config.evaluator.balanced);
        assert_eq!(
            file_config.evaluator.aggressive,
            hardcoded_config.evaluator.aggressive
        );
        assert_eq!(
            file_config.evaluator.defensive,
            hardcoded_config.evaluator.defensive
        );
        assert_eq!(file_config.evaluator.tricky, hardcoded_config.evaluator.tricky);
    }

    #[test]
    fn test_personality_lookup() {
        let config = Config::default_hardcoded();
        let defensive = config.evaluator.for_personality(AiPersonality::Defensive);
        assert_eq!(defensive.opponent[4], -120_000);
        let tricky = config.evaluator.for_personality(AiPersonality::Tricky);
        assert_eq!(tricky.edge_bonus, 5);
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = Config::default_hardcoded();
        config.search.depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_inverted_clamp() {
        let mut config = Config::default_hardcoded();
        config.estimator.min_probability = 96.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.estimator.max_simulations_per_column, 20);
    }
}
