//! JSON configuration parsing for headless mode

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::config::BattleConfig;

/// Headless battle configuration loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessBattleConfig {
    /// Probability (0.0 - 1.0) that the scripted player answers correctly
    #[serde(default = "default_accuracy")]
    pub accuracy: f32,
    /// Ticks the scripted player waits before answering. The question timer
    /// starts on the tick the question appears, so delays of
    /// `question_ticks - 1` or more make every question time out.
    #[serde(default = "default_answer_delay")]
    pub answer_delay_ticks: u32,
    /// Hold the defend input for the whole battle
    #[serde(default)]
    pub always_defend: bool,
    /// Fire the player attack whenever it is off cooldown between questions
    #[serde(default)]
    pub attack_between_questions: bool,
    /// Random seed for deterministic battle reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Simulation updates before the battle is abandoned (default: 36000, ten minutes)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Custom output path for the battle log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Battle tuning overrides
    #[serde(default)]
    pub battle: BattleConfig,
}

fn default_accuracy() -> f32 {
    0.8
}

fn default_answer_delay() -> u32 {
    60
}

fn default_max_ticks() -> u64 {
    36_000
}

impl Default for HeadlessBattleConfig {
    fn default() -> Self {
        Self {
            accuracy: default_accuracy(),
            answer_delay_ticks: default_answer_delay(),
            always_defend: false,
            attack_between_questions: false,
            random_seed: None,
            max_ticks: default_max_ticks(),
            output_path: None,
            battle: BattleConfig::default(),
        }
    }
}

impl HeadlessBattleConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: HeadlessBattleConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(format!(
                "accuracy must be between 0.0 and 1.0 (got {})",
                self.accuracy
            ));
        }
        if self.max_ticks == 0 {
            return Err("max_ticks must be positive".to_string());
        }
        self.battle.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = HeadlessBattleConfig::from_json("{}").unwrap();
        assert_eq!(config, HeadlessBattleConfig::default());
    }

    #[test]
    fn test_accuracy_out_of_range_is_rejected() {
        let err = HeadlessBattleConfig::from_json(r#"{ "accuracy": 1.5 }"#).unwrap_err();
        assert!(err.contains("accuracy"));
    }

    #[test]
    fn test_nested_battle_config_is_validated() {
        let err =
            HeadlessBattleConfig::from_json(r#"{ "battle": { "question_ticks": 0 } }"#).unwrap_err();
        assert!(err.contains("question_ticks"));
    }

    #[test]
    fn test_malformed_json_reports_parse_error() {
        let err = HeadlessBattleConfig::from_json("{ accuracy: }").unwrap_err();
        assert!(err.starts_with("Failed to parse JSON"));
    }
}
