//! Battle tuning
//!
//! Timings and identifiers that settings files and headless configs may
//! override. Every field has a default so partial files stay valid.

use serde::{Deserialize, Serialize};

use super::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Identifier reported to the progression controller
    pub game_id: String,
    /// Locale passed to the speech service when a word is read out
    pub speech_locale: String,
    /// Ticks spent in the intro cutscene
    pub intro_ticks: u32,
    /// Ticks allowed to answer each question
    pub question_ticks: u32,
    /// Ticks between an answer and the next question
    pub post_answer_ticks: u32,
    /// Correct answers shown as the progress goal
    pub required_correct: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            game_id: "boss_fight".to_string(),
            speech_locale: "en-US".to_string(),
            intro_ticks: INTRO_TICKS,
            question_ticks: QUESTION_TICKS,
            post_answer_ticks: POST_ANSWER_TICKS,
            required_correct: REQUIRED_CORRECT,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.game_id.trim().is_empty() {
            return Err("game_id must not be empty".to_string());
        }
        if self.question_ticks == 0 {
            return Err("question_ticks must be positive".to_string());
        }
        if self.required_correct == 0 {
            return Err("required_correct must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BattleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.question_ticks, 300);
        assert_eq!(config.post_answer_ticks, 90);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BattleConfig = serde_json::from_str(r#"{ "question_ticks": 120 }"#).unwrap();
        assert_eq!(config.question_ticks, 120);
        assert_eq!(config.intro_ticks, INTRO_TICKS);
        assert_eq!(config.game_id, "boss_fight");
    }

    #[test]
    fn test_zero_question_time_is_rejected() {
        let config = BattleConfig {
            question_ticks: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
