//! External collaborators
//!
//! The battle talks to audio, progression and the HUD through these traits.
//! Implementations are handed to [`super::session::BattleSession`] at
//! construction; a session built without one simply skips those calls.

use bevy::prelude::*;
use serde::Serialize;

/// Sound cues the battle can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEffect {
    BossIntro,
    Question,
    Correct,
    Wrong,
    PlayerAttack,
    BossAttack,
    Hit,
    Block,
    PhaseChange,
    Victory,
    Defeat,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::BossIntro => "boss_intro",
            SoundEffect::Question => "question",
            SoundEffect::Correct => "correct",
            SoundEffect::Wrong => "wrong",
            SoundEffect::PlayerAttack => "player_attack",
            SoundEffect::BossAttack => "boss_attack",
            SoundEffect::Hit => "hit",
            SoundEffect::Block => "block",
            SoundEffect::PhaseChange => "phase_change",
            SoundEffect::Victory => "victory",
            SoundEffect::Defeat => "defeat",
        }
    }
}

/// Fire-and-forget audio. Implementations swallow their own failures.
pub trait AudioService: Send + Sync {
    fn play(&self, effect: SoundEffect, intensity: Option<f32>);
    fn speak(&self, word: &str, locale: &str);
}

/// Game-wide progression (scores, unlocks, menus) owned outside the battle
pub trait ProgressionController: Send + Sync {
    fn report_score_delta(&mut self, game_id: &str, points: i32, is_penalty: bool);
    fn notify_level_complete(&mut self, game_id: &str);
    fn display_message(&mut self, text: &str, duration_ms: u32);
    fn return_to_menu(&mut self);
}

/// Numeric HUD values pushed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Readouts {
    pub player_health: i32,
    pub boss_health: i32,
    pub boss_phase: i32,
    pub score: u32,
    pub questions_answered: u32,
    pub questions_correct: u32,
    pub required_correct: u32,
}

/// Write-only sink for [`Readouts`]
pub trait ReadoutSink {
    fn update(&mut self, readouts: &Readouts);
}

/// Audio stand-in that only logs the requested cues
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioService for LogAudio {
    fn play(&self, effect: SoundEffect, intensity: Option<f32>) {
        match intensity {
            Some(level) => debug!("play {} ({:.2})", effect.name(), level),
            None => debug!("play {}", effect.name()),
        }
    }

    fn speak(&self, word: &str, locale: &str) {
        debug!("speak '{}' [{}]", word, locale);
    }
}

/// Progression stand-in that logs calls and keeps a running total
#[derive(Debug, Default, Clone)]
pub struct LogProgression {
    pub total_points: i32,
    pub levels_completed: Vec<String>,
}

impl ProgressionController for LogProgression {
    fn report_score_delta(&mut self, game_id: &str, points: i32, is_penalty: bool) {
        if is_penalty {
            self.total_points -= points;
        } else {
            self.total_points += points;
        }
        debug!(
            "[{}] score {}{} (total {})",
            game_id,
            if is_penalty { "-" } else { "+" },
            points,
            self.total_points
        );
    }

    fn notify_level_complete(&mut self, game_id: &str) {
        info!("[{}] level complete", game_id);
        self.levels_completed.push(game_id.to_string());
    }

    fn display_message(&mut self, text: &str, duration_ms: u32) {
        info!("{} ({} ms)", text, duration_ms);
    }

    fn return_to_menu(&mut self) {
        info!("Returning to menu");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progression_tracks_total() {
        let mut progression = LogProgression::default();
        progression.report_score_delta("boss_fight", 10, false);
        progression.report_score_delta("boss_fight", 5, true);
        progression.notify_level_complete("boss_fight");

        assert_eq!(progression.total_points, 5);
        assert_eq!(progression.levels_completed, vec!["boss_fight".to_string()]);
    }

    #[test]
    fn test_sound_effect_names_are_unique() {
        let effects = [
            SoundEffect::BossIntro,
            SoundEffect::Question,
            SoundEffect::Correct,
            SoundEffect::Wrong,
            SoundEffect::PlayerAttack,
            SoundEffect::BossAttack,
            SoundEffect::Hit,
            SoundEffect::Block,
            SoundEffect::PhaseChange,
            SoundEffect::Victory,
            SoundEffect::Defeat,
        ];
        let names: std::collections::HashSet<_> = effects.iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), effects.len());
    }
}
