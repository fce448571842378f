//! Headless battle execution
//!
//! Runs a battle without any graphical output. A scripted player answers
//! questions with a configured accuracy and delay, one simulation tick per
//! app update, so runs with the same seed are reproducible.

use bevy::prelude::*;

use crate::battle::components::GameRng;
use crate::battle::log::BattleMetadata;
use crate::battle::services::{LogAudio, LogProgression};
use crate::battle::session::{BattleOutcome, BattleSession, BattleState};
use crate::words::{PronunciationClass, WordBank};

use super::config::HeadlessBattleConfig;

/// Result of a completed headless battle
#[derive(Debug, Clone)]
pub struct BattleResult {
    /// None when the battle hit `max_ticks` before either side fell
    pub outcome: Option<BattleOutcome>,
    /// App updates run, including the intro
    pub ticks: u64,
    pub score: u32,
    pub questions_answered: u32,
    pub questions_correct: u32,
    pub player_health: i32,
    pub boss_health: i32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Where the battle log was written, if saving succeeded
    pub log_path: Option<String>,
}

/// Answers questions on behalf of a player
pub struct ScriptedPlayer {
    accuracy: f32,
    answer_delay_ticks: u32,
    always_defend: bool,
    attack_between_questions: bool,
    rng: GameRng,
}

impl ScriptedPlayer {
    pub fn new(config: &HeadlessBattleConfig) -> Self {
        // Separate stream so the player's choices don't shift the battle's own rolls
        let rng = match config.random_seed {
            Some(seed) => GameRng::from_seed(seed.wrapping_add(1)),
            None => GameRng::from_entropy(),
        };
        Self {
            accuracy: config.accuracy,
            answer_delay_ticks: config.answer_delay_ticks,
            always_defend: config.always_defend,
            attack_between_questions: config.attack_between_questions,
            rng,
        }
    }

    /// Pick an answer: correct with probability `accuracy`, otherwise one of
    /// the two wrong classes.
    pub fn choose(&mut self, expected: PronunciationClass) -> PronunciationClass {
        if self.rng.random_f32() < self.accuracy {
            return expected;
        }
        let wrong: Vec<PronunciationClass> = PronunciationClass::all()
            .into_iter()
            .filter(|class| *class != expected)
            .collect();
        wrong[self.rng.random_index(wrong.len())]
    }

    /// Feed this tick's inputs to the session
    pub fn drive(&mut self, session: &mut BattleSession) {
        if session.state() != BattleState::Active {
            return;
        }

        if self.always_defend {
            session.set_defending(true);
        }

        let word = session.question().map(|active| active.question.word.clone());
        match (word, session.question_age()) {
            (Some(word), Some(age)) if age >= self.answer_delay_ticks as u64 => {
                let answer = WordBank.classify(&word).map(|expected| self.choose(expected));
                session.submit_answer(answer);
            }
            (None, _) if self.attack_between_questions => {
                session.player_attack();
            }
            _ => {}
        }
    }
}

/// Resource to track headless battle state
#[derive(Resource)]
pub struct HeadlessBattleState {
    pub max_ticks: u64,
    pub elapsed_ticks: u64,
    pub output_path: Option<String>,
    pub complete: bool,
    pub script: ScriptedPlayer,
    pub result: Option<BattleResult>,
}

/// Plugin for headless battle execution
pub struct HeadlessPlugin {
    pub config: HeadlessBattleConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                GameRng::from_entropy()
            }
        };

        let session = BattleSession::new(self.config.battle.clone(), rng)
            .with_audio(LogAudio)
            .with_progression(LogProgression::default());

        app.insert_resource(session)
            .insert_resource(HeadlessBattleState {
                max_ticks: self.config.max_ticks,
                elapsed_ticks: 0,
                output_path: self.config.output_path.clone(),
                complete: false,
                script: ScriptedPlayer::new(&self.config),
                result: None,
            })
            .add_systems(Startup, headless_start_battle)
            .add_systems(
                Update,
                (headless_drive_player, headless_tick, headless_check_battle_end).chain(),
            );
    }
}

fn headless_start_battle(mut session: ResMut<BattleSession>) {
    session.start_battle();
}

fn headless_drive_player(
    mut session: ResMut<BattleSession>,
    mut headless_state: ResMut<HeadlessBattleState>,
) {
    if !headless_state.complete {
        headless_state.script.drive(&mut session);
    }
}

fn headless_tick(mut session: ResMut<BattleSession>, mut headless_state: ResMut<HeadlessBattleState>) {
    if headless_state.complete {
        return;
    }
    session.tick();
    headless_state.elapsed_ticks += 1;
}

fn headless_check_battle_end(
    session: Res<BattleSession>,
    mut headless_state: ResMut<HeadlessBattleState>,
) {
    if headless_state.complete {
        return;
    }

    let outcome = session.outcome();
    if outcome.is_none() && headless_state.elapsed_ticks < headless_state.max_ticks {
        return;
    }

    match outcome {
        Some(outcome) => info!("Battle ended: {}", outcome.name()),
        None => info!(
            "Battle abandoned after {} ticks without a winner",
            headless_state.elapsed_ticks
        ),
    }

    let metadata = session.metadata();
    let log_path = match session
        .log()
        .save_to_file(&metadata, headless_state.output_path.as_deref())
    {
        Ok(path) => {
            println!("Battle complete. Log saved to: {}", path);
            Some(path)
        }
        Err(e) => {
            eprintln!("Failed to save battle log: {}", e);
            None
        }
    };

    let ticks = headless_state.elapsed_ticks;
    headless_state.result = Some(build_battle_result(&metadata, outcome, ticks, log_path));
    headless_state.complete = true;
}

fn build_battle_result(
    metadata: &BattleMetadata,
    outcome: Option<BattleOutcome>,
    ticks: u64,
    log_path: Option<String>,
) -> BattleResult {
    BattleResult {
        outcome,
        ticks,
        score: metadata.score,
        questions_answered: metadata.questions_answered,
        questions_correct: metadata.questions_correct,
        player_health: metadata.player_health,
        boss_health: metadata.boss_health,
        random_seed: metadata.random_seed,
        log_path,
    }
}

/// Run a headless battle to completion and return its result
pub fn run_headless_battle(config: HeadlessBattleConfig) -> Result<BattleResult, String> {
    config.validate()?;

    println!("Starting headless boss fight...");
    println!("  Accuracy: {:.0}%", config.accuracy * 100.0);
    println!("  Answer delay: {} ticks", config.answer_delay_ticks);
    println!("  Max ticks: {}", config.max_ticks);

    let max_ticks = config.max_ticks;

    // Drive updates by hand: one update is one simulation tick
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(HeadlessPlugin { config });
    app.finish();
    app.cleanup();

    for _ in 0..=max_ticks.saturating_add(1) {
        app.update();
        if app.world().resource::<HeadlessBattleState>().complete {
            break;
        }
    }

    app.world_mut()
        .resource_mut::<HeadlessBattleState>()
        .result
        .take()
        .ok_or_else(|| "Battle did not finish within the tick limit".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_accuracy_always_answers_correctly() {
        let config = HeadlessBattleConfig {
            accuracy: 1.0,
            random_seed: Some(1),
            ..Default::default()
        };
        let mut script = ScriptedPlayer::new(&config);
        for class in PronunciationClass::all() {
            assert_eq!(script.choose(class), class);
        }
    }

    #[test]
    fn test_zero_accuracy_never_answers_correctly() {
        let config = HeadlessBattleConfig {
            accuracy: 0.0,
            random_seed: Some(1),
            ..Default::default()
        };
        let mut script = ScriptedPlayer::new(&config);
        for _ in 0..50 {
            for class in PronunciationClass::all() {
                assert_ne!(script.choose(class), class);
            }
        }
    }
}
