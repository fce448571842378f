//! Integration tests for headless battle execution
//!
//! These tests verify that:
//! - Headless battles run to completion through the Bevy app
//! - Battle results are accessible programmatically
//! - Seeded RNG produces deterministic results
//! - The battle log is written where the config asks

use pastboss::battle::session::BattleOutcome;
use pastboss::headless::{run_headless_battle, BattleResult, HeadlessBattleConfig};

fn temp_output(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("pastboss_headless_tests_{}", std::process::id()))
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Helper to create a seeded config that writes its log to a temp file
fn create_config(accuracy: f32, seed: u64, output: &str) -> HeadlessBattleConfig {
    HeadlessBattleConfig {
        accuracy,
        answer_delay_ticks: 30,
        random_seed: Some(seed),
        output_path: Some(temp_output(output)),
        ..Default::default()
    }
}

fn run(config: HeadlessBattleConfig) -> BattleResult {
    run_headless_battle(config).expect("headless battle should finish")
}

#[test]
fn test_perfect_player_wins() {
    let result = run(create_config(1.0, 7, "perfect.json"));

    assert_eq!(result.outcome, Some(BattleOutcome::Victory));
    assert_eq!(result.boss_health, 0);
    assert_eq!(result.player_health, 100);
    assert_eq!(result.questions_answered, 12);
    assert_eq!(result.questions_correct, 12);
    assert_eq!(result.score, 120);
    assert_eq!(result.random_seed, Some(7));
}

#[test]
fn test_hopeless_player_loses() {
    let result = run(create_config(0.0, 8, "hopeless.json"));

    assert_eq!(result.outcome, Some(BattleOutcome::Defeat));
    assert_eq!(result.player_health, 0);
    assert_eq!(result.boss_health, 100);
    assert_eq!(result.questions_correct, 0);
    assert_eq!(result.score, 0);
}

#[test]
fn test_same_seed_same_result() {
    let first = run(create_config(0.6, 99, "determinism_a.json"));
    let second = run(create_config(0.6, 99, "determinism_b.json"));

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.ticks, second.ticks);
    assert_eq!(first.score, second.score);
    assert_eq!(first.questions_answered, second.questions_answered);
    assert_eq!(first.questions_correct, second.questions_correct);
    assert_eq!(first.player_health, second.player_health);
    assert_eq!(first.boss_health, second.boss_health);
}

#[test]
fn test_always_defending_stalemate_hits_tick_limit() {
    let config = HeadlessBattleConfig {
        always_defend: true,
        max_ticks: 2_000,
        ..create_config(0.0, 5, "stalemate.json")
    };
    let result = run(config);

    assert_eq!(result.outcome, None);
    assert_eq!(result.ticks, 2_000);
    assert_eq!(result.player_health, 100);
    assert_eq!(result.boss_health, 100);
    assert!(result.questions_answered > 0);
}

#[test]
fn test_unbounded_tick_limit_runs_to_the_end() {
    let config = HeadlessBattleConfig {
        max_ticks: u64::MAX,
        ..create_config(1.0, 12, "unbounded.json")
    };
    let result = run(config);

    assert_eq!(result.outcome, Some(BattleOutcome::Victory));
    assert_eq!(result.questions_correct, 12);
}

#[test]
fn test_answer_delay_just_inside_question_timer() {
    let question_ticks = pastboss::battle::config::BattleConfig::default().question_ticks;

    let in_time = run(HeadlessBattleConfig {
        answer_delay_ticks: question_ticks - 2,
        ..create_config(1.0, 21, "delay_in_time.json")
    });
    assert_eq!(in_time.outcome, Some(BattleOutcome::Victory));
    assert_eq!(in_time.questions_correct, 12);

    let too_late = run(HeadlessBattleConfig {
        answer_delay_ticks: question_ticks - 1,
        ..create_config(1.0, 21, "delay_too_late.json")
    });
    assert_eq!(too_late.outcome, Some(BattleOutcome::Defeat));
    assert_eq!(too_late.questions_correct, 0);
    assert!(too_late.questions_answered > 0, "Timeouts still count as answered");
}

#[test]
fn test_battle_log_written_to_output_path() {
    let output = temp_output("logged.json");
    let result = run(create_config(0.8, 3, "logged.json"));

    assert_eq!(result.log_path.as_deref(), Some(output.as_str()));
    let contents = std::fs::read_to_string(&output).expect("log file should exist");
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["metadata"]["random_seed"], 3);
    assert_eq!(
        json["metadata"]["questions_answered"],
        result.questions_answered
    );

    let _ = std::fs::remove_file(&output);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = HeadlessBattleConfig {
        accuracy: 2.0,
        ..Default::default()
    };
    let err = run_headless_battle(config).unwrap_err();
    assert!(err.contains("accuracy"));
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_output("config.json");
    std::fs::create_dir_all(std::path::Path::new(&path).parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{ "accuracy": 0.5, "random_seed": 11, "battle": { "question_ticks": 240 } }"#,
    )
    .unwrap();

    let config = HeadlessBattleConfig::load_from_file(std::path::Path::new(&path)).unwrap();
    assert_eq!(config.accuracy, 0.5);
    assert_eq!(config.random_seed, Some(11));
    assert_eq!(config.battle.question_ticks, 240);
    assert_eq!(config.battle.intro_ticks, 180);
    assert_eq!(config.answer_delay_ticks, 60);

    let _ = std::fs::remove_file(&path);
}
