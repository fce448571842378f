//! Tests for the battle log
//!
//! These tests verify that the BattleLog correctly:
//! - Filters, counts and windows entries
//! - Records the events of a real battle with readable messages
//! - Saves itself as JSON with battle metadata

use regex::Regex;

use pastboss::battle::components::GameRng;
use pastboss::battle::config::BattleConfig;
use pastboss::battle::log::{BattleLog, BattleLogEventType, BattleMetadata};
use pastboss::battle::session::BattleSession;

fn create_test_log() -> BattleLog {
    let mut log = BattleLog::default();
    log.log(0, BattleLogEventType::MatchEvent, "Boss fight started".to_string());
    log.log(180, BattleLogEventType::Question, "Question: 'jumped'".to_string());
    log.log(
        200,
        BattleLogEventType::Answer,
        "'jumped' answered /t/: correct".to_string(),
    );
    log.log(200, BattleLogEventType::Damage, "Boss takes 7 damage".to_string());
    log.log(290, BattleLogEventType::Question, "Question: 'played'".to_string());
    log
}

/// Play one battle with alternating right and wrong answers until it ends
fn played_session(seed: u64) -> BattleSession {
    let mut session = BattleSession::new(BattleConfig::default(), GameRng::from_seed(seed));
    session.start_battle();

    let mut correct = true;
    for _ in 0..20_000 {
        if session.outcome().is_some() {
            break;
        }
        if let Some(active) = session.question() {
            let expected = active.question.pronunciation_class;
            let answer = if correct {
                expected
            } else {
                pastboss::PronunciationClass::all()
                    .into_iter()
                    .find(|c| *c != expected)
                    .unwrap()
            };
            session.submit_answer(Some(answer));
            correct = !correct;
        }
        session.tick();
    }
    session
}

fn temp_log_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("pastboss_log_tests_{}", std::process::id()))
        .join(name)
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_filter_and_count_by_type() {
    let log = create_test_log();

    let questions = log.filter_by_type(BattleLogEventType::Question);
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].tick, 180);
    assert_eq!(questions[1].tick, 290);

    assert_eq!(log.count(BattleLogEventType::Answer), 1);
    assert_eq!(log.count(BattleLogEventType::Phase), 0);
}

#[test]
fn test_recent_keeps_chronological_order() {
    let log = create_test_log();

    let recent = log.recent(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].event_type, BattleLogEventType::Damage);
    assert_eq!(recent[1].event_type, BattleLogEventType::Question);

    assert_eq!(log.recent(50).len(), 5, "Asking for more than exist returns all");
}

#[test]
fn test_clear_empties_log() {
    let mut log = create_test_log();
    log.clear();
    assert!(log.entries.is_empty());
    assert!(log.recent(3).is_empty());
}

// =============================================================================
// Battle Recording Tests
// =============================================================================

#[test]
fn test_battle_records_every_answer() {
    let session = played_session(42);
    let log = session.log();

    assert_eq!(
        log.count(BattleLogEventType::Answer),
        session.stats().questions_answered as usize
    );
    let asked = log.count(BattleLogEventType::Question);
    let answered = session.stats().questions_answered as usize;
    assert!(
        asked == answered || asked == answered + 1,
        "At most the final question is left unanswered ({} asked, {} answered)",
        asked,
        answered
    );

    let answer = Regex::new(
        r"^'[a-z]+' answered (/t/|/d/|/ɪd/|nothing|nothing \(time out\)): (correct|wrong \(expected (/t/|/d/|/ɪd/)\))$",
    )
    .unwrap();
    for entry in log.filter_by_type(BattleLogEventType::Answer) {
        assert!(answer.is_match(&entry.message), "Unexpected answer entry: {}", entry.message);
    }
}

#[test]
fn test_battle_damage_messages() {
    let session = played_session(43);
    let damage = Regex::new(r"^(Boss takes \d+ damage|Player takes \d+ damage|Boss projectile hits player for \d+)$")
        .unwrap();

    let entries = session.log().filter_by_type(BattleLogEventType::Damage);
    assert!(!entries.is_empty());
    for entry in entries {
        assert!(damage.is_match(&entry.message), "Unexpected damage entry: {}", entry.message);
    }
}

#[test]
fn test_battle_log_is_chronological_and_closed() {
    let session = played_session(44);
    let entries = &session.log().entries;

    assert!(entries.windows(2).all(|pair| pair[0].tick <= pair[1].tick));
    assert_eq!(entries.first().unwrap().message, "Boss fight started");

    let ended = Regex::new(r"^Battle ended: (Victory|Defeat)$").unwrap();
    assert!(ended.is_match(&entries.last().unwrap().message));
}

#[test]
fn test_restart_clears_previous_entries() {
    let mut session = played_session(45);
    assert!(session.log().count(BattleLogEventType::Answer) > 0);

    session.reset();
    session.start_battle();
    assert_eq!(session.log().entries.len(), 1);
    assert_eq!(session.log().count(BattleLogEventType::Answer), 0);
}

// =============================================================================
// Saving Tests
// =============================================================================

#[test]
fn test_save_to_file_writes_metadata_and_entries() {
    let session = played_session(46);
    let path = temp_log_path("saved.json");

    let written = session
        .log()
        .save_to_file(&session.metadata(), Some(path.to_str().unwrap()))
        .expect("log should save");
    assert_eq!(written, path.to_str().unwrap());

    let contents = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();

    let metadata = &json["metadata"];
    assert_eq!(metadata["random_seed"], 46);
    assert_eq!(metadata["score"], session.stats().score);
    assert!(matches!(
        metadata["outcome"].as_str(),
        Some("Victory") | Some("Defeat")
    ));
    assert_eq!(
        json["entries"].as_array().unwrap().len(),
        session.log().entries.len()
    );
    assert_eq!(json["entries"][0]["event_type"], "MatchEvent");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_save_unfinished_battle_has_no_outcome() {
    let mut log = create_test_log();
    log.log(300, BattleLogEventType::MatchEvent, "Paused".to_string());
    let metadata = BattleMetadata {
        outcome: None,
        ticks: 300,
        score: 10,
        questions_answered: 1,
        questions_correct: 1,
        player_health: 100,
        boss_health: 93,
        random_seed: None,
    };
    let path = temp_log_path("nested/unfinished.json");

    log.save_to_file(&metadata, Some(path.to_str().unwrap()))
        .expect("nested directories are created");

    let contents = std::fs::read_to_string(&path).unwrap();
    let outcome = Regex::new(r#""outcome":\s*null"#).unwrap();
    assert!(outcome.is_match(&contents));

    let _ = std::fs::remove_file(&path);
}
