//! Battle logging
//!
//! Records battle events for display and post-battle analysis.

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// A single entry in the battle log
#[derive(Debug, Clone, Serialize)]
pub struct BattleLogEntry {
    /// Simulation tick the event happened on
    pub tick: u64,
    /// The type of event
    pub event_type: BattleLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of battle log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattleLogEventType {
    /// A new question was asked
    Question,
    /// An answer was resolved (including timeouts)
    Answer,
    /// Health was lost
    Damage,
    /// An attack was launched
    Attack,
    /// The boss changed phase
    Phase,
    /// Battle lifecycle (start, pause, end)
    MatchEvent,
}

/// Summary written alongside the entries when the log is saved
#[derive(Debug, Clone, Serialize)]
pub struct BattleMetadata {
    /// "Victory", "Defeat" or None when the battle did not finish
    pub outcome: Option<String>,
    pub ticks: u64,
    pub score: u32,
    pub questions_answered: u32,
    pub questions_correct: u32,
    pub player_health: i32,
    pub boss_health: i32,
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct SavedBattleLog<'a> {
    metadata: &'a BattleMetadata,
    entries: &'a [BattleLogEntry],
}

#[derive(Debug, Default)]
pub struct BattleLog {
    /// All log entries in chronological order
    pub entries: Vec<BattleLogEntry>,
}

impl BattleLog {
    /// Clear the log for a new battle
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn log(&mut self, tick: u64, event_type: BattleLogEventType, message: String) {
        self.entries.push(BattleLogEntry {
            tick,
            event_type,
            message,
        });
    }

    pub fn filter_by_type(&self, event_type: BattleLogEventType) -> Vec<&BattleLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    pub fn count(&self, event_type: BattleLogEventType) -> usize {
        self.entries.iter().filter(|e| e.event_type == event_type).count()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&BattleLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Write the log as JSON. Without an explicit path the file goes to
    /// `battle_logs/battle_<unix time>.json`. Returns the path written.
    pub fn save_to_file(&self, metadata: &BattleMetadata, output_path: Option<&str>) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("battle_logs/battle_{}.json", stamp)
            }
        };

        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create log directory: {}", e))?;
            }
        }

        let contents = serde_json::to_string_pretty(&SavedBattleLog {
            metadata,
            entries: &self.entries,
        })
        .map_err(|e| format!("Failed to serialize battle log: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write battle log: {}", e))?;
        Ok(path)
    }
}
