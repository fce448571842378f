//! Game-wide progression shared between the menus and the battle
//!
//! The battle session owns its progression controller, so the menus read
//! the same ledger through a shared handle.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use crate::battle::services::ProgressionController;

/// A message shown on top of the battle for a while
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub remaining_secs: f32,
}

#[derive(Debug, Default)]
pub struct ProgressionLedger {
    pub total_points: i32,
    pub levels_completed: Vec<String>,
    pub toast: Option<Toast>,
    /// Set when the battle asks to go back to the main menu
    pub menu_requested: bool,
}

impl ProgressionLedger {
    /// Count down the toast timer and drop it once expired
    pub fn advance_toast(&mut self, delta_secs: f32) {
        if let Some(toast) = self.toast.as_mut() {
            toast.remaining_secs -= delta_secs;
            if toast.remaining_secs <= 0.0 {
                self.toast = None;
            }
        }
    }
}

/// Shared handle to the ledger
#[derive(Resource, Clone, Default)]
pub struct SharedProgression(pub Arc<Mutex<ProgressionLedger>>);

impl SharedProgression {
    /// Run `f` against the ledger, recovering from a poisoned lock
    pub fn with<R>(&self, f: impl FnOnce(&mut ProgressionLedger) -> R) -> R {
        let mut guard = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }

    pub fn controller(&self) -> LedgerProgression {
        LedgerProgression {
            shared: self.clone(),
        }
    }
}

/// Progression controller handed to the battle session
pub struct LedgerProgression {
    shared: SharedProgression,
}

impl ProgressionController for LedgerProgression {
    fn report_score_delta(&mut self, game_id: &str, points: i32, is_penalty: bool) {
        let total = self.shared.with(|ledger| {
            ledger.total_points += if is_penalty { -points } else { points };
            ledger.total_points
        });
        debug!("[{}] total points: {}", game_id, total);
    }

    fn notify_level_complete(&mut self, game_id: &str) {
        info!("[{}] level complete", game_id);
        self.shared.with(|ledger| {
            if !ledger.levels_completed.iter().any(|id| id == game_id) {
                ledger.levels_completed.push(game_id.to_string());
            }
        });
    }

    fn display_message(&mut self, text: &str, duration_ms: u32) {
        self.shared.with(|ledger| {
            ledger.toast = Some(Toast {
                text: text.to_string(),
                remaining_secs: duration_ms as f32 / 1000.0,
            });
        });
    }

    fn return_to_menu(&mut self) {
        self.shared.with(|ledger| ledger.menu_requested = true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_collects_controller_calls() {
        let shared = SharedProgression::default();
        let mut controller = shared.controller();

        controller.report_score_delta("boss_fight", 10, false);
        controller.report_score_delta("boss_fight", 5, true);
        controller.notify_level_complete("boss_fight");
        controller.notify_level_complete("boss_fight");
        controller.display_message("Victory!", 1500);
        controller.return_to_menu();

        shared.with(|ledger| {
            assert_eq!(ledger.total_points, 5);
            assert_eq!(ledger.levels_completed.len(), 1);
            assert!(ledger.menu_requested);
            assert_eq!(ledger.toast.as_ref().map(|t| t.remaining_secs), Some(1.5));
        });
    }

    #[test]
    fn test_toast_expires() {
        let mut ledger = ProgressionLedger {
            toast: Some(Toast {
                text: "hi".to_string(),
                remaining_secs: 1.0,
            }),
            ..Default::default()
        };
        ledger.advance_toast(0.6);
        assert!(ledger.toast.is_some());
        ledger.advance_toast(0.6);
        assert!(ledger.toast.is_none());
    }
}
