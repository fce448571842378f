//! Banners drawn over the arena: start hint, intro, pause and battle end

use bevy::math::{Rect, Vec2};

use super::{BattleFrame, TextAnchor};
use crate::battle::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::battle::session::{BattleOutcome, BattleSession, BattleState};
use crate::ui::{colors, fonts};

pub fn draw_overlays(frame: &mut BattleFrame, session: &BattleSession) {
    match session.state() {
        BattleState::Idle => draw_banner(
            frame,
            "BOSS FIGHT",
            Some("Press ENTER to start".to_string()),
            colors::TITLE,
        ),
        BattleState::Intro => draw_banner(
            frame,
            "A BOSS APPEARS!",
            Some("Listen to each word and pick how its ending sounds".to_string()),
            colors::phase(session.boss.phase()),
        ),
        BattleState::Paused => draw_banner(
            frame,
            "PAUSED",
            Some("Press the pause key to resume".to_string()),
            colors::TEXT,
        ),
        BattleState::Ended(outcome) => {
            let stats = session.stats();
            let summary = format!(
                "Score {}  -  {} of {} correct",
                stats.score, stats.questions_correct, stats.questions_answered
            );
            match outcome {
                BattleOutcome::Victory => draw_banner(frame, "VICTORY!", Some(summary), colors::VICTORY),
                BattleOutcome::Defeat => draw_banner(frame, "DEFEAT", Some(summary), colors::DEFEAT),
            }
        }
        BattleState::Active => {}
    }
}

fn draw_banner(
    frame: &mut BattleFrame,
    title: &str,
    subtitle: Option<String>,
    color: bevy_egui::egui::Color32,
) {
    let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
    frame.fill_rect(
        Rect::from_center_size(center, Vec2::new(ARENA_WIDTH, 140.0)),
        colors::OVERLAY,
    );
    frame.text(
        center - Vec2::new(0.0, 20.0),
        title,
        fonts::TITLE,
        color,
        TextAnchor::Center,
    );
    if let Some(subtitle) = subtitle {
        frame.text(
            center + Vec2::new(0.0, 35.0),
            subtitle,
            fonts::BODY,
            colors::TEXT_DIM,
            TextAnchor::Center,
        );
    }
}
