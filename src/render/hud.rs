//! HUD
//!
//! Health bars, score line, question prompt with answer choices and the
//! answer timer bar.

use bevy::math::{Rect, Vec2};
use bevy_egui::egui::Color32;

use super::{BattleFrame, TextAnchor};
use crate::battle::components::Combatant;
use crate::battle::constants::{ARENA_WIDTH, MAX_HEALTH, TIMER_WARNING_FRACTION};
use crate::battle::session::{BattleSession, BattleState};
use crate::ui::{colors, fonts, phase_label};
use crate::words::PronunciationClass;

/// Below this fraction of health a bar switches to its low color
const LOW_HEALTH_FRACTION: f32 = 0.3;

const BAR_WIDTH: f32 = 250.0;
const BAR_HEIGHT: f32 = 20.0;
const BAR_TOP: f32 = 30.0;
const MARGIN: f32 = 20.0;

const CHOICE_WIDTH: f32 = 110.0;
const CHOICE_HEIGHT: f32 = 44.0;
const CHOICE_GAP: f32 = 20.0;
const CHOICE_TOP: f32 = 530.0;

const TIMER_TOP: f32 = 505.0;
const TIMER_WIDTH: f32 = 370.0;
const TIMER_HEIGHT: f32 = 10.0;

pub fn draw_hud(frame: &mut BattleFrame, session: &BattleSession) {
    if session.state() == BattleState::Idle {
        return;
    }

    draw_health_bar(
        frame,
        Rect::new(MARGIN, BAR_TOP, MARGIN + BAR_WIDTH, BAR_TOP + BAR_HEIGHT),
        &session.player.base,
        "PLAYER".to_string(),
        TextAnchor::Left,
    );
    draw_health_bar(
        frame,
        Rect::new(
            ARENA_WIDTH - MARGIN - BAR_WIDTH,
            BAR_TOP,
            ARENA_WIDTH - MARGIN,
            BAR_TOP + BAR_HEIGHT,
        ),
        &session.boss.base,
        format!("BOSS - {}", phase_label(session.boss.phase())),
        TextAnchor::Right,
    );

    let stats = session.stats();
    frame.text(
        Vec2::new(ARENA_WIDTH / 2.0, BAR_TOP + BAR_HEIGHT / 2.0),
        format!("Score: {}", stats.score),
        fonts::BODY,
        colors::TITLE,
        TextAnchor::Center,
    );
    frame.text(
        Vec2::new(ARENA_WIDTH / 2.0, BAR_TOP + BAR_HEIGHT + 14.0),
        format!(
            "Correct: {} / {}  (answered {})",
            stats.questions_correct, stats.required_correct, stats.questions_answered
        ),
        fonts::SMALL,
        colors::TEXT_DIM,
        TextAnchor::Center,
    );

    draw_question(frame, session);
}

fn draw_health_bar(
    frame: &mut BattleFrame,
    rect: Rect,
    combatant: &Combatant,
    label: String,
    anchor: TextAnchor,
) {
    let fraction = (combatant.health() as f32 / MAX_HEALTH as f32).clamp(0.0, 1.0);
    let fill_color = if fraction < LOW_HEALTH_FRACTION {
        colors::HEALTH_LOW
    } else {
        colors::HEALTH
    };

    frame.fill_rect(rect, colors::BAR_BACKGROUND);
    if fraction > 0.0 {
        let fill = Rect::new(
            rect.min.x,
            rect.min.y,
            rect.min.x + rect.width() * fraction,
            rect.max.y,
        );
        frame.fill_rect(fill, fill_color);
    }
    frame.stroke_rect(rect, 2.0, colors::BAR_BORDER);

    let label_x = match anchor {
        TextAnchor::Right => rect.max.x,
        _ => rect.min.x,
    };
    frame.text(
        Vec2::new(label_x, rect.min.y - 12.0),
        label,
        fonts::SMALL,
        colors::TEXT,
        anchor,
    );
    frame.text(
        rect.center(),
        format!("{} / {}", combatant.health(), MAX_HEALTH),
        fonts::SMALL,
        Color32::WHITE,
        TextAnchor::Center,
    );
}

fn draw_question(frame: &mut BattleFrame, session: &BattleSession) {
    let Some(active) = session.question() else {
        return;
    };

    frame.text(
        Vec2::new(ARENA_WIDTH / 2.0, 430.0),
        "How is the ending pronounced?",
        fonts::BODY,
        colors::TEXT_DIM,
        TextAnchor::Center,
    );
    frame.text(
        Vec2::new(ARENA_WIDTH / 2.0, 470.0),
        active.question.word.clone(),
        fonts::WORD,
        colors::TITLE,
        TextAnchor::Center,
    );

    let fraction = active.time_fraction();
    let timer = Rect::new(
        (ARENA_WIDTH - TIMER_WIDTH) / 2.0,
        TIMER_TOP,
        (ARENA_WIDTH + TIMER_WIDTH) / 2.0,
        TIMER_TOP + TIMER_HEIGHT,
    );
    frame.fill_rect(timer, colors::BAR_BACKGROUND);
    frame.fill_rect(
        Rect::new(
            timer.min.x,
            timer.min.y,
            timer.min.x + timer.width() * fraction,
            timer.max.y,
        ),
        timer_color(fraction),
    );

    for (class, rect) in choice_rects() {
        frame.fill_rect(rect, colors::CHOICE_FILL);
        frame.stroke_rect(rect, 2.0, colors::CHOICE_BORDER);
        frame.text(
            rect.center(),
            class.symbol(),
            fonts::HEADER * 0.75,
            colors::TEXT,
            TextAnchor::Center,
        );
    }
}

/// Timer bar color for the remaining answer time
pub fn timer_color(fraction: f32) -> Color32 {
    if fraction < TIMER_WARNING_FRACTION {
        colors::TIMER_WARNING
    } else {
        colors::TIMER
    }
}

/// Screen rectangles of the three answer buttons, left to right
pub fn choice_rects() -> [(PronunciationClass, Rect); 3] {
    let total = CHOICE_WIDTH * 3.0 + CHOICE_GAP * 2.0;
    let left = (ARENA_WIDTH - total) / 2.0;
    let rect = |index: usize| {
        let x = left + index as f32 * (CHOICE_WIDTH + CHOICE_GAP);
        Rect::new(x, CHOICE_TOP, x + CHOICE_WIDTH, CHOICE_TOP + CHOICE_HEIGHT)
    };
    [
        (PronunciationClass::T, rect(0)),
        (PronunciationClass::D, rect(1)),
        (PronunciationClass::Id, rect(2)),
    ]
}

/// Answer button under an arena-space point, if any
pub fn choice_at(point: Vec2) -> Option<PronunciationClass> {
    choice_rects()
        .into_iter()
        .find(|(_, rect)| rect.contains(point))
        .map(|(class, _)| class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::components::GameRng;
    use crate::battle::config::BattleConfig;
    use crate::render::DrawCommand;

    fn active_session() -> BattleSession {
        let config = BattleConfig {
            intro_ticks: 1,
            ..Default::default()
        };
        let mut session = BattleSession::new(config, GameRng::from_seed(4));
        session.start_battle();
        session.tick();
        assert!(session.question().is_some());
        session
    }

    #[test]
    fn test_timer_turns_warning_color_below_threshold() {
        assert_eq!(timer_color(1.0), colors::TIMER);
        assert_eq!(timer_color(0.3), colors::TIMER);
        assert_eq!(timer_color(0.29), colors::TIMER_WARNING);
    }

    #[test]
    fn test_question_prompt_shows_word_and_choices() {
        let session = active_session();
        let word = session.question().unwrap().question.word.clone();

        let mut frame = BattleFrame::new();
        draw_hud(&mut frame, &session);

        assert!(frame.contains_text(&word));
        assert!(frame.contains_text("/t/"));
        assert!(frame.contains_text("/d/"));
        assert!(frame.contains_text("/ɪd/"));
        assert!(frame.contains_text("Score: 0"));
    }

    #[test]
    fn test_timer_bar_uses_warning_color_late_in_question() {
        let mut session = active_session();
        let total = session.config().question_ticks;
        for _ in 0..(total as f32 * 0.8) as u32 {
            session.tick();
        }

        let mut frame = BattleFrame::new();
        draw_hud(&mut frame, &session);
        let warning = frame.commands.iter().any(|c| {
            matches!(c, DrawCommand::FillRect { color, .. } if *color == colors::TIMER_WARNING)
        });
        assert!(warning);
    }

    #[test]
    fn test_choice_hit_testing() {
        for (class, rect) in choice_rects() {
            assert_eq!(choice_at(rect.center()), Some(class));
        }
        assert_eq!(choice_at(Vec2::new(5.0, 5.0)), None);
    }
}
