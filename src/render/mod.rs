//! Arena Rendering
//!
//! Turns a [`BattleSession`] into a flat list of draw commands on an
//! 800x600 surface with y pointing down. Nothing here touches a window; the
//! graphical front-end scales the frame and paints it with egui, and tests
//! inspect the commands directly.
//!
//! Split into focused modules:
//! - `arena`: background, combatants, projectiles, particles, floating text
//! - `hud`: health bars, score, question prompt and answer timer
//! - `overlays`: intro, pause and end-of-battle banners

pub mod arena;
pub mod hud;
pub mod overlays;

use bevy::math::{Rect, Vec2};
use bevy_egui::egui::Color32;

use crate::battle::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::battle::session::BattleSession;

pub use hud::choice_at;

/// Horizontal alignment of a text command around its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color32,
    },
    StrokeRect {
        rect: Rect,
        width: f32,
        color: Color32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color32,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color32,
    },
    /// Single line of text, vertically centered on `position`
    Text {
        position: Vec2,
        text: String,
        size: f32,
        color: Color32,
        anchor: TextAnchor,
    },
}

/// Everything needed to paint one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct BattleFrame {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl BattleFrame {
    pub fn new() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            commands: Vec::new(),
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32) {
        self.commands.push(DrawCommand::StrokeRect { rect, width, color });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    pub fn text(
        &mut self,
        position: Vec2,
        text: impl Into<String>,
        size: f32,
        color: Color32,
        anchor: TextAnchor,
    ) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.into(),
            size,
            color,
            anchor,
        });
    }

    /// All text drawn this frame, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

/// Build the full frame for the current session state
pub fn draw_battle(session: &BattleSession) -> BattleFrame {
    let mut frame = BattleFrame::new();

    arena::draw_background(&mut frame);
    arena::draw_combatants(&mut frame, session);
    arena::draw_effects(&mut frame, session);
    hud::draw_hud(&mut frame, session);
    overlays::draw_overlays(&mut frame, session);

    frame
}

/// Scale a color's alpha by `fraction`, used for fading effects
pub fn fade(color: Color32, fraction: f32) -> Color32 {
    color.gamma_multiply(fraction.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::components::GameRng;
    use crate::battle::config::BattleConfig;

    #[test]
    fn test_idle_frame_has_background_and_start_hint() {
        let session = BattleSession::new(BattleConfig::default(), GameRng::from_seed(1));
        let frame = draw_battle(&session);

        assert_eq!(frame.width, 800.0);
        assert_eq!(frame.height, 600.0);
        assert!(matches!(frame.commands.first(), Some(DrawCommand::FillRect { .. })));
        assert!(frame.contains_text("start"));
    }

    #[test]
    fn test_fade_scales_alpha() {
        let faded = fade(Color32::WHITE, 0.5);
        assert!(faded.a() < 255 && faded.a() > 0);
        assert_eq!(fade(Color32::WHITE, 0.0).a(), 0);
        assert_eq!(fade(Color32::WHITE, 2.0), Color32::WHITE);
    }
}
