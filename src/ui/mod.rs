//! UI palette and shared styling
//!
//! Colors and font sizes used by the arena renderer and the egui screens.

use bevy_egui::egui;

use crate::battle::components::BossPhase;

/// Apply the dark theme shared by every screen
pub fn apply_dark_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals.window_fill = colors::PANEL;
    style.visuals.panel_fill = colors::PANEL;
    ctx.set_style(style);
}

/// Common colors used throughout the UI
pub mod colors {
    use bevy_egui::egui::Color32;

    use crate::battle::components::BossPhase;

    /// Screen background behind menus
    pub const PANEL: Color32 = Color32::from_rgb(20, 20, 30);
    /// Arena sky
    pub const ARENA_BACKGROUND: Color32 = Color32::from_rgb(28, 24, 44);
    /// Arena floor strip
    pub const ARENA_FLOOR: Color32 = Color32::from_rgb(48, 40, 62);
    /// Dimming layer behind overlays
    pub const OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 170);

    pub const TITLE: Color32 = Color32::from_rgb(230, 204, 153);
    pub const TEXT: Color32 = Color32::from_rgb(230, 217, 191);
    pub const TEXT_DIM: Color32 = Color32::from_rgb(153, 140, 128);

    pub const PLAYER: Color32 = Color32::from_rgb(70, 130, 220);
    pub const PLAYER_FLASH: Color32 = Color32::from_rgb(150, 200, 255);
    pub const PLAYER_DEFENDING: Color32 = Color32::from_rgb(50, 170, 160);
    pub const SHIELD: Color32 = Color32::from_rgb(120, 200, 255);
    pub const PLAYER_PROJECTILE: Color32 = Color32::from_rgb(255, 220, 90);
    pub const BOSS_PROJECTILE: Color32 = Color32::from_rgb(190, 80, 230);
    pub const BOSS_EYES: Color32 = Color32::from_rgb(255, 240, 120);

    /// Health bar color
    pub const HEALTH: Color32 = Color32::from_rgb(50, 200, 50);
    /// Health bar low color
    pub const HEALTH_LOW: Color32 = Color32::from_rgb(200, 50, 50);
    pub const BAR_BACKGROUND: Color32 = Color32::from_rgb(40, 40, 40);
    pub const BAR_BORDER: Color32 = Color32::from_rgb(200, 200, 200);

    pub const TIMER: Color32 = Color32::from_rgb(90, 170, 255);
    pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 90, 60);

    pub const CHOICE_FILL: Color32 = Color32::from_rgb(45, 45, 70);
    pub const CHOICE_BORDER: Color32 = Color32::from_rgb(130, 120, 170);

    // Feedback
    pub const CORRECT: Color32 = Color32::from_rgb(80, 220, 120);
    pub const WRONG: Color32 = Color32::from_rgb(235, 80, 80);
    pub const DAMAGE: Color32 = Color32::from_rgb(255, 90, 90);
    pub const BOSS_DAMAGE: Color32 = Color32::from_rgb(255, 230, 120);
    pub const BLOCK: Color32 = Color32::from_rgb(120, 180, 255);
    pub const HIT_SPARK: Color32 = Color32::from_rgb(255, 200, 80);
    pub const VICTORY: Color32 = Color32::from_rgb(255, 215, 0);
    pub const DEFEAT: Color32 = Color32::from_rgb(200, 60, 60);

    /// Boss body tint, angrier with every phase
    pub fn phase(phase: BossPhase) -> Color32 {
        match phase {
            BossPhase::One => Color32::from_rgb(140, 60, 160),
            BossPhase::Two => Color32::from_rgb(190, 70, 90),
            BossPhase::Three => Color32::from_rgb(230, 50, 40),
        }
    }
}

/// Font sizes used throughout the UI
pub mod fonts {
    /// Large title text
    pub const TITLE: f32 = 48.0;
    /// Section headers and banners
    pub const HEADER: f32 = 32.0;
    /// The word being asked
    pub const WORD: f32 = 40.0;
    /// Normal body text
    pub const BODY: f32 = 18.0;
    /// Small labels and annotations
    pub const SMALL: f32 = 14.0;
}

/// Human-readable phase label for HUDs
pub fn phase_label(phase: BossPhase) -> String {
    format!("PHASE {}", phase.value())
}
