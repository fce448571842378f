//! Arena, combatants and effects

use bevy::math::{Rect, Vec2};

use super::{fade, BattleFrame, TextAnchor};
use crate::battle::components::Side;
use crate::battle::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::battle::session::BattleSession;
use crate::ui::{colors, fonts};

/// Top of the floor strip
const FLOOR_Y: f32 = 400.0;

/// Vertical idle bob amplitude, in pixels
const BOB_AMPLITUDE: f32 = 4.0;

const PLAYER_PROJECTILE_RADIUS: f32 = 6.0;
const BOSS_PROJECTILE_RADIUS: f32 = 9.0;

pub fn draw_background(frame: &mut BattleFrame) {
    frame.fill_rect(
        Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT),
        colors::ARENA_BACKGROUND,
    );
    frame.fill_rect(
        Rect::new(0.0, FLOOR_Y, ARENA_WIDTH, ARENA_HEIGHT),
        colors::ARENA_FLOOR,
    );
}

pub fn draw_combatants(frame: &mut BattleFrame, session: &BattleSession) {
    draw_player(frame, session);
    draw_boss(frame, session);
}

fn draw_player(frame: &mut BattleFrame, session: &BattleSession) {
    let player = &session.player;
    let bob = Vec2::new(0.0, player.base.animation_phase.sin() * BOB_AMPLITUDE);
    let body = player.base.bounds();
    let body = Rect::from_corners(body.min + bob, body.max + bob);

    let color = if player.base.is_attacking {
        colors::PLAYER_FLASH
    } else if player.is_defending {
        colors::PLAYER_DEFENDING
    } else {
        colors::PLAYER
    };
    frame.fill_rect(body, color);

    // Head
    let head = Vec2::new(body.center().x, body.min.y - 14.0);
    frame.fill_circle(head, 14.0, color);

    if player.is_defending {
        let radius = body.size().max_element() * 0.75;
        frame.stroke_circle(body.center(), radius, 4.0, colors::SHIELD);
        frame.fill_circle(body.center(), radius, fade(colors::SHIELD, 0.15));
    }

    if !player.base.is_alive() {
        frame.fill_rect(body, fade(colors::ARENA_BACKGROUND, 0.6));
    }
}

fn draw_boss(frame: &mut BattleFrame, session: &BattleSession) {
    let boss = &session.boss;
    let bob = Vec2::new(0.0, boss.base.animation_phase.sin() * BOB_AMPLITUDE * 1.5);
    let body = boss.base.bounds();
    let body = Rect::from_corners(body.min + bob, body.max + bob);
    let tint = colors::phase(boss.phase());

    if boss.base.is_attacking {
        let glow = body.inflate(8.0);
        frame.fill_rect(glow, fade(tint, 0.35));
    }
    frame.fill_rect(body, tint);
    frame.stroke_rect(body, 3.0, fade(colors::BAR_BORDER, 0.5));

    // Eyes, one per phase reached
    let eye_y = body.min.y + body.height() * 0.3;
    let count = boss.phase().value();
    let spacing = body.width() / (count + 1) as f32;
    for eye in 1..=count {
        let center = Vec2::new(body.min.x + spacing * eye as f32, eye_y);
        frame.fill_circle(center, 8.0, colors::BOSS_EYES);
    }

    if !boss.base.is_alive() {
        frame.fill_rect(body, fade(colors::ARENA_BACKGROUND, 0.6));
    }
}

pub fn draw_effects(frame: &mut BattleFrame, session: &BattleSession) {
    for projectile in &session.effects.projectiles {
        let (radius, color) = match projectile.owner {
            Side::Player => (PLAYER_PROJECTILE_RADIUS, colors::PLAYER_PROJECTILE),
            Side::Boss => (BOSS_PROJECTILE_RADIUS, colors::BOSS_PROJECTILE),
        };
        frame.fill_circle(projectile.position, radius * 1.6, fade(color, 0.3));
        frame.fill_circle(projectile.position, radius, color);
    }

    for particle in &session.effects.particles {
        frame.fill_circle(
            particle.position,
            particle.size,
            fade(particle.color, particle.life_fraction()),
        );
    }

    for text in &session.effects.texts {
        frame.text(
            text.position,
            text.text.clone(),
            fonts::BODY,
            fade(text.color, text.life_fraction()),
            TextAnchor::Center,
        );
    }
}
