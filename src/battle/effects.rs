//! Projectiles and visual effects
//!
//! Attack projectiles, particle bursts and floating combat text. The
//! [`Effects`] container owns all three lists; nothing else holds references
//! into them. Every object carries a life countdown so each list drains on
//! its own.

use bevy::math::{Rect, Vec2};
use bevy_egui::egui::Color32;
use std::f32::consts::TAU;

use super::components::{GameRng, Side};
use super::constants::*;

/// An attack in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vec2,
    /// Displacement per tick
    pub velocity: Vec2,
    pub owner: Side,
    pub damage: i32,
    pub remaining_life: u32,
}

/// Purely cosmetic spark
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub remaining_life: u32,
    pub max_life: u32,
    pub color: Color32,
    pub size: f32,
}

impl Particle {
    pub fn life_fraction(&self) -> f32 {
        life_fraction(self.remaining_life, self.max_life)
    }
}

/// Rising combat text ("Correct!", "-15", ...)
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub position: Vec2,
    pub text: String,
    pub color: Color32,
    pub remaining_life: u32,
    pub max_life: u32,
}

impl FloatingText {
    pub fn life_fraction(&self) -> f32 {
        life_fraction(self.remaining_life, self.max_life)
    }
}

fn life_fraction(remaining: u32, max: u32) -> f32 {
    if max == 0 {
        0.0
    } else {
        (remaining as f32 / max as f32).clamp(0.0, 1.0)
    }
}

/// A projectile that struck the opposing combatant this tick
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileHit {
    pub owner: Side,
    pub position: Vec2,
    pub damage: i32,
}

/// Owner of every projectile, particle and floating text in the arena
#[derive(Debug, Default)]
pub struct Effects {
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
}

impl Effects {
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.particles.clear();
        self.texts.clear();
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Scatter `count` particles from `center` in random directions
    pub fn spawn_burst(&mut self, center: Vec2, count: usize, color: Color32, rng: &mut GameRng) {
        for _ in 0..count {
            let angle = rng.random_range(0.0, TAU);
            let speed = rng.random_range(1.0, 4.0);
            let life = rng.random_range(30.0, 50.0) as u32;
            self.particles.push(Particle {
                position: center,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                remaining_life: life,
                max_life: life,
                color,
                size: rng.random_range(2.0, 5.0),
            });
        }
    }

    pub fn spawn_text(&mut self, position: Vec2, text: impl Into<String>, color: Color32) {
        self.texts.push(FloatingText {
            position,
            text: text.into(),
            color,
            remaining_life: FLOATING_TEXT_LIFE,
            max_life: FLOATING_TEXT_LIFE,
        });
    }

    /// Move particles and texts one tick and drop the expired ones
    pub fn advance_cosmetics(&mut self) {
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.velocity *= PARTICLE_DRAG;
            particle.remaining_life = particle.remaining_life.saturating_sub(1);
        }
        self.particles.retain(|p| p.remaining_life > 0);

        for text in &mut self.texts {
            text.position.y -= FLOATING_TEXT_RISE;
            text.remaining_life = text.remaining_life.saturating_sub(1);
        }
        self.texts.retain(|t| t.remaining_life > 0);
    }

    /// Move projectiles, test them against the opposing combatant's rectangle
    /// and cull the ones that hit, expired or left the arena.
    pub fn advance_projectiles(&mut self, player: Rect, boss: Rect, arena: Rect) -> Vec<ProjectileHit> {
        let mut hits = Vec::new();

        self.projectiles.retain_mut(|projectile| {
            projectile.position += projectile.velocity;
            projectile.remaining_life = projectile.remaining_life.saturating_sub(1);

            let target = match projectile.owner {
                Side::Player => boss,
                Side::Boss => player,
            };
            if target.contains(projectile.position) {
                hits.push(ProjectileHit {
                    owner: projectile.owner,
                    position: projectile.position,
                    damage: projectile.damage,
                });
                return false;
            }

            projectile.remaining_life > 0 && within_margin(arena, projectile.position)
        });

        hits
    }

    pub fn projectiles_owned_by(&self, owner: Side) -> usize {
        self.projectiles.iter().filter(|p| p.owner == owner).count()
    }
}

fn within_margin(arena: Rect, point: Vec2) -> bool {
    point.x >= arena.min.x - ARENA_CULL_MARGIN
        && point.x <= arena.max.x + ARENA_CULL_MARGIN
        && point.y >= arena.min.y - ARENA_CULL_MARGIN
        && point.y <= arena.max.y + ARENA_CULL_MARGIN
}
