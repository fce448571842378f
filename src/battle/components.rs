//! Combat entities
//!
//! Player and boss state plus the seeded random source shared by the
//! battle. Everything here is plain data with small, self-contained rules;
//! orchestration lives in [`super::session`].

use bevy::math::{Rect, Vec2};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::constants::*;

// ============================================================================
// Random Source
// ============================================================================

/// Seeded random number generator for deterministic battles.
///
/// When a seed is provided (e.g., via headless config), the same seed and the
/// same inputs always produce the same battle. Without a seed, uses system
/// entropy.
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Sides & Phases
// ============================================================================

/// Which combatant an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Boss,
}

/// Boss difficulty tier, unlocked by health thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    /// Phase implied by the boss's current health
    pub fn for_health(health: i32) -> Self {
        if health <= PHASE_THREE_HEALTH {
            BossPhase::Three
        } else if health <= PHASE_TWO_HEALTH {
            BossPhase::Two
        } else {
            BossPhase::One
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }

    /// Damage the boss takes from a correct answer: 5 + floor(2 x phase)
    pub fn boss_damage(&self) -> i32 {
        (5 + (2.0 * self.value() as f32).floor() as i32).max(0)
    }

    /// Damage the player takes from a wrong answer: 10 + 5 x phase
    pub fn player_damage(&self) -> i32 {
        10 + 5 * self.value()
    }

    /// Boss attack cooldown in ticks, shorter at higher phases
    pub fn boss_cooldown(&self) -> u32 {
        (BOSS_BASE_COOLDOWN - BOSS_COOLDOWN_PER_PHASE * self.value()).max(BOSS_MIN_COOLDOWN) as u32
    }

    /// Damage carried by each boss projectile: 8 + 2 x phase
    pub fn projectile_damage(&self) -> i32 {
        8 + 2 * self.value()
    }

    /// Number of projectiles in one boss attack
    pub fn volley_size(&self) -> u32 {
        self.value() as u32
    }
}

// ============================================================================
// Combatants
// ============================================================================

/// State shared by the player and the boss
#[derive(Debug, Clone)]
pub struct Combatant {
    /// Top-left corner of the collision rectangle
    pub position: Vec2,
    pub size: Vec2,
    health: i32,
    /// Ticks until the next attack is allowed
    pub attack_cooldown: u32,
    /// Animation flag, cleared by a deferred task after the attack window
    pub is_attacking: bool,
    /// Idle animation angle in [0, 2π)
    pub animation_phase: f32,
}

impl Combatant {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            health: MAX_HEALTH,
            attack_cooldown: 0,
            is_attacking: false,
            animation_phase: 0.0,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Remove health, clamped to `0..=MAX_HEALTH`. Returns the health actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).clamp(0, MAX_HEALTH);
        before - self.health
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    pub fn can_attack(&self) -> bool {
        self.attack_cooldown == 0
    }

    pub fn decay_cooldown(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
    }

    pub fn advance_animation(&mut self, step: f32) {
        self.animation_phase = (self.animation_phase + step).rem_euclid(TAU);
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub base: Combatant,
    /// Blocks all incoming damage while held
    pub is_defending: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            base: Combatant::new(
                Vec2::new(PLAYER_POSITION.0, PLAYER_POSITION.1),
                Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            ),
            is_defending: false,
        }
    }

    /// Point projectiles leave from (right edge, vertical center)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.base.position.x + self.base.size.x,
            self.base.position.y + self.base.size.y / 2.0,
        )
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub base: Combatant,
    phase: BossPhase,
}

impl Boss {
    pub fn new() -> Self {
        Self {
            base: Combatant::new(
                Vec2::new(BOSS_POSITION.0, BOSS_POSITION.1),
                Vec2::new(BOSS_SIZE.0, BOSS_SIZE.1),
            ),
            phase: BossPhase::One,
        }
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    /// Apply damage and re-derive the phase. Returns the health actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let lost = self.base.apply_damage(amount);
        self.sync_phase();
        lost
    }

    /// Advance the phase to match current health. Phases never regress.
    /// Returns the new phase when it changed.
    pub fn sync_phase(&mut self) -> Option<BossPhase> {
        let target = BossPhase::for_health(self.base.health()).max(self.phase);
        if target != self.phase {
            self.phase = target;
            Some(target)
        } else {
            None
        }
    }

    /// Point projectiles leave from (left edge, vertical center)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.base.position.x,
            self.base.position.y + self.base.size.y / 2.0,
        )
    }
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // GameRng Tests
    // =========================================================================

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut rng1 = GameRng::from_seed(42);
        let mut rng2 = GameRng::from_seed(42);

        for _ in 0..100 {
            assert_eq!(rng1.random_f32(), rng2.random_f32());
        }
    }

    #[test]
    fn test_random_range_and_index_bounds() {
        let mut rng = GameRng::from_seed(123);

        for _ in 0..100 {
            let value = rng.random_range(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&value), "Value {} out of range", value);
            assert!(rng.random_index(3) < 3);
        }
    }

    #[test]
    fn test_entropy_rng_has_no_seed() {
        assert!(GameRng::from_entropy().seed.is_none());
        assert_eq!(GameRng::from_seed(5).seed, Some(5));
    }

    // =========================================================================
    // Phase Tests
    // =========================================================================

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(BossPhase::for_health(100), BossPhase::One);
        assert_eq!(BossPhase::for_health(67), BossPhase::One);
        assert_eq!(BossPhase::for_health(66), BossPhase::Two);
        assert_eq!(BossPhase::for_health(34), BossPhase::Two);
        assert_eq!(BossPhase::for_health(33), BossPhase::Three);
        assert_eq!(BossPhase::for_health(0), BossPhase::Three);
    }

    #[test]
    fn test_phase_formulas() {
        assert_eq!(BossPhase::One.boss_damage(), 7);
        assert_eq!(BossPhase::Two.boss_damage(), 9);
        assert_eq!(BossPhase::Three.boss_damage(), 11);

        assert_eq!(BossPhase::One.player_damage(), 15);
        assert_eq!(BossPhase::Three.player_damage(), 25);

        assert_eq!(BossPhase::One.boss_cooldown(), 100);
        assert_eq!(BossPhase::Three.boss_cooldown(), 60);

        assert_eq!(BossPhase::Two.projectile_damage(), 12);
        assert_eq!(BossPhase::Three.volley_size(), 3);
    }

    #[test]
    fn test_boss_phase_follows_damage() {
        let mut boss = Boss::new();
        boss.apply_damage(34);
        assert_eq!(boss.phase(), BossPhase::Two);
        boss.apply_damage(33);
        assert_eq!(boss.phase(), BossPhase::Three);
        assert_eq!(boss.sync_phase(), None);
    }

    // =========================================================================
    // Combatant Tests
    // =========================================================================

    #[test]
    fn test_damage_is_clamped() {
        let mut combatant = Combatant::new(Vec2::ZERO, Vec2::splat(10.0));
        assert_eq!(combatant.apply_damage(-20), 0);
        assert_eq!(combatant.health(), 100);
        assert_eq!(combatant.apply_damage(250), 100);
        assert_eq!(combatant.health(), 0);
        assert!(!combatant.is_alive());
    }

    #[test]
    fn test_cooldown_decays_to_zero() {
        let mut combatant = Combatant::new(Vec2::ZERO, Vec2::splat(10.0));
        combatant.attack_cooldown = 2;
        assert!(!combatant.can_attack());
        combatant.decay_cooldown();
        combatant.decay_cooldown();
        combatant.decay_cooldown();
        assert_eq!(combatant.attack_cooldown, 0);
        assert!(combatant.can_attack());
    }

    #[test]
    fn test_animation_phase_wraps() {
        let mut combatant = Combatant::new(Vec2::ZERO, Vec2::splat(10.0));
        for _ in 0..1000 {
            combatant.advance_animation(0.05);
            assert!(combatant.animation_phase >= 0.0 && combatant.animation_phase < TAU);
        }
    }

    #[test]
    fn test_bounds_cover_size() {
        let player = Player::new();
        let bounds = player.base.bounds();
        assert_eq!(bounds.width(), PLAYER_SIZE.0);
        assert_eq!(bounds.height(), PLAYER_SIZE.1);
        assert!(bounds.contains(player.base.center()));
    }
}
