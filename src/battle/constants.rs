//! Battle Constants
//!
//! Centralized location for the numbers that shape the boss fight.
//! Durations are expressed in ticks; one tick is 1/60 of a second.

// ============================================================================
// Timing
// ============================================================================

/// Nominal simulation rate
pub const TICKS_PER_SECOND: u32 = 60;

/// Length of the boss intro cutscene before the first question
pub const INTRO_TICKS: u32 = 3 * TICKS_PER_SECOND;

/// Time the player has to answer a question (5 seconds)
pub const QUESTION_TICKS: u32 = 5 * TICKS_PER_SECOND;

/// Pause between resolving an answer and asking the next question (1.5 seconds)
pub const POST_ANSWER_TICKS: u32 = 90;

/// Below this fraction of remaining answer time the timer bar turns to its warning color
pub const TIMER_WARNING_FRACTION: f32 = 0.3;

// ============================================================================
// Health
// ============================================================================

pub const MAX_HEALTH: i32 = 100;

/// Boss enters phase 2 at or below this health
pub const PHASE_TWO_HEALTH: i32 = 66;

/// Boss enters phase 3 at or below this health
pub const PHASE_THREE_HEALTH: i32 = 33;

// ============================================================================
// Attacks
// ============================================================================

/// Ticks the player must wait between attacks (~1 second)
pub const PLAYER_ATTACK_COOLDOWN: u32 = 60;

/// Damage carried by the player's projectile (cosmetic, boss damage is applied on answer)
pub const PLAYER_PROJECTILE_DAMAGE: i32 = 5;

pub const PLAYER_PROJECTILE_SPEED: f32 = 8.0;

pub const PLAYER_PROJECTILE_LIFE: u32 = 100;

/// How long the player's attack flash stays on
pub const PLAYER_ATTACK_FLASH_TICKS: u32 = 18;

/// Boss cooldown before phase scaling is subtracted
pub const BOSS_BASE_COOLDOWN: i32 = 120;

/// Cooldown removed per boss phase
pub const BOSS_COOLDOWN_PER_PHASE: i32 = 20;

/// Lower bound on the boss cooldown whatever the phase
pub const BOSS_MIN_COOLDOWN: i32 = 1;

pub const BOSS_PROJECTILE_SPEED: f32 = 6.0;

/// Maximum vertical speed of a boss projectile (randomized in +/- this range).
/// Small enough that every shot still crosses the player's rectangle.
pub const BOSS_PROJECTILE_JITTER: f32 = 0.25;

pub const BOSS_PROJECTILE_LIFE: u32 = 150;

/// Delay between consecutive projectiles of a multi-projectile boss attack
pub const BOSS_VOLLEY_STAGGER_TICKS: u32 = 12;

/// How long the boss's charge flash stays on
pub const BOSS_ATTACK_FLASH_TICKS: u32 = 30;

// ============================================================================
// Scoring
// ============================================================================

/// Points awarded for a correct answer
pub const CORRECT_ANSWER_POINTS: i32 = 10;

/// Points reported as a penalty for a wrong or missed answer
pub const WRONG_ANSWER_PENALTY: i32 = 5;

/// Correct answers shown as the progress target (informational only)
pub const REQUIRED_CORRECT: u32 = 15;

// ============================================================================
// Arena Layout
// ============================================================================

pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;

/// Distance outside the arena a projectile may travel before being culled
pub const ARENA_CULL_MARGIN: f32 = 50.0;

pub const PLAYER_POSITION: (f32, f32) = (100.0, 300.0);
pub const PLAYER_SIZE: (f32, f32) = (60.0, 80.0);

pub const BOSS_POSITION: (f32, f32) = (600.0, 250.0);
pub const BOSS_SIZE: (f32, f32) = (120.0, 140.0);

// ============================================================================
// Effects
// ============================================================================

/// Velocity multiplier applied to particles every tick
pub const PARTICLE_DRAG: f32 = 0.98;

/// Floating text rise per tick, in pixels
pub const FLOATING_TEXT_RISE: f32 = 1.0;

pub const FLOATING_TEXT_LIFE: u32 = 60;

pub const FEEDBACK_PARTICLES: usize = 12;

pub const HIT_PARTICLES: usize = 8;

/// Idle animation advance per tick
pub const PLAYER_ANIMATION_STEP: f32 = 0.05;
pub const BOSS_ANIMATION_STEP: f32 = 0.03;
