//! Boss battle core
//!
//! Everything that decides what happens in a battle, independent of any
//! window or input device:
//! - `components`: player, boss, phases and the seeded RNG
//! - `effects`: projectiles, particles and floating text
//! - `schedule`: deferred tasks with stale-task protection
//! - `session`: the state machine and per-tick loop
//! - `services`: audio, progression and HUD collaborator traits
//! - `config`: tunable timings
//! - `log`: battle event log and JSON export

pub mod components;
pub mod config;
pub mod constants;
pub mod effects;
pub mod log;
pub mod schedule;
pub mod services;
pub mod session;

pub use components::{Boss, BossPhase, Combatant, GameRng, Player, Side};
pub use config::BattleConfig;
pub use log::{BattleLog, BattleLogEntry, BattleLogEventType, BattleMetadata};
pub use services::{
    AudioService, LogAudio, LogProgression, ProgressionController, ReadoutSink, Readouts,
    SoundEffect,
};
pub use session::{ActiveQuestion, BattleOutcome, BattleSession, BattleState, InputEvent, SessionStats};
