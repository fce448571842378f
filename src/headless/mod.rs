//! Headless mode for automated runs
//!
//! Plays a full boss fight without a window, with a scripted player standing
//! in for keyboard input. Used for balance checks and tests.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless battle.json --seed 42
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "accuracy": 0.75,
//!   "answer_delay_ticks": 90,
//!   "always_defend": false,
//!   "random_seed": 42,
//!   "max_ticks": 36000,
//!   "battle": { "question_ticks": 300 }
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessBattleConfig;
pub use runner::{run_headless_battle, BattleResult, HeadlessPlugin, ScriptedPlayer};
