//! Past-tense pronunciation boss fight
//!
//! A single-player quiz battle: the game says a regular past-tense verb and
//! the player picks how its `-ed` ending sounds (/t/, /d/ or /ɪd/). Correct
//! answers damage the boss, wrong or missed ones let the boss strike back.
//!
//! This library exposes the battle core, its renderer and the Bevy
//! front-end for testing and reuse.

pub mod battle;
pub mod cli;
pub mod headless;
pub mod keybindings;
pub mod render;
pub mod settings;
pub mod states;
pub mod ui;
pub mod words;

// Re-export commonly used types
pub use battle::log::{BattleLog, BattleLogEventType};
pub use battle::session::{BattleOutcome, BattleSession, BattleState, InputEvent};
pub use headless::HeadlessBattleConfig;
pub use words::{PronunciationClass, Question, WordBank};
