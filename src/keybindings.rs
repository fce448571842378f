//! Keybinding system for remappable controls
//!
//! Maps keyboard keys to battle actions. Bindings are stored in the
//! settings file by key name (`"Digit1"`, `"Space"`, ...).

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

use crate::words::PronunciationClass;

/// All possible actions that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    // Navigation
    Back,
    Confirm,

    // Answers
    AnswerT,
    AnswerD,
    AnswerId,

    // Combat
    Attack,
    Defend,
    RepeatWord,
    PausePlay,
}

impl GameAction {
    pub fn description(&self) -> &'static str {
        match self {
            GameAction::Back => "Back / Menu",
            GameAction::Confirm => "Confirm / Start",
            GameAction::AnswerT => "Answer /t/",
            GameAction::AnswerD => "Answer /d/",
            GameAction::AnswerId => "Answer /ɪd/",
            GameAction::Attack => "Attack",
            GameAction::Defend => "Defend (hold)",
            GameAction::RepeatWord => "Repeat Word",
            GameAction::PausePlay => "Pause / Play",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            GameAction::Back | GameAction::Confirm => "Navigation",
            GameAction::AnswerT | GameAction::AnswerD | GameAction::AnswerId => "Answers",
            GameAction::Attack
            | GameAction::Defend
            | GameAction::RepeatWord
            | GameAction::PausePlay => "Combat",
        }
    }

    /// The answer this action submits, if it is an answer key
    pub fn answer(&self) -> Option<PronunciationClass> {
        match self {
            GameAction::AnswerT => Some(PronunciationClass::T),
            GameAction::AnswerD => Some(PronunciationClass::D),
            GameAction::AnswerId => Some(PronunciationClass::Id),
            _ => None,
        }
    }

    pub fn all() -> [GameAction; 9] {
        [
            GameAction::Back,
            GameAction::Confirm,
            GameAction::AnswerT,
            GameAction::AnswerD,
            GameAction::AnswerId,
            GameAction::Attack,
            GameAction::Defend,
            GameAction::RepeatWord,
            GameAction::PausePlay,
        ]
    }
}

/// Keys that can be bound: (key, stored name, display label)
const KEY_TABLE: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Escape, "Escape", "ESC"),
    (KeyCode::Enter, "Enter", "ENTER"),
    (KeyCode::Space, "Space", "SPACE"),
    (KeyCode::Tab, "Tab", "TAB"),
    (KeyCode::Backspace, "Backspace", "BACKSPACE"),
    (KeyCode::ShiftLeft, "ShiftLeft", "L-SHIFT"),
    (KeyCode::ShiftRight, "ShiftRight", "R-SHIFT"),
    (KeyCode::ControlLeft, "ControlLeft", "L-CTRL"),
    (KeyCode::KeyA, "KeyA", "A"),
    (KeyCode::KeyB, "KeyB", "B"),
    (KeyCode::KeyC, "KeyC", "C"),
    (KeyCode::KeyD, "KeyD", "D"),
    (KeyCode::KeyE, "KeyE", "E"),
    (KeyCode::KeyF, "KeyF", "F"),
    (KeyCode::KeyG, "KeyG", "G"),
    (KeyCode::KeyH, "KeyH", "H"),
    (KeyCode::KeyI, "KeyI", "I"),
    (KeyCode::KeyJ, "KeyJ", "J"),
    (KeyCode::KeyK, "KeyK", "K"),
    (KeyCode::KeyL, "KeyL", "L"),
    (KeyCode::KeyM, "KeyM", "M"),
    (KeyCode::KeyN, "KeyN", "N"),
    (KeyCode::KeyO, "KeyO", "O"),
    (KeyCode::KeyP, "KeyP", "P"),
    (KeyCode::KeyQ, "KeyQ", "Q"),
    (KeyCode::KeyR, "KeyR", "R"),
    (KeyCode::KeyS, "KeyS", "S"),
    (KeyCode::KeyT, "KeyT", "T"),
    (KeyCode::KeyU, "KeyU", "U"),
    (KeyCode::KeyV, "KeyV", "V"),
    (KeyCode::KeyW, "KeyW", "W"),
    (KeyCode::KeyX, "KeyX", "X"),
    (KeyCode::KeyY, "KeyY", "Y"),
    (KeyCode::KeyZ, "KeyZ", "Z"),
    (KeyCode::Digit1, "Digit1", "1"),
    (KeyCode::Digit2, "Digit2", "2"),
    (KeyCode::Digit3, "Digit3", "3"),
    (KeyCode::Digit4, "Digit4", "4"),
    (KeyCode::Digit5, "Digit5", "5"),
    (KeyCode::Digit6, "Digit6", "6"),
    (KeyCode::Digit7, "Digit7", "7"),
    (KeyCode::Digit8, "Digit8", "8"),
    (KeyCode::Digit9, "Digit9", "9"),
    (KeyCode::Digit0, "Digit0", "0"),
    (KeyCode::Numpad1, "Numpad1", "NUM1"),
    (KeyCode::Numpad2, "Numpad2", "NUM2"),
    (KeyCode::Numpad3, "Numpad3", "NUM3"),
    (KeyCode::F1, "F1", "F1"),
    (KeyCode::F2, "F2", "F2"),
    (KeyCode::F3, "F3", "F3"),
    (KeyCode::F4, "F4", "F4"),
    (KeyCode::ArrowUp, "ArrowUp", "↑"),
    (KeyCode::ArrowDown, "ArrowDown", "↓"),
    (KeyCode::ArrowLeft, "ArrowLeft", "←"),
    (KeyCode::ArrowRight, "ArrowRight", "→"),
];

fn key_from_name(name: &str) -> Option<KeyCode> {
    KEY_TABLE
        .iter()
        .find(|(_, stored, _)| *stored == name)
        .map(|(key, _, _)| *key)
}

fn key_to_name(key: KeyCode) -> Option<&'static str> {
    KEY_TABLE
        .iter()
        .find(|(candidate, _, _)| *candidate == key)
        .map(|(_, stored, _)| *stored)
}

/// Key binding with primary and optional secondary key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyBinding {
    #[serde(with = "keycode_serde")]
    pub primary: KeyCode,
    #[serde(default, with = "option_keycode_serde")]
    pub secondary: Option<KeyCode>,
}

mod keycode_serde {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S>(key: &KeyCode, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match key_to_name(*key) {
            Some(name) => serializer.serialize_str(name),
            None => Err(serde::ser::Error::custom(format!("unsupported key {:?}", key))),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<KeyCode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        key_from_name(&name).ok_or_else(|| D::Error::custom(format!("unknown key '{}'", name)))
    }
}

mod option_keycode_serde {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S>(key: &Option<KeyCode>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match key {
            Some(k) => match key_to_name(*k) {
                Some(name) => serializer.serialize_some(name),
                None => Err(serde::ser::Error::custom(format!("unsupported key {:?}", k))),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<KeyCode>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name: Option<String> = Option::deserialize(deserializer)?;
        name.map(|name| {
            key_from_name(&name).ok_or_else(|| D::Error::custom(format!("unknown key '{}'", name)))
        })
        .transpose()
    }
}

impl KeyBinding {
    pub fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

/// Complete keybindings configuration
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
pub struct Keybindings {
    bindings: HashMap<GameAction, KeyBinding>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::create_defaults()
    }
}

impl Keybindings {
    pub fn create_defaults() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(GameAction::Back, KeyBinding::new(KeyCode::Escape));
        bindings.insert(GameAction::Confirm, KeyBinding::new(KeyCode::Enter));

        bindings.insert(
            GameAction::AnswerT,
            KeyBinding::with_secondary(KeyCode::Digit1, KeyCode::KeyT),
        );
        bindings.insert(
            GameAction::AnswerD,
            KeyBinding::with_secondary(KeyCode::Digit2, KeyCode::KeyD),
        );
        bindings.insert(
            GameAction::AnswerId,
            KeyBinding::with_secondary(KeyCode::Digit3, KeyCode::KeyI),
        );

        bindings.insert(
            GameAction::Attack,
            KeyBinding::with_secondary(KeyCode::Space, KeyCode::KeyA),
        );
        bindings.insert(
            GameAction::Defend,
            KeyBinding::with_secondary(KeyCode::ShiftLeft, KeyCode::KeyS),
        );
        bindings.insert(GameAction::RepeatWord, KeyBinding::new(KeyCode::KeyR));
        bindings.insert(GameAction::PausePlay, KeyBinding::new(KeyCode::KeyP));

        Self { bindings }
    }

    pub fn get(&self, action: GameAction) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    pub fn set(&mut self, action: GameAction, binding: KeyBinding) {
        self.bindings.insert(action, binding);
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::create_defaults();
    }

    /// Check if an action is currently held
    pub fn action_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action).map_or(false, |binding| {
            keyboard.pressed(binding.primary)
                || binding.secondary.map_or(false, |key| keyboard.pressed(key))
        })
    }

    /// Check if an action was just pressed this frame
    pub fn action_just_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action).map_or(false, |binding| {
            keyboard.just_pressed(binding.primary)
                || binding.secondary.map_or(false, |key| keyboard.just_pressed(key))
        })
    }

    /// Answer submitted this frame, if any answer key was just pressed
    pub fn just_pressed_answer(&self, keyboard: &ButtonInput<KeyCode>) -> Option<PronunciationClass> {
        [GameAction::AnswerT, GameAction::AnswerD, GameAction::AnswerId]
            .into_iter()
            .find(|action| self.action_just_pressed(*action, keyboard))
            .and_then(|action| action.answer())
    }

    /// Check if a key is already bound to any action (for conflict detection)
    pub fn is_key_bound(&self, key: KeyCode, exclude_action: Option<GameAction>) -> Option<GameAction> {
        self.bindings
            .iter()
            .find(|(action, binding)| Some(**action) != exclude_action && binding.matches(key))
            .map(|(action, _)| *action)
    }

    /// Get a human-readable string for a key
    pub fn key_name(key: KeyCode) -> &'static str {
        KEY_TABLE
            .iter()
            .find(|(candidate, _, _)| *candidate == key)
            .map_or("???", |(_, _, label)| *label)
    }

    /// Get display string for a binding
    pub fn binding_display(&self, action: GameAction) -> String {
        match self.get(action) {
            Some(binding) => {
                let primary = Self::key_name(binding.primary);
                match binding.secondary {
                    Some(secondary) => format!("{} / {}", primary, Self::key_name(secondary)),
                    None => primary.to_string(),
                }
            }
            None => "Unbound".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_has_a_default_binding() {
        let bindings = Keybindings::default();
        for action in GameAction::all() {
            assert!(bindings.get(action).is_some(), "{:?} is unbound", action);
        }
    }

    #[test]
    fn test_default_bindings_do_not_conflict() {
        let bindings = Keybindings::default();
        for action in GameAction::all() {
            let binding = bindings.get(action).unwrap();
            assert_eq!(bindings.is_key_bound(binding.primary, Some(action)), None);
            if let Some(secondary) = binding.secondary {
                assert_eq!(bindings.is_key_bound(secondary, Some(action)), None);
            }
        }
    }

    #[test]
    fn test_answer_actions_map_to_classes() {
        assert_eq!(GameAction::AnswerT.answer(), Some(PronunciationClass::T));
        assert_eq!(GameAction::AnswerId.answer(), Some(PronunciationClass::Id));
        assert_eq!(GameAction::Attack.answer(), None);
    }

    #[test]
    fn test_just_pressed_answer_reads_secondary_key() {
        let bindings = Keybindings::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyI);
        assert_eq!(bindings.just_pressed_answer(&keyboard), Some(PronunciationClass::Id));
    }

    #[test]
    fn test_unknown_key_name_is_rejected() {
        let parsed: Result<KeyBinding, _> = ron::from_str(r#"(primary: "NotAKey", secondary: None)"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_binding_display() {
        let bindings = Keybindings::default();
        assert_eq!(bindings.binding_display(GameAction::AnswerT), "1 / T");
        assert_eq!(bindings.binding_display(GameAction::PausePlay), "P");
    }
}
