//! Game settings and configuration
//!
//! User preferences (window, audio, controls) and battle tuning, persisted
//! as `settings.ron` next to the executable.

use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::battle::config::BattleConfig;
use crate::keybindings::Keybindings;

/// User-configurable game settings
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub window_mode: WindowModeOption,
    pub resolution: ResolutionOption,
    pub vsync: bool,
    /// Play sound cues and read words aloud
    pub sound_enabled: bool,
    pub keybindings: Keybindings,
    pub battle: BattleConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeOption::Windowed,
            resolution: ResolutionOption::Arena,
            vsync: true,
            sound_enabled: true,
            keybindings: Keybindings::default(),
            battle: BattleConfig::default(),
        }
    }
}

impl GameSettings {
    fn settings_path() -> PathBuf {
        PathBuf::from("settings.ron")
    }

    /// Load settings from `settings.ron`, or defaults if missing or invalid
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        let settings = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file: {}", e))
            .and_then(|contents| {
                ron::from_str::<GameSettings>(&contents)
                    .map_err(|e| format!("Failed to parse settings file: {}", e))
            })
            .and_then(|settings| settings.battle.validate().map(|_| settings));

        match settings {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Tracks whether settings have changed and require application restart
#[derive(Resource)]
pub struct PendingSettingsRestart {
    pub restart_required: bool,
    previous_settings: GameSettings,
}

impl Default for PendingSettingsRestart {
    fn default() -> Self {
        Self {
            restart_required: false,
            previous_settings: GameSettings::default(),
        }
    }
}

impl PendingSettingsRestart {
    /// Only window mode and resolution changes require a restart
    pub fn check_restart_needed(&mut self, new_settings: &GameSettings) -> bool {
        let needs_restart = self.previous_settings.window_mode != new_settings.window_mode
            || self.previous_settings.resolution != new_settings.resolution;

        self.previous_settings = new_settings.clone();
        self.restart_required = needs_restart;
        needs_restart
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowModeOption {
    Windowed,
    BorderlessFullscreen,
}

impl WindowModeOption {
    pub fn to_bevy(&self) -> WindowMode {
        match self {
            WindowModeOption::Windowed => WindowMode::Windowed,
            WindowModeOption::BorderlessFullscreen => {
                WindowMode::BorderlessFullscreen(MonitorSelection::Current)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowModeOption::Windowed => "Windowed",
            WindowModeOption::BorderlessFullscreen => "Borderless Fullscreen",
        }
    }

    pub fn all() -> [WindowModeOption; 2] {
        [WindowModeOption::Windowed, WindowModeOption::BorderlessFullscreen]
    }
}

/// Resolution presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOption {
    /// Native arena size
    Arena,
    HD720,
    HD1080,
}

impl ResolutionOption {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            ResolutionOption::Arena => (800.0, 600.0),
            ResolutionOption::HD720 => (1280.0, 720.0),
            ResolutionOption::HD1080 => (1920.0, 1080.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOption::Arena => "800 × 600",
            ResolutionOption::HD720 => "1280 × 720",
            ResolutionOption::HD1080 => "1920 × 1080",
        }
    }

    pub fn all() -> [ResolutionOption; 3] {
        [
            ResolutionOption::Arena,
            ResolutionOption::HD720,
            ResolutionOption::HD1080,
        ]
    }
}

/// Plugin for managing game settings
pub struct SettingsPlugin {
    pub settings: GameSettings,
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();
        let keybindings = settings.keybindings.clone();

        app.insert_resource(settings.clone())
            .insert_resource(keybindings)
            .insert_resource(PendingSettingsRestart {
                restart_required: false,
                previous_settings: settings,
            })
            .add_systems(
                Update,
                (save_settings_on_change, apply_runtime_settings, sync_keybindings),
            );
    }
}

fn save_settings_on_change(
    settings: Res<GameSettings>,
    mut pending_restart: ResMut<PendingSettingsRestart>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }

    let needs_restart = pending_restart.check_restart_needed(&settings);
    match settings.save() {
        Err(e) => error!("Failed to save settings: {}", e),
        Ok(()) if needs_restart => info!(
            "Settings changed: {:?} @ {:?} (restart required)",
            settings.window_mode, settings.resolution
        ),
        Ok(()) => info!("Settings changed and applied immediately"),
    }
}

/// Apply settings that can change at runtime (VSync)
fn apply_runtime_settings(
    settings: Res<GameSettings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    pending_restart: Res<PendingSettingsRestart>,
) {
    if settings.is_changed() && !settings.is_added() && !pending_restart.restart_required {
        if let Ok(mut window) = windows.get_single_mut() {
            window.present_mode = if settings.vsync {
                PresentMode::AutoVsync
            } else {
                PresentMode::AutoNoVsync
            };
            info!("Applied VSync: {}", settings.vsync);
        }
    }
}

/// Keep the Keybindings resource in sync with GameSettings
fn sync_keybindings(settings: Res<GameSettings>, mut keybindings: ResMut<Keybindings>) {
    if settings.is_changed() && !settings.is_added() {
        *keybindings = settings.keybindings.clone();
        info!("Synced keybindings from settings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pastboss_{}_{}.ron", name, std::process::id()))
    }

    #[test]
    fn test_settings_survive_save_and_load() {
        let path = temp_path("roundtrip");
        let mut settings = GameSettings::default();
        settings.sound_enabled = false;
        settings.battle.question_ticks = 240;

        settings.save_to(&path).unwrap();
        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "(vsync: false)").unwrap();
        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert!(!loaded.vsync);
        assert!(loaded.sound_enabled);
        assert_eq!(loaded.battle, BattleConfig::default());
    }

    #[test]
    fn test_invalid_battle_config_falls_back_to_defaults() {
        let path = temp_path("invalid");
        fs::write(&path, "(battle: (question_ticks: 0))").unwrap();
        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, GameSettings::default());
    }

    #[test]
    fn test_restart_needed_only_for_window_changes() {
        let mut pending = PendingSettingsRestart::default();
        let mut settings = GameSettings::default();
        settings.vsync = false;
        assert!(!pending.check_restart_needed(&settings));

        settings.window_mode = WindowModeOption::BorderlessFullscreen;
        assert!(pending.check_restart_needed(&settings));
    }
}
