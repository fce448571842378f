//! Past-tense pronunciation boss fight
//!
//! Runs the graphical game by default, or a scripted battle with `--headless`.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use std::process::ExitCode;

use pastboss::cli;
use pastboss::headless::{run_headless_battle, HeadlessBattleConfig};
use pastboss::settings::{GameSettings, SettingsPlugin};
use pastboss::states::{GameState, StatesPlugin};

fn main() -> ExitCode {
    let args = cli::parse_args();

    if let Some(config_path) = args.headless {
        return run_headless(config_path, args.output, args.seed, args.max_ticks);
    }

    let settings = GameSettings::load();
    let (width, height) = settings.resolution.dimensions();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Past-Tense Boss".to_string(),
                resolution: (width, height).into(),
                mode: settings.window_mode.to_bevy(),
                present_mode: if settings.vsync {
                    bevy::window::PresentMode::AutoVsync
                } else {
                    bevy::window::PresentMode::AutoNoVsync
                },
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((EguiPlugin, SettingsPlugin { settings }, StatesPlugin))
        .init_state::<GameState>()
        .run();

    ExitCode::SUCCESS
}

fn run_headless(
    config_path: std::path::PathBuf,
    output: Option<std::path::PathBuf>,
    seed: Option<u64>,
    max_ticks: Option<u64>,
) -> ExitCode {
    let mut config = match HeadlessBattleConfig::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(output) = output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if seed.is_some() {
        config.random_seed = seed;
    }
    if let Some(max_ticks) = max_ticks {
        config.max_ticks = max_ticks;
    }

    match run_headless_battle(config) {
        Ok(result) => {
            let outcome = result.outcome.map_or("Abandoned", |o| o.name());
            println!(
                "{} after {} ticks: score {}, {}/{} correct, player {} HP, boss {} HP",
                outcome,
                result.ticks,
                result.score,
                result.questions_correct,
                result.questions_answered,
                result.player_health,
                result.boss_health
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
