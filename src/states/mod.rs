//! Game state management
//!
//! Defines the screens of the game and the transitions between them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub mod boss_fight;
pub mod progression;

pub use boss_fight::BossFightPlugin;
pub use progression::SharedProgression;

use crate::keybindings::{GameAction, Keybindings};
use crate::settings::{GameSettings, PendingSettingsRestart, ResolutionOption, WindowModeOption};
use crate::ui::{apply_dark_theme, colors, fonts};

/// The screens of the game
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Main menu - entry point, navigate to other states
    #[default]
    MainMenu,
    /// Options menu - video, audio and battle settings
    Options,
    /// The boss fight itself
    BossFight,
}

/// Plugin for managing game states and transitions
pub struct StatesPlugin;

impl Plugin for StatesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SharedProgression>()
            .add_plugins(BossFightPlugin)
            .add_systems(Startup, setup_camera)
            .add_systems(Update, main_menu_ui.run_if(in_state(GameState::MainMenu)))
            .add_systems(Update, options_ui.run_if(in_state(GameState::Options)));
    }
}

/// egui needs a camera to draw into
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn menu_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add_sized(
        egui::vec2(280.0, 60.0),
        egui::Button::new(egui::RichText::new(label).size(28.0).color(colors::TEXT)),
    )
    .clicked()
}

// ============================================================================
// Main Menu (egui)
// ============================================================================

fn main_menu_ui(
    mut contexts: EguiContexts,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    progression: Res<SharedProgression>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit_events: EventWriter<AppExit>,
) {
    if keybindings.action_just_pressed(GameAction::Confirm, &keyboard) {
        info!("Confirm pressed - starting boss fight");
        next_state.set(GameState::BossFight);
        return;
    }

    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    apply_dark_theme(ctx);

    let (total_points, levels) = progression.with(|ledger| {
        (ledger.total_points, ledger.levels_completed.len())
    });

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(colors::PANEL))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);

                ui.heading(
                    egui::RichText::new("PAST-TENSE BOSS")
                        .size(64.0)
                        .color(colors::TITLE),
                );
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new("Is it /t/, /d/ or /ɪd/? Answer fast, hit hard.")
                        .size(22.0)
                        .color(colors::TEXT_DIM),
                );

                ui.add_space(50.0);

                if menu_button(ui, "FIGHT") {
                    info!("Fight button pressed - transitioning to BossFight");
                    next_state.set(GameState::BossFight);
                }
                ui.add_space(10.0);
                if menu_button(ui, "OPTIONS") {
                    info!("Options button pressed - transitioning to Options");
                    next_state.set(GameState::Options);
                }
                ui.add_space(10.0);
                if menu_button(ui, "EXIT") {
                    info!("Exit button pressed - quitting application");
                    exit_events.send(AppExit::Success);
                }

                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Total points: {}   •   Bosses defeated: {}",
                        total_points, levels
                    ))
                    .size(fonts::BODY)
                    .color(colors::TEXT_DIM),
                );
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::RIGHT), |ui| {
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new(concat!("v", env!("CARGO_PKG_VERSION")))
                        .size(fonts::SMALL)
                        .color(egui::Color32::from_rgb(102, 102, 102)),
                );
            });
        });
}

// ============================================================================
// Options Menu (egui)
// ============================================================================

fn option_group(ui: &mut egui::Ui, title: &str, note: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.set_min_width(580.0);
        ui.add_space(10.0);
        ui.label(egui::RichText::new(title).size(24.0).color(colors::TITLE));
        if !note.is_empty() {
            ui.label(
                egui::RichText::new(note)
                    .size(fonts::SMALL)
                    .color(egui::Color32::from_rgb(150, 150, 150)),
            );
        }
        ui.add_space(10.0);
        add_contents(ui);
        ui.add_space(10.0);
    });
    ui.add_space(20.0);
}

fn choice_button(ui: &mut egui::Ui, label: &str, selected: bool, width: f32) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).size(18.0).color(if selected {
        egui::Color32::WHITE
    } else {
        egui::Color32::from_rgb(180, 180, 180)
    }))
    .min_size(egui::vec2(width, 40.0))
    .fill(if selected {
        egui::Color32::from_rgb(60, 60, 80)
    } else {
        egui::Color32::from_rgb(40, 40, 50)
    });
    ui.add(button).clicked()
}

fn options_ui(
    mut contexts: EguiContexts,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut settings: ResMut<GameSettings>,
    pending_restart: Res<PendingSettingsRestart>,
) {
    if settings.keybindings.action_just_pressed(GameAction::Back, &keyboard) {
        next_state.set(GameState::MainMenu);
        return;
    }

    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    apply_dark_theme(ctx);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(colors::PANEL).inner_margin(20.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(egui::RichText::new("← BACK").size(20.0)).clicked() {
                    next_state.set(GameState::MainMenu);
                }
                ui.add_space(160.0);
                ui.heading(egui::RichText::new("OPTIONS").size(42.0).color(colors::TITLE));
            });
            ui.add_space(30.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    option_group(ui, "Window Mode", "(Requires restart)", |ui| {
                        ui.horizontal(|ui| {
                            for mode in WindowModeOption::all() {
                                if choice_button(ui, mode.as_str(), settings.window_mode == mode, 280.0) {
                                    settings.window_mode = mode;
                                }
                            }
                        });
                    });

                    option_group(
                        ui,
                        "Resolution",
                        "(Requires restart • Only applies in Windowed mode)",
                        |ui| {
                            ui.horizontal(|ui| {
                                for resolution in ResolutionOption::all() {
                                    let selected = settings.resolution == resolution;
                                    if choice_button(ui, resolution.as_str(), selected, 180.0) {
                                        settings.resolution = resolution;
                                    }
                                }
                            });
                        },
                    );

                    option_group(ui, "Display & Sound", "Applied immediately", |ui| {
                        let mut vsync = settings.vsync;
                        if ui
                            .checkbox(&mut vsync, egui::RichText::new("VSync").size(18.0))
                            .changed()
                        {
                            settings.vsync = vsync;
                            info!("VSync toggled to: {}", vsync);
                        }
                        let mut sound = settings.sound_enabled;
                        if ui
                            .checkbox(&mut sound, egui::RichText::new("Sound & speech").size(18.0))
                            .changed()
                        {
                            settings.sound_enabled = sound;
                            info!("Sound toggled to: {}", sound);
                        }
                    });

                    option_group(ui, "Answer Time", "Seconds per question (next battle)", |ui| {
                        let mut seconds = settings.battle.question_ticks as f32
                            / crate::battle::constants::TICKS_PER_SECOND as f32;
                        if ui
                            .add(egui::Slider::new(&mut seconds, 2.0..=10.0).step_by(0.5))
                            .changed()
                        {
                            settings.battle.question_ticks = (seconds
                                * crate::battle::constants::TICKS_PER_SECOND as f32)
                                .round() as u32;
                        }
                    });

                    option_group(ui, "Controls", "", |ui| {
                        for action in GameAction::all() {
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new(format!(
                                        "{} - {}",
                                        action.category(),
                                        action.description()
                                    ))
                                    .size(16.0)
                                    .color(colors::TEXT_DIM),
                                );
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        ui.label(
                                            egui::RichText::new(settings.keybindings.binding_display(action))
                                                .size(16.0)
                                                .color(colors::TEXT),
                                        );
                                    },
                                );
                            });
                        }
                        ui.add_space(8.0);
                        if ui.button("Reset to defaults").clicked() {
                            settings.keybindings.reset_to_defaults();
                            info!("Keybindings reset to defaults");
                        }
                    });

                    if pending_restart.restart_required {
                        ui.label(
                            egui::RichText::new("⚠ Restart required to apply window settings")
                                .size(18.0)
                                .color(egui::Color32::from_rgb(230, 170, 80)),
                        );
                    }
                });
            });
        });
}
