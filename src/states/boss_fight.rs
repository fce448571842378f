//! Boss fight screen
//!
//! Wraps a [`BattleSession`] in Bevy systems:
//! - `FixedUpdate` at 60 Hz advances the session one tick
//! - keyboard and mouse input are mapped to session inputs every frame
//! - the rendered frame is scaled to the window and painted with egui
//! - readouts are pushed into a HUD resource shown in a side panel

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::progression::SharedProgression;
use super::GameState;
use crate::battle::components::GameRng;
use crate::battle::constants::{ARENA_HEIGHT, ARENA_WIDTH, TICKS_PER_SECOND};
use crate::battle::services::{LogAudio, ReadoutSink, Readouts};
use crate::battle::session::{BattleSession, BattleState, InputEvent};
use crate::keybindings::{GameAction, Keybindings};
use crate::render::{self, BattleFrame, DrawCommand, TextAnchor};
use crate::settings::GameSettings;
use crate::ui::colors;

/// Width of the stats side panel
const SIDE_PANEL_WIDTH: f32 = 220.0;

/// Latest readouts pushed by the session
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct HudReadouts(pub Readouts);

impl ReadoutSink for HudReadouts {
    fn update(&mut self, readouts: &Readouts) {
        self.0 = *readouts;
    }
}

pub struct BossFightPlugin;

impl Plugin for BossFightPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND as f64))
            .init_resource::<HudReadouts>()
            .add_systems(OnEnter(GameState::BossFight), setup_boss_fight)
            .add_systems(OnExit(GameState::BossFight), cleanup_boss_fight)
            .add_systems(
                FixedUpdate,
                tick_battle.run_if(in_state(GameState::BossFight)),
            )
            .add_systems(
                Update,
                (
                    handle_battle_input,
                    sync_hud_readouts,
                    render_stats_panel,
                    render_arena,
                    render_toast,
                    follow_menu_request,
                )
                    .chain()
                    .run_if(in_state(GameState::BossFight)),
            );
    }
}

fn setup_boss_fight(
    mut commands: Commands,
    settings: Res<GameSettings>,
    progression: Res<SharedProgression>,
) {
    progression.with(|ledger| {
        ledger.menu_requested = false;
        ledger.toast = None;
    });

    let mut session = BattleSession::new(settings.battle.clone(), GameRng::from_entropy())
        .with_progression(progression.controller());
    if settings.sound_enabled {
        session = session.with_audio(LogAudio);
    }
    session.start_battle();

    commands.insert_resource(session);
    commands.insert_resource(HudReadouts::default());
    info!("Entered boss fight");
}

fn cleanup_boss_fight(mut commands: Commands) {
    commands.remove_resource::<BattleSession>();
    info!("Left boss fight");
}

fn tick_battle(mut session: ResMut<BattleSession>) {
    session.tick();
}

fn handle_battle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut session: ResMut<BattleSession>,
) {
    if keybindings.action_just_pressed(GameAction::Back, &keyboard) {
        session.exit_to_menu();
        return;
    }

    if keybindings.action_just_pressed(GameAction::Confirm, &keyboard) {
        match session.state() {
            BattleState::Idle => {
                session.start_battle();
            }
            BattleState::Ended(_) => {
                session.reset();
                session.start_battle();
            }
            _ => {}
        }
    }

    if keybindings.action_just_pressed(GameAction::PausePlay, &keyboard) {
        session.handle_input(InputEvent::TogglePause);
    }

    if keybindings.action_just_pressed(GameAction::RepeatWord, &keyboard) {
        session.repeat_word();
    }

    if let Some(answer) = keybindings.just_pressed_answer(&keyboard) {
        session.handle_input(InputEvent::SubmitAnswer(Some(answer)));
    }

    if keybindings.action_just_pressed(GameAction::Attack, &keyboard) {
        session.handle_input(InputEvent::PlayerAttack);
    }

    // Resent whenever it disagrees so a release during pause is picked up on resume
    let defending = keybindings.action_pressed(GameAction::Defend, &keyboard);
    if defending != session.player.is_defending && session.state() == BattleState::Active {
        session.handle_input(InputEvent::SetDefending(defending));
    }
}

fn sync_hud_readouts(mut session: ResMut<BattleSession>, mut hud: ResMut<HudReadouts>) {
    session.sync_readouts(&mut *hud);
}

fn render_stats_panel(
    mut contexts: EguiContexts,
    hud: Res<HudReadouts>,
    keybindings: Res<Keybindings>,
    progression: Res<SharedProgression>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let readouts = hud.0;
    let total_points = progression.with(|ledger| ledger.total_points);

    egui::SidePanel::right("battle_stats")
        .exact_width(SIDE_PANEL_WIDTH)
        .resizable(false)
        .frame(egui::Frame::none().fill(colors::PANEL).inner_margin(12.0))
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("BATTLE").size(22.0).color(colors::TITLE));
            ui.add_space(8.0);

            stat_row(ui, "Player HP", readouts.player_health.to_string());
            stat_row(ui, "Boss HP", readouts.boss_health.to_string());
            stat_row(ui, "Boss phase", readouts.boss_phase.to_string());
            stat_row(ui, "Score", readouts.score.to_string());
            stat_row(
                ui,
                "Correct",
                format!("{} / {}", readouts.questions_correct, readouts.required_correct),
            );
            stat_row(ui, "Answered", readouts.questions_answered.to_string());
            stat_row(ui, "Total points", total_points.to_string());

            ui.add_space(16.0);
            ui.label(egui::RichText::new("CONTROLS").size(18.0).color(colors::TITLE));
            ui.add_space(4.0);
            for action in GameAction::all() {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(action.description())
                            .size(13.0)
                            .color(colors::TEXT_DIM),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(keybindings.binding_display(action))
                                .size(13.0)
                                .color(colors::TEXT),
                        );
                    });
                });
            }
        });
}

fn stat_row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).size(15.0).color(colors::TEXT_DIM));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(value).size(15.0).color(colors::TEXT));
        });
    });
}

fn render_arena(mut contexts: EguiContexts, mut session: ResMut<BattleSession>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let frame = render::draw_battle(&session);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::BLACK))
        .show(ctx, |ui| {
            let available = ui.available_rect_before_wrap();
            let scale = (available.width() / ARENA_WIDTH)
                .min(available.height() / ARENA_HEIGHT)
                .max(0.01);
            let size = egui::vec2(ARENA_WIDTH * scale, ARENA_HEIGHT * scale);
            let arena_rect = egui::Rect::from_center_size(available.center(), size);

            let response = ui.allocate_rect(arena_rect, egui::Sense::click());
            paint_frame(&ui.painter_at(arena_rect), &frame, arena_rect.min, scale);

            if response.clicked() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    let local = (pointer - arena_rect.min) / scale;
                    if let Some(answer) = render::choice_at(Vec2::new(local.x, local.y)) {
                        session.handle_input(InputEvent::SubmitAnswer(Some(answer)));
                    }
                }
            }
        });
}

/// Paint a battle frame at `origin`, scaled from arena units to screen points
pub fn paint_frame(painter: &egui::Painter, frame: &BattleFrame, origin: egui::Pos2, scale: f32) {
    let to_screen = |point: Vec2| origin + egui::vec2(point.x, point.y) * scale;
    let to_rect = |rect: Rect| egui::Rect::from_min_max(to_screen(rect.min), to_screen(rect.max));

    for command in &frame.commands {
        match command {
            DrawCommand::FillRect { rect, color } => {
                painter.rect_filled(to_rect(*rect), 0.0, *color);
            }
            DrawCommand::StrokeRect { rect, width, color } => {
                painter.rect_stroke(to_rect(*rect), 0.0, egui::Stroke::new(width * scale, *color));
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(to_screen(*center), radius * scale, *color);
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                width,
                color,
            } => {
                painter.circle_stroke(
                    to_screen(*center),
                    radius * scale,
                    egui::Stroke::new(width * scale, *color),
                );
            }
            DrawCommand::Text {
                position,
                text,
                size,
                color,
                anchor,
            } => {
                let align = match anchor {
                    TextAnchor::Left => egui::Align2::LEFT_CENTER,
                    TextAnchor::Center => egui::Align2::CENTER_CENTER,
                    TextAnchor::Right => egui::Align2::RIGHT_CENTER,
                };
                painter.text(
                    to_screen(*position),
                    align,
                    text,
                    egui::FontId::proportional(size * scale),
                    *color,
                );
            }
        }
    }
}

fn render_toast(mut contexts: EguiContexts, time: Res<Time>, progression: Res<SharedProgression>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let toast = progression.with(|ledger| {
        ledger.advance_toast(time.delta_secs());
        ledger.toast.clone()
    });
    let Some(toast) = toast else {
        return;
    };

    egui::Area::new(egui::Id::new("battle_toast"))
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(-SIDE_PANEL_WIDTH / 2.0, 80.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(200))
                .rounding(6.0)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(toast.text).size(20.0).color(colors::TITLE));
                });
        });
}

fn follow_menu_request(
    progression: Res<SharedProgression>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let requested = progression.with(|ledger| std::mem::take(&mut ledger.menu_requested));
    if requested {
        info!("Battle requested main menu");
        next_state.set(GameState::MainMenu);
    }
}
