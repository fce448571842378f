//! Battle state machine and game loop
//!
//! [`BattleSession`] owns every piece of battle state and advances it one
//! tick at a time:
//!
//! ```text
//! Idle -> Intro -> Active <-> Paused -> Ended(Victory | Defeat)
//! ```
//!
//! ## Tick order
//!
//! Each [`BattleSession::tick`] first fires due deferred tasks, then, while
//! `Active`:
//!
//! 1. boss cooldown and phase
//! 2. question timer (timeout counts as a wrong answer)
//! 3. particles, floating text, player cooldown
//! 4. projectiles (move, collide, cull)
//! 5. end conditions (a dead boss wins over a dead player)
//! 6. idle animation
//!
//! Inputs are applied immediately through [`BattleSession::handle_input`].
//! While paused, every input except the pause toggle is dropped.

use bevy::prelude::*;
use serde::Serialize;

use super::components::{Boss, BossPhase, GameRng, Player, Side};
use super::config::BattleConfig;
use super::constants::*;
use super::effects::{Effects, Projectile};
use super::log::{BattleLog, BattleLogEventType, BattleMetadata};
use super::schedule::{DeferredAction, DeferredTask, Scheduler, TaskGuard};
use super::services::{AudioService, ProgressionController, ReadoutSink, Readouts, SoundEffect};
use crate::ui::colors;
use crate::words::{PronunciationClass, Question, WordBank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

impl BattleOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            BattleOutcome::Victory => "Victory",
            BattleOutcome::Defeat => "Defeat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    /// No battle running; waiting for a start signal
    Idle,
    /// Boss intro cutscene
    Intro,
    /// Questions are being asked and the simulation advances
    Active,
    /// Simulation frozen by the player
    Paused,
    /// Terminal for this session; reset to return to Idle
    Ended(BattleOutcome),
}

/// Discrete input delivered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    SubmitAnswer(Option<PronunciationClass>),
    PlayerAttack,
    SetDefending(bool),
    TogglePause,
}

/// The question currently on screen and its countdown
#[derive(Debug, Clone)]
pub struct ActiveQuestion {
    pub question: Question,
    pub ticks_remaining: u32,
    pub total_ticks: u32,
    /// Tick the question was asked on
    pub asked_at: u64,
}

impl ActiveQuestion {
    /// Remaining answer time as a fraction of the full timer
    pub fn time_fraction(&self) -> f32 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.ticks_remaining as f32 / self.total_ticks as f32
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub score: u32,
    pub questions_answered: u32,
    pub questions_correct: u32,
    /// Progress goal shown in the HUD; the battle is won by emptying the boss's health
    pub required_correct: u32,
}

#[derive(Resource)]
pub struct BattleSession {
    config: BattleConfig,
    state: BattleState,
    /// Bumped on every start/reset so deferred tasks from an older battle are ignored
    epoch: u64,
    tick: u64,
    pub player: Player,
    pub boss: Boss,
    pub effects: Effects,
    question: Option<ActiveQuestion>,
    stats: SessionStats,
    scheduler: Scheduler,
    rng: GameRng,
    words: WordBank,
    log: BattleLog,
    readouts_dirty: bool,
    audio: Option<Box<dyn AudioService>>,
    progression: Option<Box<dyn ProgressionController>>,
}

impl BattleSession {
    pub fn new(config: BattleConfig, rng: GameRng) -> Self {
        let stats = SessionStats {
            required_correct: config.required_correct,
            ..Default::default()
        };
        Self {
            config,
            state: BattleState::Idle,
            epoch: 0,
            tick: 0,
            player: Player::new(),
            boss: Boss::new(),
            effects: Effects::default(),
            question: None,
            stats,
            scheduler: Scheduler::default(),
            rng,
            words: WordBank,
            log: BattleLog::default(),
            readouts_dirty: true,
            audio: None,
            progression: None,
        }
    }

    pub fn with_audio(mut self, audio: impl AudioService + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_progression(mut self, progression: impl ProgressionController + 'static) -> Self {
        self.progression = Some(Box::new(progression));
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.state {
            BattleState::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// True from the start signal until the battle ends or is reset
    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            BattleState::Intro | BattleState::Active | BattleState::Paused
        )
    }

    pub fn is_paused(&self) -> bool {
        self.state == BattleState::Paused
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn question(&self) -> Option<&ActiveQuestion> {
        self.question.as_ref()
    }

    /// Ticks since the current question was asked
    pub fn question_age(&self) -> Option<u64> {
        self.question.as_ref().map(|q| self.tick - q.asked_at)
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn arena(&self) -> Rect {
        Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT)
    }

    pub fn readouts(&self) -> Readouts {
        Readouts {
            player_health: self.player.base.health(),
            boss_health: self.boss.base.health(),
            boss_phase: self.boss.phase().value(),
            score: self.stats.score,
            questions_answered: self.stats.questions_answered,
            questions_correct: self.stats.questions_correct,
            required_correct: self.stats.required_correct,
        }
    }

    pub fn metadata(&self) -> BattleMetadata {
        BattleMetadata {
            outcome: self.outcome().map(|o| o.name().to_string()),
            ticks: self.tick,
            score: self.stats.score,
            questions_answered: self.stats.questions_answered,
            questions_correct: self.stats.questions_correct,
            player_health: self.player.base.health(),
            boss_health: self.boss.base.health(),
            random_seed: self.rng.seed,
        }
    }

    // ========================================================================
    // Presentation sync
    // ========================================================================

    /// Push readouts to the sink if anything changed since the last sync.
    /// Returns whether the sink was updated.
    pub fn sync_readouts(&mut self, sink: &mut dyn ReadoutSink) -> bool {
        if !self.readouts_dirty {
            return false;
        }
        sink.update(&self.readouts());
        self.readouts_dirty = false;
        true
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a new battle. Only valid from `Idle`.
    pub fn start_battle(&mut self) -> bool {
        if self.state != BattleState::Idle {
            debug!("Ignoring start signal while {:?}", self.state);
            return false;
        }

        self.reset_battle_state();
        self.log.clear();
        self.state = BattleState::Intro;
        self.scheduler.schedule(
            self.tick,
            self.config.intro_ticks,
            self.epoch,
            TaskGuard::Intro,
            DeferredAction::BeginCombat,
        );

        self.play(SoundEffect::BossIntro, None);
        self.log_event(BattleLogEventType::MatchEvent, "Boss fight started".to_string());
        info!("Boss fight started (epoch {})", self.epoch);
        true
    }

    /// Abandon whatever is running and return to `Idle`
    pub fn reset(&mut self) {
        self.reset_battle_state();
        self.state = BattleState::Idle;
    }

    /// Reset and hand control back to the menu
    pub fn exit_to_menu(&mut self) {
        self.reset();
        if let Some(progression) = self.progression.as_mut() {
            progression.return_to_menu();
        }
    }

    fn reset_battle_state(&mut self) {
        self.scheduler.cancel_all();
        self.epoch += 1;
        self.tick = 0;
        self.player = Player::new();
        self.boss = Boss::new();
        self.effects.clear();
        self.question = None;
        self.stats = SessionStats {
            required_correct: self.config.required_correct,
            ..Default::default()
        };
        self.readouts_dirty = true;
    }

    /// Toggle between `Active` and `Paused`. Returns whether anything changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            BattleState::Active => {
                self.state = BattleState::Paused;
                self.log_event(BattleLogEventType::MatchEvent, "Paused".to_string());
                info!("Battle PAUSED");
                true
            }
            BattleState::Paused => {
                self.state = BattleState::Active;
                self.log_event(BattleLogEventType::MatchEvent, "Resumed".to_string());
                info!("Battle RESUMED");
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn handle_input(&mut self, event: InputEvent) {
        if event == InputEvent::TogglePause {
            self.toggle_pause();
            return;
        }
        if self.state != BattleState::Active {
            debug!("Dropping {:?} while {:?}", event, self.state);
            return;
        }
        match event {
            InputEvent::SubmitAnswer(answer) => {
                self.submit_answer(answer);
            }
            InputEvent::PlayerAttack => {
                self.player_attack();
            }
            InputEvent::SetDefending(defending) => self.set_defending(defending),
            InputEvent::TogglePause => {}
        }
    }

    pub fn set_defending(&mut self, defending: bool) {
        if self.state == BattleState::Active {
            self.player.is_defending = defending;
        }
    }

    /// Resolve the active question. `None` counts as a wrong answer.
    /// Returns false when there was nothing to answer.
    pub fn submit_answer(&mut self, answer: Option<PronunciationClass>) -> bool {
        if self.state != BattleState::Active || self.question.is_none() {
            return false;
        }
        self.resolve_answer(answer, false);
        true
    }

    /// Parse and submit an answer string. Unrecognized answers are ignored.
    pub fn submit_raw_answer(&mut self, raw: &str) -> bool {
        match PronunciationClass::parse(raw) {
            Some(class) => self.submit_answer(Some(class)),
            None => {
                warn!("Ignoring unrecognized answer '{}'", raw);
                false
            }
        }
    }

    /// Read the current word out loud again
    pub fn repeat_word(&self) {
        if self.state != BattleState::Active {
            return;
        }
        if let (Some(active), Some(audio)) = (self.question.as_ref(), self.audio.as_ref()) {
            audio.speak(&active.question.word, &self.config.speech_locale);
        }
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    /// Fire one projectile at the boss. No-op while cooling down.
    pub fn player_attack(&mut self) -> bool {
        if self.state != BattleState::Active || !self.player.base.can_attack() {
            return false;
        }

        self.player.base.attack_cooldown = PLAYER_ATTACK_COOLDOWN;
        self.player.base.is_attacking = true;
        self.schedule(PLAYER_ATTACK_FLASH_TICKS, DeferredAction::ClearPlayerAttack);

        self.effects.spawn_projectile(Projectile {
            position: self.player.muzzle(),
            velocity: Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0),
            owner: Side::Player,
            damage: PLAYER_PROJECTILE_DAMAGE,
            remaining_life: PLAYER_PROJECTILE_LIFE,
        });
        self.play(SoundEffect::PlayerAttack, None);
        self.log_event(BattleLogEventType::Attack, "Player attacks".to_string());
        true
    }

    /// Launch a volley of `phase` projectiles at the player, staggered in
    /// time. No-op while cooling down.
    pub fn boss_attack(&mut self) -> bool {
        if self.state != BattleState::Active || !self.boss.base.can_attack() {
            return false;
        }

        let phase = self.boss.phase();
        self.boss.base.attack_cooldown = phase.boss_cooldown();
        self.boss.base.is_attacking = true;
        self.schedule(BOSS_ATTACK_FLASH_TICKS, DeferredAction::ClearBossAttack);

        // The whole volley hits as hard as the phase it was fired in
        let damage = phase.projectile_damage();
        self.spawn_boss_projectile(damage);
        for volley_index in 1..phase.volley_size() {
            self.schedule(
                volley_index * BOSS_VOLLEY_STAGGER_TICKS,
                DeferredAction::SpawnBossProjectile { damage },
            );
        }

        self.play(SoundEffect::BossAttack, Some(phase.value() as f32 / 3.0));
        self.log_event(
            BattleLogEventType::Attack,
            format!("Boss attacks ({} projectiles)", phase.volley_size()),
        );
        true
    }

    fn spawn_boss_projectile(&mut self, damage: i32) {
        let vertical = self
            .rng
            .random_range(-BOSS_PROJECTILE_JITTER, BOSS_PROJECTILE_JITTER);
        self.effects.spawn_projectile(Projectile {
            position: self.boss.muzzle(),
            velocity: Vec2::new(-BOSS_PROJECTILE_SPEED, vertical),
            owner: Side::Boss,
            damage,
            remaining_life: BOSS_PROJECTILE_LIFE,
        });
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the battle by one tick. Once the battle has ended only
    /// particles and floating texts keep fading out.
    pub fn tick(&mut self) {
        if let BattleState::Ended(_) = self.state {
            self.effects.advance_cosmetics();
            return;
        }
        if !matches!(self.state, BattleState::Intro | BattleState::Active) {
            return;
        }

        self.tick += 1;
        self.run_due_tasks();

        if self.state != BattleState::Active {
            return;
        }

        self.advance_boss();
        self.advance_question_timer();

        self.effects.advance_cosmetics();
        self.player.base.decay_cooldown();

        self.advance_projectiles();

        self.check_end_conditions();
        if self.state != BattleState::Active {
            return;
        }

        self.player.base.advance_animation(PLAYER_ANIMATION_STEP);
        self.boss.base.advance_animation(BOSS_ANIMATION_STEP);
    }

    fn task_guard(&self) -> Option<TaskGuard> {
        match self.state {
            BattleState::Intro => Some(TaskGuard::Intro),
            BattleState::Active => Some(TaskGuard::Active),
            _ => None,
        }
    }

    fn schedule(&mut self, delay: u32, action: DeferredAction) {
        self.scheduler
            .schedule(self.tick, delay, self.epoch, TaskGuard::Active, action);
    }

    fn run_due_tasks(&mut self) {
        for task in self.scheduler.take_due(self.tick) {
            if !task.is_live(self.epoch, self.task_guard()) {
                debug!("Dropping stale {:?} (epoch {})", task.action, task.epoch);
                continue;
            }
            self.run_task(&task);
        }
    }

    fn run_task(&mut self, task: &DeferredTask) {
        match task.action {
            DeferredAction::BeginCombat => {
                self.state = BattleState::Active;
                self.log_event(BattleLogEventType::MatchEvent, "Combat begins".to_string());
                info!("Intro finished - combat begins");
                self.generate_question();
            }
            DeferredAction::NextQuestion => {
                if self.player.base.is_alive() && self.boss.base.is_alive() {
                    self.generate_question();
                }
            }
            DeferredAction::ClearPlayerAttack => self.player.base.is_attacking = false,
            DeferredAction::ClearBossAttack => self.boss.base.is_attacking = false,
            DeferredAction::SpawnBossProjectile { damage } => self.spawn_boss_projectile(damage),
        }
    }

    fn advance_boss(&mut self) {
        self.boss.base.decay_cooldown();
        if let Some(phase) = self.boss.sync_phase() {
            self.announce_phase(phase);
        }
    }

    fn advance_question_timer(&mut self) {
        let timed_out = match self.question.as_mut() {
            Some(active) => {
                active.ticks_remaining = active.ticks_remaining.saturating_sub(1);
                active.ticks_remaining == 0
            }
            None => false,
        };
        if timed_out {
            self.resolve_answer(None, true);
        }
    }

    fn advance_projectiles(&mut self) {
        let hits = self.effects.advance_projectiles(
            self.player.base.bounds(),
            self.boss.base.bounds(),
            self.arena(),
        );

        for hit in hits {
            match hit.owner {
                Side::Player => {
                    self.effects
                        .spawn_burst(hit.position, HIT_PARTICLES, colors::HIT_SPARK, &mut self.rng);
                    self.play(SoundEffect::Hit, Some(0.5));
                }
                Side::Boss if self.player.is_defending => {
                    self.effects
                        .spawn_burst(hit.position, HIT_PARTICLES, colors::BLOCK, &mut self.rng);
                    self.effects.spawn_text(hit.position, "Blocked!", colors::BLOCK);
                    self.play(SoundEffect::Block, None);
                }
                Side::Boss => {
                    let lost = self.player.base.apply_damage(hit.damage);
                    self.effects
                        .spawn_burst(hit.position, HIT_PARTICLES, colors::DAMAGE, &mut self.rng);
                    self.effects
                        .spawn_text(hit.position, format!("-{}", lost), colors::DAMAGE);
                    self.play(SoundEffect::Hit, Some(lost as f32 / 25.0));
                    self.log_event(
                        BattleLogEventType::Damage,
                        format!("Boss projectile hits player for {}", lost),
                    );
                    self.readouts_dirty = true;
                }
            }
        }
    }

    fn check_end_conditions(&mut self) {
        // Boss damage lands before any counter-attack, so a double knockout is a win
        if !self.boss.base.is_alive() {
            self.end_battle(BattleOutcome::Victory);
        } else if !self.player.base.is_alive() {
            self.end_battle(BattleOutcome::Defeat);
        }
    }

    fn end_battle(&mut self, outcome: BattleOutcome) {
        if !self.is_running() {
            return;
        }

        self.state = BattleState::Ended(outcome);
        self.question = None;
        self.scheduler.cancel_all();
        self.effects.projectiles.clear();
        self.readouts_dirty = true;

        self.log_event(
            BattleLogEventType::MatchEvent,
            format!("Battle ended: {}", outcome.name()),
        );
        info!(
            "Battle ended: {} after {} ticks ({} / {} correct)",
            outcome.name(),
            self.tick,
            self.stats.questions_correct,
            self.stats.questions_answered
        );

        let game_id = self.config.game_id.clone();
        match outcome {
            BattleOutcome::Victory => {
                let center = self.boss.base.center();
                self.effects
                    .spawn_burst(center, FEEDBACK_PARTICLES * 3, colors::VICTORY, &mut self.rng);
                self.play(SoundEffect::Victory, None);
                if let Some(progression) = self.progression.as_mut() {
                    progression.notify_level_complete(&game_id);
                    progression.display_message("Victory! The boss has been defeated.", 3000);
                }
            }
            BattleOutcome::Defeat => {
                self.play(SoundEffect::Defeat, None);
                if let Some(progression) = self.progression.as_mut() {
                    progression.display_message("Defeated... review the endings and try again!", 3000);
                }
            }
        }
    }

    // ========================================================================
    // Questions
    // ========================================================================

    fn generate_question(&mut self) {
        if self.question.is_some() {
            return;
        }

        let question = self.words.next_question(&mut self.rng);
        self.log_event(
            BattleLogEventType::Question,
            format!("Question: '{}'", question.word),
        );
        self.play(SoundEffect::Question, None);
        if let Some(audio) = self.audio.as_ref() {
            audio.speak(&question.word, &self.config.speech_locale);
        }

        self.question = Some(ActiveQuestion {
            question,
            ticks_remaining: self.config.question_ticks,
            total_ticks: self.config.question_ticks,
            asked_at: self.tick,
        });
    }

    fn resolve_answer(&mut self, answer: Option<PronunciationClass>, timed_out: bool) {
        let Some(active) = self.question.take() else {
            return;
        };
        let expected = active.question.pronunciation_class;
        let phase = self.boss.phase();
        self.stats.questions_answered += 1;

        let given = match answer {
            Some(class) => class.symbol(),
            None if timed_out => "nothing (time out)",
            None => "nothing",
        };

        if active.question.is_correct(answer) {
            self.stats.score += CORRECT_ANSWER_POINTS as u32;
            self.stats.questions_correct += 1;
            self.log_event(
                BattleLogEventType::Answer,
                format!("'{}' answered {}: correct", active.question.word, given),
            );
            self.play(SoundEffect::Correct, None);

            let feedback_at = self.feedback_anchor(Side::Player);
            self.effects
                .spawn_text(feedback_at, format!("Correct! {}", expected), colors::CORRECT);
            let center = self.player.base.center();
            self.effects
                .spawn_burst(center, FEEDBACK_PARTICLES, colors::CORRECT, &mut self.rng);

            self.player_attack();
            self.damage_boss(phase.boss_damage());
            self.report_score(CORRECT_ANSWER_POINTS, false);
        } else {
            self.log_event(
                BattleLogEventType::Answer,
                format!(
                    "'{}' answered {}: wrong (expected {})",
                    active.question.word, given, expected
                ),
            );
            self.play(SoundEffect::Wrong, None);

            let feedback_at = self.feedback_anchor(Side::Player);
            if self.player.is_defending {
                self.effects.spawn_text(feedback_at, "Blocked!", colors::BLOCK);
                self.play(SoundEffect::Block, None);
            } else {
                let lost = self.player.base.apply_damage(phase.player_damage());
                self.effects
                    .spawn_text(feedback_at, format!("-{}", lost), colors::DAMAGE);
                self.log_event(
                    BattleLogEventType::Damage,
                    format!("Player takes {} damage", lost),
                );
            }
            let hint_at = feedback_at - Vec2::new(0.0, 24.0);
            self.effects
                .spawn_text(hint_at, format!("It's {}", expected), colors::WRONG);
            let center = self.player.base.center();
            self.effects
                .spawn_burst(center, FEEDBACK_PARTICLES, colors::WRONG, &mut self.rng);

            self.boss_attack();
            self.report_score(WRONG_ANSWER_PENALTY, true);
        }

        self.readouts_dirty = true;
        self.schedule(self.config.post_answer_ticks, DeferredAction::NextQuestion);
    }

    fn damage_boss(&mut self, amount: i32) {
        let before = self.boss.phase();
        let lost = self.boss.apply_damage(amount);

        let at = self.feedback_anchor(Side::Boss);
        self.effects.spawn_text(at, format!("-{}", lost), colors::BOSS_DAMAGE);
        self.log_event(
            BattleLogEventType::Damage,
            format!("Boss takes {} damage", lost),
        );

        let after = self.boss.phase();
        if after != before {
            self.announce_phase(after);
        }
    }

    fn announce_phase(&mut self, phase: BossPhase) {
        self.log_event(
            BattleLogEventType::Phase,
            format!("Boss enters phase {}", phase.value()),
        );
        info!("Boss enters phase {}", phase.value());
        self.play(SoundEffect::PhaseChange, Some(phase.value() as f32 / 3.0));
        let at = self.feedback_anchor(Side::Boss) - Vec2::new(0.0, 24.0);
        self.effects
            .spawn_text(at, format!("PHASE {}!", phase.value()), colors::phase(phase));
        self.readouts_dirty = true;
    }

    /// Point just above a combatant's head where feedback text appears
    fn feedback_anchor(&self, side: Side) -> Vec2 {
        let base = match side {
            Side::Player => &self.player.base,
            Side::Boss => &self.boss.base,
        };
        Vec2::new(base.center().x, base.position.y - 10.0)
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    fn play(&self, effect: SoundEffect, intensity: Option<f32>) {
        if let Some(audio) = self.audio.as_ref() {
            audio.play(effect, intensity);
        }
    }

    fn report_score(&mut self, points: i32, is_penalty: bool) {
        let game_id = self.config.game_id.clone();
        if let Some(progression) = self.progression.as_mut() {
            progression.report_score_delta(&game_id, points, is_penalty);
        }
    }

    fn log_event(&mut self, event_type: BattleLogEventType, message: String) {
        self.log.log(self.tick, event_type, message);
    }
}

impl Default for BattleSession {
    fn default() -> Self {
        Self::new(BattleConfig::default(), GameRng::default())
    }
}
