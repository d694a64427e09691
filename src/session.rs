//! Game session: owns the world, the progression state and the collaborators
//!
//! The host calls [`Session::advance`] once per display frame with the
//! elapsed wall-clock time. Physics runs on a fixed 60 Hz timestep and only
//! while [`Progression::is_simulating`] allows it. Deferred events (the reward
//! reveal) fire from the same clock, so tests drive everything by passing
//! simulated time.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::content::{Content, Quiz, RewardItem};
use crate::input::UiAction;
use crate::progress::{AnswerOutcome, GameMode, Progression, SubMode};
use crate::renderer::{RenderFrame, ScreenShake};
use crate::settings::Settings;
use crate::sim::{PowerUpKind, ScheduledEvent, Scheduler, SimEvent, TickInput, World, tick};

/// Salt separating the session RNG stream from the world's
const SESSION_RNG_SALT: u64 = 0x9E37_79B9_7F4A_7C15;
/// Salt for the render-effects stream, which is drawn per rendered frame
const FX_RNG_SALT: u64 = 0xD1B5_4A32_D192_ED03;

/// The quiz as shown to the player, without its answer
#[derive(Debug, Clone, Serialize)]
pub struct QuizPrompt {
    pub question: String,
    pub choices: Vec<String>,
}

impl From<&Quiz> for QuizPrompt {
    fn from(quiz: &Quiz) -> Self {
        Self {
            question: quiz.question.clone(),
            choices: quiz.choices.clone(),
        }
    }
}

/// Snapshot of everything the HUD and overlays display
#[derive(Debug, Clone, Serialize)]
pub struct HudState {
    pub mode: GameMode,
    pub sub: SubMode,
    pub score: u64,
    /// Progress toward the next quiz, 0..100
    pub energy: u64,
    pub pending_quizzes: u32,
    pub power: Option<PowerUpKind>,
    /// Remaining share of the power-up duration, 0..=1
    pub power_fraction: f32,
    pub stage: u32,
    pub stage_name: String,
    pub collected: usize,
    pub goal: usize,
    pub combo: u32,
    pub combo_label: Option<String>,
    pub quiz: Option<QuizPrompt>,
    /// Reward draw in progress but not yet revealed
    pub drawing: bool,
    pub reward: Option<RewardItem>,
}

/// One row of the collection viewer
#[derive(Debug, Clone, Serialize)]
pub struct CollectionEntry<'a> {
    pub item: &'a RewardItem,
    pub owned: bool,
}

pub struct Session {
    world: World,
    progress: Progression,
    content: Content,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    scheduler: Scheduler<ScheduledEvent>,
    shake: ScreenShake,
    /// Quiz and reward choice, separate from the world's stream
    rng: Pcg32,
    /// Screen shake jitter; never feeds game decisions
    fx_rng: Pcg32,
    clock_ms: f64,
    accumulator_ms: f64,
    seed: u64,
}

impl Session {
    pub fn new(
        content: Content,
        settings: Settings,
        mut audio: Box<dyn AudioSink>,
        viewport: Vec2,
    ) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        audio.apply_settings(&settings);
        log::info!("New session (seed {seed})");
        Self {
            world: World::new(seed, viewport),
            progress: Progression::new(),
            content,
            settings,
            audio,
            scheduler: Scheduler::default(),
            shake: ScreenShake::default(),
            rng: Pcg32::seed_from_u64(seed ^ SESSION_RNG_SALT),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_RNG_SALT),
            clock_ms: 0.0,
            accumulator_ms: 0.0,
            seed,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn progression(&self) -> &Progression {
        &self.progress
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Session clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn mode(&self) -> GameMode {
        self.progress.mode()
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.world.resize(viewport);
    }

    // === Frame driving ===

    /// Advance the session clock by `delta_ms` and run as many fixed physics
    /// steps as fit (at most `MAX_SUBSTEPS`). Returns the number of steps run.
    pub fn advance(&mut self, delta_ms: f64, input: &TickInput) -> u32 {
        let delta = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        };
        self.clock_ms += delta;
        self.run_due_events();

        if !self.progress.is_simulating() {
            self.accumulator_ms = 0.0;
            return 0;
        }

        self.accumulator_ms += delta;
        let mut steps = 0;
        while self.accumulator_ms >= FRAME_MS && steps < MAX_SUBSTEPS {
            self.accumulator_ms -= FRAME_MS;
            let now = self.clock_ms - self.accumulator_ms;
            self.physics_step(input, now);
            steps += 1;
            if !self.progress.is_simulating() {
                self.accumulator_ms = 0.0;
                break;
            }
        }
        if steps == MAX_SUBSTEPS && self.accumulator_ms >= FRAME_MS {
            // Too far behind; drop the backlog rather than spiral
            self.accumulator_ms = 0.0;
        }
        steps
    }

    /// Advance exactly one frame of time and run one physics step if play is
    /// active. Returns whether the step ran.
    pub fn step_frame(&mut self, input: &TickInput) -> bool {
        self.clock_ms += FRAME_MS;
        self.run_due_events();
        if !self.progress.is_simulating() {
            return false;
        }
        self.physics_step(input, self.clock_ms);
        true
    }

    fn physics_step(&mut self, input: &TickInput, now_ms: f64) {
        tick(&mut self.world, input, now_ms);

        for event in self.world.drain_events() {
            match event {
                SimEvent::GemCollected { combo, .. } => {
                    self.progress.record_pickup();
                    self.audio.play(SoundEffect::Pickup { combo });
                }
                SimEvent::PowerUpActivated(_) => {
                    self.audio.play(SoundEffect::PowerUp);
                    self.shake.trigger(POWERUP_SHAKE);
                }
                SimEvent::PowerUpExpired(_) => {}
                SimEvent::ComboEnded { .. } => {
                    self.progress.on_combo_end();
                }
            }
        }
    }

    fn run_due_events(&mut self) {
        for event in self.scheduler.drain_due(self.clock_ms) {
            match event {
                ScheduledEvent::RevealReward => self.reveal_reward(),
            }
        }
    }

    fn reveal_reward(&mut self) {
        let Some(item) = self
            .progress
            .reveal_reward(&self.content.rewards, &mut self.rng)
        else {
            log::warn!("Reward reveal fired with nothing to draw");
            return;
        };
        self.audio.play(SoundEffect::RewardReveal(item.rarity));
    }

    // === UI actions ===

    /// Title -> playing: wake the audio device and lay out a fresh level
    pub fn start(&mut self) -> bool {
        if !self.progress.start() {
            return false;
        }
        self.audio.init();
        let viewport = self.world.viewport;
        self.world = World::new(self.seed, viewport);
        self.world.init_level();
        self.accumulator_ms = 0.0;
        log::info!("Game started");
        true
    }

    pub fn continue_action(&mut self) -> bool {
        self.progress.continue_intro()
    }

    pub fn answer(&mut self, choice: usize) -> bool {
        match self
            .progress
            .answer(choice, &self.content.quizzes, &mut self.rng)
        {
            Some(AnswerOutcome::Correct) => {
                self.audio.play(SoundEffect::QuizCorrect);
                self.audio.play(SoundEffect::RewardDrawStart);
                self.shake.trigger(REWARD_SHAKE);
                self.scheduler.schedule(
                    self.clock_ms + REWARD_REVEAL_DELAY_MS,
                    ScheduledEvent::RevealReward,
                );
                true
            }
            Some(AnswerOutcome::Wrong) => {
                self.audio.play(SoundEffect::QuizWrong);
                true
            }
            None => false,
        }
    }

    /// Dismiss a revealed reward
    pub fn close_reward(&mut self) -> bool {
        let goal = self.content.collection_goal();
        let quiz_count = self.content.quizzes.len();
        match self.progress.close_reward(goal, quiz_count, &mut self.rng) {
            Some(GameMode::Ending) => {
                log::info!("Collection complete - ending reached");
                self.audio.play(SoundEffect::Ending);
                true
            }
            Some(GameMode::StageClear) => {
                log::info!("Stage {} cleared", self.progress.stage());
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn open_collection(&mut self) -> bool {
        self.progress.open_collection()
    }

    pub fn close_collection(&mut self) -> bool {
        self.progress.close_collection()
    }

    /// Full reset: back to the title screen with a fresh session. Cancels a
    /// pending reward reveal.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.progress = Progression::new();
        self.seed = self.settings.seed.unwrap_or_else(rand::random);
        self.rng = Pcg32::seed_from_u64(self.seed ^ SESSION_RNG_SALT);
        self.fx_rng = Pcg32::seed_from_u64(self.seed ^ FX_RNG_SALT);
        let viewport = self.world.viewport;
        self.world = World::new(self.seed, viewport);
        self.shake = ScreenShake::default();
        self.accumulator_ms = 0.0;
        log::info!("Session reset (seed {})", self.seed);
    }

    /// Route a discrete UI command to whichever action applies
    pub fn apply(&mut self, action: UiAction) -> bool {
        let handled = match action {
            UiAction::Confirm => match (self.progress.mode(), self.progress.sub()) {
                (GameMode::Title, _) => self.start(),
                (GameMode::Playing, SubMode::QuizIntro)
                | (GameMode::StageClear, SubMode::StageIntro) => self.continue_action(),
                (GameMode::Gacha, _) => self.close_reward(),
                _ => false,
            },
            UiAction::Answer(choice) => self.answer(choice),
            UiAction::ToggleCollection => {
                if self.progress.mode() == GameMode::Collection {
                    self.close_collection()
                } else {
                    self.open_collection()
                }
            }
            UiAction::Reset => {
                self.reset();
                true
            }
        };
        if !handled {
            log::trace!(
                "Ignored {:?} in {:?}/{:?}",
                action,
                self.progress.mode(),
                self.progress.sub()
            );
        }
        handled
    }

    // === Views ===

    /// Snapshot for the render step; `None` outside active play. Each call
    /// consumes one frame of screen shake.
    pub fn render_frame(&mut self) -> Option<RenderFrame> {
        if self.progress.mode() != GameMode::Playing {
            return None;
        }
        let offset = self.shake.next_offset(&mut self.fx_rng);
        Some(RenderFrame::capture(
            &self.world,
            self.progress.stage() as usize,
            offset,
            &self.settings,
        ))
    }

    pub fn current_quiz(&self) -> Option<&Quiz> {
        (self.progress.mode() == GameMode::Quiz)
            .then(|| self.content.quiz(self.progress.quiz_index()))
            .flatten()
    }

    pub fn last_reward(&self) -> Option<&RewardItem> {
        self.progress
            .last_reward()
            .and_then(|id| self.content.reward(id))
    }

    pub fn collection(&self) -> Vec<CollectionEntry<'_>> {
        self.content
            .rewards
            .iter()
            .map(|item| CollectionEntry {
                item,
                owned: self.progress.has_collected(item.id),
            })
            .collect()
    }

    pub fn hud(&self) -> HudState {
        let combo = self.world.combo.count();
        HudState {
            mode: self.progress.mode(),
            sub: self.progress.sub(),
            score: self.progress.score(),
            energy: self.progress.score() % POINTS_PER_QUIZ,
            pending_quizzes: self.progress.pending_quizzes(),
            power: self.world.power.kind(),
            power_fraction: self.world.power.remaining_fraction(),
            stage: self.progress.stage(),
            stage_name: self.content.stage_name(self.progress.stage()).to_string(),
            collected: self.progress.collected().len(),
            goal: self.content.collection_goal(),
            combo,
            combo_label: (combo > 1).then(|| format!("{combo} COMBO")),
            quiz: self.current_quiz().map(QuizPrompt::from),
            drawing: self.progress.mode() == GameMode::Gacha && self.progress.last_reward().is_none(),
            reward: self.last_reward().cloned(),
        }
    }
}
