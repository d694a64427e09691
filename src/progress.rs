//! Meta-progression: game mode, sub-mode, score, quizzes, rewards and stages
//!
//! The state machine never runs physics itself; it only decides whether the
//! simulation step is allowed to run ([`Progression::is_simulating`]).
//! Actions that do not apply to the current mode are ignored and report so.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::content::{Quiz, RewardItem};
use crate::sim::quiz_quota;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Title,
    Playing,
    Quiz,
    /// Reward draw: drawing until the reveal fires, then showing the result
    Gacha,
    /// Collection viewer opened from play; suspends the simulation
    Collection,
    StageClear,
    /// Terminal until a full reset
    Ending,
}

/// Secondary mode layered over `Playing` / `StageClear`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubMode {
    #[default]
    None,
    QuizIntro,
    StageIntro,
}

/// Result of answering the current quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Moved to `Gacha`; the caller schedules the reveal
    Correct,
    /// Back to `Playing`
    Wrong,
}

/// Progression state for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progression {
    pub(crate) mode: GameMode,
    pub(crate) sub: SubMode,
    pub(crate) score: u64,
    pub(crate) stage: u32,
    /// Rewards drawn in the current stage
    pub(crate) stage_draws: u32,
    /// Quizzes waiting to be served (0..=MAX_QUIZ_STOCK)
    pub(crate) pending_quizzes: u32,
    pub(crate) quiz_index: usize,
    /// Quizzes consumed so far, right or wrong
    pub(crate) quizzes_served: u32,
    /// Reward shown by the open reveal, if it has fired
    pub(crate) last_reward: Option<u32>,
    pub(crate) collected: BTreeSet<u32>,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn sub(&self) -> SubMode {
        self.sub
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn stage_draws(&self) -> u32 {
        self.stage_draws
    }

    pub fn pending_quizzes(&self) -> u32 {
        self.pending_quizzes
    }

    pub fn quiz_index(&self) -> usize {
        self.quiz_index
    }

    pub fn quizzes_served(&self) -> u32 {
        self.quizzes_served
    }

    pub fn last_reward(&self) -> Option<u32> {
        self.last_reward
    }

    pub fn collected(&self) -> &BTreeSet<u32> {
        &self.collected
    }

    pub fn has_collected(&self, id: u32) -> bool {
        self.collected.contains(&id)
    }

    /// Physics only runs while playing with no overlay
    pub fn is_simulating(&self) -> bool {
        self.mode == GameMode::Playing && self.sub == SubMode::None
    }

    /// Reward draw finished and waiting to be closed
    pub fn is_reward_revealed(&self) -> bool {
        self.mode == GameMode::Gacha && self.last_reward.is_some()
    }

    fn set_mode(&mut self, mode: GameMode, sub: SubMode) {
        if (mode, sub) != (self.mode, self.sub) {
            log::info!("Mode {:?}/{:?} -> {:?}/{:?}", self.mode, self.sub, mode, sub);
        }
        self.mode = mode;
        self.sub = sub;
    }

    fn pick_quiz<R: Rng + ?Sized>(&mut self, quiz_count: usize, rng: &mut R) {
        self.quiz_index = if quiz_count > 0 {
            rng.random_range(0..quiz_count)
        } else {
            0
        };
    }

    /// Title -> Playing. Score and served-quiz counters restart.
    pub fn start(&mut self) -> bool {
        if self.mode != GameMode::Title {
            return false;
        }
        self.score = 0;
        self.quizzes_served = 0;
        self.set_mode(GameMode::Playing, SubMode::None);
        true
    }

    /// A gem was collected
    pub fn record_pickup(&mut self) {
        self.score += 1;
    }

    /// A combo streak ended. Opens the quiz intro when quizzes are owed and
    /// returns the new pending count.
    pub fn on_combo_end(&mut self) -> Option<u32> {
        if !self.is_simulating() {
            return None;
        }
        let quota = quiz_quota(self.score, self.quizzes_served);
        if quota == 0 {
            return None;
        }
        self.pending_quizzes = quota.min(MAX_QUIZ_STOCK);
        log::debug!(
            "Quiz unlocked at score {} ({} pending)",
            self.score,
            self.pending_quizzes
        );
        self.set_mode(GameMode::Playing, SubMode::QuizIntro);
        Some(self.pending_quizzes)
    }

    /// The "continue" button: quiz intro -> quiz, stage intro -> next stage
    pub fn continue_intro(&mut self) -> bool {
        match (self.mode, self.sub) {
            (GameMode::Playing, SubMode::QuizIntro) => {
                self.set_mode(GameMode::Quiz, SubMode::None);
                true
            }
            (GameMode::StageClear, SubMode::StageIntro) => {
                self.stage += 1;
                self.stage_draws = 0;
                log::info!("Entering stage {}", self.stage);
                self.set_mode(GameMode::Playing, SubMode::None);
                true
            }
            _ => false,
        }
    }

    /// Answer the current quiz with choice `choice`
    pub fn answer<R: Rng + ?Sized>(
        &mut self,
        choice: usize,
        quizzes: &[Quiz],
        rng: &mut R,
    ) -> Option<AnswerOutcome> {
        if self.mode != GameMode::Quiz || self.sub != SubMode::None {
            return None;
        }
        let correct = quizzes
            .get(self.quiz_index)
            .is_some_and(|q| q.answer == choice);

        if correct {
            self.last_reward = None;
            self.set_mode(GameMode::Gacha, SubMode::None);
            Some(AnswerOutcome::Correct)
        } else {
            self.quizzes_served += 1;
            self.pending_quizzes = self.pending_quizzes.saturating_sub(1);
            self.pick_quiz(quizzes.len(), rng);
            self.set_mode(GameMode::Playing, SubMode::None);
            Some(AnswerOutcome::Wrong)
        }
    }

    /// Draw a reward: uniformly among uncollected items while any remain,
    /// otherwise uniformly from the whole catalog.
    pub fn reveal_reward<'c, R: Rng + ?Sized>(
        &mut self,
        catalog: &'c [RewardItem],
        rng: &mut R,
    ) -> Option<&'c RewardItem> {
        if self.mode != GameMode::Gacha || self.last_reward.is_some() {
            return None;
        }

        let uncollected: Vec<&RewardItem> = catalog
            .iter()
            .filter(|item| !self.collected.contains(&item.id))
            .collect();
        let chosen = if uncollected.is_empty() {
            if catalog.is_empty() {
                return None;
            }
            &catalog[rng.random_range(0..catalog.len())]
        } else {
            uncollected[rng.random_range(0..uncollected.len())]
        };

        self.collected.insert(chosen.id);
        self.last_reward = Some(chosen.id);
        self.stage_draws += 1;
        self.pending_quizzes = self.pending_quizzes.saturating_sub(1);
        self.quizzes_served += 1;
        log::debug!(
            "Drew reward {} ({} collected, {} this stage)",
            chosen.id,
            self.collected.len(),
            self.stage_draws
        );
        Some(chosen)
    }

    /// Close the reveal and route to the next mode. Priority: ending, queued
    /// quiz, stage clear, back to play.
    pub fn close_reward<R: Rng + ?Sized>(
        &mut self,
        collection_goal: usize,
        quiz_count: usize,
        rng: &mut R,
    ) -> Option<GameMode> {
        if !self.is_reward_revealed() {
            return None;
        }
        self.last_reward = None;

        if self.collected.len() >= collection_goal {
            self.set_mode(GameMode::Ending, SubMode::None);
        } else if self.pending_quizzes > 0 {
            self.pick_quiz(quiz_count, rng);
            self.set_mode(GameMode::Quiz, SubMode::None);
        } else if self.stage_draws >= DRAWS_PER_STAGE {
            self.set_mode(GameMode::StageClear, SubMode::StageIntro);
        } else {
            self.pick_quiz(quiz_count, rng);
            self.set_mode(GameMode::Playing, SubMode::None);
        }
        Some(self.mode)
    }

    /// Open the collection viewer from active play
    pub fn open_collection(&mut self) -> bool {
        if !self.is_simulating() {
            return false;
        }
        self.set_mode(GameMode::Collection, SubMode::None);
        true
    }

    pub fn close_collection(&mut self) -> bool {
        if self.mode != GameMode::Collection {
            return false;
        }
        self.set_mode(GameMode::Playing, SubMode::None);
        true
    }
}
