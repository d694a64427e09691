//! Combo streak timing, power-up countdown, and the quiz unlock quota

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;
use crate::consts::*;

/// Consecutive-pickup streak
///
/// Expiry is measured in wall-clock milliseconds supplied by the caller,
/// unlike motion which advances per frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboTracker {
    count: u32,
    last_pickup_ms: f64,
}

impl ComboTracker {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Time of the latest pickup in the running streak
    pub fn last_pickup_ms(&self) -> Option<f64> {
        (self.count > 0).then_some(self.last_pickup_ms)
    }

    /// Count a pickup; returns the new combo value (saturates at `MAX_COMBO`)
    pub fn register_pickup(&mut self, now_ms: f64) -> u32 {
        self.count = (self.count + 1).min(MAX_COMBO);
        self.last_pickup_ms = now_ms;
        self.count
    }

    /// Whether the running streak is over at `now_ms`
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.count > 0
            && (now_ms - self.last_pickup_ms > COMBO_THRESHOLD_MS || self.count >= MAX_COMBO)
    }

    /// End the streak if it is over, returning its length
    pub fn check_expiry(&mut self, now_ms: f64) -> Option<u32> {
        if !self.is_expired(now_ms) {
            return None;
        }
        let length = self.count;
        self.count = 0;
        Some(length)
    }
}

/// A running power-up and its remaining frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub frames_left: u32,
}

/// Active power-up effect, at most one at a time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpState {
    active: Option<ActivePowerUp>,
}

impl PowerUpState {
    /// Start (or restart) a power-up with the full duration
    pub fn activate(&mut self, kind: PowerUpKind) {
        self.active = Some(ActivePowerUp {
            kind,
            frames_left: POWERUP_DURATION,
        });
    }

    pub fn kind(&self) -> Option<PowerUpKind> {
        self.active.map(|a| a.kind)
    }

    pub fn is(&self, kind: PowerUpKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn frames_left(&self) -> u32 {
        self.active.map_or(0, |a| a.frames_left)
    }

    /// Remaining duration as a 0-1 fraction (HUD bar)
    pub fn remaining_fraction(&self) -> f32 {
        self.frames_left() as f32 / POWERUP_DURATION as f32
    }

    /// Advance one frame; returns the kind that just expired, if any
    pub fn countdown(&mut self) -> Option<PowerUpKind> {
        let active = self.active.as_mut()?;
        active.frames_left = active.frames_left.saturating_sub(1);
        if active.frames_left == 0 {
            return self.active.take().map(|a| a.kind);
        }
        None
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Horizontal scroll multiplier for gems
    pub fn scroll_multiplier(&self) -> f32 {
        if self.is(PowerUpKind::Burst) {
            BURST_SCROLL_MULTIPLIER
        } else {
            1.0
        }
    }

    /// How many gem slots the pool should hold
    pub fn population_target(&self) -> usize {
        if self.is(PowerUpKind::Burst) {
            BURST_GEM_COUNT
        } else {
            BASE_GEM_COUNT
        }
    }

    /// Player pickup radius given its base radius
    pub fn pickup_radius(&self, base: f32) -> f32 {
        if self.is(PowerUpKind::Giant) {
            GIANT_RADIUS
        } else {
            base
        }
    }
}

/// Quizzes owed when a combo ends: one per `POINTS_PER_QUIZ` points not yet
/// served, capped at `MAX_QUIZ_STOCK`.
pub fn quiz_quota(score: u64, quizzes_served: u32) -> u32 {
    let earned = score / POINTS_PER_QUIZ;
    let owed = earned.saturating_sub(u64::from(quizzes_served));
    owed.min(u64::from(MAX_QUIZ_STOCK)) as u32
}
