//! Chrono Collector - a side-scrolling gem collection arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, gem pool, combo, particles)
//! - `progress`: Mode/sub-mode state machine (quiz, reward draw, stages, ending)
//! - `session`: Owns one game session and drives both of the above per frame
//! - `renderer`: Frame snapshot, tessellation and the WebGPU pipeline
//! - `content`: Quiz bank and reward catalog tables
//! - `audio`: Fire-and-forget sound effect sink
//! - `input`: Keyboard mapping to tick input and UI actions
//! - `settings`: Presentation and audio preferences

pub mod audio;
pub mod content;
pub mod input;
pub mod progress;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use content::{Content, ContentError, Quiz, Rarity, RewardItem};
pub use progress::{AnswerOutcome, GameMode, Progression, SubMode};
pub use session::{CollectionEntry, HudState, QuizPrompt, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length. Motion constants are expressed per frame at this rate.
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum simulation frames run for one host callback
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest host delta accepted before clamping (tab switches etc.)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Player movement
    pub const PLAYER_START_X: f32 = 150.0;
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_ACCEL: f32 = 1.2;
    pub const PLAYER_FRICTION: f32 = 0.92;
    pub const TRAIL_LENGTH: usize = 5;

    /// Gem spawning
    pub const BASE_GEM_COUNT: usize = 55;
    pub const BURST_GEM_COUNT: usize = 150;
    pub const GEM_EDGE_MARGIN: f32 = 50.0;
    pub const GEM_MIN_SPEED: f32 = 5.0;
    pub const GEM_MAX_SPEED: f32 = 7.0;
    pub const GEM_RECYCLE_X: f32 = -100.0;
    pub const GEM_PICKUP_RADIUS: f32 = 18.0;
    pub const GEM_COLOR_COUNT: u8 = 6;
    pub const SPECIAL_CHANCE: f64 = 0.012;

    /// Power-ups
    pub const POWERUP_DURATION: u32 = 400;
    pub const GIANT_RADIUS: f32 = 80.0;
    pub const MAGNET_RANGE: f32 = 320.0;
    pub const MAGNET_PULL: f32 = 0.15;
    pub const BURST_SCROLL_MULTIPLIER: f32 = 2.5;

    /// Combo and quiz unlocks
    pub const COMBO_THRESHOLD_MS: f64 = 1200.0;
    pub const MAX_COMBO: u32 = 1000;
    pub const POINTS_PER_QUIZ: u64 = 100;
    pub const MAX_QUIZ_STOCK: u32 = 5;

    /// Rewards and stages
    pub const REWARD_REVEAL_DELAY_MS: f64 = 750.0;
    pub const DRAWS_PER_STAGE: u32 = 5;
    pub const COLLECTION_GOAL: usize = 50;

    /// Effects
    pub const PARTICLES_PER_PICKUP: usize = 8;
    pub const PARTICLE_GRAVITY: f32 = 0.12;
    pub const PARTICLE_DECAY: f32 = 0.03;
    pub const STAR_COUNT: usize = 70;
    pub const STAR_WRAP_MARGIN: f32 = 10.0;
    pub const POWERUP_SHAKE: f32 = 15.0;
    pub const REWARD_SHAKE: f32 = 40.0;
}
