//! Deterministic simulation module
//!
//! All per-frame gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Caller-supplied clock (`now_ms`) for combo timing
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod combo;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{magnet_pull, within_reach};
pub use combo::{ActivePowerUp, ComboTracker, PowerUpState, quiz_quota};
pub use schedule::{ScheduledEvent, Scheduler};
pub use spawn::{GemPool, Placement, spawn_gem};
pub use state::{Gem, GemKind, Particle, Player, PowerUpKind, SimEvent, Star, World};
pub use tick::{TickInput, autopilot, tick};
