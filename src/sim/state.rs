//! Entity model and the simulation context
//!
//! Everything the per-frame step mutates lives in [`World`]. Scoring and the
//! mode state machine live in `crate::progress`; the world only reports what
//! happened through [`SimEvent`]s.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::{ComboTracker, PowerUpState};
use super::spawn::GemPool;
use crate::consts::*;

/// Temporary global effects granted by special gems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Pulls nearby gems toward the player
    Magnet,
    /// Faster scrolling and a denser gem field
    Burst,
    /// Enlarged pickup radius
    Giant,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Magnet, PowerUpKind::Burst, PowerUpKind::Giant];
}

/// What a gem is: a plain coloured gem or a power-up carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GemKind {
    /// Palette index in `0..GEM_COLOR_COUNT`
    Plain { color: u8 },
    Special(PowerUpKind),
}

impl GemKind {
    pub fn is_special(self) -> bool {
        matches!(self, GemKind::Special(_))
    }

    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            GemKind::Special(kind) => Some(kind),
            GemKind::Plain { .. } => None,
        }
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Recent positions for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Record current position to trail (call once per frame)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

/// A collectible gem occupying one pool slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    /// Random render key, not an identity for equality
    pub id: u32,
    pub pos: Vec2,
    /// Horizontal velocity (always negative)
    pub vx: f32,
    /// Cleared on pickup; the slot is recycled on the next frame
    pub active: bool,
    pub kind: GemKind,
}

/// A burst particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life: f32, // 0-1, decreases over time
    /// Kind of the gem that emitted it, for colour lookup
    pub color: GemKind,
}

/// Decorative background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    GemCollected { combo: u32, kind: GemKind, pos: Vec2 },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    /// A combo streak ended by timeout or by reaching the cap
    ComboEnded { length: u32 },
}

/// The simulation context: all entity state for one level
#[derive(Debug, Clone)]
pub struct World {
    /// Screen size in pixels (x = width, y = height)
    pub viewport: Vec2,
    pub player: Player,
    pub gems: GemPool,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub combo: ComboTracker,
    pub power: PowerUpState,
    /// Simulation frame counter
    pub frame: u64,
    /// Events produced since the last drain
    pub events: Vec<SimEvent>,
    pub rng: Pcg32,
}

impl World {
    /// Create an empty world; call [`World::init_level`] to populate it
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        Self {
            viewport,
            player: Player::new(Vec2::new(PLAYER_START_X, viewport.y / 2.0)),
            gems: GemPool::default(),
            particles: Vec::new(),
            stars: Vec::new(),
            combo: ComboTracker::default(),
            power: PowerUpState::default(),
            frame: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset the player and fill the field with pre-scattered gems and stars
    pub fn init_level(&mut self) {
        let viewport = self.viewport;
        self.player = Player::new(Vec2::new(PLAYER_START_X, viewport.y / 2.0));
        self.gems.populate(BASE_GEM_COUNT, viewport, &mut self.rng);
        self.particles.clear();
        self.events.clear();

        let rng = &mut self.rng;
        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * viewport.x,
                    rng.random::<f32>() * viewport.y,
                ),
                size: rng.random::<f32>() * 2.0 + 0.5,
                speed: rng.random::<f32>() * 1.5 + 0.5,
                opacity: rng.random::<f32>() * 0.4 + 0.1,
            })
            .collect();
    }

    /// Host window changed size
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pickup radius of the player including any active power-up
    pub fn effective_player_radius(&self) -> f32 {
        self.power.pickup_radius(self.player.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_keeps_five_newest_positions() {
        let mut player = Player::new(Vec2::ZERO);
        for i in 0..8 {
            player.pos = Vec2::new(i as f32, 0.0);
            player.record_trail();
        }
        assert_eq!(player.trail.len(), TRAIL_LENGTH);
        assert_eq!(player.trail[0].x, 7.0);
        assert_eq!(player.trail[4].x, 3.0);
    }

    #[test]
    fn test_init_level_populates_field() {
        let mut world = World::new(7, Vec2::new(1280.0, 720.0));
        world.init_level();
        assert_eq!(world.gems.len(), BASE_GEM_COUNT);
        assert_eq!(world.stars.len(), STAR_COUNT);
        assert_eq!(world.player.pos, Vec2::new(PLAYER_START_X, 360.0));
        assert!(world.gems.iter().all(|g| g.active));
        assert!(world.gems.iter().all(|g| g.pos.x >= 0.0 && g.pos.x < 2560.0));
    }

    #[test]
    fn test_gem_kind_reports_power_up() {
        assert_eq!(GemKind::Plain { color: 2 }.power_up(), None);
        assert_eq!(
            GemKind::Special(PowerUpKind::Giant).power_up(),
            Some(PowerUpKind::Giant)
        );
        assert!(!GemKind::Plain { color: 0 }.is_special());
    }
}
