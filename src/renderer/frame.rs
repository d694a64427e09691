//! Render snapshot
//!
//! The render step reads the world but never mutates it. [`RenderFrame`] is
//! the immutable view handed to the tessellator; it already has the user's
//! visual toggles applied.

use glam::Vec2;
use rand::Rng;

use crate::settings::Settings;
use crate::sim::{GemKind, PowerUpKind, World};

/// Drawn radius of a plain gem
pub const GEM_SPRITE_RADIUS: f32 = 11.0;
/// Power-up carriers are drawn larger
pub const SPECIAL_SPRITE_RADIUS: f32 = 16.0;
pub const PLAYER_SPRITE_RADIUS: f32 = 20.0;
/// Peak alpha of the newest trail ghost
pub const TRAIL_ALPHA: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarSprite {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: GemKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub kind: GemKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailGhost {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Everything needed to draw one frame of play
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Vec2,
    /// Index into the stage background palette
    pub theme: usize,
    pub stars: Vec<StarSprite>,
    /// Camera offset applied to everything except the background
    pub shake: Vec2,
    pub gems: Vec<GemSprite>,
    pub particles: Vec<ParticleSprite>,
    pub trail: Vec<TrailGhost>,
    pub player_pos: Vec2,
    pub player_radius: f32,
    /// Combo count and the point above the player it is anchored to
    pub combo_label: Option<(u32, Vec2)>,
}

impl RenderFrame {
    pub fn capture(world: &World, theme: usize, shake: Vec2, settings: &Settings) -> Self {
        let giant = world.power.is(PowerUpKind::Giant);
        let player_radius = if giant {
            PLAYER_SPRITE_RADIUS * 2.0
        } else {
            PLAYER_SPRITE_RADIUS
        };

        let stars = world
            .stars
            .iter()
            .map(|s| StarSprite {
                pos: s.pos,
                size: s.size,
                opacity: s.opacity,
            })
            .collect();

        let gems = world
            .gems
            .active()
            .map(|g| GemSprite {
                pos: g.pos,
                radius: if g.kind.is_special() {
                    SPECIAL_SPRITE_RADIUS
                } else {
                    GEM_SPRITE_RADIUS
                },
                kind: g.kind,
            })
            .collect();

        let particles = if settings.particles {
            world
                .particles
                .iter()
                .map(|p| ParticleSprite {
                    pos: p.pos,
                    size: p.size,
                    alpha: p.life.clamp(0.0, 1.0),
                    kind: p.color,
                })
                .collect()
        } else {
            Vec::new()
        };

        let trail = if settings.trails {
            let len = world.player.trail.len() as f32;
            world
                .player
                .trail
                .iter()
                .enumerate()
                .map(|(i, &pos)| TrailGhost {
                    pos,
                    radius: player_radius * 0.875,
                    alpha: (1.0 - i as f32 / len) * TRAIL_ALPHA,
                })
                .collect()
        } else {
            Vec::new()
        };

        let combo = world.combo.count();
        let combo_label = (combo > 1).then(|| {
            (
                combo,
                world.player.pos - Vec2::new(0.0, player_radius),
            )
        });

        Self {
            viewport: world.viewport,
            theme,
            stars,
            shake: if settings.screen_shake { shake } else { Vec2::ZERO },
            gems,
            particles,
            trail,
            player_pos: world.player.pos,
            player_radius,
            combo_label,
        }
    }
}

/// Camera shake that fades by one unit per rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    magnitude: f32,
}

impl ScreenShake {
    /// Restart the shake at `magnitude`
    pub fn trigger(&mut self, magnitude: f32) {
        self.magnitude = magnitude;
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Offset for this frame, uniform in +/- magnitude/2, then decay
    pub fn next_offset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec2 {
        if self.magnitude <= 0.0 {
            return Vec2::ZERO;
        }
        let m = self.magnitude;
        let offset = Vec2::new(
            (rng.random::<f32>() - 0.5) * m,
            (rng.random::<f32>() - 0.5) * m,
        );
        self.magnitude = (m - 1.0).max(0.0);
        offset
    }
}
