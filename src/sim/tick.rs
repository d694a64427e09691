//! Per-frame simulation step
//!
//! Motion is frame-based (constants are per 60 Hz frame). Only combo expiry
//! reads the wall clock, passed in as `now_ms`.

use glam::Vec2;
use rand::Rng;

use super::collision::{magnet_pull, within_reach};
use super::state::{GemKind, Particle, PowerUpKind, SimEvent, World};
use crate::consts::*;

/// Directional key state sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// Sum of pressed directions (opposing keys cancel), screen coords (y down)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput, now_ms: f64) {
    world.frame += 1;

    update_player(world, input);
    scroll_stars(world);

    if let Some(kind) = world.power.countdown() {
        log::debug!("Power-up {:?} expired", kind);
        world.events.push(SimEvent::PowerUpExpired(kind));
    }

    if let Some(length) = world.combo.check_expiry(now_ms) {
        world.events.push(SimEvent::ComboEnded { length });
    }

    update_gems(world, now_ms);

    let target = world.power.population_target();
    world.gems.top_up(target, world.viewport, &mut world.rng);

    update_particles(world);
}

fn update_player(world: &mut World, input: &TickInput) {
    let bounds = world.viewport;
    let player = &mut world.player;

    player.vel += input.direction() * PLAYER_ACCEL;
    player.vel *= PLAYER_FRICTION;
    player.pos += player.vel;

    // Inelastic stop at the screen edges
    let margin = player.radius;
    if player.pos.x < margin {
        player.pos.x = margin;
        player.vel.x = 0.0;
    }
    if player.pos.x > bounds.x - margin {
        player.pos.x = bounds.x - margin;
        player.vel.x = 0.0;
    }
    if player.pos.y < margin {
        player.pos.y = margin;
        player.vel.y = 0.0;
    }
    if player.pos.y > bounds.y - margin {
        player.pos.y = bounds.y - margin;
        player.vel.y = 0.0;
    }

    player.record_trail();
}

fn scroll_stars(world: &mut World) {
    let wrap_x = world.viewport.x + STAR_WRAP_MARGIN;
    for star in &mut world.stars {
        star.pos.x -= star.speed;
        if star.pos.x < -STAR_WRAP_MARGIN {
            star.pos.x = wrap_x;
        }
    }
}

fn update_gems(world: &mut World, now_ms: f64) {
    let player_pos = world.player.pos;
    let reach = world.effective_player_radius() + GEM_PICKUP_RADIUS;
    let scroll = world.power.scroll_multiplier();
    let magnet = world.power.is(PowerUpKind::Magnet);
    let target = world.power.population_target();
    let viewport = world.viewport;

    // High to low so a shrinking recycle can swap the tail into `i`
    let mut i = world.gems.len();
    while i > 0 {
        i -= 1;

        let Some(gem) = world.gems.get_mut(i) else {
            continue;
        };
        if !gem.active {
            world.gems.recycle(i, target, viewport, &mut world.rng);
            continue;
        }

        gem.pos.x += gem.vx * scroll;
        if magnet {
            gem.pos = magnet_pull(player_pos, gem.pos, MAGNET_RANGE, MAGNET_PULL);
        }

        let hit = within_reach(player_pos, gem.pos, reach);
        if hit {
            gem.active = false;
        }
        let (pos, kind) = (gem.pos, gem.kind);

        if hit {
            collect(world, pos, kind, now_ms);
        }
        if pos.x < GEM_RECYCLE_X {
            world.gems.recycle(i, target, viewport, &mut world.rng);
        }
    }
}

fn collect(world: &mut World, pos: Vec2, kind: GemKind, now_ms: f64) {
    let combo = world.combo.register_pickup(now_ms);
    world.events.push(SimEvent::GemCollected { combo, kind, pos });

    let rng = &mut world.rng;
    world.particles.extend((0..PARTICLES_PER_PICKUP).map(|_| Particle {
        pos,
        vel: Vec2::new(
            (rng.random::<f32>() - 0.5) * 8.0,
            (rng.random::<f32>() - 0.5) * 8.0 - 1.0,
        ),
        size: rng.random::<f32>() * 3.0 + 1.0,
        life: 1.0,
        color: kind,
    }));

    if let GemKind::Special(power) = kind {
        log::debug!("Power-up {:?} activated", power);
        world.power.activate(power);
        world.events.push(SimEvent::PowerUpActivated(power));
    }
}

fn update_particles(world: &mut World) {
    for particle in &mut world.particles {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= PARTICLE_DECAY;
    }
    world.particles.retain(|p| p.life > 0.0);
}

/// Demo/idle steering: chase the nearest gem ahead of the player, preferring
/// power-up carriers.
pub fn autopilot(world: &World) -> TickInput {
    let player = world.player.pos;
    let score = |g: &super::state::Gem| {
        let dist = g.pos.distance(player);
        if g.kind.is_special() { dist * 0.5 } else { dist }
    };

    let target = world
        .gems
        .active()
        .filter(|g| g.pos.x > player.x - 10.0 && g.pos.x < world.viewport.x)
        .min_by(|a, b| {
            score(*a)
                .partial_cmp(&score(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = target else {
        return TickInput::default();
    };

    let delta = target.pos - player;
    let deadzone = 8.0;
    TickInput {
        up: delta.y < -deadzone,
        down: delta.y > deadzone,
        left: delta.x < -deadzone,
        right: delta.x > deadzone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Gem, PowerUpKind};

    const VIEW: Vec2 = Vec2::new(1280.0, 720.0);

    fn level(seed: u64) -> World {
        let mut world = World::new(seed, VIEW);
        world.init_level();
        world
    }

    /// Push every gem far off to the right so nothing is collected by accident
    fn park_gems(world: &mut World) {
        for gem in world.gems.iter_mut() {
            gem.pos.x = 100_000.0;
            gem.vx = -5.0;
        }
    }

    fn place_gem(world: &mut World, index: usize, pos: Vec2, kind: GemKind) {
        let gem = world.gems.get_mut(index).unwrap();
        *gem = Gem {
            id: 1,
            pos,
            vx: 0.0,
            active: true,
            kind,
        };
    }

    #[test]
    fn test_friction_decays_velocity() {
        let mut world = level(1);
        park_gems(&mut world);
        world.player.vel = Vec2::new(10.0, 0.0);
        tick(&mut world, &TickInput::default(), 0.0);
        assert!((world.player.vel.x - 9.2).abs() < 1e-4);
        assert!((world.player.pos.x - (PLAYER_START_X + 9.2)).abs() < 1e-3);
    }

    #[test]
    fn test_input_accelerates_before_friction() {
        let mut world = level(1);
        park_gems(&mut world);
        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0);
        assert!((world.player.vel.x - 1.2 * 0.92).abs() < 1e-5);
        assert!((world.player.vel.y + 1.2 * 0.92).abs() < 1e-5);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_player_stops_at_wall() {
        let mut world = level(2);
        park_gems(&mut world);
        world.player.pos = Vec2::new(20.0, 360.0);
        world.player.vel = Vec2::new(-30.0, 0.0);
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.player.pos.x, PLAYER_RADIUS);
        assert_eq!(world.player.vel.x, 0.0);

        world.player.pos = Vec2::new(600.0, 710.0);
        world.player.vel = Vec2::new(0.0, 30.0);
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.player.pos.y, VIEW.y - PLAYER_RADIUS);
        assert_eq!(world.player.vel.y, 0.0);
    }

    #[test]
    fn test_trail_tracks_recent_positions() {
        let mut world = level(3);
        park_gems(&mut world);
        for _ in 0..10 {
            tick(&mut world, &TickInput { down: true, ..Default::default() }, 0.0);
        }
        assert_eq!(world.player.trail.len(), TRAIL_LENGTH);
        assert_eq!(world.player.trail[0], world.player.pos);
    }

    #[test]
    fn test_stars_wrap_to_right_edge() {
        let mut world = level(4);
        park_gems(&mut world);
        world.stars[0].pos.x = -9.5;
        world.stars[0].speed = 1.0;
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.stars[0].pos.x, VIEW.x + STAR_WRAP_MARGIN);
    }

    #[test]
    fn test_pickup_scores_combo_and_particles() {
        let mut world = level(5);
        park_gems(&mut world);
        let pos = world.player.pos;
        place_gem(&mut world, 0, pos, GemKind::Plain { color: 3 });

        tick(&mut world, &TickInput::default(), 500.0);

        assert_eq!(world.combo.count(), 1);
        assert_eq!(world.combo.last_pickup_ms(), Some(500.0));
        assert_eq!(world.particles.len(), PARTICLES_PER_PICKUP);
        assert!(world.particles.iter().all(|p| p.color == GemKind::Plain { color: 3 }));
        let events = world.drain_events();
        assert!(matches!(
            events.as_slice(),
            [SimEvent::GemCollected { combo: 1, .. }]
        ));
        // Collected slot stays inactive until the next frame recycles it
        assert!(!world.gems.get(0).unwrap().active);
        tick(&mut world, &TickInput::default(), 510.0);
        assert!(world.gems.get(0).unwrap().active);
        assert_eq!(world.gems.len(), BASE_GEM_COUNT);
    }

    #[test]
    fn test_gem_just_outside_reach_is_not_collected() {
        let mut world = level(6);
        park_gems(&mut world);
        let pos = world.player.pos + Vec2::new(0.0, PLAYER_RADIUS + GEM_PICKUP_RADIUS + 1.0);
        place_gem(&mut world, 0, pos, GemKind::Plain { color: 0 });
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.combo.count(), 0);
        assert!(world.gems.get(0).unwrap().active);
    }

    #[test]
    fn test_giant_widens_reach() {
        let mut world = level(6);
        park_gems(&mut world);
        world.power.activate(PowerUpKind::Giant);
        let pos = world.player.pos + Vec2::new(0.0, 90.0);
        place_gem(&mut world, 0, pos, GemKind::Plain { color: 0 });
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.combo.count(), 1);
    }

    #[test]
    fn test_special_pickup_activates_power_up() {
        let mut world = level(7);
        park_gems(&mut world);
        let pos = world.player.pos;
        place_gem(&mut world, 0, pos, GemKind::Special(PowerUpKind::Burst));
        tick(&mut world, &TickInput::default(), 0.0);

        assert_eq!(world.power.kind(), Some(PowerUpKind::Burst));
        assert_eq!(world.power.frames_left(), POWERUP_DURATION);
        assert!(world
            .drain_events()
            .contains(&SimEvent::PowerUpActivated(PowerUpKind::Burst)));
        // Burst raises the population target in the same frame
        assert_eq!(world.gems.len(), BURST_GEM_COUNT);
    }

    #[test]
    fn test_burst_scrolls_faster() {
        let mut world = level(8);
        park_gems(&mut world);
        place_gem(&mut world, 0, Vec2::new(1000.0, 50.0), GemKind::Plain { color: 1 });
        world.gems.get_mut(0).unwrap().vx = -6.0;
        world.power.activate(PowerUpKind::Burst);
        tick(&mut world, &TickInput::default(), 0.0);
        assert!((world.gems.get(0).unwrap().pos.x - (1000.0 - 15.0)).abs() < 1e-3);
    }

    #[test]
    fn test_magnet_attracts_nearby_gems() {
        let mut world = level(9);
        park_gems(&mut world);
        world.player.pos = Vec2::new(300.0, 360.0);
        world.power.activate(PowerUpKind::Magnet);
        place_gem(&mut world, 0, Vec2::new(500.0, 360.0), GemKind::Plain { color: 1 });
        tick(&mut world, &TickInput::default(), 0.0);
        // 200 px gap closes by 15%
        assert!((world.gems.get(0).unwrap().pos.x - 470.0).abs() < 1e-3);
    }

    #[test]
    fn test_scrolled_out_gems_are_recycled() {
        let mut world = level(10);
        park_gems(&mut world);
        place_gem(&mut world, 0, Vec2::new(-99.0, 50.0), GemKind::Plain { color: 1 });
        world.gems.get_mut(0).unwrap().vx = -5.0;
        tick(&mut world, &TickInput::default(), 0.0);
        let gem = world.gems.get(0).unwrap();
        assert!(gem.active);
        assert!(gem.pos.x >= VIEW.x);
    }

    #[test]
    fn test_combo_ends_after_pause() {
        let mut world = level(11);
        park_gems(&mut world);
        let pos = world.player.pos;
        place_gem(&mut world, 0, pos, GemKind::Plain { color: 0 });
        tick(&mut world, &TickInput::default(), 0.0);
        world.drain_events();

        tick(&mut world, &TickInput::default(), 1200.0);
        assert!(world.drain_events().is_empty());
        tick(&mut world, &TickInput::default(), 1201.0);
        assert_eq!(world.drain_events(), vec![SimEvent::ComboEnded { length: 1 }]);
        assert_eq!(world.combo.count(), 0);
    }

    #[test]
    fn test_power_up_expires_after_duration() {
        let mut world = level(12);
        park_gems(&mut world);
        world.power.activate(PowerUpKind::Magnet);
        for _ in 0..POWERUP_DURATION {
            tick(&mut world, &TickInput::default(), 0.0);
        }
        assert_eq!(world.power.kind(), None);
        assert!(world
            .drain_events()
            .contains(&SimEvent::PowerUpExpired(PowerUpKind::Magnet)));
    }

    #[test]
    fn test_particles_fall_and_fade() {
        let mut world = level(13);
        park_gems(&mut world);
        world.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 2.0,
            life: 1.0,
            color: GemKind::Plain { color: 0 },
        });
        tick(&mut world, &TickInput::default(), 0.0);
        assert!((world.particles[0].vel.y - PARTICLE_GRAVITY).abs() < 1e-6);
        assert!((world.particles[0].life - 0.97).abs() < 1e-6);

        for _ in 0..40 {
            tick(&mut world, &TickInput::default(), 0.0);
        }
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_population_converges_after_burst() {
        let mut world = level(14);
        world.power.activate(PowerUpKind::Burst);
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.gems.len(), BURST_GEM_COUNT);

        world.power.clear();
        // Park the player above the gem lanes so nothing new triggers a burst
        world.player.pos = Vec2::new(PLAYER_START_X, PLAYER_RADIUS);
        for frame in 0..2000 {
            tick(&mut world, &TickInput::default(), frame as f64);
            assert_eq!(world.power.kind(), None);
            assert!(world.gems.len() >= BASE_GEM_COUNT);
        }
        assert_eq!(world.gems.len(), BASE_GEM_COUNT);
    }

    #[test]
    fn test_determinism() {
        let mut a = level(99_999);
        let mut b = level(99_999);
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { down: true, ..Default::default() },
            TickInput::default(),
        ];
        for frame in 0..300 {
            let input = &inputs[frame % inputs.len()];
            tick(&mut a, input, frame as f64 * FRAME_MS);
            tick(&mut b, input, frame as f64 * FRAME_MS);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.gems.len(), b.gems.len());
        assert_eq!(a.combo.count(), b.combo.count());
        assert!(a.player.pos.distance(b.player.pos) < 1e-4);
    }

    #[test]
    fn test_autopilot_steers_toward_nearest_gem() {
        let mut world = level(15);
        park_gems(&mut world);
        let pos = world.player.pos + Vec2::new(100.0, -60.0);
        place_gem(&mut world, 0, pos, GemKind::Plain { color: 0 });
        let input = autopilot(&world);
        assert!(input.right && input.up);
        assert!(!input.left && !input.down);
    }
}
