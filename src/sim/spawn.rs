//! Gem spawning and slot recycling
//!
//! The pool is a flat vector of slots. Collected or scrolled-out gems are
//! re-rolled in place; the vector only grows when the population target
//! rises and only shrinks one recycle at a time when it falls.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Gem, GemKind, PowerUpKind};
use crate::consts::*;

/// Where a freshly rolled gem is placed horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere in `[0, 2 * width)`, used when a level starts
    Scattered,
    /// Just past the right edge in `[width, 2 * width)`
    Offscreen,
}

/// Uniform sample that tolerates degenerate ranges (tiny viewports)
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Roll a new gem
pub fn spawn_gem<R: Rng + ?Sized>(rng: &mut R, viewport: Vec2, placement: Placement) -> Gem {
    let x = match placement {
        Placement::Scattered => uniform(rng, 0.0, viewport.x * 2.0),
        Placement::Offscreen => viewport.x + uniform(rng, 0.0, viewport.x),
    };
    let y = if viewport.y > GEM_EDGE_MARGIN * 2.0 {
        uniform(rng, GEM_EDGE_MARGIN, viewport.y - GEM_EDGE_MARGIN)
    } else {
        viewport.y / 2.0
    };
    let vx = -rng.random_range(GEM_MIN_SPEED..=GEM_MAX_SPEED);

    let kind = if rng.random_bool(SPECIAL_CHANCE) {
        GemKind::Special(PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())])
    } else {
        GemKind::Plain {
            color: rng.random_range(0..GEM_COLOR_COUNT),
        }
    };

    Gem {
        id: rng.random(),
        pos: Vec2::new(x, y),
        vx,
        active: true,
        kind,
    }
}

/// Fixed-slot collection of gems
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GemPool {
    slots: Vec<Gem>,
}

impl GemPool {
    /// Replace the whole pool with `target` scattered gems
    pub fn populate<R: Rng + ?Sized>(&mut self, target: usize, viewport: Vec2, rng: &mut R) {
        self.slots.clear();
        self.slots
            .extend((0..target).map(|_| spawn_gem(rng, viewport, Placement::Scattered)));
    }

    /// Append offscreen gems until the pool holds at least `target` slots
    pub fn top_up<R: Rng + ?Sized>(&mut self, target: usize, viewport: Vec2, rng: &mut R) {
        while self.slots.len() < target {
            self.slots.push(spawn_gem(rng, viewport, Placement::Offscreen));
        }
    }

    /// Re-roll the slot at `index` in place, or drop it while the pool is
    /// above `target`. Dropping swaps the last slot into `index`, so callers
    /// iterating must walk indices from high to low.
    ///
    /// Returns `true` if the slot still exists afterwards.
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        target: usize,
        viewport: Vec2,
        rng: &mut R,
    ) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        if self.slots.len() > target {
            self.slots.swap_remove(index);
            false
        } else {
            self.slots[index] = spawn_gem(rng, viewport, Placement::Offscreen);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Gem> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Gem> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gem> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Gem> {
        self.slots.iter_mut()
    }

    /// Gems that should be drawn
    pub fn active(&self) -> impl Iterator<Item = &Gem> {
        self.slots.iter().filter(|g| g.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEW: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_offscreen_gems_spawn_right_of_screen() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            let gem = spawn_gem(&mut rng, VIEW, Placement::Offscreen);
            assert!(gem.pos.x >= VIEW.x && gem.pos.x < VIEW.x * 2.0);
            assert!(gem.pos.y >= GEM_EDGE_MARGIN && gem.pos.y <= VIEW.y - GEM_EDGE_MARGIN);
            assert!(gem.vx >= -GEM_MAX_SPEED && gem.vx <= -GEM_MIN_SPEED);
            assert!(gem.active);
            if let GemKind::Plain { color } = gem.kind {
                assert!(color < GEM_COLOR_COUNT);
            }
        }
    }

    #[test]
    fn test_special_gems_are_rare_but_present() {
        let mut rng = Pcg32::seed_from_u64(99);
        let specials = (0..20_000)
            .filter(|_| spawn_gem(&mut rng, VIEW, Placement::Offscreen).kind.is_special())
            .count();
        // Expected ~240 at 1.2%
        assert!(specials > 120 && specials < 400, "got {specials}");
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let mut rng = Pcg32::seed_from_u64(3);
        let gem = spawn_gem(&mut rng, Vec2::new(0.0, 40.0), Placement::Scattered);
        assert_eq!(gem.pos, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_recycle_reuses_slot_at_target() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = GemPool::default();
        pool.populate(BASE_GEM_COUNT, VIEW, &mut rng);
        pool.get_mut(10).unwrap().active = false;

        assert!(pool.recycle(10, BASE_GEM_COUNT, VIEW, &mut rng));
        assert_eq!(pool.len(), BASE_GEM_COUNT);
        let gem = pool.get(10).unwrap();
        assert!(gem.active);
        assert!(gem.pos.x >= VIEW.x);
    }

    #[test]
    fn test_recycle_shrinks_toward_lower_target() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = GemPool::default();
        pool.populate(BASE_GEM_COUNT, VIEW, &mut rng);
        pool.top_up(BURST_GEM_COUNT, VIEW, &mut rng);
        assert_eq!(pool.len(), BURST_GEM_COUNT);

        for i in (0..pool.len()).rev() {
            pool.recycle(i, BASE_GEM_COUNT, VIEW, &mut rng);
        }
        assert_eq!(pool.len(), BASE_GEM_COUNT);
        // Further recycles keep the size stable
        assert!(pool.recycle(0, BASE_GEM_COUNT, VIEW, &mut rng));
        assert_eq!(pool.len(), BASE_GEM_COUNT);
    }

    #[test]
    fn test_top_up_never_shrinks() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut pool = GemPool::default();
        pool.populate(BURST_GEM_COUNT, VIEW, &mut rng);
        pool.top_up(BASE_GEM_COUNT, VIEW, &mut rng);
        assert_eq!(pool.len(), BURST_GEM_COUNT);
    }
}
