//! Circle pickup tests and magnet attraction
//!
//! Everything here is a plain circle-vs-point check: gems have no hitbox of
//! their own, the pickup reach is the player radius plus a fixed gem margin.

use glam::Vec2;

/// True if `point` lies strictly within `reach` of `center`
#[inline]
pub fn within_reach(center: Vec2, point: Vec2, reach: f32) -> bool {
    center.distance_squared(point) < reach * reach
}

/// Move `pos` a fraction of the way toward `target` if it is inside `range`.
///
/// The approach is exponential and never lands exactly on the target. A zero
/// gap counts as already arrived.
pub fn magnet_pull(target: Vec2, pos: Vec2, range: f32, strength: f32) -> Vec2 {
    let gap = target - pos;
    let dist = gap.length();
    if dist <= f32::EPSILON || !dist.is_finite() || dist >= range {
        return pos;
    }
    pos + gap * strength
}
