//! WebGPU rendering module
//!
//! A [`RenderFrame`] is tessellated on the CPU into coloured triangles in
//! screen pixels; [`RenderState`] uploads and draws them.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use frame::{RenderFrame, ScreenShake};
pub use pipeline::RenderState;
pub use vertex::Vertex;

use vertex::colors;

/// Pips drawn above the player for a running combo
const MAX_COMBO_PIPS: u32 = 10;

/// Build the triangle list for one frame, back to front
pub fn tessellate(frame: &RenderFrame) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    // Background and stars stay fixed under camera shake
    let (left, right) = colors::stage_background(frame.theme);
    out.extend(shapes::gradient_rect(Vec2::ZERO, frame.viewport, left, right));
    for star in &frame.stars {
        let color = colors::with_alpha(colors::STAR, star.opacity);
        out.extend(shapes::circle(star.pos, star.size, color, 6));
    }

    let shaken_from = out.len();

    for gem in &frame.gems {
        let color = colors::gem(gem.kind);
        if gem.kind.is_special() {
            out.extend(shapes::circle(
                gem.pos,
                gem.radius * 1.6,
                colors::with_alpha(color, 0.3),
                16,
            ));
            out.extend(shapes::ring(gem.pos, gem.radius * 0.8, gem.radius, color, 16));
            out.extend(shapes::circle(gem.pos, gem.radius * 0.55, color, 12));
        } else {
            out.extend(shapes::circle(gem.pos, gem.radius * 1.3, colors::GLOW, 10));
            out.extend(shapes::diamond(gem.pos, gem.radius, color));
        }
    }

    for p in &frame.particles {
        let color = colors::with_alpha(colors::gem(p.kind), p.alpha);
        out.extend(shapes::circle(p.pos, p.size, color, 6));
    }

    for ghost in &frame.trail {
        let color = colors::with_alpha(colors::PLAYER, ghost.alpha);
        out.extend(shapes::craft(ghost.pos, ghost.radius, color));
    }

    out.extend(shapes::circle(
        frame.player_pos,
        frame.player_radius * 0.9,
        colors::GLOW,
        16,
    ));
    out.extend(shapes::craft(frame.player_pos, frame.player_radius, colors::PLAYER));
    out.extend(shapes::circle(
        frame.player_pos,
        frame.player_radius * 0.2,
        colors::PLAYER_CORE,
        8,
    ));

    if let Some((combo, anchor)) = frame.combo_label {
        let pips = combo.min(MAX_COMBO_PIPS);
        let spacing = 6.0;
        let start = anchor.x - (pips as f32 - 1.0) * spacing / 2.0;
        for i in 0..pips {
            let pos = Vec2::new(start + i as f32 * spacing, anchor.y - 6.0);
            out.extend(shapes::circle(pos, 2.0, colors::COMBO_MARK, 6));
        }
    }

    shapes::translate(&mut out[shaken_from..], frame.shake);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::World;

    fn frame(shake: Vec2) -> RenderFrame {
        let mut world = World::new(11, Vec2::new(800.0, 600.0));
        world.init_level();
        RenderFrame::capture(&world, 1, shake, &Settings::default())
    }

    #[test]
    fn test_background_comes_first() {
        let verts = tessellate(&frame(Vec2::ZERO));
        let (left, _) = colors::stage_background(1);
        assert_eq!(verts[0].color, left);
        assert_eq!(verts.len() % 3, 0);
    }

    #[test]
    fn test_shake_moves_sprites_not_background() {
        let still = tessellate(&frame(Vec2::ZERO));
        let shaken = tessellate(&frame(Vec2::new(5.0, 0.0)));
        assert_eq!(still.len(), shaken.len());
        assert_eq!(still[0], shaken[0]);
        let last = still.len() - 1;
        assert!((shaken[last].position[0] - still[last].position[0] - 5.0).abs() < 1e-4);
    }
}
