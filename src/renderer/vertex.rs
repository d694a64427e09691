//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::{GemKind, PowerUpKind};

    /// `0xRRGGBB` to linear-ish RGBA (no gamma correction)
    pub const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
        color[3] *= alpha;
        color
    }

    /// Plain gem palette, indexed by `GemKind::Plain::color`
    pub const GEMS: [[f32; 4]; 6] = [
        hex(0xef4444),
        hex(0xf59e0b),
        hex(0x10b981),
        hex(0x3b82f6),
        hex(0x8b5cf6),
        hex(0xec4899),
    ];

    pub const MAGNET: [f32; 4] = hex(0xfacc15);
    pub const BURST: [f32; 4] = hex(0xf472b6);
    pub const GIANT: [f32; 4] = hex(0x22d3ee);

    pub const PLAYER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER_CORE: [f32; 4] = hex(0x38bdf8);
    pub const GLOW: [f32; 4] = [1.0, 1.0, 1.0, 0.25];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const COMBO_MARK: [f32; 4] = hex(0xfde047);

    /// Left/right gradient stops per stage theme
    pub const STAGE_BACKGROUNDS: [([f32; 4], [f32; 4]); 5] = [
        (hex(0x064e3b), hex(0x065f46)),
        (hex(0x4c1d95), hex(0x5b21b6)),
        (hex(0x7f1d1d), hex(0x991b1b)),
        (hex(0x1e3a8a), hex(0x1e40af)),
        (hex(0x111827), hex(0x1f2937)),
    ];

    pub fn power_up(kind: PowerUpKind) -> [f32; 4] {
        match kind {
            PowerUpKind::Magnet => MAGNET,
            PowerUpKind::Burst => BURST,
            PowerUpKind::Giant => GIANT,
        }
    }

    pub fn gem(kind: GemKind) -> [f32; 4] {
        match kind {
            GemKind::Plain { color } => GEMS[color as usize % GEMS.len()],
            GemKind::Special(p) => power_up(p),
        }
    }

    pub fn stage_background(theme: usize) -> ([f32; 4], [f32; 4]) {
        STAGE_BACKGROUNDS[theme % STAGE_BACKGROUNDS.len()]
    }
}
