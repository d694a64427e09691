//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let at = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = at(inner_radius, theta1);
        let outer1 = at(outer_radius, theta1);
        let inner2 = at(inner_radius, theta2);
        let outer2 = at(outer_radius, theta2);

        quad(&mut vertices, [inner1, outer1, outer2, inner2], [color; 4]);
    }

    vertices
}

/// Four-pointed gem outline (rhombus) centred on `center`
pub fn diamond(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let top = center - Vec2::new(0.0, radius);
    let bottom = center + Vec2::new(0.0, radius);
    let left = center - Vec2::new(radius * 0.75, 0.0);
    let right = center + Vec2::new(radius * 0.75, 0.0);

    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, [top, right, bottom, left], [color; 4]);
    vertices
}

/// Axis-aligned rectangle with a horizontal gradient
pub fn gradient_rect(min: Vec2, max: Vec2, left: [f32; 4], right: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        [left, right, right, left],
    );
    vertices
}

/// Arrow-head craft pointing right
pub fn craft(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let nose = center + Vec2::new(radius, 0.0);
    let upper = center + Vec2::new(-radius * 0.8, -radius * 0.7);
    let notch = center + Vec2::new(-radius * 0.4, 0.0);
    let lower = center + Vec2::new(-radius * 0.8, radius * 0.7);

    vec![
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(upper.x, upper.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(lower.x, lower.y, color),
    ]
}

/// Two triangles for a convex quad given in winding order
fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    let [a, b, c, d] = corners;
    let [ca, cb, cc, cd] = colors;
    out.push(Vertex::new(a.x, a.y, ca));
    out.push(Vertex::new(b.x, b.y, cb));
    out.push(Vertex::new(c.x, c.y, cc));

    out.push(Vertex::new(a.x, a.y, ca));
    out.push(Vertex::new(c.x, c.y, cc));
    out.push(Vertex::new(d.x, d.y, cd));
}

/// Offset every vertex by `delta`
pub fn translate(vertices: &mut [Vertex], delta: Vec2) {
    if delta == Vec2::ZERO {
        return;
    }
    for v in vertices {
        v.position[0] += delta.x;
        v.position[1] += delta.y;
    }
}
