//! Triangle-list tessellation of scene shapes
//!
//! Input rectangles are in playfield pixels; output vertices are already in
//! clip space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::{Rect, Rgb};
use crate::ui::Scene;

/// Segments used to tessellate a bubble
pub const BUBBLE_SEGMENTS: u32 = 32;

/// Filled ellipse inscribed in `rect`, as a fan around its center
pub fn ellipse(rect: &Rect, color: Rgb, segments: u32) -> Vec<Vertex> {
    let center = rect.pos.as_vec2() + rect.size.as_vec2() / 2.0;
    let radii = rect.size.as_vec2() / 2.0;
    let rim = |i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        center + radii * Vec2::from_angle(theta)
    };

    (0..segments)
        .flat_map(|i| [center, rim(i), rim(i + 1)])
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Filled rectangle as two triangles
pub fn rectangle(rect: &Rect, color: Rgb) -> Vec<Vertex> {
    let min = rect.pos.as_vec2();
    let max = min + rect.size.as_vec2();
    let top_right = Vec2::new(max.x, min.y);
    let bottom_left = Vec2::new(min.x, max.y);

    [min, bottom_left, top_right, top_right, bottom_left, max]
        .into_iter()
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Every sprite and button in draw order (bubbles first)
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        scene.sprites.len() * (BUBBLE_SEGMENTS * 3) as usize + scene.buttons.len() * 6,
    );
    for sprite in &scene.sprites {
        vertices.extend(ellipse(&sprite.rect, sprite.color, BUBBLE_SEGMENTS));
    }
    for button in &scene.buttons {
        vertices.extend(rectangle(&button.rect, button.fill));
    }
    vertices
}
