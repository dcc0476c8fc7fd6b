//! WebGPU rendering module
//!
//! Tessellates the UI scene into colored triangles. Text is drawn by the
//! host page on top of the canvas.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::consts::SCREEN_SIZE;

pub use pipeline::RenderState;
pub use shapes::scene_vertices;
pub use vertex::Vertex;

/// Playfield pixels (origin top-left, y down) to normalized device coordinates
///
/// The canvas is stretched to the fixed playfield, so the mapping does not
/// depend on the physical viewport size.
pub fn screen_to_ndc(pixel: Vec2) -> Vec2 {
    let unit = pixel / SCREEN_SIZE.as_vec2();
    Vec2::new(unit.x * 2.0 - 1.0, 1.0 - unit.y * 2.0)
}
