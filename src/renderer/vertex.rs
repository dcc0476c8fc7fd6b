//! Colored 2D vertex in clip space

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::screen_to_ndc;
use crate::sim::Rgb;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub clip: [f32; 2],
    pub rgba: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Vertex at a playfield pixel
    pub fn at(pixel: Vec2, color: Rgb) -> Self {
        Self {
            clip: screen_to_ndc(pixel).to_array(),
            rgba: color.to_rgba_f32(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
