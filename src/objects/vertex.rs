//! Vertex type shared by every mesh

use bytemuck::{Pod, Zeroable};

/// Mesh vertex: object-space position plus texture coordinate
///
/// Color-only meshes leave `uv` at zero; the color program ignores it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            uv: [0.0, 0.0],
        }
    }

    pub const fn textured(x: f32, y: f32, z: f32, s: f32, t: f32) -> Self {
        Self {
            position: [x, y, z],
            uv: [s, t],
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
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    use glam::Vec3;

    pub const FAR_MALLET: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const NEAR_MALLET: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    pub const PUCK: Vec3 = Vec3::new(0.8, 0.8, 1.0);
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
}
