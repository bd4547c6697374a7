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

    /// Position at location 0, color at location 1
    #[cfg(feature = "gpu")]
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Buffer layout for a triangle-list pipeline fed from `Frame::to_ndc`
    #[cfg(feature = "gpu")]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.53, 0.81, 0.92, 1.0]; // Sky
    pub const WALL: [f32; 4] = [0.55, 0.45, 0.35, 1.0];
    pub const CANNON: [f32; 4] = [0.15, 0.15, 0.15, 1.0];
    pub const CANNON_BASE: [f32; 4] = [0.3, 0.3, 0.3, 1.0];
    pub const BALL: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    pub const ATTACKER: [f32; 4] = [0.8, 0.2, 0.2, 1.0];
    pub const ATTACKER_WIDE: [f32; 4] = [0.55, 0.1, 0.1, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
    pub const POWER_BAR_BG: [f32; 4] = [0.2, 0.2, 0.2, 0.8];
    pub const POWER_BAR: [f32; 4] = [1.0, 0.8, 0.1, 1.0];
    pub const TEXT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const POWER_UP_TEXT: [f32; 4] = [0.1, 0.5, 0.1, 1.0];
    pub const EVENT_TEXT: [f32; 4] = [0.7, 0.1, 0.6, 1.0];
}
