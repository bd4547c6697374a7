//! Rendering module
//!
//! Produces backend-agnostic geometry: triangle lists in arena pixels and
//! HUD text labels. With the `gpu` feature, `Vertex::desc()` gives the
//! matching `wgpu` vertex buffer layout.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::{Align, Frame, Label, build_frame, flash_opacity};
pub use vertex::{Vertex, colors};
