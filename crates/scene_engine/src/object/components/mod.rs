//! Engine-provided components

pub mod mesh_renderer;

pub use mesh_renderer::MeshRenderer;
