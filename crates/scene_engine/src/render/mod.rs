//! Rendering interface
//!
//! Rasterization is not done here. This module holds the data a renderer
//! consumes (meshes, materials, lights, projections) and the [`Renderer`]
//! seam the frame driver presents the active scene through.

pub mod color;
pub mod mesh;
pub mod light;
pub mod camera;

pub use color::Color;
pub use mesh::{Geometry, GeometryKind, Material, Mesh, Texture, TextureWrap};
pub use light::{Light, LightKind};
pub use camera::Projection;

use crate::scene::{NodeKey, SceneGraph};

/// Presents a scene graph from a camera once per frame
pub trait Renderer {
    /// Draw `graph` as seen from the `camera` node
    fn render(&mut self, graph: &SceneGraph, camera: NodeKey);
}

/// Renderer that draws nothing; counts frames for diagnostics and tests
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
}

impl HeadlessRenderer {
    /// Create a headless renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, graph: &SceneGraph, camera: NodeKey) {
        self.frames += 1;
        log::trace!(
            "frame {}: {} attached nodes, camera {:?}",
            self.frames,
            graph.attached_count(),
            camera
        );
    }
}
