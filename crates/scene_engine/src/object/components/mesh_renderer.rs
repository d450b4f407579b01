//! Renderable primitive
//!
//! Holds a built mesh until the owner starts, then swaps the owner's
//! placeholder transform for a mesh node that keeps its position, rotation
//! and scale. Releasing the mesh on destroy frees the material's textures.

use crate::object::{Component, ComponentContext, Hooks};
use crate::render::Mesh;
use crate::scene::{NodeKey, NodeKind};

/// Component that owns a mesh and its node
#[derive(Debug)]
pub struct MeshRenderer {
    pending: Option<Mesh>,
    node: Option<NodeKey>,
}

impl MeshRenderer {
    /// Wrap a mesh that will be placed on start
    pub fn new(mesh: Mesh) -> Self {
        Self {
            pending: Some(mesh),
            node: None,
        }
    }

    /// Mesh node once started
    pub fn node(&self) -> Option<NodeKey> {
        self.node
    }

    /// Whether the mesh has been placed in the graph
    pub fn is_placed(&self) -> bool {
        self.node.is_some()
    }
}

impl Component for MeshRenderer {
    fn hooks(&self) -> Hooks {
        Hooks::START | Hooks::DESTROY
    }

    fn on_start(&mut self, ctx: &mut ComponentContext<'_>) {
        let Some(mesh) = self.pending.take() else {
            return;
        };
        let name = ctx.name().to_string();
        let node = ctx.graph_mut().create(name, NodeKind::Mesh(mesh));
        if ctx.adopt_transform(node) {
            self.node = Some(node);
        } else {
            log::warn!("MeshRenderer: could not place mesh for \"{}\"", ctx.name());
            ctx.graph_mut().remove(node);
        }
    }

    fn on_destroy(&mut self, ctx: &mut ComponentContext<'_>) {
        if let Some(mesh) = self.pending.as_mut() {
            mesh.release();
        }
        let Some(node) = self.node else {
            return;
        };
        if let Some(NodeKind::Mesh(mesh)) = ctx.graph_mut().get_mut(node).map(|n| &mut n.kind) {
            mesh.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::object::GameObject;
    use crate::render::{Geometry, GeometryKind, Material};
    use crate::scene::SceneGraph;

    fn cube() -> Mesh {
        Mesh::new(
            Geometry { kind: GeometryKind::Box, width: 1.0, height: 1.0, depth: 1.0 },
            Material::missing(),
        )
    }

    #[test]
    fn test_start_swaps_placeholder_keeping_position() {
        let mut graph = SceneGraph::new();
        let mut object = GameObject::new("box", &mut graph);
        let placeholder = object.transform();
        graph.add_to_root(placeholder);
        graph.get_mut(placeholder).unwrap().transform.position = Vec3::new(2.0, 0.5, -1.0);
        object.add(MeshRenderer::new(cube()));

        object.on_start(&mut graph);

        let node = object.get_component::<MeshRenderer>().and_then(MeshRenderer::node).unwrap();
        assert_eq!(object.transform(), node);
        assert!(!graph.contains(placeholder));
        let placed = graph.get(node).unwrap();
        assert_eq!(placed.transform.position, Vec3::new(2.0, 0.5, -1.0));
        assert_eq!(placed.name, "box");
        assert!(matches!(placed.kind, NodeKind::Mesh(_)));
        assert_eq!(graph.find_by_name("box"), Some(node));
    }

    #[test]
    fn test_destroy_releases_mesh() {
        let mut graph = SceneGraph::new();
        let mut object = GameObject::new("box", &mut graph);
        graph.add_to_root(object.transform());
        object.add(MeshRenderer::new(cube()));
        object.on_start(&mut graph);

        object.destroy(&mut graph);

        let node = graph.get(object.transform()).unwrap();
        match &node.kind {
            NodeKind::Mesh(mesh) => assert!(mesh.is_released()),
            other => panic!("unexpected node kind {:?}", other),
        }
        assert!(!graph.is_attached(object.transform()));
    }

    #[test]
    fn test_destroy_before_start_is_safe() {
        let mut graph = SceneGraph::new();
        let mut object = GameObject::new("never-started", &mut graph);
        object.add(MeshRenderer::new(cube()));
        object.destroy(&mut graph);
        assert!(object.is_destroyed());
        assert!(!object.get_component::<MeshRenderer>().unwrap().is_placed());
    }
}
