//! Scene graph
//!
//! The rendering root of a loaded scene: an arena of named nodes with local
//! transforms and parent/child links. Keys are versioned, so a node that has
//! been removed is never confused with one created later. The key of a
//! GameObject's transform node is that object's spatial identity.

use crate::assets::{CubeTexture, ModelAsset};
use crate::foundation::math::{Transform, Vec3};
use crate::render::{Color, Light, Mesh, Projection};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeKey;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
    
    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point; `None` for an empty set
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }
    
    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
    
    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Axis-aligned box around this box after applying `transform`
    pub fn transformed(&self, transform: &Transform) -> Aabb {
        let corners: Vec<Vec3> = (0..8)
            .map(|i| {
                let corner = Vec3::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                );
                transform.position + transform.rotation * corner.component_mul(&transform.scale)
            })
            .collect();
        // eight corners always yield a box
        Aabb::from_points(&corners).unwrap_or(*self)
    }
}

/// What the renderer sees behind everything else
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Flat clear color
    Color(Color),
    /// Six-face environment map
    Cubemap(CubeTexture),
}

/// Wireframe box drawn around another node while debugging
#[derive(Debug, Clone, PartialEq)]
pub struct BoxHelper {
    /// Node whose bounds are visualized
    pub target: NodeKey,
    /// World-space bounds captured at the last refresh
    pub bounds: Option<Aabb>,
    /// Line color
    pub color: Color,
}

/// Payload of a scene node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform (placeholders, groups, the root)
    Group,
    /// Primitive renderable
    Mesh(Mesh),
    /// Loaded external model
    Model(ModelAsset),
    /// Light source
    Light(Light),
    /// Camera
    Camera(Projection),
    /// Debug visual aid
    BoxHelper(BoxHelper),
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name (not unique)
    pub name: String,
    /// Local transform relative to the parent
    pub transform: Transform,
    /// Payload
    pub kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Node {
    /// Parent node, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Bounds of this node's own payload in local space
    pub fn local_bounds(&self) -> Option<Aabb> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(Aabb::from_center_extents(Vec3::zeros(), mesh.geometry.half_extents())),
            NodeKind::Model(model) => model.bounds,
            _ => None,
        }
    }
}

/// Arena-backed scene graph with a fixed root
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    /// Clear color or environment map
    pub background: Background,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only its root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            name: "Scene".to_string(),
            transform: Transform::identity(),
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
        });
        Self {
            nodes,
            root,
            background: Background::Color(Color::BACKGROUND),
        }
    }

    /// The root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Create a detached node
    pub fn create(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeKey {
        self.nodes.insert(Node {
            name: name.into(),
            transform: Transform::identity(),
            kind,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Borrow a node
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Whether the key still refers to a node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Parent `child` under `parent`, detaching it from any previous parent.
    ///
    /// Returns `false` (and changes nothing) for stale keys or when the
    /// attachment would create a cycle.
    pub fn add(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor_or_self(child, parent) {
            log::warn!("SceneGraph: refusing to attach {:?} under {:?}", child, parent);
            return false;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Parent `child` under the root
    pub fn add_to_root(&mut self, child: NodeKey) -> bool {
        self.add(self.root, child)
    }

    /// Unlink a node from its parent; the node and its subtree stay alive.
    /// Returns whether it was attached.
    pub fn detach(&mut self, key: NodeKey) -> bool {
        let Some(parent) = self.nodes.get(key).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != key);
        }
        self.nodes[key].parent = None;
        true
    }

    /// Insert `replacement` at `old`'s position among its parent's children
    /// and detach `old`. A detached `old` leaves `replacement` detached too.
    pub fn replace(&mut self, old: NodeKey, replacement: NodeKey) -> bool {
        if old == replacement || !self.contains(old) || !self.contains(replacement) {
            return false;
        }
        let parent = self.nodes[old].parent;
        self.detach(replacement);
        if let Some(parent) = parent {
            if self.is_ancestor_or_self(replacement, parent) {
                return false;
            }
            let index = self.nodes[parent].children.iter().position(|c| *c == old);
            if let Some(index) = index {
                self.nodes[parent].children[index] = replacement;
                self.nodes[replacement].parent = Some(parent);
                self.nodes[old].parent = None;
            }
        }
        true
    }

    /// Remove a node and its whole subtree from the arena
    pub fn remove(&mut self, key: NodeKey) {
        if key == self.root {
            return;
        }
        self.detach(key);
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, key: NodeKey) -> bool {
        self.is_ancestor_or_self(self.root, key)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.nodes.get(k).and_then(|n| n.parent);
        }
        false
    }

    /// First attached node with this name, depth-first from the root
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        let mut stack = vec![self.root];
        while let Some(key) = stack.pop() {
            let node = &self.nodes[key];
            if node.name == name {
                return Some(key);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Transform of a node in world space
    pub fn world_transform(&self, key: NodeKey) -> Option<Transform> {
        let mut node = self.nodes.get(key)?;
        let mut world = node.transform.clone();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = node.transform.combine(&world);
        }
        Some(world)
    }

    /// World-space bounds of a node's payload and every descendant's
    pub fn world_bounds(&self, key: NodeKey) -> Option<Aabb> {
        let node = self.nodes.get(key)?;
        let own = node
            .local_bounds()
            .and_then(|local| Some(local.transformed(&self.world_transform(key)?)));
        node.children
            .iter()
            .filter_map(|child| self.world_bounds(*child))
            .fold(own, |acc, b| Some(acc.map_or(b, |a| a.union(&b))))
    }

    /// Number of nodes reachable from the root, root included
    pub fn attached_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(key) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[key].children.iter().copied());
        }
        count
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root is never removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Geometry, GeometryKind, Material};
    use approx::assert_relative_eq;

    fn unit_box() -> NodeKind {
        NodeKind::Mesh(Mesh::new(
            Geometry { kind: GeometryKind::Box, width: 2.0, height: 2.0, depth: 2.0 },
            Material::missing(),
        ))
    }

    #[test]
    fn test_find_by_name_first_match_depth_first() {
        let mut graph = SceneGraph::new();
        let a = graph.create("group", NodeKind::Group);
        let nested = graph.create("floor", NodeKind::Group);
        let later = graph.create("floor", NodeKind::Group);
        graph.add_to_root(a);
        graph.add(a, nested);
        graph.add_to_root(later);

        assert_eq!(graph.find_by_name("floor"), Some(nested));
        graph.detach(a);
        assert_eq!(graph.find_by_name("floor"), Some(later));
        assert_eq!(graph.find_by_name("missing"), None);
    }

    #[test]
    fn test_detach_keeps_node_alive() {
        let mut graph = SceneGraph::new();
        let node = graph.create("n", NodeKind::Group);
        assert!(!graph.detach(node));
        graph.add_to_root(node);
        assert!(graph.is_attached(node));
        assert!(graph.detach(node));
        assert!(!graph.detach(node));
        assert!(graph.contains(node));
        assert!(!graph.is_attached(node));
    }

    #[test]
    fn test_add_refuses_cycles() {
        let mut graph = SceneGraph::new();
        let parent = graph.create("p", NodeKind::Group);
        let child = graph.create("c", NodeKind::Group);
        assert!(graph.add(parent, child));
        assert!(!graph.add(child, parent));
        assert_eq!(graph.get(child).unwrap().parent(), Some(parent));
    }

    #[test]
    fn test_replace_keeps_sibling_order() {
        let mut graph = SceneGraph::new();
        let first = graph.create("first", NodeKind::Group);
        let placeholder = graph.create("placeholder", NodeKind::Group);
        let last = graph.create("last", NodeKind::Group);
        for key in [first, placeholder, last] {
            graph.add_to_root(key);
        }
        let mesh = graph.create("mesh", unit_box());

        assert!(graph.replace(placeholder, mesh));
        assert_eq!(graph.get(graph.root()).unwrap().children(), &[first, mesh, last]);
        assert!(!graph.is_attached(placeholder));
    }

    #[test]
    fn test_remove_drops_subtree_and_invalidates_keys() {
        let mut graph = SceneGraph::new();
        let parent = graph.create("p", NodeKind::Group);
        let child = graph.create("c", NodeKind::Group);
        graph.add_to_root(parent);
        graph.add(parent, child);

        graph.remove(parent);
        assert!(!graph.contains(parent));
        assert!(!graph.contains(child));
        assert_eq!(graph.len(), 1);

        let reused = graph.create("new", NodeKind::Group);
        assert_ne!(reused, parent);
        assert_ne!(reused, child);
    }

    #[test]
    fn test_world_bounds_follow_parent_chain() {
        let mut graph = SceneGraph::new();
        let parent = graph.create("p", NodeKind::Group);
        let mesh = graph.create("m", unit_box());
        graph.add_to_root(parent);
        graph.add(parent, mesh);
        graph.get_mut(parent).unwrap().transform.position = Vec3::new(10.0, 0.0, 0.0);
        graph.get_mut(mesh).unwrap().transform.position = Vec3::new(0.0, 5.0, 0.0);

        let bounds = graph.world_bounds(parent).unwrap();
        assert_relative_eq!(bounds.center(), Vec3::new(10.0, 5.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(bounds.extents(), Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-5);
        let empty = graph.create("empty", NodeKind::Group);
        assert!(graph.world_bounds(empty).is_none());
    }
}
