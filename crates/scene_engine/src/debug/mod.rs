//! Debug visualization
//!
//! While enabled, every live game object gets a bounding box helper under a
//! dedicated group in the scene graph. Helpers are keyed by the object's
//! transform node, never by name, and reconciled against the live set on
//! every update.

use crate::object::GameObject;
use crate::render::Color;
use crate::scene::{BoxHelper, LoadedScene, NodeKey, NodeKind, SceneGraph};
use std::collections::{HashMap, HashSet};

/// Name of the group node holding every helper
pub const DEBUG_ROOT_NAME: &str = "DebugHelpers";

/// Keeps bounding box helpers in sync with the live objects
#[derive(Debug, Default)]
pub struct DebugManager {
    enabled: bool,
    root: Option<NodeKey>,
    helpers: HashMap<NodeKey, NodeKey>,
}

impl DebugManager {
    /// Disabled manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether helpers are shown
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of helpers currently alive
    pub fn helper_count(&self) -> usize {
        self.helpers.len()
    }

    /// Helper node for the object whose transform is `target`
    pub fn helper_for(&self, target: NodeKey) -> Option<NodeKey> {
        self.helpers.get(&target).copied()
    }

    /// Flip visibility; enabling builds a helper per live object, disabling
    /// removes every helper
    pub fn toggle(&mut self, scene: Option<&mut LoadedScene>) {
        self.enabled = !self.enabled;
        log::info!("Debug mode {}.", if self.enabled { "enabled" } else { "disabled" });
        let Some(scene) = scene else {
            return;
        };
        if self.enabled {
            self.attach(scene);
        } else {
            self.detach(&mut scene.graph);
        }
    }

    /// Refresh helper bounds, then add and drop helpers to match the live set
    pub fn update(&mut self, scene: Option<&mut LoadedScene>) {
        if !self.enabled {
            return;
        }
        let Some(scene) = scene else {
            return;
        };
        if !self.root.is_some_and(|root| scene.graph.contains(root)) {
            self.attach(scene);
            return;
        }

        for helper in self.helpers.values() {
            refresh(&mut scene.graph, *helper);
        }
        self.sync(scene);
    }

    /// Forget helpers that lived in a scene graph that no longer exists
    pub fn scene_changed(&mut self) {
        self.root = None;
        self.helpers.clear();
    }

    fn attach(&mut self, scene: &mut LoadedScene) {
        self.detach(&mut scene.graph);
        let root = scene.graph.create(DEBUG_ROOT_NAME, NodeKind::Group);
        scene.graph.add_to_root(root);
        self.root = Some(root);
        self.sync(scene);
    }

    fn detach(&mut self, graph: &mut SceneGraph) {
        if let Some(root) = self.root.take() {
            if graph.contains(root) {
                graph.remove(root);
            }
        }
        self.helpers.clear();
    }

    fn sync(&mut self, scene: &mut LoadedScene) {
        let Some(root) = self.root else {
            return;
        };
        let live: HashSet<NodeKey> = scene.live_objects().map(GameObject::transform).collect();

        let graph = &mut scene.graph;
        self.helpers.retain(|target, helper| {
            let keep = live.contains(target);
            if !keep {
                graph.remove(*helper);
            }
            keep
        });

        for object in scene.game_objects.iter().filter(|go| !go.is_destroyed()) {
            let target = object.transform();
            if self.helpers.contains_key(&target) {
                continue;
            }
            let helper = scene.graph.create(
                format!("{}-bounds", object.name()),
                NodeKind::BoxHelper(BoxHelper {
                    target,
                    bounds: None,
                    color: Color::DEBUG,
                }),
            );
            scene.graph.add(root, helper);
            refresh(&mut scene.graph, helper);
            self.helpers.insert(target, helper);
        }
    }
}

fn refresh(graph: &mut SceneGraph, helper: NodeKey) {
    let Some(NodeKind::BoxHelper(BoxHelper { target, .. })) = graph.get(helper).map(|n| &n.kind) else {
        return;
    };
    let bounds = graph.world_bounds(*target);
    if let Some(NodeKind::BoxHelper(helper)) = graph.get_mut(helper).map(|n| &mut n.kind) {
        helper.bounds = bounds;
    }
}
