//! A named, loadable scene

use super::{NodeKey, SceneGraph};
use crate::object::GameObject;

/// Everything a loaded scene owns
#[derive(Debug)]
pub struct LoadedScene {
    /// Rendering root
    pub graph: SceneGraph,
    /// Camera node presented by the renderer
    pub camera: NodeKey,
    /// Camera object first, then the document's objects in order
    pub game_objects: Vec<GameObject>,
}

impl LoadedScene {
    /// Objects that have not been destroyed
    pub fn live_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.game_objects.iter().filter(|go| !go.is_destroyed())
    }

    /// First object with this name
    pub fn find_object(&self, name: &str) -> Option<&GameObject> {
        self.game_objects.iter().find(|go| go.name() == name)
    }

    /// Drop destroyed objects, keeping survivors in order.
    ///
    /// Each removed object's transform subtree leaves the graph with it.
    pub fn compact(&mut self) -> usize {
        let before = self.game_objects.len();
        let graph = &mut self.graph;
        self.game_objects.retain(|go| {
            if go.is_destroyed() {
                graph.remove(go.transform());
                false
            } else {
                true
            }
        });
        before - self.game_objects.len()
    }

    /// Destroy every object
    fn destroy_all(&mut self) {
        for object in &mut self.game_objects {
            object.destroy(&mut self.graph);
        }
    }
}

/// A registered scene and, while loaded, its contents
#[derive(Debug)]
pub struct Scene {
    name: String,
    source: String,
    payload: Option<LoadedScene>,
}

impl Scene {
    /// A registered, unloaded scene
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            payload: None,
        }
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Document locator
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Whether the scene holds a payload
    pub fn is_loaded(&self) -> bool {
        self.payload.is_some()
    }

    /// Loaded contents
    pub fn loaded(&self) -> Option<&LoadedScene> {
        self.payload.as_ref()
    }

    /// Loaded contents, mutable
    pub fn loaded_mut(&mut self) -> Option<&mut LoadedScene> {
        self.payload.as_mut()
    }

    /// Scene graph of a loaded scene
    pub fn graph(&self) -> Option<&SceneGraph> {
        self.payload.as_ref().map(|p| &p.graph)
    }

    /// Camera node of a loaded scene
    pub fn camera(&self) -> Option<NodeKey> {
        self.payload.as_ref().map(|p| p.camera)
    }

    /// Objects of a loaded scene; empty when unloaded
    pub fn game_objects(&self) -> &[GameObject] {
        self.payload.as_ref().map_or(&[], |p| &p.game_objects)
    }

    pub(crate) fn attach(&mut self, payload: LoadedScene) {
        self.payload = Some(payload);
    }

    /// Destroy every object and drop the contents
    pub fn unload(&mut self) {
        if let Some(mut payload) = self.payload.take() {
            payload.destroy_all();
            log::info!("Scene \"{}\" unloaded.", self.name);
        }
    }
}
