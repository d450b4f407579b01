//! Component trait and hook context

use crate::audio::AudioManager;
use crate::core::Services;
use crate::events::EventBus;
use crate::foundation::math::Transform;
use crate::input::InputManager;
use crate::scene::{NodeKey, SceneGraph};
use bitflags::bitflags;
use std::any::Any;

bitflags! {
    /// Lifecycle hooks a component implements
    ///
    /// Read once when the component is attached; hooks that are not declared
    /// are never called.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Hooks: u8 {
        /// `on_start`, once after the scene is fully assembled
        const START = 1 << 0;
        /// `update`, once per simulated frame
        const UPDATE = 1 << 1;
        /// `on_collision_enter`, from a physics collaborator
        const COLLISION = 1 << 2;
        /// `on_destroy`, once when the owner is destroyed
        const DESTROY = 1 << 3;
    }
}

/// Upcast helper so components can be found by concrete type
pub trait AsAny: Any {
    /// `&dyn Any` view of `self`
    fn as_any(&self) -> &dyn Any;
    /// `&mut dyn Any` view of `self`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A capability attached to a [`GameObject`](super::GameObject)
///
/// Every hook has an empty default; [`Component::hooks`] declares which ones
/// the component actually overrides.
pub trait Component: AsAny {
    /// Hooks this component implements
    fn hooks(&self) -> Hooks;

    /// Called once after the owner and every sibling object are in the graph
    fn on_start(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called once per simulated frame while playing
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32, _input: &InputManager) {}

    /// Called when the owner starts touching another object
    fn on_collision_enter(&mut self, _ctx: &mut ComponentContext<'_>, _other: &CollisionInfo) {}

    /// Called once when the owner is destroyed
    fn on_destroy(&mut self, _ctx: &mut ComponentContext<'_>) {}
}

impl dyn Component {
    /// View as a concrete component type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable view as a concrete component type
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// The other side of a collision
#[derive(Debug, Clone)]
pub struct CollisionInfo {
    /// Name of the other object
    pub name: String,
    /// Transform node of the other object
    pub transform: NodeKey,
}

/// A component together with its attach-time hook set
pub(crate) struct ComponentSlot {
    pub(crate) component: Box<dyn Component>,
    pub(crate) hooks: Hooks,
}

impl ComponentSlot {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        let hooks = component.hooks();
        Self { component, hooks }
    }

    pub(crate) fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.component.as_ref().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.component.as_mut().downcast_mut::<T>()
    }
}

/// Per-object state a hook may read or change
#[derive(Debug)]
pub(crate) struct ObjectState {
    pub(crate) name: String,
    pub(crate) transform: NodeKey,
    pub(crate) destroy_requested: bool,
    pub(crate) services: Option<Services>,
}

impl ObjectState {
    /// Replace the owned transform with `node`, carrying over position,
    /// rotation, scale, name, graph placement and children.
    pub(crate) fn adopt_transform(&mut self, graph: &mut SceneGraph, node: NodeKey) -> bool {
        let old = self.transform;
        if old == node || !graph.contains(node) {
            return false;
        }
        if let Some(placeholder) = graph.get(old) {
            let local = placeholder.transform.clone();
            let children = placeholder.children().to_vec();
            if let Some(target) = graph.get_mut(node) {
                target.transform = local;
                target.name.clone_from(&self.name);
            }
            graph.replace(old, node);
            for child in children {
                graph.add(node, child);
            }
            graph.remove(old);
        } else if let Some(target) = graph.get_mut(node) {
            target.name.clone_from(&self.name);
        }
        self.transform = node;
        true
    }
}

/// What a hook sees: its owner, the scene graph and its sibling components
pub struct ComponentContext<'a> {
    pub(crate) object: &'a mut ObjectState,
    pub(crate) graph: &'a mut SceneGraph,
    pub(crate) before: &'a mut [ComponentSlot],
    pub(crate) after: &'a mut [ComponentSlot],
}

impl<'a> ComponentContext<'a> {
    /// Owner's name
    pub fn name(&self) -> &str {
        &self.object.name
    }

    /// Owner's transform node
    pub fn transform_key(&self) -> NodeKey {
        self.object.transform
    }

    /// Owner's local transform
    pub fn transform(&self) -> Option<&Transform> {
        self.graph.get(self.object.transform).map(|n| &n.transform)
    }

    /// Owner's local transform, mutable
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.graph.get_mut(self.object.transform).map(|n| &mut n.transform)
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &*self.graph
    }

    /// The scene graph, mutable
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut *self.graph
    }

    /// Swap the owner's transform for `node`, keeping its placement
    pub fn adopt_transform(&mut self, node: NodeKey) -> bool {
        self.object.adopt_transform(&mut *self.graph, node)
    }

    /// First sibling component of type `T`, in addition order
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(ComponentSlot::downcast_ref::<T>)
    }

    /// First sibling component of type `T`, mutable
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find_map(ComponentSlot::downcast_mut::<T>)
    }

    /// Services the owner was built with, if any
    pub fn services(&self) -> Option<&Services> {
        self.object.services.as_ref()
    }

    /// Shared event bus
    pub fn events(&self) -> Option<&EventBus> {
        self.object.services.as_ref().map(|s| &*s.events)
    }

    /// Shared audio manager
    pub fn audio(&self) -> Option<&AudioManager> {
        self.object.services.as_ref().map(|s| &*s.audio)
    }

    /// Ask for the owner to be destroyed once the current hook pass ends
    pub fn destroy(&mut self) {
        self.object.destroy_requested = true;
    }
}
