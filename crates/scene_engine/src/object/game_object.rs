//! GameObject: named entity, owned transform, ordered components

use super::component::{CollisionInfo, Component, ComponentContext, ComponentSlot, Hooks, ObjectState};
use crate::core::Services;
use crate::input::InputManager;
use crate::scene::{NodeKey, NodeKind, SceneGraph};

/// An entity in a scene
///
/// Component order is the hook order: a component another one looks up in
/// `on_start` must be added first.
pub struct GameObject {
    state: ObjectState,
    components: Vec<ComponentSlot>,
    destroyed: bool,
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.state.name)
            .field("transform", &self.state.transform)
            .field("components", &self.components.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl GameObject {
    /// Create an object with a fresh, detached placeholder transform
    pub fn new(name: impl Into<String>, graph: &mut SceneGraph) -> Self {
        let name = name.into();
        let transform = graph.create(name.clone(), NodeKind::Group);
        Self::with_transform(name, transform)
    }

    /// Create an object that owns an existing node
    pub fn with_transform(name: impl Into<String>, transform: NodeKey) -> Self {
        Self {
            state: ObjectState {
                name: name.into(),
                transform,
                destroy_requested: false,
                services: None,
            },
            components: Vec::new(),
            destroyed: false,
        }
    }

    /// Display name (not unique)
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// The owned transform node; also this object's identity in the graph
    pub fn transform(&self) -> NodeKey {
        self.state.transform
    }

    /// Whether `destroy` has run
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Give hooks access to the shared services
    pub fn set_services(&mut self, services: Services) {
        self.state.services = Some(services);
    }

    /// Shared services, once set
    pub fn services(&self) -> Option<&Services> {
        self.state.services.as_ref()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Append a component; its hook set is captured now
    pub fn add_component(&mut self, component: Box<dyn Component>) {
        self.components.push(ComponentSlot::new(component));
    }

    /// Append a concrete component
    pub fn add<C: Component>(&mut self, component: C) {
        self.add_component(Box::new(component));
    }

    /// First component of type `T`, in addition order
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(ComponentSlot::downcast_ref::<T>)
    }

    /// First component of type `T`, mutable
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(ComponentSlot::downcast_mut::<T>)
    }

    /// Replace the owned transform, migrating position, rotation and scale
    pub fn adopt_transform(&mut self, graph: &mut SceneGraph, node: NodeKey) -> bool {
        self.state.adopt_transform(graph, node)
    }

    /// Run every component's `on_start`
    pub fn on_start(&mut self, graph: &mut SceneGraph) {
        self.dispatch(graph, Hooks::START, |component, ctx| component.on_start(ctx));
        self.apply_destroy_request(graph);
    }

    /// Run every component's `update`
    pub fn update(&mut self, delta_time: f32, graph: &mut SceneGraph, input: &InputManager) {
        if self.destroyed {
            return;
        }
        self.dispatch(graph, Hooks::UPDATE, |component, ctx| {
            component.update(ctx, delta_time, input);
        });
        self.apply_destroy_request(graph);
    }

    /// Forward a collision to every component
    pub fn on_collision_enter(&mut self, graph: &mut SceneGraph, other: &CollisionInfo) {
        if self.destroyed {
            return;
        }
        self.dispatch(graph, Hooks::COLLISION, |component, ctx| {
            component.on_collision_enter(ctx, other);
        });
        self.apply_destroy_request(graph);
    }

    /// Fire `on_destroy` on every component, then detach the transform.
    ///
    /// Only the first call has any effect.
    pub fn destroy(&mut self, graph: &mut SceneGraph) {
        if self.destroyed {
            return;
        }
        self.dispatch(graph, Hooks::DESTROY, |component, ctx| component.on_destroy(ctx));
        graph.detach(self.state.transform);
        self.destroyed = true;
        log::debug!("GameObject \"{}\" destroyed", self.state.name);
    }

    fn apply_destroy_request(&mut self, graph: &mut SceneGraph) {
        if self.state.destroy_requested {
            self.destroy(graph);
        }
    }

    fn dispatch<F>(&mut self, graph: &mut SceneGraph, hook: Hooks, mut call: F)
    where
        F: FnMut(&mut dyn Component, &mut ComponentContext<'_>),
    {
        for index in 0..self.components.len() {
            if !self.components[index].hooks.contains(hook) {
                continue;
            }
            let (before, rest) = self.components.split_at_mut(index);
            let Some((current, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = ComponentContext {
                object: &mut self.state,
                graph: &mut *graph,
                before,
                after,
            };
            call(current.component.as_mut(), &mut ctx);
        }
    }
}
