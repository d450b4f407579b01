//! GameObjects and their components
//!
//! A [`GameObject`] is a named entity owning one transform node in the scene
//! graph and an ordered list of [`Component`]s. Components are driven through
//! four optional lifecycle hooks, always in the order they were added.

pub mod component;
pub mod components;
mod game_object;

pub use component::{CollisionInfo, Component, ComponentContext, Hooks};
pub use game_object::GameObject;
