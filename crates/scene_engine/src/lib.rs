//! # Scene Engine
//!
//! A lifecycle and orchestration runtime for declarative 3D scenes.
//!
//! ## Features
//!
//! - **GameObjects and Components**: ordered components with optional
//!   `on_start`, `update`, `on_collision_enter` and `on_destroy` hooks
//! - **Declarative Scenes**: scenes described as JSON, TOML or RON documents
//!   and assembled asynchronously from an asset source
//! - **Event Bus**: named events with JSON payloads, reachable from every hook
//! - **Trusted Scripts**: behaviors created by name from a registry, never
//!   from inline source
//! - **Hot Reloading**: a scene can be torn down and rebuilt from its document
//!   while frames keep ticking
//! - **Simulation Clock**: play, pause and stop with a single `delta_time`
//! - **Debug Helpers**: bounding boxes that follow every live object
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//! use std::rc::Rc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let source = Rc::new(FileAssets::new(&config.assets.assets_dir));
//!     let mut renderer = HeadlessRenderer::new();
//!     Engine::run(config, ScriptRegistry::with_builtins(), &mut renderer, source)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Engine-wide configuration
pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod input;
pub mod audio;
pub mod events;
pub mod object;
pub mod scripts;
pub mod scene;
pub mod debug;
pub mod game_loop;

mod engine;

#[cfg(test)]
mod testing;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError,
        assets::{AssetError, AssetLoader, AssetSource, FileAssets, MemoryAssets},
        audio::AudioManager,
        core::{Config, EngineConfig, KeyBindings, Services},
        debug::DebugManager,
        events::{EventBus, SubscriptionId},
        foundation::{
            math::{Quat, Transform, Vec3},
            time::{PlayState, TimeManager},
        },
        game_loop::GameLoop,
        input::{InputManager, KeyCode, MouseButton},
        object::{CollisionInfo, Component, ComponentContext, GameObject, Hooks},
        render::{HeadlessRenderer, Renderer},
        scene::{LoadedScene, Scene, SceneError, SceneGraph, SceneLoader, SceneManager},
        scripts::{ScriptDescriptor, ScriptError, ScriptParams, ScriptRegistry},
    };
}
