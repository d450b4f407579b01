//! # Core Engine Module
//!
//! Engine-wide configuration shared by the runtime and applications, and the
//! services every game object can reach.

pub mod config;
pub mod services;

pub use config::{AssetConfig, EngineConfig, KeyBindings, SceneEntry, WindowConfig};
pub use services::Services;
pub use crate::config::{Config, ConfigError};
