//! # Engine Configuration
//!
//! Everything an application decides before the first frame: viewport size,
//! where assets live, which scenes exist and which one starts, the system
//! key bindings and the frame rate.
//!
//! Loads from `.toml`, `.ron` or `.json` through [`Config`].

use crate::input::KeyCode;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// # Window Configuration
///
/// Viewport dimensions; cameras take their aspect ratio from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WindowConfig {
    /// Viewport width / height
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Engine".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// # Asset Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory every asset locator is relative to
    pub assets_dir: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            assets_dir: "resources".to_string(),
        }
    }
}

/// # System Key Bindings
///
/// Keys the frame loop reacts to on their pressed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Show or hide debug bounds
    pub debug_toggle: KeyCode,
    /// Pause or resume the clock
    pub pause: KeyCode,
    /// Reload the active scene
    pub reload: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            debug_toggle: KeyCode::Backquote,
            pause: KeyCode::P,
            reload: KeyCode::R,
        }
    }
}

/// A scene the engine registers at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
    /// Registered name
    pub name: String,
    /// Document locator, relative to the asset directory
    pub source: String,
}

/// # Engine Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Frames per second the driver aims for
    pub target_fps: u32,
    /// Viewport
    pub window: WindowConfig,
    /// Asset location
    pub assets: AssetConfig,
    /// System keys
    pub keys: KeyBindings,
    /// Scenes to register
    pub scenes: Vec<SceneEntry>,
    /// Scene loaded before the first frame
    pub initial_scene: String,
}

impl EngineConfig {
    /// Configuration with the default `level-1` scene
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: 60,
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
            keys: KeyBindings::default(),
            scenes: vec![SceneEntry {
                name: "level-1".to_string(),
                source: "scenes/level-1.json".to_string(),
            }],
            initial_scene: "level-1".to_string(),
        }
    }

    /// Set the asset directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets.assets_dir = dir.into();
        self
    }

    /// Set the viewport size
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set the frame rate
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Register another scene, or repoint an existing one
    pub fn with_scene(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        let source = source.into();
        match self.scenes.iter_mut().find(|s| s.name == name) {
            Some(entry) => entry.source = source,
            None => self.scenes.push(SceneEntry { name, source }),
        }
        self
    }

    /// Choose the scene loaded first
    pub fn with_initial_scene(mut self, name: impl Into<String>) -> Self {
        self.initial_scene = name.into();
        self
    }

    /// Seconds per frame at the target rate
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.target_fps == 0 {
            return Err("Target FPS must be at least 1".to_string());
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err("Window dimensions must be non-zero".to_string());
        }
        if !self.scenes.iter().any(|s| s.name == self.initial_scene) {
            return Err(format!("Initial scene \"{}\" is not in the scene list", self.initial_scene));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}
