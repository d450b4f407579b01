//! Scenes: documents, the loading pipeline and the transition protocol

pub mod descriptor;
pub mod scene_graph;
mod scene;
mod scene_loader;
mod scene_manager;

pub use descriptor::SceneDocument;
pub use scene::{LoadedScene, Scene};
pub use scene_graph::{Aabb, Background, BoxHelper, Node, NodeKey, NodeKind, SceneGraph};
pub use scene_loader::SceneLoader;
pub use scene_manager::SceneManager;

use crate::assets::AssetError;
use crate::config::ConfigError;
use thiserror::Error;

/// Scene loading and transition errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// No scene registered under this name
    #[error("Scene \"{0}\" is not registered")]
    NotRegistered(String),

    /// Another load is in flight; the request was dropped
    #[error("Already loading a scene; request for \"{0}\" rejected")]
    AlreadyLoading(String),

    /// The scene document could not be fetched
    #[error("Failed to fetch scene config {locator}: {source}")]
    ConfigFetch {
        /// Document locator
        locator: String,
        /// Cause
        #[source]
        source: AssetError,
    },

    /// The scene document could not be parsed
    #[error("Failed to parse scene config {locator}: {source}")]
    ConfigParse {
        /// Document locator
        locator: String,
        /// Cause
        #[source]
        source: ConfigError,
    },

    /// The document parsed but describes something that cannot be built
    #[error("Invalid scene config: {0}")]
    InvalidConfig(String),

    /// A required asset failed to load
    #[error("Required asset failed to load: {0}")]
    Asset(#[from] AssetError),
}
