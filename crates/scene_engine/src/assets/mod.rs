//! Asset pipeline
//!
//! Scene documents, textures, cubemaps, models and audio all arrive through an
//! [`AssetSource`]. Reads are asynchronous and suspend only the load that
//! issued them; the frame loop keeps ticking meanwhile. Everything runs on one
//! thread, so sources are `?Send`.

pub mod image_loader;
pub mod obj_loader;
mod source;

pub use image_loader::ImageData;
pub use obj_loader::ModelAsset;
pub use source::{AssetSource, FileAssets, MemoryAssets};

use crate::render::Texture;
use std::rc::Rc;
use thiserror::Error;

/// Six textures, in +X, -X, +Y, -Y, +Z, -Z order
#[derive(Debug, Clone, PartialEq)]
pub struct CubeTexture {
    /// Faces in +X, -X, +Y, -Y, +Z, -Z order
    pub faces: Vec<Texture>,
}

/// High-level loader turning raw asset bytes into engine resources
#[derive(Clone)]
pub struct AssetLoader {
    source: Rc<dyn AssetSource>,
}

impl AssetLoader {
    /// Wrap a source
    pub fn new(source: Rc<dyn AssetSource>) -> Self {
        Self { source }
    }

    /// The underlying source
    pub fn source(&self) -> &Rc<dyn AssetSource> {
        &self.source
    }

    /// Read a UTF-8 document
    pub async fn load_text(&self, locator: &str) -> Result<String, AssetError> {
        self.source.read_text(locator).await
    }

    /// Read raw bytes
    pub async fn load_bytes(&self, locator: &str) -> Result<Vec<u8>, AssetError> {
        self.source.read_bytes(locator).await
    }

    /// Fetch and decode a texture
    pub async fn load_texture(&self, locator: &str) -> Result<Texture, AssetError> {
        let bytes = self.source.read_bytes(locator).await?;
        let image = ImageData::from_bytes(&bytes)?;
        log::debug!("Loaded texture {} ({}x{})", locator, image.width, image.height);
        Ok(Texture {
            source: locator.to_string(),
            width: image.width,
            height: image.height,
            wrap: Default::default(),
            repeat: (1.0, 1.0),
        })
    }

    /// Fetch all six faces of a cubemap; any failing face fails the cubemap
    pub async fn load_cubemap(&self, faces: &[String]) -> Result<CubeTexture, AssetError> {
        if faces.len() != 6 {
            return Err(AssetError::Decode(format!(
                "cubemap needs 6 faces, got {}",
                faces.len()
            )));
        }
        let mut loaded = Vec::with_capacity(6);
        for face in faces {
            loaded.push(self.load_texture(face).await?);
        }
        Ok(CubeTexture { faces: loaded })
    }

    /// Fetch and parse an external model
    pub async fn load_model(&self, locator: &str) -> Result<ModelAsset, AssetError> {
        let path = locator.split(['?', '#']).next().unwrap_or(locator);
        if !path.to_ascii_lowercase().ends_with(".obj") {
            return Err(AssetError::UnsupportedFormat(locator.to_string()));
        }
        let text = self.source.read_text(locator).await?;
        let model = obj_loader::parse_obj(locator, &text)?;
        log::debug!(
            "Loaded model {} ({} vertices, {} faces)",
            locator,
            model.vertex_count,
            model.face_count
        );
        Ok(model)
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Nothing exists at the locator
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Underlying read failed
    #[error("IO error reading {locator}: {source}")]
    Io {
        /// Locator being read
        locator: String,
        /// Cause
        #[source]
        source: std::io::Error,
    },

    /// Bytes were read but could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// No decoder for this kind of asset
    #[error("Unsupported asset format: {0}")]
    UnsupportedFormat(String),
}
