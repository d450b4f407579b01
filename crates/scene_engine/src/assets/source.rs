//! Byte sources the asset pipeline reads from

use super::AssetError;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Asynchronous, single-threaded byte source
#[async_trait(?Send)]
pub trait AssetSource {
    /// Read every byte behind `locator`
    async fn read_bytes(&self, locator: &str) -> Result<Vec<u8>, AssetError>;

    /// Read `locator` as UTF-8 text
    async fn read_text(&self, locator: &str) -> Result<String, AssetError> {
        let bytes = self.read_bytes(locator).await?;
        String::from_utf8(bytes)
            .map_err(|e| AssetError::Decode(format!("{locator} is not UTF-8: {e}")))
    }
}

/// Assets on the local filesystem, relative to a root directory
#[derive(Debug, Clone)]
pub struct FileAssets {
    root: PathBuf,
}

impl FileAssets {
    /// Serve files below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a locator below the root; parent components and absolute
    /// paths are refused so a scene cannot read outside its asset tree.
    fn resolve(&self, locator: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(locator);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AssetError::NotFound(locator.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait(?Send)]
impl AssetSource for FileAssets {
    async fn read_bytes(&self, locator: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(locator)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(locator.to_string()),
            _ => AssetError::Io {
                locator: locator.to_string(),
                source: e,
            },
        })
    }
}

/// In-memory assets, for tests and embedded content
#[derive(Debug, Default)]
pub struct MemoryAssets {
    entries: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryAssets {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite an entry
    pub fn insert(&self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.entries.borrow_mut().insert(locator.into(), bytes);
    }

    /// Add or overwrite a text entry
    pub fn insert_text(&self, locator: impl Into<String>, text: impl Into<String>) {
        self.insert(locator, text.into().into_bytes());
    }

    /// Remove an entry
    pub fn remove(&self, locator: &str) {
        self.entries.borrow_mut().remove(locator);
    }
}

#[async_trait(?Send)]
impl AssetSource for MemoryAssets {
    async fn read_bytes(&self, locator: &str) -> Result<Vec<u8>, AssetError> {
        self.entries
            .borrow()
            .get(locator)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(locator.to_string()))
    }
}
