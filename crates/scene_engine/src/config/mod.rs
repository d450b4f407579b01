//! Configuration system
//!
//! Documents are parsed by file extension: `.toml`, `.ron` and `.json`.

pub use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;

/// Document formats understood by the configuration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// TOML
    Toml,
    /// Rusty Object Notation
    Ron,
    /// JSON
    Json,
}

impl Format {
    /// Pick a format from a path or locator's extension
    pub fn from_locator(locator: &str) -> Result<Self, ConfigError> {
        // query strings and fragments never carry the extension
        let path = locator.split(['?', '#']).next().unwrap_or(locator);
        if path.ends_with(".toml") {
            Ok(Self::Toml)
        } else if path.ends_with(".ron") {
            Ok(Self::Ron)
        } else if path.ends_with(".json") {
            Ok(Self::Json)
        } else {
            Err(ConfigError::UnsupportedFormat(locator.to_string()))
        }
    }
}

/// Parse `contents` as `T` using the format implied by `locator`
pub fn from_str_for<T: DeserializeOwned>(locator: &str, contents: &str) -> Result<T, ConfigError> {
    match Format::from_locator(locator)? {
        Format::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        Format::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        Format::Json => serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;
        from_str_for(path, &contents)
    }
    
    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = match Format::from_locator(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    
    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
