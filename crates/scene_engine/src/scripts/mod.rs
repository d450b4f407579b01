//! Script resolution
//!
//! Scene documents attach behavior through script descriptors:
//! `{ "type": "<name>", ...params }`. The type selects a factory from a
//! [`ScriptRegistry`] built at startup; nothing is ever compiled or evaluated
//! from document text. A descriptor that fails is logged and dropped without
//! affecting its neighbours.

pub mod audio_source;
pub mod camera_follow;
pub mod gravity;
pub mod keyboard_input;
pub mod rotator;

pub use audio_source::AudioSource;
pub use camera_follow::CameraFollow;
pub use gravity::Gravity;
pub use keyboard_input::KeyboardInput;
pub use rotator::Rotator;

use crate::object::Component;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Free-form descriptor parameters
pub type ScriptParams = serde_json::Map<String, serde_json::Value>;

/// Builds a component from descriptor parameters
pub type ScriptFactory = fn(&ScriptParams) -> Result<Box<dyn Component>, ScriptError>;

/// One script entry of a scene document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptDescriptor {
    /// Registry name
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Inline code; always rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<serde_json::Value>,
    /// Everything else, handed to the factory
    #[serde(flatten)]
    pub params: ScriptParams,
}

impl ScriptDescriptor {
    /// Descriptor for a registered type with no parameters
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    /// Read one raw descriptor entry.
    ///
    /// A `type` that is not a string never reaches the registry; inline
    /// `source` is still reported first.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ScriptError> {
        let serde_json::Value::Object(entry) = value else {
            return Err(ScriptError::InvalidParams {
                kind: "<unknown>".to_string(),
                message: format!("descriptor must be an object, got {value}"),
            });
        };
        let mut params = entry.clone();
        let source = params.remove("source").filter(|v| !v.is_null());
        let kind = match params.remove("type") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(kind)) => Some(kind),
            Some(other) if source.is_some() => return Err(ScriptError::InlineSource(other.to_string())),
            Some(other) => return Err(ScriptError::UnknownType(other.to_string())),
        };
        Ok(Self { kind, source, params })
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Script resolution errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Descriptor has no `type`
    #[error("Script descriptor has no type")]
    MissingType,

    /// `type` is not in the registry
    #[error("Unknown script type: {0}")]
    UnknownType(String),

    /// Descriptor carries inline code
    #[error("Inline script source is not allowed (type: {0})")]
    InlineSource(String),

    /// Parameters did not match what the factory expects
    #[error("Invalid parameters for script {kind}: {message}")]
    InvalidParams {
        /// Script type
        kind: String,
        /// What was wrong
        message: String,
    },
}

/// Deserialize a factory's parameter struct from descriptor params
pub fn parse_params<T: DeserializeOwned>(kind: &str, params: &ScriptParams) -> Result<T, ScriptError> {
    serde_json::from_value(serde_json::Value::Object(params.clone())).map_err(|e| ScriptError::InvalidParams {
        kind: kind.to_string(),
        message: e.to_string(),
    })
}

/// Closed name → factory table
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    factories: HashMap<String, ScriptFactory>,
}

impl ScriptRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the engine's built-in scripts
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(rotator::NAME, rotator::create);
        registry.register(gravity::NAME, gravity::create);
        registry.register(keyboard_input::NAME, keyboard_input::create);
        registry.register(camera_follow::NAME, camera_follow::create);
        registry.register(audio_source::NAME, audio_source::create);
        registry
    }

    /// Add or replace a factory
    pub fn register(&mut self, name: impl Into<String>, factory: ScriptFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            log::warn!("ScriptRegistry: factory \"{}\" replaced", name);
        }
    }

    /// Whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve and instantiate one descriptor
    pub fn create(&self, descriptor: &ScriptDescriptor) -> Result<Box<dyn Component>, ScriptError> {
        let kind = descriptor.kind.as_deref();
        if descriptor.source.is_some() {
            return Err(ScriptError::InlineSource(kind.unwrap_or("inline").to_string()));
        }
        let kind = kind.ok_or(ScriptError::MissingType)?;
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| ScriptError::UnknownType(kind.to_string()))?;
        factory(&descriptor.params)
    }
}

/// Instantiate every descriptor entry that resolves, in order; failures are
/// logged and left out.
pub fn load_scripts(registry: &ScriptRegistry, entries: &[serde_json::Value]) -> Vec<Box<dyn Component>> {
    entries
        .iter()
        .filter_map(|entry| {
            match ScriptDescriptor::from_value(entry).and_then(|descriptor| registry.create(&descriptor)) {
                Ok(component) => Some(component),
                Err(e) => {
                    let kind = entry.get("type").map_or_else(|| "inline".to_string(), ToString::to_string);
                    log::error!("Failed to load or instantiate script component: {} ({})", kind, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(descriptors: &[ScriptDescriptor]) -> Vec<serde_json::Value> {
        descriptors.iter().map(|d| serde_json::to_value(d).unwrap()).collect()
    }

    #[test]
    fn test_descriptor_keeps_extra_keys_as_params() {
        let descriptor: ScriptDescriptor =
            serde_json::from_str(r#"{ "type": "camera-follow", "target": "player", "smooth_speed": 0.5 }"#).unwrap();
        assert_eq!(descriptor.kind.as_deref(), Some("camera-follow"));
        assert!(descriptor.source.is_none());
        assert_eq!(descriptor.params["target"], "player");
        assert_eq!(descriptor.params.len(), 2);
    }

    #[test]
    fn test_failures_are_dropped_and_order_kept() {
        let registry = ScriptRegistry::with_builtins();
        let descriptors = vec![
            ScriptDescriptor::of_type("rotator").with_param("speed", 3.0),
            ScriptDescriptor::of_type("does-not-exist"),
            ScriptDescriptor::default(),
            ScriptDescriptor::of_type("gravity"),
            ScriptDescriptor::of_type("rotator").with_param("speed", "fast"),
            ScriptDescriptor::of_type("keyboard-input"),
        ];

        let components = load_scripts(&registry, &entries(&descriptors));

        assert_eq!(components.len(), 3);
        let rotator = components[0].downcast_ref::<Rotator>().unwrap();
        assert_eq!(rotator.speed, 3.0);
        assert!(components[1].downcast_ref::<Gravity>().is_some());
        assert!(components[2].downcast_ref::<KeyboardInput>().is_some());
    }

    #[test]
    fn test_inline_source_rejected_even_for_known_type() {
        let registry = ScriptRegistry::with_builtins();
        let descriptor: ScriptDescriptor =
            serde_json::from_str(r#"{ "type": "rotator", "source": "update() { steal() }" }"#).unwrap();

        assert!(matches!(registry.create(&descriptor), Err(ScriptError::InlineSource(_))));
        assert!(load_scripts(&registry, &entries(&[descriptor])).is_empty());
    }

    #[test]
    fn test_missing_and_unknown_type() {
        let registry = ScriptRegistry::with_builtins();
        assert!(matches!(
            registry.create(&ScriptDescriptor::default()),
            Err(ScriptError::MissingType)
        ));
        assert!(matches!(
            registry.create(&ScriptDescriptor::of_type("eval")),
            Err(ScriptError::UnknownType(name)) if name == "eval"
        ));
    }

    #[test]
    fn test_custom_factory_registration() {
        fn spin_fast(_: &ScriptParams) -> Result<Box<dyn Component>, ScriptError> {
            Ok(Box::new(Rotator { speed: 10.0 }))
        }

        let mut registry = ScriptRegistry::with_builtins();
        registry.register("spin-fast", spin_fast);

        assert!(registry.contains("spin-fast"));
        assert_eq!(
            registry.names(),
            ["audio-source", "camera-follow", "gravity", "keyboard-input", "rotator", "spin-fast"]
        );
        let components = load_scripts(&registry, &[json!({ "type": "spin-fast" })]);
        assert_eq!(components.len(), 1);
    }

    #[test]
    fn test_malformed_entries_dropped_individually() {
        let registry = ScriptRegistry::with_builtins();
        let raw = [
            json!({ "type": 5 }),
            json!("rotator"),
            json!({ "type": ["gravity"] }),
            json!({ "type": "rotator", "speed": 2.0 }),
        ];

        assert!(matches!(ScriptDescriptor::from_value(&raw[0]), Err(ScriptError::UnknownType(t)) if t == "5"));
        assert!(matches!(ScriptDescriptor::from_value(&raw[1]), Err(ScriptError::InvalidParams { .. })));

        let components = load_scripts(&registry, &raw);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].downcast_ref::<Rotator>().unwrap().speed, 2.0);
    }

    #[test]
    fn test_inline_source_wins_over_bad_type() {
        let descriptor = ScriptDescriptor::from_value(&json!({ "type": 7, "source": "x()" }));
        assert!(matches!(descriptor, Err(ScriptError::InlineSource(_))));
    }
}
