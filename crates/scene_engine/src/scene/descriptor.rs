//! Scene document schema
//!
//! Every field a document may omit has a documented default applied by the
//! loader, not here; these types only mirror what was written.

use crate::foundation::math::Vec3;
use crate::render::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A whole scene document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Environment settings
    #[serde(default)]
    pub scene: EnvironmentDescriptor,
    /// Light sources, read one by one so a malformed entry only drops itself
    #[serde(default)]
    pub lights: Vec<serde_json::Value>,
    /// The scene camera; required
    pub camera: CameraDescriptor,
    /// Game objects, in start order
    #[serde(default)]
    pub objects: Vec<ObjectDescriptor>,
}

/// `{ x, y, z }` with missing axes at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X
    #[serde(default)]
    pub x: f32,
    /// Y
    #[serde(default)]
    pub y: f32,
    /// Z
    #[serde(default)]
    pub z: f32,
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Background settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    /// Flat background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    /// Six cubemap face locators (+X, -X, +Y, -Y, +Z, -Z)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skybox: Option<Vec<String>>,
}

/// One light, as read from a single `lights` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightDescriptor {
    /// Light type tag, e.g. `PointLight`
    #[serde(rename = "type")]
    pub kind: String,
    /// Emitted color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Intensity multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    /// Placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl LightDescriptor {
    /// Read one raw `lights` entry
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// The camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDescriptor {
    /// `perspective` or `orthographic` (long forms accepted)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Vertical field of view in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
    /// Near clip distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near: Option<f32>,
    /// Far clip distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f32>,
    /// Orthographic view height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    /// Orthographic zoom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f32>,
    /// Placement; required
    pub position: Position,
    /// Script descriptors attached to the camera
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<serde_json::Value>,
}

/// One game object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// External model locator; wins over `geometry`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Primitive shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryDescriptor>,
    /// Surface of the primitive shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialDescriptor>,
    /// Script descriptors attached to the object
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<serde_json::Value>,
}

/// Primitive geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDescriptor {
    /// Geometry type tag, e.g. `BoxGeometry`
    #[serde(rename = "type")]
    pub kind: String,
    /// Width (radius for round shapes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
}

/// Material parameters
///
/// String values under `map` or keys ending in `Map` are texture locators;
/// every other key is passed through to the material untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    /// Material model tag
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Base color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Tiling applied to every loaded texture map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatDescriptor>,
    /// Texture locators and opaque parameters
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_json::Value>,
}

fn is_texture_key(key: &str) -> bool {
    key == "map" || key.ends_with("Map")
}

impl MaterialDescriptor {
    /// `(key, locator)` for every texture map entry
    pub fn texture_maps(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().filter_map(|(key, value)| match value {
            serde_json::Value::String(locator) if is_texture_key(key) => Some((key.as_str(), locator.as_str())),
            _ => None,
        })
    }

    /// Every entry that is not a texture map
    pub fn plain_params(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.params
            .iter()
            .filter(|(key, value)| !(is_texture_key(key) && value.is_string()))
    }
}

/// Texture tiling; missing axes repeat once
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatDescriptor {
    /// Repeats along U
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Repeats along V
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}
