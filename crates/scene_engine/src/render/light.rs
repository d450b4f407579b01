//! Light sources placed by scene documents

use super::Color;

/// Supported light types, named as scene documents name them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Uniform light from every direction
    Ambient,
    /// Parallel rays from a direction (sun)
    Directional,
    /// Omnidirectional light from a point
    Point,
    /// Cone of light from a point
    Spot,
    /// Sky/ground gradient ambient
    Hemisphere,
}

impl LightKind {
    /// Resolve a document type tag such as `"PointLight"`
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "AmbientLight" => Some(Self::Ambient),
            "DirectionalLight" => Some(Self::Directional),
            "PointLight" => Some(Self::Point),
            "SpotLight" => Some(Self::Spot),
            "HemisphereLight" => Some(Self::Hemisphere),
            _ => None,
        }
    }
}

/// A light instance held by a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub kind: LightKind,
    /// Emitted color
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
}
