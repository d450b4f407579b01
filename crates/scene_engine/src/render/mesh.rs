//! Meshes: primitive geometry plus material

use super::Color;
use crate::foundation::math::Vec3;
use std::collections::BTreeMap;

/// Primitive geometry families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Axis-aligned box (width × height × depth)
    Box,
    /// Flat XY rectangle (width × height)
    Plane,
    /// Sphere of radius `width`
    Sphere,
    /// Y-aligned cylinder of radius `width` and the given height
    Cylinder,
}

impl GeometryKind {
    /// Resolve a document type tag such as `"BoxGeometry"`
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "BoxGeometry" => Some(Self::Box),
            "PlaneGeometry" => Some(Self::Plane),
            "SphereGeometry" => Some(Self::Sphere),
            "CylinderGeometry" => Some(Self::Cylinder),
            _ => None,
        }
    }
}

/// Primitive geometry with its dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Geometry family
    pub kind: GeometryKind,
    /// Width (radius for spheres and cylinders)
    pub width: f32,
    /// Height
    pub height: f32,
    /// Depth
    pub depth: f32,
}

impl Geometry {
    /// Half-size of the geometry's local bounding box
    pub fn half_extents(&self) -> Vec3 {
        match self.kind {
            GeometryKind::Box => Vec3::new(self.width, self.height, self.depth) * 0.5,
            GeometryKind::Plane => Vec3::new(self.width * 0.5, self.height * 0.5, 0.0),
            GeometryKind::Sphere => Vec3::repeat(self.width),
            GeometryKind::Cylinder => Vec3::new(self.width, self.height * 0.5, self.width),
        }
    }
}

/// How texture coordinates outside [0, 1] are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWrap {
    /// Clamp to the edge texel
    #[default]
    ClampToEdge,
    /// Tile the texture
    Repeat,
}

/// A decoded texture ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Locator the texture was loaded from
    pub source: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Wrap mode on both axes
    pub wrap: TextureWrap,
    /// Tiling factors on U and V
    pub repeat: (f32, f32),
}

impl Texture {
    /// Tile this texture `x` × `y` times
    pub fn set_repeat(&mut self, x: f32, y: f32) {
        self.wrap = TextureWrap::Repeat;
        self.repeat = (x, y);
    }
}

/// Surface description of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material model, e.g. `MeshStandardMaterial`
    pub kind: String,
    /// Base color
    pub color: Option<Color>,
    /// Texture maps keyed by parameter name (`map`, `normalMap`, ...)
    pub maps: BTreeMap<String, Texture>,
    /// Remaining scalar parameters passed through untouched
    pub params: BTreeMap<String, serde_json::Value>,
}

impl Material {
    /// Default material model
    pub const DEFAULT_KIND: &'static str = "MeshStandardMaterial";

    /// Placeholder used when an object declares no material at all
    pub fn missing() -> Self {
        Self {
            kind: Self::DEFAULT_KIND.to_string(),
            color: Some(Color::MISSING),
            maps: BTreeMap::new(),
            params: BTreeMap::new(),
        }
    }
}

/// Geometry and material owned by a renderable node
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Shape
    pub geometry: Geometry,
    /// Surface
    pub material: Material,
    released: bool,
}

impl Mesh {
    /// Build a mesh from its parts
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            released: false,
        }
    }

    /// Drop GPU-side resources held by this mesh; idempotent
    pub fn release(&mut self) {
        if !self.released {
            self.material.maps.clear();
            self.released = true;
        }
    }

    /// Whether `release` has run
    pub fn is_released(&self) -> bool {
        self.released
    }
}
