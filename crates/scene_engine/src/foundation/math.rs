//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the position/rotation/scale triple that
//! every scene node carries.

pub use nalgebra::{Quaternion, Unit, Vector3, Matrix4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Combine this (parent) transform with a child transform
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }
}

/// Math utility functions
pub mod utils {
    use super::{Quat, Vec3};

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
    
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * DEG_TO_RAD
    }
    
    /// Linear interpolation between two vectors
    pub fn lerp_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// Rotation that points the local -Z axis from `eye` toward `target` (Y-up).
    ///
    /// Returns `None` when the two points coincide or the view direction is
    /// parallel to up.
    pub fn look_rotation(eye: &Vec3, target: &Vec3) -> Option<Quat> {
        let forward = target - eye;
        if forward.norm_squared() <= f32::EPSILON {
            return None;
        }
        let up = Vec3::y();
        if forward.normalize().cross(&up).norm_squared() <= f32::EPSILON {
            return None;
        }
        // face_towards aligns +Z with the direction; cameras look down -Z
        Some(Quat::face_towards(&-forward, &up))
    }
}
