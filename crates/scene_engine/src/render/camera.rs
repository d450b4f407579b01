//! Camera projections

use crate::foundation::math::{utils::deg_to_rad, Mat4};

/// Default vertical field of view in degrees
pub const DEFAULT_FOV: f32 = 75.0;
/// Default near clip distance
pub const DEFAULT_NEAR: f32 = 0.1;
/// Default far clip distance
pub const DEFAULT_FAR: f32 = 1000.0;
/// Default orthographic view height in world units
pub const DEFAULT_ORTHO_SIZE: f32 = 10.0;

/// Projection carried by a camera node
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in degrees
        fov: f32,
        /// Viewport width / height
        aspect: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Left frustum plane
        left: f32,
        /// Right frustum plane
        right: f32,
        /// Top frustum plane
        top: f32,
        /// Bottom frustum plane
        bottom: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
        /// Zoom factor applied to the frustum
        zoom: f32,
    },
}

impl Projection {
    /// Perspective camera with every field defaulted except the aspect ratio
    pub fn default_perspective(aspect: f32) -> Self {
        Self::Perspective {
            fov: DEFAULT_FOV,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    /// Orthographic camera `size` units tall, width following `aspect`
    pub fn orthographic(size: f32, aspect: f32, zoom: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            left: size * aspect / -2.0,
            right: size * aspect / 2.0,
            top: size / 2.0,
            bottom: size / -2.0,
            near,
            far,
            zoom,
        }
    }

    /// Projection matrix (OpenGL clip conventions)
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective { fov, aspect, near, far } => {
                Mat4::new_perspective(aspect, deg_to_rad(fov), near, far)
            }
            Self::Orthographic { left, right, top, bottom, near, far, zoom } => {
                let zoom = if zoom > 0.0 { zoom } else { 1.0 };
                Mat4::new_orthographic(left / zoom, right / zoom, bottom / zoom, top / zoom, near, far)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthographic_frustum_from_size() {
        let projection = Projection::orthographic(10.0, 2.0, 1.0, 0.1, 100.0);
        match projection {
            Projection::Orthographic { left, right, top, bottom, .. } => {
                assert_eq!((left, right), (-10.0, 10.0));
                assert_eq!((top, bottom), (5.0, -5.0));
            }
            Projection::Perspective { .. } => panic!("expected orthographic"),
        }
    }

    #[test]
    fn test_matrices_are_finite() {
        let perspective = Projection::default_perspective(16.0 / 9.0).matrix();
        assert!(perspective.iter().all(|v| v.is_finite()));
        let ortho = Projection::orthographic(10.0, 1.0, 0.0, 0.1, 10.0).matrix();
        assert!(ortho.iter().all(|v| v.is_finite()));
    }
}
