use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::math::AABB;

/// Distance used when the scene bounds are empty or flat to a point.
const FALLBACK_MAX_DISTANCE: f32 = 100.0;
const FOV_Y_DEGREES: f32 = 70.0;

/// Projection range, controller speed and default camera derived from the
/// scene bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFraming {
    bounds: AABB,
    max_distance: f32,
}

impl SceneFraming {
    pub fn from_bounds(bounds: AABB) -> Self {
        let diagonal = bounds.diagonal().length();
        let max_distance = if !bounds.is_empty() && diagonal > 0.0 && diagonal.is_finite() {
            diagonal
        } else {
            FALLBACK_MAX_DISTANCE
        };
        Self {
            bounds,
            max_distance,
        }
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    /// Length of the bounding box diagonal, or a fixed fallback for empty scenes.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn near(&self) -> f32 {
        0.001 * self.max_distance
    }

    pub fn far(&self) -> f32 {
        1.5 * self.max_distance
    }

    /// Right-handed perspective with a 70 degree vertical field of view and
    /// the [0, 1] depth range wgpu expects.
    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect_ratio, self.near(), self.far())
    }

    pub fn controller_speed(&self) -> f32 {
        0.5 * self.max_distance
    }

    /// Looks at the bounds center from one diagonal away.
    ///
    /// Scenes flat in z are viewed from the front instead. Falls back to
    /// [`Camera::default`] when the bounds are empty or too degenerate to
    /// derive a view from.
    pub fn default_camera(&self) -> Camera {
        if self.bounds.is_empty() {
            return Camera::default();
        }

        let up = Vec3::Y;
        let center = self.bounds.center();
        let diagonal = self.bounds.diagonal();
        let eye = if diagonal.z > 0.0 {
            center + diagonal
        } else {
            center + 2.0 * diagonal.cross(up)
        };

        Camera::try_new(eye, center, up).unwrap_or_else(|| {
            log::warn!("cannot frame scene bounds {:?}, using default camera", self.bounds);
            Camera::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bounds_use_fallback_distance() {
        let framing = SceneFraming::from_bounds(AABB::EMPTY);
        assert_eq!(framing.max_distance(), FALLBACK_MAX_DISTANCE);
        assert_eq!(framing.controller_speed(), 50.0);
        assert_eq!(framing.default_camera(), Camera::default());
    }

    #[test]
    fn near_and_far_scale_with_diagonal() {
        let framing = SceneFraming::from_bounds(AABB::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)));
        assert!((framing.max_distance() - 5.0).abs() < 1e-6);
        assert!((framing.near() - 0.005).abs() < 1e-6);
        assert!((framing.far() - 7.5).abs() < 1e-6);
    }

    #[test]
    fn deep_scene_viewed_along_diagonal() {
        let bounds = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let camera = SceneFraming::from_bounds(bounds).default_camera();
        assert_eq!(camera.center(), Vec3::ZERO);
        assert_eq!(camera.eye(), Vec3::splat(2.0));
    }

    #[test]
    fn flat_scene_viewed_from_front() {
        let bounds = AABB::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 0.0));
        let camera = SceneFraming::from_bounds(bounds).default_camera();
        // cross((2, 2, 0), +Y) = (0, 0, 2)
        assert_eq!(camera.eye(), Vec3::new(1.0, 1.0, 4.0));
        assert_eq!(camera.center(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let framing = SceneFraming::from_bounds(AABB::new(Vec3::ZERO, Vec3::splat(1.0)));
        let clip = framing.projection(16.0 / 9.0) * glam::Vec4::new(0.0, 0.0, -framing.near(), 1.0);
        assert!((clip.z / clip.w).abs() < 1e-4);
    }
}
