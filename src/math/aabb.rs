use glam::{Mat4, Vec3};

/// Axis-aligned bounding box in world space.
///
/// A freshly created box is inverted (`min = +inf`, `max = -inf`) so that the
/// first folded point defines it exactly. A box that never saw a point stays
/// inverted; use [`AABB::is_empty`] to detect it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub const EMPTY: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// True when no point was ever folded into the box.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Folds a local-space point transformed by `world` (w = 1).
    pub fn extend_transformed(&mut self, world: &Mat4, local: Vec3) {
        self.extend(world.transform_point3(local));
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::EMPTY
    }
}
