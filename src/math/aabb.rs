//! Axis-aligned bounding box

use crate::core::types::{IVec3, Vec3};

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box covering every lattice cell from `min` to `max` inclusive.
    ///
    /// Cell (x, y, z) occupies `[x, x+1) × [y, y+1) × [z, z+1)`.
    pub fn from_lattice(min: IVec3, max: IVec3) -> Self {
        Self {
            min: min.as_vec3(),
            max: (max + IVec3::ONE).as_vec3(),
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Sum of the three edge lengths
    pub fn manhattan_extent(&self) -> f32 {
        let s = self.size();
        s.x.abs() + s.y.abs() + s.z.abs()
    }

    /// Check if point is inside AABB
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Return merged AABB containing both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
