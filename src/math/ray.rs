//! Ray type and operations

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use super::aabb::Aabb;

/// A ray defined by origin and unit direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    ///
    /// Fails with [`Error::RayDirectionDegenerate`] when the direction has
    /// zero length or is not finite.
    pub fn try_new(origin: Vec3, direction: Vec3) -> Result<Self> {
        let len_sq = direction.length_squared();
        if !len_sq.is_finite() || len_sq == 0.0 || !origin.is_finite() {
            return Err(Error::RayDirectionDegenerate);
        }
        let direction = direction / len_sq.sqrt();
        Ok(Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        })
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB intersection using slab method
    /// Returns Some((t_near, t_far)) if intersection, None otherwise.
    /// `t_near` is clamped to 0 when the origin is inside the box.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        self.slab_entry(aabb).map(|(t_near, t_far, _)| (t_near, t_far))
    }

    /// Slab test that also reports which axis produced `t_near`.
    ///
    /// The axis is `None` when the origin lies inside the box.
    pub(crate) fn slab_entry(&self, aabb: &Aabb) -> Option<(f32, f32, Option<usize>)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut entry_axis = None;

        for axis in 0..3 {
            let o = self.origin[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
            if self.direction[axis] == 0.0 {
                // Parallel to this slab: inside it or never
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = self.inv_direction[axis];
            let t1 = (lo - o) * inv;
            let t2 = (hi - o) * inv;
            let (t_min, t_max) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            if t_min > t_near {
                t_near = t_min;
                entry_axis = Some(axis);
            }
            t_far = t_far.min(t_max);
        }

        if t_near <= t_far && t_far >= 0.0 {
            if t_near <= 0.0 {
                Some((0.0, t_far, None))
            } else {
                Some((t_near, t_far, entry_axis))
            }
        } else {
            None
        }
    }
}

/// Intersect an unnormalized ray with the box `[box_min, box_max]`.
///
/// Parameters are in units of the normalized direction.
pub fn intersect_ray_aabb(
    origin: Vec3,
    direction: Vec3,
    box_min: Vec3,
    box_max: Vec3,
) -> Result<Option<(f32, f32)>> {
    let ray = Ray::try_new(origin, direction)?;
    Ok(ray.intersects_aabb(&Aabb::new(box_min, box_max)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::try_new(Vec3::ZERO, Vec3::X).unwrap();
        assert_eq!(ray.at(5.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::try_new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0)).unwrap();
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_direction_fails() {
        let err = Ray::try_new(Vec3::ONE, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, Error::RayDirectionDegenerate));
        assert!(intersect_ray_aabb(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ONE).is_err());
    }

    #[test]
    fn test_nan_direction_fails() {
        assert!(Ray::try_new(Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 0.0)).is_err());
    }

    #[test]
    fn test_intersects_aabb_hit() {
        let ray = Ray::try_new(Vec3::new(-2.0, 0.5, 0.5), Vec3::X).unwrap();
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let (t_near, t_far) = ray.intersects_aabb(&aabb).unwrap();
        assert!((t_near - 2.0).abs() < 0.001);
        assert!((t_far - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_intersects_aabb_miss() {
        let ray = Ray::try_new(Vec3::new(-2.0, 5.0, 0.5), Vec3::X).unwrap();
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(ray.intersects_aabb(&aabb).is_none());
    }

    #[test]
    fn test_intersects_aabb_behind() {
        let ray = Ray::try_new(Vec3::new(-2.0, 0.5, 0.5), -Vec3::X).unwrap();
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(ray.intersects_aabb(&aabb).is_none());
    }

    #[test]
    fn test_intersects_aabb_inside() {
        let ray = Ray::try_new(Vec3::splat(0.5), Vec3::X).unwrap();
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let (t_near, _) = ray.intersects_aabb(&aabb).unwrap();
        assert_eq!(t_near, 0.0); // Inside, so t_near clamped to 0
    }

    #[test]
    fn test_entry_axis_reported() {
        let ray = Ray::try_new(Vec3::new(5.0, 0.5, 0.5), -Vec3::X).unwrap();
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let (t_near, t_far, axis) = ray.slab_entry(&aabb).unwrap();
        assert!((t_near - 4.0).abs() < 1e-5);
        assert!((t_far - 5.0).abs() < 1e-5);
        assert_eq!(axis, Some(0));
    }

    #[test]
    fn test_parallel_outside_slab_misses() {
        let ray = Ray::try_new(Vec3::new(0.5, 2.0, -3.0), Vec3::Z).unwrap();
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(ray.intersects_aabb(&aabb).is_none());
    }
}
