//! Amanatides–Woo grid traversal.

use crate::core::types::{IVec3, Vec3};
use crate::math::{Aabb, Ray};
use crate::trace::{entry_normal, RayHit, VoxelTracer};
use crate::voxel::VoxelCoord;

/// Face-by-face grid traversal using per-axis `t_max` / `t_delta`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridDda;

impl VoxelTracer for GridDda {
    fn trace(&self, ray: &Ray, bounds: &Aabb, occupied: &dyn Fn(VoxelCoord) -> bool) -> Option<RayHit> {
        let (t_near, t_far, entry_axis) = ray.slab_entry(bounds)?;

        // Work in box-local parameters so distant origins keep precision
        let origin = ray.at(t_near);
        let t_len = t_far - t_near;

        let cell_min = bounds.min.floor().as_ivec3();
        let cell_max = (bounds.max.ceil().as_ivec3() - IVec3::ONE).max(cell_min);

        // Entry points on a max face floor into the neighbouring cell
        let mut cell = origin.floor().as_ivec3().clamp(cell_min, cell_max);
        let dir = ray.direction;

        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);
        for axis in 0..3 {
            if dir[axis] > 0.0 {
                step[axis] = 1;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) * ray.inv_direction[axis];
                t_delta[axis] = ray.inv_direction[axis];
            } else if dir[axis] < 0.0 {
                step[axis] = -1;
                t_max[axis] = (cell[axis] as f32 - origin[axis]) * ray.inv_direction[axis];
                t_delta[axis] = -ray.inv_direction[axis];
            }
        }

        let mut normal = entry_normal(entry_axis, dir);
        let mut t = 0.0f32;

        loop {
            let coord = VoxelCoord::from(cell);
            if occupied(coord) {
                return Some(RayHit { coord, normal, t: t_near + t });
            }

            let axis = if t_max.x < t_max.y {
                if t_max.x < t_max.z { 0 } else { 2 }
            } else if t_max.y < t_max.z {
                1
            } else {
                2
            };

            if t_max[axis] > t_len {
                return None;
            }
            cell[axis] += step[axis];
            if cell[axis] < cell_min[axis] || cell[axis] > cell_max[axis] {
                return None;
            }
            normal = IVec3::ZERO;
            normal[axis] = -step[axis];
            // An origin lying on this face gives -0.0
            t = if t_max[axis] > 0.0 { t_max[axis] } else { 0.0 };
            t_max[axis] += t_delta[axis];
        }
    }
}
