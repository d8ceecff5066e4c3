//! Sub-voxel ray marching.

use crate::core::types::{IVec3, Vec3};
use crate::math::{Aabb, Ray};
use crate::trace::{entry_normal, RayHit, VoxelTracer};
use crate::voxel::VoxelCoord;

/// Smallest step the march ever takes, in box-local ray units.
pub const MIN_STEP: f32 = 1e-4;

/// Marches from face to face, each time re-deriving the nearest face ahead
/// of the current point. The cell between two stops is sampled at the
/// segment midpoint, so a stop landing exactly on a face (or a hair before
/// it) never selects the wrong side.
///
/// Parameters are measured from the box entry point, keeping full f32
/// precision for distant origins. The iteration count is capped by the
/// box's Manhattan extent, so grazing rays terminate.
#[derive(Clone, Copy, Debug)]
pub struct SubVoxelMarch {
    pub min_step: f32,
}

impl Default for SubVoxelMarch {
    fn default() -> Self {
        Self { min_step: MIN_STEP }
    }
}

impl SubVoxelMarch {
    /// Parametric distance from `p` to the next cell face strictly ahead
    /// along `dir`, and the axis of that face. A point on a face moving
    /// negatively is already in the lower cell, whose far face is a whole
    /// cell away. `None` only for a zero direction.
    pub fn next_voxel(p: Vec3, dir: Vec3) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for axis in 0..3 {
            let d = dir[axis];
            let dt = if d > 0.0 {
                (p[axis].floor() + 1.0 - p[axis]) / d
            } else if d < 0.0 {
                let below = p[axis] - p[axis].floor();
                let dist = if below > 0.0 { below } else { 1.0 };
                dist / -d
            } else {
                continue;
            };
            if best.is_none_or(|(t, _)| dt < t) {
                best = Some((dt, axis));
            }
        }
        best
    }

    /// Upper bound on stops for a ray crossing `bounds`.
    pub fn max_iterations(&self, bounds: &Aabb) -> usize {
        // A stop crosses at least one face, or is a short re-stop right
        // after one; faces crossed are bounded by the Manhattan extent.
        bounds.manhattan_extent().ceil() as usize * 2 + 4
    }
}

impl VoxelTracer for SubVoxelMarch {
    fn trace(&self, ray: &Ray, bounds: &Aabb, occupied: &dyn Fn(VoxelCoord) -> bool) -> Option<RayHit> {
        let (t_near, t_far, entry_axis) = ray.slab_entry(bounds)?;

        let origin = ray.at(t_near);
        let t_len = t_far - t_near;
        let dir = ray.direction;

        let cell_min = bounds.min.floor().as_ivec3();
        let cell_max = (bounds.max.ceil().as_ivec3() - IVec3::ONE).max(cell_min);

        let mut normal = entry_normal(entry_axis, dir);
        let mut s = 0.0f32;

        for _ in 0..self.max_iterations(bounds) {
            if s >= t_len {
                return None;
            }
            let p = origin + dir * s;
            let (dt, axis) = Self::next_voxel(p, dir)?;
            let step = dt.max(self.min_step);

            let coord = VoxelCoord::from_point(origin + dir * (s + step * 0.5));
            let c = coord.as_ivec3();
            let inside = c.cmpge(cell_min).all() && c.cmple(cell_max).all();
            if inside && occupied(coord) {
                return Some(RayHit { coord, normal, t: t_near + s });
            }

            s += step;
            normal = entry_normal(Some(axis), dir);
        }

        log::trace!("march gave up after {} stops", self.max_iterations(bounds));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::trace::GridDda;
    use std::cell::Cell;

    fn lattice(min: (i32, i32, i32), max: (i32, i32, i32)) -> Aabb {
        Aabb::from_lattice(IVec3::new(min.0, min.1, min.2), IVec3::new(max.0, max.1, max.2))
    }

    #[test]
    fn test_next_voxel_positive() {
        let (dt, axis) = SubVoxelMarch::next_voxel(Vec3::new(0.25, 0.5, 0.9), Vec3::new(1.0, 0.0, 1.0)).unwrap();
        assert_eq!(axis, 2);
        assert!((dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_next_voxel_on_face_moving_down() {
        let (dt, axis) = SubVoxelMarch::next_voxel(Vec3::new(0.5, 2.0, 0.5), -Vec3::Y).unwrap();
        assert_eq!(axis, 1);
        assert_eq!(dt, 1.0);
    }

    #[test]
    fn test_next_voxel_zero_direction() {
        assert!(SubVoxelMarch::next_voxel(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_single_voxel_hit_from_plus_x() {
        let ray = Ray::try_new(Vec3::new(5.0, 0.5, 0.5), -Vec3::X).unwrap();
        let bounds = lattice((0, 0, 0), (0, 0, 0));
        let hit = SubVoxelMarch::default().trace(&ray, &bounds, &|c| c == VoxelCoord::ORIGIN).unwrap();
        assert_eq!(hit.coord, VoxelCoord::ORIGIN);
        assert_eq!(hit.normal, IVec3::X);
        assert!(hit.t >= 4.0 && hit.t < 4.01);
    }

    #[test]
    fn test_walks_column_to_first_occupied() {
        let ray = Ray::try_new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z).unwrap();
        let bounds = lattice((0, 0, 0), (0, 0, 5));
        let hit = SubVoxelMarch::default()
            .trace(&ray, &bounds, &|c| c.z == 3 || c.z == 4)
            .unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(0, 0, 3));
        assert_eq!(hit.normal, -IVec3::Z);
    }

    #[test]
    fn test_miss_returns_none() {
        let ray = Ray::try_new(Vec3::new(5.0, 0.5, 0.5), -Vec3::X).unwrap();
        let bounds = lattice((0, 0, 0), (3, 3, 3));
        assert!(SubVoxelMarch::default().trace(&ray, &bounds, &|c| c.y == 2).is_none());
    }

    #[test]
    fn test_stops_at_t_far() {
        let ray = Ray::try_new(Vec3::new(0.5, 0.5, 0.5), Vec3::X).unwrap();
        let bounds = lattice((0, 0, 0), (2, 0, 0));
        assert!(SubVoxelMarch::default().trace(&ray, &bounds, &|c| c.x >= 3).is_none());
    }

    #[test]
    fn test_grazing_ray_terminates() {
        // Runs along the y = 1 face of a long row of cells
        let ray = Ray::try_new(Vec3::new(0.0, 1.0, 0.5), Vec3::new(1.0, 1e-7, 0.0)).unwrap();
        let bounds = lattice((0, 0, 0), (999, 1, 0));
        let march = SubVoxelMarch::default();
        assert!(march.trace(&ray, &bounds, &|_| false).is_none());
        assert!(march.max_iterations(&bounds) >= 1000);
    }

    #[test]
    fn test_agrees_with_dda_on_oblique_ray() {
        let ray = Ray::try_new(Vec3::new(-2.0, 0.3, 0.7), Vec3::new(1.0, 0.37, 0.21)).unwrap();
        let bounds = lattice((0, 0, 0), (7, 7, 7));
        let target = |c: VoxelCoord| c == VoxelCoord::new(4, 2, 1);
        let dda = GridDda.trace(&ray, &bounds, &target).unwrap();
        let march = SubVoxelMarch::default().trace(&ray, &bounds, &target).unwrap();
        assert_eq!(dda.coord, march.coord);
        assert_eq!(dda.normal, march.normal);
    }

    #[test]
    fn test_inside_origin_on_face_moving_down() {
        let ray = Ray::try_new(Vec3::new(0.5, 2.0, 0.5), -Vec3::Y).unwrap();
        let bounds = lattice((0, 0, 0), (0, 3, 0));
        let target = |c: VoxelCoord| c == VoxelCoord::new(0, 1, 0);
        let hit = SubVoxelMarch::default().trace(&ray, &bounds, &target).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(0, 1, 0));
        assert_eq!(hit.t, 0.0);
        assert_eq!(GridDda.trace(&ray, &bounds, &target).unwrap().coord, hit.coord);
    }

    /// The `n`-th cell the grid DDA visits along `ray`.
    fn nth_dda_cell(ray: &Ray, bounds: &Aabb, n: usize) -> Option<VoxelCoord> {
        let visited = Cell::new(0usize);
        let hit = GridDda.trace(ray, bounds, &|_| {
            visited.set(visited.get() + 1);
            visited.get() == n
        })?;
        Some(hit.coord)
    }

    #[test]
    fn test_finds_dda_cells_from_distant_origins() {
        let bounds = lattice((0, 0, 0), (63, 63, 63));
        let center = bounds.center();
        let march = SubVoxelMarch::default();

        for distance in [150.0f32, 1000.0, 3000.0] {
            for i in 0..60 {
                let a = i as f32 * 0.7548777;
                let b = i as f32 * 0.5698403 + 0.3;
                let dir = Vec3::new(a.cos() * b.sin(), a.sin() * b.sin(), b.cos()).normalize();
                let aim = center + Vec3::new((i % 7) as f32 * 3.1 - 9.0, (i % 5) as f32 * 2.3 - 4.6, 1.7);
                let ray = Ray::try_new(aim - dir * distance, dir).unwrap();

                let Some(target) = nth_dda_cell(&ray, &bounds, 10) else {
                    continue;
                };
                let hit = march.trace(&ray, &bounds, &|c| c == target);
                assert_eq!(
                    hit.map(|h| h.coord),
                    Some(target),
                    "ray {} at distance {}",
                    i,
                    distance
                );
            }
        }
    }
}
