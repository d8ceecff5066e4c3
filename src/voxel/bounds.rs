//! Derived per-axis and per-attribute extents of a volume.

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Vec3, EPSILON};
use crate::math::Aabb;
use crate::voxel::volume::SparseVoxelVolume;

/// Closed interval of observed values
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    fn of(v: f32) -> Self {
        Self { min: v, max: v }
    }

    fn include(&mut self, v: f32) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// True when every observed value was the same.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

fn include_opt(range: &mut Option<ValueRange>, v: f32) {
    match range {
        Some(r) => r.include(v),
        None => *range = Some(ValueRange::of(v)),
    }
}

/// Extents of a volume over all voxels whose value exceeds [`EPSILON`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeBounds {
    pub lattice_min: IVec3,
    pub lattice_max: IVec3,
    pub value: ValueRange,
    pub sx: Option<ValueRange>,
    pub sy: Option<ValueRange>,
    pub sz: Option<ValueRange>,
}

impl VolumeBounds {
    /// One full pass over the volume. `None` if no voxel exceeds epsilon.
    pub fn compute(volume: &SparseVoxelVolume) -> Option<Self> {
        let mut bounds: Option<VolumeBounds> = None;

        for (coord, voxel) in volume.entries() {
            if voxel.value <= EPSILON {
                continue;
            }
            let p = coord.as_ivec3();
            let b = bounds.get_or_insert(VolumeBounds {
                lattice_min: p,
                lattice_max: p,
                value: ValueRange::of(voxel.value),
                sx: None,
                sy: None,
                sz: None,
            });
            b.lattice_min = b.lattice_min.min(p);
            b.lattice_max = b.lattice_max.max(p);
            b.value.include(voxel.value);
            if let Some(g) = voxel.gradient {
                include_opt(&mut b.sx, g.x);
                include_opt(&mut b.sy, g.y);
                include_opt(&mut b.sz, g.z);
            }
        }

        bounds
    }

    /// Box enclosing every counted cell
    pub fn aabb(&self) -> Aabb {
        Aabb::from_lattice(self.lattice_min, self.lattice_max)
    }

    /// Midpoint of the lattice extent, used to centre the view.
    pub fn center(&self) -> Vec3 {
        let min = self.lattice_min.as_vec3();
        let max = self.lattice_max.as_vec3();
        (max - min) * 0.5 + min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::coord::VoxelCoord;
    use crate::voxel::voxel::Voxel;

    #[test]
    fn test_empty_volume_has_no_bounds() {
        assert!(VolumeBounds::compute(&SparseVoxelVolume::new()).is_none());
    }

    #[test]
    fn test_bounds_ignore_epsilon_voxels() {
        let mut vol = SparseVoxelVolume::new();
        vol.set_value(VoxelCoord::new(0, 0, 0), 2.0);
        vol.set_value(VoxelCoord::new(4, -2, 1), 5.0);
        vol.set_value(VoxelCoord::new(100, 100, 100), 0.0005);

        let b = VolumeBounds::compute(&vol).unwrap();
        assert_eq!(b.lattice_min, IVec3::new(0, -2, 0));
        assert_eq!(b.lattice_max, IVec3::new(4, 0, 1));
        assert_eq!(b.value, ValueRange { min: 2.0, max: 5.0 });
        assert!(b.sx.is_none());
        assert_eq!(b.center(), Vec3::new(2.0, -1.0, 0.5));
    }

    #[test]
    fn test_single_voxel_is_degenerate() {
        let mut vol = SparseVoxelVolume::new();
        vol.set(VoxelCoord::new(1, 1, 1), Voxel::with_gradient(3.0, Vec3::new(0.0, 1.0, 0.0)));
        let b = VolumeBounds::compute(&vol).unwrap();
        assert!(b.value.is_degenerate());
        assert_eq!(b.sy, Some(ValueRange { min: 1.0, max: 1.0 }));
        assert_eq!(b.aabb(), Aabb::new(Vec3::ONE, Vec3::splat(2.0)));
    }
}
