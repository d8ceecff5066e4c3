//! Gradient field: Sobel passes, normalization and local averaging.

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Vec3, EPSILON};
use crate::filter::correlate::{correlate_1d, SOBEL_DIFF_KERNEL, SOBEL_SMOOTH_KERNEL};
use crate::voxel::{Axis, SparseVoxelVolume, Voxel, VoxelCoord, NEIGHBOR_OFFSETS_26};

/// Which neighbours take part in [`avg_gradients`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragingNeighborhood {
    /// Only the 8 corner neighbours (every offset component non-zero).
    #[default]
    Corners,
    /// All 26 neighbours.
    Full,
}

impl AveragingNeighborhood {
    fn includes(self, offset: IVec3) -> bool {
        match self {
            AveragingNeighborhood::Corners => offset.x != 0 && offset.y != 0 && offset.z != 0,
            AveragingNeighborhood::Full => true,
        }
    }
}

/// One Sobel component along `axis`.
///
/// Smooths the two perpendicular axes with `[1, 2, 1]` (unless
/// `blur_perpendicular` is false), then differences along `axis`.
pub fn sobel_1d(volume: &SparseVoxelVolume, axis: Axis, blur_perpendicular: bool) -> SparseVoxelVolume {
    if blur_perpendicular {
        let [a, b] = axis.perpendicular();
        let smoothed_a = correlate_1d(volume, &SOBEL_SMOOTH_KERNEL, a);
        let smoothed = correlate_1d(&smoothed_a, &SOBEL_SMOOTH_KERNEL, b);
        drop(smoothed_a);
        correlate_1d(&smoothed, &SOBEL_DIFF_KERNEL, axis)
    } else {
        correlate_1d(volume, &SOBEL_DIFF_KERNEL, axis)
    }
}

/// Full Sobel gradient. Every voxel in the result carries a gradient;
/// its value is the raw gradient magnitude.
pub fn sobel_3d(volume: &SparseVoxelVolume) -> SparseVoxelVolume {
    let gx = sobel_1d(volume, Axis::X, true);
    let gy = sobel_1d(volume, Axis::Y, true);
    let gz = sobel_1d(volume, Axis::Z, true);

    let mut out = SparseVoxelVolume::with_capacity(gx.size().max(gy.size()).max(gz.size()));
    for component in [&gx, &gy, &gz] {
        for coord in component.keys() {
            if out.contains(coord) {
                continue;
            }
            let g = Vec3::new(gx.value_at(coord), gy.value_at(coord), gz.value_at(coord));
            out.set(coord, Voxel::with_gradient(g.length(), g));
        }
    }

    log::debug!("sobel_3d: {} -> {} voxels", volume.size(), out.size());
    out
}

/// Replace each gradient by its unit vector and store the magnitude as
/// `value`. Voxels with magnitude below [`EPSILON`] (or no gradient) are
/// dropped.
pub fn normalize_gradients(volume: &SparseVoxelVolume) -> SparseVoxelVolume {
    let mut out = SparseVoxelVolume::with_capacity(volume.size());
    for (coord, voxel) in volume.entries() {
        let g = voxel.gradient_or_zero();
        let magnitude = g.length();
        if magnitude < EPSILON {
            continue;
        }
        let mut normalized = voxel.clone();
        normalized.value = magnitude;
        normalized.gradient = Some(g / magnitude);
        out.set(coord, normalized);
    }
    log::debug!(
        "normalize_gradients: kept {} of {} voxels",
        out.size(),
        volume.size()
    );
    out
}

/// Average each voxel's gradient and value with its populated neighbours
/// in `neighborhood`, then renormalize the gradient.
///
/// Voxels without a gradient are copied unchanged. A voxel whose averaged
/// gradient cancels out below [`EPSILON`] is dropped.
pub fn avg_gradients(volume: &SparseVoxelVolume, neighborhood: AveragingNeighborhood) -> SparseVoxelVolume {
    let mut out = SparseVoxelVolume::with_capacity(volume.size());

    for (coord, voxel) in volume.entries() {
        let Some(own) = voxel.gradient else {
            out.set(coord, voxel.clone());
            continue;
        };

        let mut sum = own;
        let mut value_sum = voxel.value;
        let mut count = 1.0f32;
        for offset in NEIGHBOR_OFFSETS_26 {
            if !neighborhood.includes(offset) {
                continue;
            }
            let neighbor: VoxelCoord = coord.offset(offset);
            if let Some(n) = volume.get(neighbor) {
                if let Some(g) = n.gradient {
                    sum += g;
                    value_sum += n.value;
                    count += 1.0;
                }
            }
        }

        let mean = sum / count;
        let length = mean.length();
        if length < EPSILON {
            continue;
        }
        let mut averaged = voxel.clone();
        averaged.value = value_sum / count;
        averaged.gradient = Some(mean / length);
        out.set(coord, averaged);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(size: i32, value: f32) -> SparseVoxelVolume {
        let mut vol = SparseVoxelVolume::new();
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    vol.set_value(VoxelCoord::new(x, y, z), value);
                }
            }
        }
        vol
    }

    #[test]
    fn test_flat_field_has_no_interior_gradient() {
        let vol = block(7, 3.0);
        let grad = sobel_3d(&vol);
        for x in 1..6 {
            for y in 1..6 {
                for z in 1..6 {
                    let c = VoxelCoord::new(x, y, z);
                    let g = grad.gradient_at(c).unwrap_or(Vec3::ZERO);
                    assert_eq!(g, Vec3::ZERO, "non-zero gradient at {}", c);
                }
            }
        }
        // Edges of the block do respond
        assert!(grad.gradient_at(VoxelCoord::new(-1, 3, 3)).is_some());
    }

    #[test]
    fn test_step_edge_points_along_axis() {
        // Half-space x < 0 populated, x >= 0 empty
        let mut vol = SparseVoxelVolume::new();
        for x in -4..0 {
            for y in -3..=3 {
                for z in -3..=3 {
                    vol.set_value(VoxelCoord::new(x, y, z), 1.0);
                }
            }
        }
        let grad = normalize_gradients(&sobel_3d(&vol));
        let g = grad.gradient_at(VoxelCoord::new(0, 0, 0)).unwrap();
        assert!((g - Vec3::X).length() < 1e-5, "got {:?}", g);
        assert!((grad.get(VoxelCoord::new(0, 0, 0)).unwrap().value - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_sobel_without_perpendicular_blur() {
        let mut vol = SparseVoxelVolume::new();
        vol.set_value(VoxelCoord::ORIGIN, 1.0);
        let gx = sobel_1d(&vol, Axis::X, false);
        assert_eq!(gx.size(), 2);
        let blurred = sobel_1d(&vol, Axis::X, true);
        assert_eq!(blurred.size(), 2 * 9);
    }

    #[test]
    fn test_normalize_drops_small() {
        let mut vol = SparseVoxelVolume::new();
        vol.set(VoxelCoord::new(0, 0, 0), Voxel::with_gradient(0.0, Vec3::new(0.0, 0.0, 0.0005)));
        vol.set(VoxelCoord::new(1, 0, 0), Voxel::with_gradient(0.0, Vec3::new(3.0, 4.0, 0.0)));
        vol.set_value(VoxelCoord::new(2, 0, 0), 5.0);

        let out = normalize_gradients(&vol);
        assert_eq!(out.size(), 1);
        let v = out.get(VoxelCoord::new(1, 0, 0)).unwrap();
        assert!((v.value - 5.0).abs() < 1e-6);
        assert!((v.gradient.unwrap() - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_gradients(&SparseVoxelVolume::new()).is_empty());
        assert!(sobel_3d(&SparseVoxelVolume::new()).is_empty());
    }

    #[test]
    fn test_avg_corners_ignores_face_neighbors() {
        let mut vol = SparseVoxelVolume::new();
        vol.set(VoxelCoord::ORIGIN, Voxel::with_gradient(1.0, Vec3::X));
        // Face neighbour pointing elsewhere
        vol.set(VoxelCoord::new(1, 0, 0), Voxel::with_gradient(3.0, Vec3::Y));

        let corners = avg_gradients(&vol, AveragingNeighborhood::Corners);
        let c = corners.get(VoxelCoord::ORIGIN).unwrap();
        assert_eq!(c.gradient, Some(Vec3::X));
        assert_eq!(c.value, 1.0);

        let full = avg_gradients(&vol, AveragingNeighborhood::Full);
        let f = full.get(VoxelCoord::ORIGIN).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((f.gradient.unwrap() - expected).length() < 1e-6);
        assert_eq!(f.value, 2.0);
    }

    #[test]
    fn test_avg_corner_neighbor_participates() {
        let mut vol = SparseVoxelVolume::new();
        vol.set(VoxelCoord::ORIGIN, Voxel::with_gradient(2.0, Vec3::X));
        vol.set(VoxelCoord::new(1, 1, -1), Voxel::with_gradient(4.0, Vec3::Z));

        let out = avg_gradients(&vol, AveragingNeighborhood::Corners);
        let v = out.get(VoxelCoord::ORIGIN).unwrap();
        assert_eq!(v.value, 3.0);
        let g = v.gradient.unwrap();
        assert!((g.length() - 1.0).abs() < 1e-6);
        assert!((g - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_avg_cancelling_gradients_dropped() {
        let mut vol = SparseVoxelVolume::new();
        vol.set(VoxelCoord::ORIGIN, Voxel::with_gradient(1.0, Vec3::X));
        vol.set(VoxelCoord::new(1, 1, 1), Voxel::with_gradient(1.0, -Vec3::X));
        let out = avg_gradients(&vol, AveragingNeighborhood::Corners);
        assert!(out.is_empty());
    }
}
