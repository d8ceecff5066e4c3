//! Separable 1-D correlation over sparse volumes.
//!
//! Output is evaluated only at candidate cells: those within the kernel's
//! half-width of a populated input cell along the pass axis. Cost is
//! proportional to populated voxels × kernel width, never to grid volume.

use std::collections::HashSet;

use crate::voxel::{Axis, SparseVoxelVolume, VoxelCoord};

/// Normalized binomial smoothing kernel
pub const GAUSSIAN_KERNEL: [f32; 3] = [0.25, 0.5, 0.25];

/// Unnormalized smoothing kernel used across Sobel's perpendicular axes
pub const SOBEL_SMOOTH_KERNEL: [f32; 3] = [1.0, 2.0, 1.0];

/// Central difference kernel
pub const SOBEL_DIFF_KERNEL: [f32; 3] = [1.0, 0.0, -1.0];

/// Correlate `volume` with `kernel` along `axis`.
///
/// `out[c] = Σ kernel[i] · in[c + (i - kh)·axis]` with `kh = len / 2`.
/// Only non-zero sums are written.
///
/// # Panics
///
/// Panics if `kernel` has even length.
pub fn correlate_1d(volume: &SparseVoxelVolume, kernel: &[f32], axis: Axis) -> SparseVoxelVolume {
    assert!(kernel.len() % 2 == 1, "kernel length must be odd, got {}", kernel.len());
    let kh = (kernel.len() / 2) as i32;

    let mut candidates: HashSet<VoxelCoord> = HashSet::with_capacity(volume.size() * 2);
    for coord in volume.keys() {
        for d in -kh..=kh {
            candidates.insert(coord.step(axis, d));
        }
    }

    let mut out = SparseVoxelVolume::with_capacity(candidates.len());
    for coord in candidates {
        let sum: f32 = kernel
            .iter()
            .enumerate()
            .map(|(i, k)| k * volume.value_at(coord.step(axis, i as i32 - kh)))
            .sum();
        if sum != 0.0 {
            out.set_value(coord, sum);
        }
    }

    log::trace!(
        "correlate_1d {:?}: {} -> {} voxels",
        axis,
        volume.size(),
        out.size()
    );
    out
}

/// Correlate along x, then y, then z.
///
/// At most two volumes are alive at any time.
pub fn correlate_3d(volume: &SparseVoxelVolume, kernel: &[f32]) -> SparseVoxelVolume {
    let pass_x = correlate_1d(volume, kernel, Axis::X);
    let pass_y = correlate_1d(&pass_x, kernel, Axis::Y);
    drop(pass_x);
    correlate_1d(&pass_y, kernel, Axis::Z)
}

/// Separable 3×3×3 binomial blur.
pub fn gaussian_blur(volume: &SparseVoxelVolume) -> SparseVoxelVolume {
    log::debug!("gaussian blur over {} voxels", volume.size());
    correlate_3d(volume, &GAUSSIAN_KERNEL)
}
