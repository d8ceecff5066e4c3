//! Contrast stretch and voxel coloring.

use serde::{Deserialize, Serialize};

use crate::voxel::{Voxel, VolumeBounds, VoxelCoord};

/// Color used for marked voxels.
pub const MARKED_COLOR: u32 = 0xFF_FF_FF;

/// Color used in [`ColorMode::Sum`] for cells holding more than one sample.
pub const DENSE_COLOR: u32 = 0xFF_00_00;

/// Channel range used for position coloring.
pub const CHANNEL_LOW: i32 = 30;
pub const CHANNEL_HIGH: i32 = 225;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Position mapped to RGB
    #[default]
    Xyz,
    /// Position RGB, but red for voxels with value above 1
    Sum,
}

/// Linearly map `v` from `[min_v, max_v]` onto `[low, high]`, flooring.
///
/// A degenerate input range (`min_v == max_v`) maps everything to `high`.
pub fn inc_contrast(v: f32, min_v: f32, max_v: f32, low: i32, high: i32) -> i32 {
    let t = if min_v == max_v { 1.0 } else { (v - min_v) / (max_v - min_v) };
    (t * (high - low) as f32 + low as f32).floor() as i32
}

/// 0xRRGGBB for one voxel.
pub fn voxel_color(coord: VoxelCoord, voxel: &Voxel, bounds: &VolumeBounds, mode: ColorMode) -> u32 {
    if voxel.marked {
        return MARKED_COLOR;
    }
    let channel = |v: i32, lo: i32, hi: i32| {
        inc_contrast(v as f32, lo as f32, hi as f32, CHANNEL_LOW, CHANNEL_HIGH).clamp(0, 255) as u32
    };
    let (min, max) = (bounds.lattice_min, bounds.lattice_max);
    let rgb = (channel(coord.x, min.x, max.x) << 16)
        | (channel(coord.y, min.y, max.y) << 8)
        | channel(coord.z, min.z, max.z);
    match mode {
        ColorMode::Xyz => rgb,
        ColorMode::Sum if voxel.value > 1.0 => DENSE_COLOR,
        ColorMode::Sum => rgb,
    }
}
