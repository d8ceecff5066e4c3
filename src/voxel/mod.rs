//! Voxel data structures

pub mod coord;
pub mod voxel;
pub mod volume;
pub mod bounds;

pub use coord::{Axis, VoxelCoord, NEIGHBOR_OFFSETS_26};
pub use voxel::{RenderHandle, Voxel};
pub use volume::SparseVoxelVolume;
pub use bounds::{ValueRange, VolumeBounds};
