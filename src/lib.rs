//! Voxseg - sparse voxel rasterization, filtering and segmentation
//!
//! Point samples are rasterized into a [`voxel::SparseVoxelVolume`], run
//! through separable filters, and segmented by growing regions from voxels
//! picked with a ray.

pub mod core;
pub mod math;
pub mod voxel;
pub mod filter;
pub mod segment;
pub mod trace;
pub mod io;
pub mod present;
pub mod session;

pub use session::{Session, SessionConfig};
