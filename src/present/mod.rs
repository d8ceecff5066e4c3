//! Presentation data: colors, histograms and the renderer contract.

pub mod color;
pub mod histogram;
pub mod renderer;

pub use color::{inc_contrast, voxel_color, ColorMode, MARKED_COLOR};
pub use histogram::ValueHistogram;
pub use renderer::{present_volume, VoxelRenderer};
