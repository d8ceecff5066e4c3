//! Sparse volume filters: separable correlation, gradients, morphology.

pub mod correlate;
pub mod gradient;
pub mod morphology;
pub mod pipeline;

pub use correlate::{correlate_1d, correlate_3d, gaussian_blur, GAUSSIAN_KERNEL};
pub use gradient::{avg_gradients, normalize_gradients, sobel_1d, sobel_3d, AveragingNeighborhood};
pub use morphology::{extend_edge, neighbor_counts, remove_marked, set_all_values_to};
pub use pipeline::{apply_filter, FilterKind, FilterParams};
