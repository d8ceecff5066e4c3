//! Symbolic filter selection and the compacting filter runner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::EPSILON;
use crate::filter::correlate::gaussian_blur;
use crate::filter::gradient::{avg_gradients, normalize_gradients, sobel_3d, AveragingNeighborhood};
use crate::filter::morphology::{extend_edge, remove_marked, set_all_values_to};
use crate::voxel::SparseVoxelVolume;

/// A single pipeline stage selected by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    None,
    Gauss,
    /// Sobel gradient, normalized
    Sobel,
    /// Gaussian blur, then Sobel
    GaussSobel,
    /// Local averaging of existing gradients
    SmoothGradients,
    ExtendEdge,
    RemoveMarked,
    /// Set every voxel to the configured reset value
    ResetValues,
}

impl FilterKind {
    /// Parse a selector; unrecognized names select [`FilterKind::None`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "gauss" | "gaussian" | "blur" => FilterKind::Gauss,
            "sobel" => FilterKind::Sobel,
            "gauss-sobel" | "sobel-gauss" => FilterKind::GaussSobel,
            "smooth-gradients" | "avg-gradients" => FilterKind::SmoothGradients,
            "extend-edge" | "edge" => FilterKind::ExtendEdge,
            "remove-marked" | "prune" => FilterKind::RemoveMarked,
            "reset-values" | "reset" => FilterKind::ResetValues,
            other => {
                if other != "none" && !other.is_empty() {
                    log::warn!("unknown filter {:?}, applying none", name);
                }
                FilterKind::None
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Gauss => "gauss",
            FilterKind::Sobel => "sobel",
            FilterKind::GaussSobel => "gauss-sobel",
            FilterKind::SmoothGradients => "smooth-gradients",
            FilterKind::ExtendEdge => "extend-edge",
            FilterKind::RemoveMarked => "remove-marked",
            FilterKind::ResetValues => "reset-values",
        }
    }
}

impl FromStr for FilterKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilterKind::from_name(s))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for stages that need them
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    pub averaging: AveragingNeighborhood,
    pub reset_value: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            averaging: AveragingNeighborhood::Corners,
            reset_value: 10.0,
        }
    }
}

/// Run one stage, producing a new compacted volume. The input is never
/// modified.
pub fn apply_filter(volume: &SparseVoxelVolume, kind: FilterKind, params: &FilterParams) -> SparseVoxelVolume {
    log::info!("filter {} start ({} voxels)", kind, volume.size());

    let mut out = match kind {
        FilterKind::None => volume.clone(),
        FilterKind::Gauss => gaussian_blur(volume),
        FilterKind::Sobel => normalize_gradients(&sobel_3d(volume)),
        FilterKind::GaussSobel => normalize_gradients(&sobel_3d(&gaussian_blur(volume))),
        FilterKind::SmoothGradients => avg_gradients(volume, params.averaging),
        FilterKind::ExtendEdge => extend_edge(volume),
        FilterKind::RemoveMarked => remove_marked(volume),
        FilterKind::ResetValues => {
            let mut copy = volume.clone();
            set_all_values_to(&mut copy, params.reset_value);
            copy
        }
    };

    let removed = out.compact(EPSILON);
    log::info!(
        "filter {} done ({} voxels, {} compacted away)",
        kind,
        out.size(),
        removed
    );
    out
}
