//! Value histogram for display.

use serde::{Deserialize, Serialize};

use crate::core::types::EPSILON;
use crate::voxel::SparseVoxelVolume;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueHistogram {
    pub min: f32,
    pub max: f32,
    pub counts: Vec<usize>,
}

impl ValueHistogram {
    /// Bin every voxel above [`EPSILON`] into `bins` equal-width buckets.
    /// All values land in bin 0 when they are identical.
    pub fn build(volume: &SparseVoxelVolume, bins: usize) -> Self {
        let bins = bins.max(1);
        let values: Vec<f32> = volume
            .entries()
            .map(|(_, v)| v.value)
            .filter(|v| *v > EPSILON)
            .collect();

        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut counts = vec![0usize; bins];
        for v in &values {
            let idx = if max > min {
                (((v - min) / (max - min)) * bins as f32) as usize
            } else {
                0
            };
            counts[idx.min(bins - 1)] += 1;
        }

        if values.is_empty() {
            return Self { min: 0.0, max: 0.0, counts };
        }
        Self { min, max, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
