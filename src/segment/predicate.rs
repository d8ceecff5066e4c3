//! Admission predicates for region growth.

use serde::{Deserialize, Serialize};

use crate::voxel::{SparseVoxelVolume, VoxelCoord};

/// Minimum gradient dot product for two cells to count as one surface.
pub const DEFAULT_SIMILARITY: f32 = 0.98;

/// Decides whether region growth may step from `previous` into `current`.
pub trait AdmissionPredicate {
    fn admit(&self, volume: &SparseVoxelVolume, current: VoxelCoord, previous: VoxelCoord) -> bool;
}

impl<F> AdmissionPredicate for F
where
    F: Fn(&SparseVoxelVolume, VoxelCoord, VoxelCoord) -> bool,
{
    fn admit(&self, volume: &SparseVoxelVolume, current: VoxelCoord, previous: VoxelCoord) -> bool {
        self(volume, current, previous)
    }
}

/// Admit any cell with a non-zero value.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThresholdPredicate;

impl AdmissionPredicate for ThresholdPredicate {
    fn admit(&self, volume: &SparseVoxelVolume, current: VoxelCoord, _previous: VoxelCoord) -> bool {
        volume.value_at(current) != 0.0
    }
}

/// Admit a cell whose gradient is nearly parallel to the previous cell's.
#[derive(Clone, Copy, Debug)]
pub struct GradientSimilarityPredicate {
    pub min_dot: f32,
}

impl Default for GradientSimilarityPredicate {
    fn default() -> Self {
        Self {
            min_dot: DEFAULT_SIMILARITY,
        }
    }
}

impl AdmissionPredicate for GradientSimilarityPredicate {
    fn admit(&self, volume: &SparseVoxelVolume, current: VoxelCoord, previous: VoxelCoord) -> bool {
        match (volume.gradient_at(current), volume.gradient_at(previous)) {
            (Some(a), Some(b)) => a.dot(b) >= self.min_dot,
            _ => false,
        }
    }
}

/// Predicate selection for configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    #[default]
    Threshold,
    GradientSimilarity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::voxel::Voxel;

    #[test]
    fn test_threshold() {
        let mut vol = SparseVoxelVolume::new();
        vol.set_value(VoxelCoord::new(0, 0, 0), -1.0);
        vol.set_value(VoxelCoord::new(1, 0, 0), 0.0);
        let p = ThresholdPredicate;
        assert!(p.admit(&vol, VoxelCoord::new(0, 0, 0), VoxelCoord::ORIGIN));
        assert!(!p.admit(&vol, VoxelCoord::new(1, 0, 0), VoxelCoord::ORIGIN));
        assert!(!p.admit(&vol, VoxelCoord::new(2, 0, 0), VoxelCoord::ORIGIN));
    }

    #[test]
    fn test_gradient_similarity() {
        let mut vol = SparseVoxelVolume::new();
        vol.set(VoxelCoord::new(0, 0, 0), Voxel::with_gradient(1.0, Vec3::X));
        vol.set(VoxelCoord::new(1, 0, 0), Voxel::with_gradient(1.0, Vec3::new(1.0, 0.1, 0.0).normalize()));
        vol.set(VoxelCoord::new(2, 0, 0), Voxel::with_gradient(1.0, Vec3::Y));
        vol.set_value(VoxelCoord::new(3, 0, 0), 1.0);

        let p = GradientSimilarityPredicate::default();
        let a = VoxelCoord::new(0, 0, 0);
        assert!(p.admit(&vol, VoxelCoord::new(1, 0, 0), a));
        assert!(!p.admit(&vol, VoxelCoord::new(2, 0, 0), a));
        assert!(!p.admit(&vol, VoxelCoord::new(3, 0, 0), a));
    }

    #[test]
    fn test_closure_predicate() {
        let vol = SparseVoxelVolume::new();
        let p = |_: &SparseVoxelVolume, c: VoxelCoord, _: VoxelCoord| c.x > 0;
        assert!(p.admit(&vol, VoxelCoord::new(1, 0, 0), VoxelCoord::ORIGIN));
        assert!(!p.admit(&vol, VoxelCoord::new(0, 0, 0), VoxelCoord::ORIGIN));
    }
}
