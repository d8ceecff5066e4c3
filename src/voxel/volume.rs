//! SparseVoxelVolume - keyed storage for populated lattice cells.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::core::types::Vec3;
use crate::voxel::coord::VoxelCoord;
use crate::voxel::voxel::Voxel;

/// Sparse mapping from lattice coordinate to voxel attributes.
///
/// A coordinate absent from the map has value 0 and no gradient.
#[derive(Clone, Debug, Default)]
pub struct SparseVoxelVolume {
    voxels: HashMap<VoxelCoord, Voxel>,
}

impl SparseVoxelVolume {
    /// Create an empty volume.
    pub fn new() -> Self {
        Self {
            voxels: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voxels: HashMap::with_capacity(capacity),
        }
    }

    /// Get a voxel by coordinate.
    pub fn get(&self, coord: VoxelCoord) -> Option<&Voxel> {
        self.voxels.get(&coord)
    }

    /// Get mutable voxel by coordinate.
    pub fn get_mut(&mut self, coord: VoxelCoord) -> Option<&mut Voxel> {
        self.voxels.get_mut(&coord)
    }

    /// Value at `coord`, 0 when unpopulated.
    pub fn value_at(&self, coord: VoxelCoord) -> f32 {
        self.voxels.get(&coord).map_or(0.0, |v| v.value)
    }

    /// Gradient at `coord`, if the voxel exists and carries one.
    pub fn gradient_at(&self, coord: VoxelCoord) -> Option<Vec3> {
        self.voxels.get(&coord).and_then(|v| v.gradient)
    }

    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.voxels.contains_key(&coord)
    }

    /// Insert or replace a voxel.
    pub fn set(&mut self, coord: VoxelCoord, voxel: Voxel) {
        self.voxels.insert(coord, voxel);
    }

    /// Insert or replace a value-only voxel.
    pub fn set_value(&mut self, coord: VoxelCoord, value: f32) {
        self.voxels.insert(coord, Voxel::with_value(value));
    }

    /// Add `amount` to the voxel at `coord`, creating it with `amount` if absent.
    pub fn accumulate(&mut self, coord: VoxelCoord, amount: f32) -> &mut Voxel {
        match self.voxels.entry(coord) {
            Entry::Occupied(e) => {
                let v = e.into_mut();
                v.value += amount;
                v
            }
            Entry::Vacant(e) => e.insert(Voxel::with_value(amount)),
        }
    }

    /// Remove a voxel.
    pub fn remove(&mut self, coord: VoxelCoord) -> Option<Voxel> {
        self.voxels.remove(&coord)
    }

    pub fn clear(&mut self) {
        self.voxels.clear();
    }

    /// Number of populated voxels.
    pub fn size(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Populated coordinates (arbitrary order).
    pub fn keys(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.voxels.keys().copied()
    }

    /// Populated coordinates and voxels (arbitrary order).
    pub fn entries(&self) -> impl Iterator<Item = (VoxelCoord, &Voxel)> + '_ {
        self.voxels.iter().map(|(c, v)| (*c, v))
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = (VoxelCoord, &mut Voxel)> + '_ {
        self.voxels.iter_mut().map(|(c, v)| (*c, v))
    }

    /// Populated coordinates in (x, y, z) order.
    pub fn sorted_keys(&self) -> Vec<VoxelCoord> {
        let mut keys: Vec<_> = self.voxels.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Remove every voxel whose value is at or below `epsilon`.
    /// Returns the number of voxels removed.
    pub fn compact(&mut self, epsilon: f32) -> usize {
        let before = self.voxels.len();
        self.voxels.retain(|_, v| v.value > epsilon);
        before - self.voxels.len()
    }

    /// Sum of all voxel values.
    pub fn total_value(&self) -> f64 {
        self.voxels.values().map(|v| v.value as f64).sum()
    }

    /// Set `marked` on every listed coordinate that is populated.
    /// Returns how many voxels were marked.
    pub fn mark<I: IntoIterator<Item = VoxelCoord>>(&mut self, coords: I) -> usize {
        let mut count = 0;
        for coord in coords {
            if let Some(v) = self.voxels.get_mut(&coord) {
                v.marked = true;
                count += 1;
            }
        }
        count
    }

    /// Number of voxels with `marked` set.
    pub fn marked_count(&self) -> usize {
        self.voxels.values().filter(|v| v.marked).count()
    }
}

impl FromIterator<(VoxelCoord, Voxel)> for SparseVoxelVolume {
    fn from_iter<T: IntoIterator<Item = (VoxelCoord, Voxel)>>(iter: T) -> Self {
        Self {
            voxels: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SparseVoxelVolume {
    type Item = (VoxelCoord, Voxel);
    type IntoIter = std::collections::hash_map::IntoIter<VoxelCoord, Voxel>;

    fn into_iter(self) -> Self::IntoIter {
        self.voxels.into_iter()
    }
}
