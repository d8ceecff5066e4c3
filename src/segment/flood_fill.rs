//! 26-connected region growth with an explicit work stack.

use std::collections::HashSet;

use crate::segment::predicate::AdmissionPredicate;
use crate::voxel::{SparseVoxelVolume, VoxelCoord};

/// Coordinates admitted by a flood fill
pub type MarkedSet = HashSet<VoxelCoord>;

/// Grow a region from `seed` through 26-connected neighbours.
///
/// Each step from `previous` to `current` is admitted by `predicate`; the
/// seed is tested against itself. Only populated cells can be admitted,
/// so the fill always terminates. The volume is not modified; callers
/// apply `marked` themselves.
pub fn flood_fill<P>(volume: &SparseVoxelVolume, seed: VoxelCoord, predicate: &P) -> MarkedSet
where
    P: AdmissionPredicate + ?Sized,
{
    let mut marked = MarkedSet::new();
    let mut stack: Vec<(VoxelCoord, VoxelCoord)> = vec![(seed, seed)];

    while let Some((current, previous)) = stack.pop() {
        if marked.contains(&current) || !volume.contains(current) {
            continue;
        }
        if !predicate.admit(volume, current, previous) {
            continue;
        }
        marked.insert(current);
        for n in current.neighbors() {
            if !marked.contains(&n) && volume.contains(n) {
                stack.push((n, current));
            }
        }
    }

    log::debug!("flood_fill from {}: {} voxels", seed, marked.len());
    marked
}
