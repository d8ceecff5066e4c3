//! Morphology: edge extension, mark pruning and bulk value rewrites.

use std::collections::HashSet;

use crate::voxel::{SparseVoxelVolume, Voxel, VoxelCoord, NEIGHBOR_OFFSETS_26};

/// Value given to voxels created by [`extend_edge`].
pub const EXTENDED_VALUE: f32 = 10.0;

/// How far past a gap the continuing edge is searched for.
pub const EDGE_CONTINUATION_STEPS: i32 = 3;

/// Fill short gaps in edges.
///
/// Every empty cell adjacent to a populated one is a candidate. A candidate
/// `c` is filled when for some direction `d` the cell `c + d` is populated
/// and the edge resumes on the other side, i.e. `c - k·d` is populated for
/// some `k` in `1..=3`. Flat surfaces do not grow: a cell above a plane has
/// support on one side only.
pub fn extend_edge(volume: &SparseVoxelVolume) -> SparseVoxelVolume {
    let mut candidates: HashSet<VoxelCoord> = HashSet::new();
    for coord in volume.keys() {
        for n in coord.neighbors() {
            if !volume.contains(n) {
                candidates.insert(n);
            }
        }
    }

    let mut out = volume.clone();
    let mut created = 0usize;
    for c in candidates {
        let continues = NEIGHBOR_OFFSETS_26.iter().any(|&d| {
            volume.contains(c.offset(d))
                && (1..=EDGE_CONTINUATION_STEPS).any(|k| volume.contains(c.offset(-d * k)))
        });
        if continues {
            out.set(c, Voxel::with_value(EXTENDED_VALUE));
            created += 1;
        }
    }

    log::debug!("extend_edge: filled {} gap voxels", created);
    out
}

/// Copy of `volume` without marked voxels.
pub fn remove_marked(volume: &SparseVoxelVolume) -> SparseVoxelVolume {
    volume
        .entries()
        .filter(|(_, v)| !v.marked)
        .map(|(c, v)| (c, v.clone()))
        .collect()
}

/// Rewrite every voxel's value in place.
pub fn set_all_values_to(volume: &mut SparseVoxelVolume, value: f32) {
    for (_, voxel) in volume.entries_mut() {
        voxel.value = value;
    }
}

/// For each populated voxel, how many cells of its 3×3×3 neighbourhood
/// (itself included) hold a positive value.
pub fn neighbor_counts(volume: &SparseVoxelVolume) -> SparseVoxelVolume {
    volume
        .keys()
        .map(|coord| {
            let own = (volume.value_at(coord) > 0.0) as u32;
            let around = coord
                .neighbors()
                .filter(|n| volume.value_at(*n) > 0.0)
                .count() as u32;
            (coord, Voxel::with_value((own + around) as f32))
        })
        .collect()
}
