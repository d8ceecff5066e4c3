//! Ray picking against voxel occupancy.
//!
//! Two traversal strategies share the [`VoxelTracer`] interface.
//! [`GridDda`] steps face to face with exact parametric bookkeeping;
//! [`SubVoxelMarch`] re-derives the next crossing from the current point
//! and nudges past each boundary, so the two can differ on grazing rays.

pub mod dda;
pub mod march;

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Result, Vec3, EPSILON};
use crate::math::{Aabb, Ray};
use crate::voxel::{SparseVoxelVolume, VolumeBounds, VoxelCoord};

pub use dda::GridDda;
pub use march::SubVoxelMarch;

/// First occupied cell found along a ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub coord: VoxelCoord,
    /// Outward normal of the face the ray entered through; zero when the
    /// ray started inside the hit cell.
    pub normal: IVec3,
    /// Ray parameter at which the cell was reached
    pub t: f32,
}

/// Walks a ray through lattice cells inside `bounds` and reports the first
/// one `occupied` accepts.
pub trait VoxelTracer {
    fn trace(&self, ray: &Ray, bounds: &Aabb, occupied: &dyn Fn(VoxelCoord) -> bool) -> Option<RayHit>;
}

/// Runtime selection between tracers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStrategy {
    #[default]
    Dda,
    March,
}

impl VoxelTracer for TraceStrategy {
    fn trace(&self, ray: &Ray, bounds: &Aabb, occupied: &dyn Fn(VoxelCoord) -> bool) -> Option<RayHit> {
        match self {
            TraceStrategy::Dda => GridDda.trace(ray, bounds, occupied),
            TraceStrategy::March => SubVoxelMarch::default().trace(ray, bounds, occupied),
        }
    }
}

/// Outward normal for entering across `axis` while moving along `direction`.
pub(crate) fn entry_normal(axis: Option<usize>, direction: Vec3) -> IVec3 {
    match axis {
        Some(a) => {
            let mut n = IVec3::ZERO;
            n[a] = if direction[a] > 0.0 { -1 } else { 1 };
            n
        }
        None => IVec3::ZERO,
    }
}

/// Pick the first voxel of `volume` hit by the ray `origin + t·direction`.
///
/// Fails only for a degenerate direction. An empty volume never hits.
pub fn pick_voxel(
    volume: &SparseVoxelVolume,
    origin: Vec3,
    direction: Vec3,
    tracer: &dyn VoxelTracer,
) -> Result<Option<RayHit>> {
    let ray = Ray::try_new(origin, direction)?;
    let Some(bounds) = VolumeBounds::compute(volume) else {
        return Ok(None);
    };
    let occupied = |c: VoxelCoord| volume.value_at(c) > EPSILON;
    Ok(tracer.trace(&ray, &bounds.aabb(), &occupied))
}
