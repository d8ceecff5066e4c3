//! Contract with the external renderer.

use crate::core::types::{Vec3, EPSILON};
use crate::present::color::{voxel_color, ColorMode};
use crate::voxel::{RenderHandle, SparseVoxelVolume, VolumeBounds};

/// Draws voxels on behalf of the core.
///
/// Handles are issued and owned by the renderer; the core stores them on
/// voxels only to hand them back.
pub trait VoxelRenderer {
    /// Remove everything drawn so far.
    fn clear(&mut self);

    /// Draw a unit cube centred at `position` and return its handle.
    fn draw_voxel(&mut self, position: Vec3, color: u32) -> RenderHandle;

    fn set_highlight(&mut self, handle: RenderHandle, highlighted: bool);
}

/// Redraw `volume`, centred on its lattice bounds, storing each returned
/// handle on its voxel. Returns the number of voxels drawn.
pub fn present_volume(volume: &mut SparseVoxelVolume, renderer: &mut dyn VoxelRenderer, mode: ColorMode) -> usize {
    renderer.clear();
    let Some(bounds) = VolumeBounds::compute(volume) else {
        return 0;
    };
    let center = bounds.center();

    let mut drawn = 0;
    for coord in volume.sorted_keys() {
        let Some(voxel) = volume.get_mut(coord) else {
            continue;
        };
        if voxel.value <= EPSILON {
            voxel.render_handle = None;
            continue;
        }
        let color = voxel_color(coord, voxel, &bounds, mode);
        let position = coord.as_ivec3().as_vec3() - center;
        voxel.render_handle = Some(renderer.draw_voxel(position, color));
        drawn += 1;
    }
    log::debug!("presented {} voxels", drawn);
    drawn
}
