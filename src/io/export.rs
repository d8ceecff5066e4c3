//! Lattice export and re-import in the `v x y z` line format.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::types::{Result, EPSILON};
use crate::io::line_reader::{read_file_lines, LineSink};
use crate::io::vertex::parse_vertex_line;
use crate::voxel::{SparseVoxelVolume, VoxelCoord};

/// One `v x y z` line per voxel above [`EPSILON`], in coordinate order.
pub fn export_lines(volume: &SparseVoxelVolume) -> String {
    let mut out = String::with_capacity(volume.size() * 16);
    for coord in volume.sorted_keys() {
        if volume.value_at(coord) > EPSILON {
            // Writing to a String cannot fail
            let _ = writeln!(out, "v {} {} {}", coord.x, coord.y, coord.z);
        }
    }
    out
}

/// Write [`export_lines`] to `path`.
pub fn write_export(volume: &SparseVoxelVolume, path: &Path) -> Result<()> {
    let text = export_lines(volume);
    std::fs::write(path, text)?;
    log::info!("exported {} voxels to {}", volume.size(), path.display());
    Ok(())
}

/// Reads `v x y z` lines as lattice coordinates, without rescaling.
#[derive(Debug)]
pub struct LatticeImporter {
    sample_value: f32,
    volume: SparseVoxelVolume,
}

impl LatticeImporter {
    pub fn new(sample_value: f32) -> Self {
        Self {
            sample_value,
            volume: SparseVoxelVolume::new(),
        }
    }

    pub fn finish(self) -> SparseVoxelVolume {
        self.volume
    }
}

impl LineSink for LatticeImporter {
    fn on_line(&mut self, line: &str) {
        if let Some(p) = parse_vertex_line(line) {
            let coord = VoxelCoord::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32);
            self.volume.accumulate(coord, self.sample_value);
        }
    }
}

/// Import lattice coordinates from in-memory text.
pub fn import_lattice(text: &str, sample_value: f32) -> SparseVoxelVolume {
    let mut importer = LatticeImporter::new(sample_value);
    for line in text.lines() {
        importer.on_line(line);
    }
    importer.finish()
}

/// Import lattice coordinates from a file.
pub fn import_lattice_file(path: &Path, sample_value: f32, chunk_size: usize) -> Result<SparseVoxelVolume> {
    let mut importer = LatticeImporter::new(sample_value);
    read_file_lines(path, chunk_size, &mut importer)?;
    Ok(importer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::voxel::Voxel;

    #[test]
    fn test_export_format_and_order() {
        let mut vol = SparseVoxelVolume::new();
        vol.set_value(VoxelCoord::new(2, 0, 0), 1.0);
        vol.set_value(VoxelCoord::new(-1, 5, 3), 4.0);
        vol.set_value(VoxelCoord::new(9, 9, 9), 0.0);
        assert_eq!(export_lines(&vol), "v -1 5 3\nv 2 0 0\n");
    }

    #[test]
    fn test_export_reimport_is_lossless() {
        let mut vol = SparseVoxelVolume::new();
        for (i, c) in [(0, 0, 0), (-7, 3, 12), (100, -100, 5), (1, 1, -1)].into_iter().enumerate() {
            vol.set(VoxelCoord::from(c), Voxel::with_gradient(1.0 + i as f32, Vec3::Y));
        }
        let back = import_lattice(&export_lines(&vol), 1.0);
        assert_eq!(back.sorted_keys(), vol.sorted_keys());
    }

    #[test]
    fn test_write_and_import_file() {
        let mut vol = SparseVoxelVolume::new();
        for x in -3..3 {
            vol.set_value(VoxelCoord::new(x, x * 2, -x), 1.0);
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxel.obj");
        write_export(&vol, &path).unwrap();

        let back = import_lattice_file(&path, 1.0, 8).unwrap();
        assert_eq!(back.sorted_keys(), vol.sorted_keys());
    }
}
