//! Two-pass rasterization of vertex samples into a sparse lattice.
//!
//! Pass 1 ([`SampleExtent`]) finds the per-axis range of the raw samples.
//! Pass 2 ([`Rasterizer`]) maps each sample to
//! `floor((v - min) * (raster_size - 1) / max_span)` using the largest axis
//! span for all three axes, so aspect ratio is preserved.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::{DVec3, Result, Vec3};
use crate::io::line_reader::{read_file_lines, read_file_lines_async, LineSink};
use crate::io::vertex::parse_vertex_line;
use crate::voxel::{SparseVoxelVolume, VoxelCoord};

/// Rasterization settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Cells along the longest axis
    pub raster_size: u32,
    /// Value added per sample; a new voxel starts at this value
    pub sample_value: f32,
    /// Keep each sample's continuous lattice-space position on its voxel
    pub keep_vertices: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            raster_size: 64,
            sample_value: 1.0,
            keep_vertices: false,
        }
    }
}

/// Per-axis range of raw samples (pass 1)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleExtent {
    pub min: DVec3,
    pub max: DVec3,
    pub samples: usize,
}

impl Default for SampleExtent {
    fn default() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
            samples: 0,
        }
    }
}

impl SampleExtent {
    pub fn include(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
        self.samples += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Largest of the three axis extents
    pub fn max_span(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.max - self.min).max_element()
    }
}

impl LineSink for SampleExtent {
    fn on_line(&mut self, line: &str) {
        if let Some(p) = parse_vertex_line(line) {
            self.include(p);
        }
    }
}

/// Accumulates samples into a volume (pass 2)
#[derive(Debug)]
pub struct Rasterizer {
    origin: DVec3,
    scale: f64,
    config: RasterConfig,
    volume: SparseVoxelVolume,
}

impl Rasterizer {
    pub fn new(extent: &SampleExtent, config: RasterConfig) -> Self {
        let span = extent.max_span();
        let scale = if span > 0.0 && span.is_finite() {
            config.raster_size.saturating_sub(1) as f64 / span
        } else {
            if !extent.is_empty() {
                log::warn!("degenerate sample extent, all samples map to one voxel");
            }
            0.0
        };
        Self {
            origin: if extent.is_empty() { DVec3::ZERO } else { extent.min },
            scale,
            config,
            volume: SparseVoxelVolume::new(),
        }
    }

    /// Lattice-space position of a raw sample
    pub fn to_lattice(&self, p: DVec3) -> DVec3 {
        (p - self.origin) * self.scale
    }

    pub fn push_sample(&mut self, p: DVec3) {
        let q = self.to_lattice(p);
        let coord = VoxelCoord::new(q.x.floor() as i32, q.y.floor() as i32, q.z.floor() as i32);
        let voxel = self.volume.accumulate(coord, self.config.sample_value);
        if self.config.keep_vertices {
            voxel.vertices.push(Vec3::new(q.x as f32, q.y as f32, q.z as f32));
        }
    }

    pub fn finish(self) -> SparseVoxelVolume {
        self.volume
    }
}

impl LineSink for Rasterizer {
    fn on_line(&mut self, line: &str) {
        if let Some(p) = parse_vertex_line(line) {
            self.push_sample(p);
        }
    }

    fn on_complete(&mut self) {
        log::info!("rasterized into {} voxels", self.volume.size());
    }
}

/// Rasterize in-memory lines.
pub fn rasterize_lines<S: AsRef<str>>(lines: &[S], config: RasterConfig) -> SparseVoxelVolume {
    let mut extent = SampleExtent::default();
    for line in lines {
        extent.on_line(line.as_ref());
    }
    let mut rasterizer = Rasterizer::new(&extent, config);
    for line in lines {
        rasterizer.on_line(line.as_ref());
    }
    rasterizer.on_complete();
    rasterizer.finish()
}

/// Rasterize a file, streaming it twice.
pub fn rasterize_file(path: &Path, config: RasterConfig, chunk_size: usize) -> Result<SparseVoxelVolume> {
    let mut extent = SampleExtent::default();
    let lines = read_file_lines(path, chunk_size, &mut extent)?;
    log::info!("{}: {} lines, {} vertices", path.display(), lines, extent.samples);
    let mut rasterizer = Rasterizer::new(&extent, config);
    read_file_lines(path, chunk_size, &mut rasterizer)?;
    Ok(rasterizer.finish())
}

/// Async counterpart of [`rasterize_file`].
pub async fn rasterize_file_async(path: &Path, config: RasterConfig, chunk_size: usize) -> Result<SparseVoxelVolume> {
    let mut extent = SampleExtent::default();
    let lines = read_file_lines_async(path, chunk_size, &mut extent).await?;
    log::info!("{}: {} lines, {} vertices", path.display(), lines, extent.samples);
    let mut rasterizer = Rasterizer::new(&extent, config);
    read_file_lines_async(path, chunk_size, &mut rasterizer).await?;
    Ok(rasterizer.finish())
}
