//! Session state: the current volume plus the settings every operation on
//! it shares.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::{Result, Vec3};
use crate::filter::{apply_filter, AveragingNeighborhood, FilterKind, FilterParams};
use crate::io::{
    export_lines, import_lattice, import_lattice_file, rasterize_file, rasterize_file_async, rasterize_lines,
    write_export, RasterConfig, DEFAULT_CHUNK_SIZE,
};
use crate::present::{present_volume, ColorMode, ValueHistogram, VoxelRenderer};
use crate::segment::{
    flood_fill, GradientSimilarityPredicate, MarkedSet, PredicateKind, ThresholdPredicate, DEFAULT_SIMILARITY,
};
use crate::trace::{pick_voxel, RayHit, TraceStrategy};
use crate::voxel::{RenderHandle, SparseVoxelVolume, VolumeBounds, VoxelCoord};

/// Session settings, loadable from JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub raster_size: u32,
    pub sample_value: f32,
    pub keep_vertices: bool,
    /// Byte chunk size for streaming reads
    pub chunk_size: usize,
    pub trace_strategy: TraceStrategy,
    pub predicate: PredicateKind,
    pub similarity_threshold: f32,
    pub averaging: AveragingNeighborhood,
    pub reset_value: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let raster = RasterConfig::default();
        let params = FilterParams::default();
        Self {
            raster_size: raster.raster_size,
            sample_value: raster.sample_value,
            keep_vertices: raster.keep_vertices,
            chunk_size: DEFAULT_CHUNK_SIZE,
            trace_strategy: TraceStrategy::default(),
            predicate: PredicateKind::default(),
            similarity_threshold: DEFAULT_SIMILARITY,
            averaging: params.averaging,
            reset_value: params.reset_value,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.raster_size == 0 {
            return Err(crate::core::Error::Config("raster_size must be at least 1".into()));
        }
        if self.chunk_size == 0 {
            return Err(crate::core::Error::Config("chunk_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn raster(&self) -> RasterConfig {
        RasterConfig {
            raster_size: self.raster_size,
            sample_value: self.sample_value,
            keep_vertices: self.keep_vertices,
        }
    }

    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            averaging: self.averaging,
            reset_value: self.reset_value,
        }
    }
}

/// Owns the current volume. Every filter produces a new volume that
/// replaces it.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    volume: SparseVoxelVolume,
    highlighted: Option<RenderHandle>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            volume: SparseVoxelVolume::new(),
            highlighted: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn volume(&self) -> &SparseVoxelVolume {
        &self.volume
    }

    /// Replace the current volume.
    pub fn set_volume(&mut self, volume: SparseVoxelVolume) {
        self.volume = volume;
        self.highlighted = None;
    }

    pub fn into_volume(self) -> SparseVoxelVolume {
        self.volume
    }

    /// Rasterize raw vertex lines into the current volume.
    pub fn load_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> usize {
        self.set_volume(rasterize_lines(lines, self.config.raster()));
        self.volume.size()
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let volume = rasterize_file(path, self.config.raster(), self.config.chunk_size)?;
        self.set_volume(volume);
        Ok(self.volume.size())
    }

    pub async fn load_file_async(&mut self, path: &Path) -> Result<usize> {
        let volume = rasterize_file_async(path, self.config.raster(), self.config.chunk_size).await?;
        self.set_volume(volume);
        Ok(self.volume.size())
    }

    /// Load lines that already hold lattice coordinates.
    pub fn load_lattice(&mut self, text: &str) -> usize {
        self.set_volume(import_lattice(text, self.config.sample_value));
        self.volume.size()
    }

    pub fn load_lattice_file(&mut self, path: &Path) -> Result<usize> {
        let volume = import_lattice_file(path, self.config.sample_value, self.config.chunk_size)?;
        self.set_volume(volume);
        Ok(self.volume.size())
    }

    /// Run one filter stage on the current volume and make its output current.
    pub fn apply(&mut self, kind: FilterKind) -> &SparseVoxelVolume {
        let next = apply_filter(&self.volume, kind, &self.config.filter_params());
        self.set_volume(next);
        &self.volume
    }

    /// Run a chain of filter stages in order.
    pub fn apply_chain(&mut self, kinds: &[FilterKind]) -> &SparseVoxelVolume {
        for kind in kinds {
            self.apply(*kind);
        }
        &self.volume
    }

    /// First voxel hit by the ray, with the configured tracer.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Result<Option<RayHit>> {
        pick_voxel(&self.volume, origin, direction, &self.config.trace_strategy)
    }

    /// Grow a region from `seed` with the configured predicate.
    pub fn segment_at(&self, seed: VoxelCoord) -> MarkedSet {
        match self.config.predicate {
            PredicateKind::Threshold => flood_fill(&self.volume, seed, &ThresholdPredicate),
            PredicateKind::GradientSimilarity => flood_fill(
                &self.volume,
                seed,
                &GradientSimilarityPredicate {
                    min_dot: self.config.similarity_threshold,
                },
            ),
        }
    }

    /// Pick along the ray, grow a region from the hit and mark it.
    ///
    /// Returns the marked set, or `None` when the ray misses.
    pub fn segment_from_ray(&mut self, origin: Vec3, direction: Vec3) -> Result<Option<MarkedSet>> {
        let Some(hit) = self.pick(origin, direction)? else {
            log::info!("segment: ray missed the volume");
            return Ok(None);
        };
        let region = self.segment_at(hit.coord);
        let marked = self.mark(&region);
        log::info!("segment: seed {} grew to {} voxels, {} marked", hit.coord, region.len(), marked);
        Ok(Some(region))
    }

    /// Mark every coordinate of `region` present in the volume.
    pub fn mark(&mut self, region: &MarkedSet) -> usize {
        self.volume.mark(region.iter().copied())
    }

    pub fn bounds(&self) -> Option<VolumeBounds> {
        VolumeBounds::compute(&self.volume)
    }

    pub fn histogram(&self, bins: usize) -> ValueHistogram {
        ValueHistogram::build(&self.volume, bins)
    }

    pub fn export(&self) -> String {
        export_lines(&self.volume)
    }

    pub fn write_export(&self, path: &Path) -> Result<()> {
        write_export(&self.volume, path)
    }

    /// Draw the current volume through `renderer`.
    pub fn present(&mut self, renderer: &mut dyn VoxelRenderer, mode: ColorMode) -> usize {
        self.highlighted = None;
        present_volume(&mut self.volume, renderer, mode)
    }

    /// Highlight the voxel under the ray, clearing the previous highlight.
    /// Returns the highlighted coordinate.
    pub fn hover(
        &mut self,
        renderer: &mut dyn VoxelRenderer,
        origin: Vec3,
        direction: Vec3,
    ) -> Result<Option<VoxelCoord>> {
        let hit = self.pick(origin, direction)?;
        let handle = hit.and_then(|h| self.volume.get(h.coord)).and_then(|v| v.render_handle);

        if self.highlighted != handle {
            if let Some(old) = self.highlighted {
                renderer.set_highlight(old, false);
            }
            if let Some(new) = handle {
                renderer.set_highlight(new, true);
            }
            self.highlighted = handle;
        }
        Ok(hit.map(|h| h.coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::renderer::tests::RecordingRenderer;

    fn cube_lines(n: i32) -> String {
        let mut text = String::new();
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    text.push_str(&format!("v {} {} {}\n", x, y, z));
                }
            }
        }
        text
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config = SessionConfig::from_json_str(r#"{"raster_size": 32, "trace_strategy": "march"}"#).unwrap();
        assert_eq!(config.raster_size, 32);
        assert_eq!(config.trace_strategy, TraceStrategy::March);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.similarity_threshold, DEFAULT_SIMILARITY);
        assert_eq!(config.averaging, AveragingNeighborhood::Corners);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(SessionConfig::from_json_str(r#"{"raster_size": 0}"#).is_err());
        assert!(SessionConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"predicate": "gradient_similarity", "averaging": "full"}"#).unwrap();
        let config = SessionConfig::from_json_file(&path).unwrap();
        assert_eq!(config.predicate, PredicateKind::GradientSimilarity);
        assert_eq!(config.averaging, AveragingNeighborhood::Full);
    }

    #[test]
    fn test_lattice_load_and_export() {
        let mut session = Session::default();
        assert_eq!(session.load_lattice(&cube_lines(2)), 8);
        let exported = session.export();
        assert_eq!(exported.lines().count(), 8);
        assert!(exported.starts_with("v 0 0 0\n"));
    }

    #[test]
    fn test_apply_replaces_volume() {
        let mut session = Session::default();
        session.load_lattice(&cube_lines(3));
        let before = session.volume().size();
        session.apply(FilterKind::Gauss);
        assert!(session.volume().size() > before);
        session.apply(FilterKind::ResetValues);
        assert!(session.volume().entries().all(|(_, v)| v.value == 10.0));
    }

    #[test]
    fn test_segment_from_ray_marks_region() {
        let mut session = Session::default();
        let mut text = cube_lines(2);
        text.push_str("v 10 10 10\n");
        session.load_lattice(&text);

        let region = session
            .segment_from_ray(Vec3::new(-5.0, 0.5, 0.5), Vec3::X)
            .unwrap()
            .unwrap();
        assert_eq!(region.len(), 8);
        assert_eq!(session.volume().marked_count(), 8);
        assert!(!session.volume().get(VoxelCoord::new(10, 10, 10)).unwrap().marked);

        session.apply(FilterKind::RemoveMarked);
        assert_eq!(session.volume().size(), 1);
    }

    #[test]
    fn test_segment_miss() {
        let mut session = Session::default();
        session.load_lattice(&cube_lines(2));
        let miss = session.segment_from_ray(Vec3::new(-5.0, 9.0, 9.0), Vec3::X).unwrap();
        assert!(miss.is_none());
        assert!(session.pick(Vec3::ZERO, Vec3::ZERO).is_err());
    }

    #[test]
    fn test_present_and_hover() {
        let mut session = Session::default();
        session.load_lattice(&cube_lines(2));
        let mut renderer = RecordingRenderer::default();
        assert_eq!(session.present(&mut renderer, ColorMode::Xyz), 8);

        let hit = session.hover(&mut renderer, Vec3::new(-5.0, 0.5, 0.5), Vec3::X).unwrap();
        assert_eq!(hit, Some(VoxelCoord::new(0, 0, 0)));
        assert_eq!(renderer.highlighted.len(), 1);

        session.hover(&mut renderer, Vec3::new(-5.0, 9.0, 9.0), Vec3::X).unwrap();
        assert!(renderer.highlighted.is_empty());
    }

    #[tokio::test]
    async fn test_load_file_async() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, cube_lines(2).as_bytes()).unwrap();
        let mut session = Session::new(SessionConfig {
            raster_size: 2,
            ..Default::default()
        });
        assert_eq!(session.load_file_async(file.path()).await.unwrap(), 8);
        assert_eq!(session.load_file(file.path()).unwrap(), 8);
    }
}
