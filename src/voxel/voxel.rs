//! Per-voxel attributes

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// Opaque id of a drawn primitive, issued by the renderer.
///
/// The core only stores and hands it back; it never resolves or frees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle(pub u32);

/// Attributes attached to one lattice cell
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
    /// Intensity: sample count, filter response or gradient magnitude
    pub value: f32,
    /// Gradient vector (sx, sy, sz), present after gradient computation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Vec3>,
    /// Set by region growth or manual marking, never cleared implicitly
    #[serde(default)]
    pub marked: bool,
    /// Continuous sample positions that fell into this cell
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Vec3>,
    #[serde(skip)]
    pub render_handle: Option<RenderHandle>,
}

impl Voxel {
    /// Voxel carrying only a value
    pub fn with_value(value: f32) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Voxel carrying a value and a gradient
    pub fn with_gradient(value: f32, gradient: Vec3) -> Self {
        Self {
            value,
            gradient: Some(gradient),
            ..Default::default()
        }
    }

    /// Gradient, or zero when absent
    pub fn gradient_or_zero(&self) -> Vec3 {
        self.gradient.unwrap_or(Vec3::ZERO)
    }

    pub fn sx(&self) -> Option<f32> {
        self.gradient.map(|g| g.x)
    }

    pub fn sy(&self) -> Option<f32> {
        self.gradient.map(|g| g.y)
    }

    pub fn sz(&self) -> Option<f32> {
        self.gradient.map(|g| g.z)
    }
}
