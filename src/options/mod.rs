//! Render settings with TOML preset and JSON host-config support.
//!
//! One [`RenderSettings`] record is handed to each scene store at mount and
//! never changes afterwards. Hosts usually pass it as a camelCase JSON object;
//! presets on disk are TOML with the same keys.

mod lighting;
mod material;
mod renderer;

use std::path::Path;

pub use lighting::LightingOptions;
pub use material::{MaterialOptions, MaterialParameters, STANDARD_MATERIAL};
pub use renderer::{AxisView, RendererKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Numeric and quality knobs read by the builders, the material factory and
/// the render surface. All fields use `#[serde(default)]` so partial configs
/// (e.g. only `sphereSegments`) work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    /// Supersample frames to smooth edges.
    #[schemars(title = "Antialias")]
    pub antialias: bool,
    /// Renderer kind; `svg` forces unlit materials.
    #[schemars(title = "Renderer")]
    pub renderer: RendererKind,
    /// Clear to a transparent background instead of `background`.
    #[schemars(title = "Transparent Background")]
    pub transparent_background: bool,
    /// Background color used when not transparent.
    #[schemars(title = "Background")]
    pub background: String,
    /// Sphere tessellation (both width and height segments).
    #[schemars(title = "Sphere Segments", range(min = 4, max = 64))]
    pub sphere_segments: u32,
    /// Cylinder and cone radial tessellation.
    #[schemars(title = "Cylinder Segments", range(min = 3, max = 64))]
    pub cylinder_segments: u32,
    /// When set, frames are only drawn after a change instead of every tick.
    #[schemars(title = "Static Scene")]
    pub static_scene: bool,
    /// Zoom applied when the camera is fitted to new content. 1 fills the
    /// viewport with room to rotate.
    #[schemars(
        title = "Default Zoom",
        range(min = 0.1, max = 4.0),
        extend("step" = 0.05),
    )]
    pub default_zoom: f32,
    /// Move the top-level `axes` container into the inset view.
    #[schemars(title = "Extract Axis")]
    pub extract_axis: bool,
    /// Multiplier for sphere radii, ellipsoid size and cube width.
    #[schemars(skip)]
    pub sphere_scale: f32,
    /// Multiplier for cylinder, arrow body and arrow head radii.
    #[schemars(skip)]
    pub cylinder_scale: f32,
    /// Opacity for surfaces and hulls that do not declare their own.
    #[schemars(skip)]
    pub default_surface_opacity: f32,
    /// Seconds for one loop of `play` animation.
    #[schemars(title = "Animation Period", range(min = 0.5, max = 60.0))]
    pub animation_period: f32,
    /// Lit material selection.
    #[schemars(skip)]
    pub material: MaterialOptions,
    /// Persistent lights.
    #[serde(alias = "lights")]
    pub lighting: LightingOptions,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            antialias: true,
            renderer: RendererKind::Webgl,
            transparent_background: false,
            background: "#ffffff".to_owned(),
            sphere_segments: 32,
            cylinder_segments: 16,
            static_scene: true,
            default_zoom: 0.8,
            extract_axis: false,
            sphere_scale: 1.0,
            cylinder_scale: 0.1,
            default_surface_opacity: 0.5,
            animation_period: 5.0,
            material: MaterialOptions::default(),
            lighting: LightingOptions::default(),
        }
    }
}

impl RenderSettings {
    /// Generate JSON Schema describing the host-exposed settings.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(RenderSettings)
    }

    /// Decode host JSON settings. `null` yields the defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SceneError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }

    /// Load settings from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(SceneError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Save settings to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SceneError::Io)?;
        }
        std::fs::write(path, content).map_err(SceneError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Sphere and cylinder segment counts clamped to something a mesh can be
    /// built from.
    #[must_use]
    pub(crate) fn segments(&self) -> (u32, u32) {
        (self.sphere_segments.max(3), self.cylinder_segments.max(3))
    }
}
