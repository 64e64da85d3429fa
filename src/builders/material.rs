//! Material factory: `(color, opacity)` plus render settings to a material.

use crate::error::SceneError;
use crate::options::{RenderSettings, RendererKind, STANDARD_MATERIAL};
use crate::scene::material::{
    LineMaterial, LineStyle, Shading, Side, SurfaceMaterial,
};
use crate::util::color::Color;

/// Fallback color for meshes without a `color` field.
pub const DEFAULT_MESH_COLOR: &str = "#52afb0";
/// Fallback color for solid lines.
pub const DEFAULT_LINE_COLOR: &str = "#2c3c54";
/// Fallback color for dashed lines.
pub const DEFAULT_DASHED_LINE_COLOR: &str = "#000000";

/// Resolves descriptor colors into materials for one set of render settings.
#[derive(Debug, Clone, Copy)]
pub struct MaterialFactory<'a> {
    settings: &'a RenderSettings,
}

impl<'a> MaterialFactory<'a> {
    /// Factory bound to `settings`.
    #[must_use]
    pub fn new(settings: &'a RenderSettings) -> Self {
        Self { settings }
    }

    /// Surface material for `color` (hex or CSS name, default teal) at
    /// `opacity` (default 1).
    ///
    /// The vector renderer gets an unlit flat material. The raster renderer
    /// gets the configured lit material, double-sided; any kind other than
    /// `MeshStandardMaterial` is rejected.
    pub fn surface(
        &self,
        color: Option<&str>,
        opacity: Option<f32>,
    ) -> Result<SurfaceMaterial, SceneError> {
        let color = Color::parse(color.unwrap_or(DEFAULT_MESH_COLOR))?;
        let opacity = opacity.unwrap_or(1.0).clamp(0.0, 1.0);
        let base = SurfaceMaterial {
            shading: Shading::Flat,
            color,
            opacity,
            transparent: false,
            depth_write: true,
            side: Side::Front,
        };
        if self.settings.renderer == RendererKind::Svg {
            return Ok(base);
        }
        let material = &self.settings.material;
        if material.kind != STANDARD_MATERIAL {
            return Err(SceneError::UnsupportedMaterialKind(
                material.kind.clone(),
            ));
        }
        Ok(SurfaceMaterial {
            shading: Shading::Standard {
                roughness: material.parameters.roughness,
                metalness: material.parameters.metalness,
            },
            ..base
        }
        .double_sided())
    }

    /// Line material; `color` falls back to the solid or dashed default.
    pub fn line(
        &self,
        color: Option<&str>,
        line_width: Option<f32>,
        style: LineStyle,
    ) -> Result<LineMaterial, SceneError> {
        let fallback = match style {
            LineStyle::Solid => DEFAULT_LINE_COLOR,
            LineStyle::Dashed { .. } => DEFAULT_DASHED_LINE_COLOR,
        };
        Ok(LineMaterial {
            color: Color::parse(color.unwrap_or(fallback))?,
            line_width: line_width.unwrap_or(1.0),
            style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_renderer_gets_flat_material() {
        let settings = RenderSettings {
            renderer: RendererKind::Svg,
            ..RenderSettings::default()
        };
        let m = MaterialFactory::new(&settings)
            .surface(Some("#ff0000"), None)
            .unwrap();
        assert_eq!(m.shading, Shading::Flat);
        assert_eq!(m.color, Color::rgb8(255, 0, 0));
        assert_eq!(m.opacity, 1.0);
    }

    #[test]
    fn webgl_renderer_gets_double_sided_standard_material() {
        let settings = RenderSettings::default();
        let m = MaterialFactory::new(&settings)
            .surface(None, Some(0.4))
            .unwrap();
        assert!(matches!(m.shading, Shading::Standard { .. }));
        assert_eq!(m.side, Side::Double);
        assert_eq!(m.color, Color::parse(DEFAULT_MESH_COLOR).unwrap());
        assert!((m.opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn unknown_material_kind_is_rejected() {
        let mut settings = RenderSettings::default();
        settings.material.kind = "MeshPhongMaterial".into();
        let err = MaterialFactory::new(&settings)
            .surface(None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnsupportedMaterialKind(k) if k == "MeshPhongMaterial"
        ));
    }

    #[test]
    fn line_defaults_depend_on_style() {
        let settings = RenderSettings::default();
        let f = MaterialFactory::new(&settings);
        let solid = f.line(None, None, LineStyle::Solid).unwrap();
        assert_eq!(solid.color, Color::parse("#2c3c54").unwrap());
        assert_eq!(solid.line_width, 1.0);
        let dashed = f
            .line(
                None,
                None,
                LineStyle::Dashed {
                    scale: 1.0,
                    dash_size: 3.0,
                    gap_size: 1.0,
                },
            )
            .unwrap();
        assert_eq!(dashed.color, Color::BLACK);
    }

    #[test]
    fn invalid_color_is_an_error() {
        let settings = RenderSettings::default();
        assert!(matches!(
            MaterialFactory::new(&settings).surface(Some("#zz0000"), None),
            Err(SceneError::InvalidColor(_))
        ));
    }
}
