//! Surface and line materials attached to built meshes.

use crate::util::color::Color;

/// Which faces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Counter-clockwise faces only.
    Front,
    /// Both windings.
    Double,
}

/// Lighting model of a surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Unlit, flat color (vector renderers).
    Flat,
    /// Lit roughness/metalness model.
    Standard {
        /// Surface roughness.
        roughness: f32,
        /// Surface metalness.
        metalness: f32,
    },
}

/// Material for triangle meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    /// Lighting model.
    pub shading: Shading,
    /// Base color.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Whether the surface is blended.
    pub transparent: bool,
    /// Whether the surface writes depth.
    pub depth_write: bool,
    /// Face culling.
    pub side: Side,
}

impl SurfaceMaterial {
    /// Mark as blended without depth writes, the way translucent surfaces and
    /// hulls are drawn.
    #[must_use]
    pub fn translucent(mut self) -> Self {
        self.transparent = true;
        self.depth_write = false;
        self
    }

    /// Force double-sided rendering.
    #[must_use]
    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }
}

/// Dash pattern of a line material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    /// Continuous line.
    Solid,
    /// Dashed line driven by per-vertex line distances.
    Dashed {
        /// Pattern scale.
        scale: f32,
        /// Dash length.
        dash_size: f32,
        /// Gap length.
        gap_size: f32,
    },
}

/// Material for line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMaterial {
    /// Line color.
    pub color: Color,
    /// Width in pixels.
    pub line_width: f32,
    /// Solid or dashed.
    pub style: LineStyle,
}

impl LineMaterial {
    /// Whether a pixel at `distance` along the line falls inside a dash.
    #[must_use]
    pub fn is_dash_visible(&self, distance: f32) -> bool {
        match self.style {
            LineStyle::Solid => true,
            LineStyle::Dashed {
                scale,
                dash_size,
                gap_size,
            } => {
                let period = dash_size + gap_size;
                if period <= 0.0 {
                    return true;
                }
                (distance * scale).rem_euclid(period) <= dash_size
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_pattern_alternates() {
        let m = LineMaterial {
            color: Color::BLACK,
            line_width: 1.0,
            style: LineStyle::Dashed {
                scale: 1.0,
                dash_size: 3.0,
                gap_size: 1.0,
            },
        };
        assert!(m.is_dash_visible(0.5));
        assert!(m.is_dash_visible(2.9));
        assert!(!m.is_dash_visible(3.5));
        assert!(m.is_dash_visible(4.2));
    }
}
