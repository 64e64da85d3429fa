//! Solid and dashed line segments.

use std::sync::Arc;

use glam::Vec3;

use super::{required, vec3, Builder};
use crate::error::SceneError;
use crate::geometry::Geometry;
use crate::scene::descriptor::Lines;
use crate::scene::material::LineStyle;
use crate::scene::object::Object3D;

impl Builder<'_> {
    /// A single line-segments node over consecutive position pairs.
    ///
    /// The line is dashed as soon as any of `dashSize`, `scale` or `gapSize`
    /// is given; missing dash parameters take their defaults and per-vertex
    /// line distances are attached.
    pub(super) fn make_lines(
        &self,
        d: &Lines,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let positions =
            required(d.positions.as_deref(), "lines", "positions")?;
        if positions.len() % 2 != 0 {
            log::warn!(
                "lines descriptor has {} positions; the last one is unpaired \
                 and not drawn",
                positions.len()
            );
        }
        let points: Vec<Vec3> = positions.iter().copied().map(vec3).collect();
        let geometry = Geometry::from_segments(&points);

        let dashed =
            d.dash_size.is_some() || d.scale.is_some() || d.gap_size.is_some();
        let style = if dashed {
            LineStyle::Dashed {
                scale: d.scale.unwrap_or(1.0),
                dash_size: d.dash_size.unwrap_or(3.0),
                gap_size: d.gap_size.unwrap_or(1.0),
            }
        } else {
            LineStyle::Solid
        };
        let material =
            self.materials
                .line(d.common.color.as_deref(), d.line_width, style)?;
        let line_distances =
            dashed.then(|| Arc::<[f32]>::from(geometry.line_distances()));

        parent.add(Object3D::lines(
            Arc::new(geometry),
            Arc::new(material),
            line_distances,
        ));
        Ok(parent)
    }
}
