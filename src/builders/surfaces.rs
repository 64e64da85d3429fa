//! Triangle surfaces and convex hulls.

use std::sync::Arc;

use glam::Vec3;

use super::{required, vec3, Builder};
use crate::error::SceneError;
use crate::geometry::{convex_hull_geometry, edges_geometry, Geometry};
use crate::scene::descriptor::{Convex, Surfaces};
use crate::scene::material::LineStyle;
use crate::scene::object::Object3D;

impl Builder<'_> {
    fn surface_opacity(&self, opacity: Option<f32>) -> f32 {
        opacity.unwrap_or(self.settings.default_surface_opacity)
    }

    /// One translucent triangle mesh from a flat vertex list, three vertices
    /// per triangle. Without `normals` the normals are computed and the
    /// material is made double-sided.
    pub(super) fn make_surfaces(
        &self,
        d: &Surfaces,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let positions =
            required(d.positions.as_deref(), "surface", "positions")?;
        if positions.len() % 3 != 0 {
            return Err(SceneError::IncompletePrimitive {
                kind: "surface",
                group: 3,
                count: positions.len(),
            });
        }
        let points: Vec<Vec3> = positions.iter().copied().map(vec3).collect();
        let opacity = self.surface_opacity(d.common.opacity);
        let mut material = self
            .materials
            .surface(d.common.color.as_deref(), Some(opacity))?
            .translucent();

        let geometry = match &d.normals {
            Some(normals) => {
                if normals.len() != positions.len() {
                    return Err(SceneError::MismatchedLengths {
                        kind: "surface",
                        expected_field: "positions",
                        expected: positions.len(),
                        actual_field: "normals",
                        actual: normals.len(),
                    });
                }
                let normals: Vec<Vec3> =
                    normals.iter().copied().map(vec3).collect();
                Geometry::from_triangle_soup(&points, Some(&normals))
            }
            None => {
                material = material.double_sided();
                Geometry::from_triangle_soup(&points, None)
            }
        };

        parent.add(Object3D::mesh(Arc::new(geometry), Arc::new(material)));
        Ok(parent)
    }

    /// Convex hull of the points: a translucent fill mesh plus a line node
    /// outlining the hull's edges in the same color.
    pub(super) fn make_convex(
        &self,
        d: &Convex,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let positions =
            required(d.positions.as_deref(), "convex", "positions")?;
        let points: Vec<Vec3> = positions.iter().copied().map(vec3).collect();
        let hull = convex_hull_geometry(&points)?;
        let edges = edges_geometry(&hull);

        let opacity = self.surface_opacity(d.common.opacity);
        let fill = self
            .materials
            .surface(d.common.color.as_deref(), Some(opacity))?
            .translucent();
        let mut outline =
            self.materials.line(None, None, LineStyle::Solid)?;
        outline.color = fill.color;

        parent.add(Object3D::mesh(Arc::new(hull), Arc::new(fill)));
        parent.add(Object3D::lines(Arc::new(edges), Arc::new(outline), None));
        Ok(parent)
    }
}
