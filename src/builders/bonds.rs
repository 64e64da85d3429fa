use std::sync::Arc;

use super::{required, segment_transform, vec3, Builder};
use crate::error::SceneError;
use crate::geometry::{cone_geometry, cylinder_geometry};
use crate::scene::descriptor::{Arrows, Cylinders};
use crate::scene::object::{Object3D, Transform};

const DEFAULT_RADIUS: f32 = 1.0;
const DEFAULT_HEAD_LENGTH: f32 = 2.0;
const DEFAULT_HEAD_WIDTH: f32 = 2.0;

impl Builder<'_> {
    /// One unit-height cylinder per position pair, stretched and rotated to
    /// span the pair.
    pub(super) fn make_cylinders(
        &self,
        d: &Cylinders,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let pairs = required(
            d.position_pairs.as_deref(),
            "cylinders",
            "positionPairs",
        )?;
        let radius =
            d.radius.unwrap_or(DEFAULT_RADIUS) * self.settings.cylinder_scale;
        let (_, segments) = self.settings.segments();
        let geometry =
            Arc::new(cylinder_geometry(radius, radius, 1.0, segments));
        let material = Arc::new(self.materials.surface(
            d.common.color.as_deref(),
            d.common.opacity,
        )?);
        for &[a, b] in pairs {
            parent.add(
                Object3D::mesh(Arc::clone(&geometry), Arc::clone(&material))
                    .at(segment_transform(vec3(a), vec3(b))),
            );
        }
        Ok(parent)
    }

    /// Cylinder body per pair plus a cone head centered on the pair's end
    /// point, sharing the body's orientation.
    pub(super) fn make_arrows(
        &self,
        d: &Arrows,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let pairs =
            required(d.position_pairs.as_deref(), "arrows", "positionPairs")?;
        let scale = self.settings.cylinder_scale;
        let radius = d.radius.unwrap_or(DEFAULT_RADIUS) * scale;
        let head_length = d.head_length.unwrap_or(DEFAULT_HEAD_LENGTH) * scale;
        let head_width = d.head_width.unwrap_or(DEFAULT_HEAD_WIDTH) * scale;
        let (_, segments) = self.settings.segments();

        let body = Arc::new(cylinder_geometry(radius, radius, 1.0, segments));
        let head = Arc::new(cone_geometry(head_width, head_length, segments));
        let material = Arc::new(self.materials.surface(
            d.common.color.as_deref(),
            d.common.opacity,
        )?);

        for &[a, b] in pairs {
            let body_transform = segment_transform(vec3(a), vec3(b));
            parent.add(
                Object3D::mesh(Arc::clone(&body), Arc::clone(&material))
                    .at(body_transform),
            );
            parent.add(
                Object3D::mesh(Arc::clone(&head), Arc::clone(&material)).at(
                    Transform {
                        rotation: body_transform.rotation,
                        ..Transform::from_translation(vec3(b))
                    },
                ),
            );
        }
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::geometry::GeometryKind;
    use crate::options::RenderSettings;
    use crate::scene::object::NodeKind;

    fn pairs() -> Option<Vec<[[f32; 3]; 2]>> {
        Some(vec![
            [[0.0, 0.0, 0.0], [0.0, 0.0, 2.0]],
            [[1.0, 1.0, 1.0], [4.0, 5.0, 1.0]],
            [[0.0, 0.0, 0.0], [0.0, -3.0, 0.0]],
        ])
    }

    #[test]
    fn one_cylinder_per_pair_scaled_to_distance() {
        let settings = RenderSettings::default();
        let d = Cylinders {
            position_pairs: pairs(),
            ..Cylinders::default()
        };
        let out = Builder::new(&settings)
            .make_cylinders(&d, Object3D::group(None))
            .unwrap();
        assert_eq!(out.mesh_count(), 3);
        let lengths: Vec<f32> =
            out.children.iter().map(|c| c.transform.scale.y).collect();
        for (got, want) in lengths.iter().zip([2.0, 5.0, 3.0]) {
            assert!((got - want).abs() < 1e-5);
        }
        assert!(
            out.children[1]
                .transform
                .translation
                .distance(Vec3::new(2.5, 3.0, 1.0))
                < 1e-5
        );
    }

    #[test]
    fn cylinder_radius_uses_cylinder_scale() {
        let settings = RenderSettings::default();
        let d = Cylinders {
            position_pairs: pairs(),
            radius: Some(2.0),
            ..Cylinders::default()
        };
        let out = Builder::new(&settings)
            .make_cylinders(&d, Object3D::group(None))
            .unwrap();
        let NodeKind::Mesh { geometry, .. } = &out.children[0].kind else {
            unreachable!("cylinders are meshes");
        };
        assert!(matches!(
            geometry.kind,
            GeometryKind::Cylinder { radius_top, .. }
                if (radius_top - 0.2).abs() < 1e-6
        ));
    }

    #[test]
    fn arrows_add_a_head_per_pair() {
        let settings = RenderSettings::default();
        let d = Arrows {
            position_pairs: pairs(),
            ..Arrows::default()
        };
        let out = Builder::new(&settings)
            .make_arrows(&d, Object3D::group(None))
            .unwrap();
        assert_eq!(out.mesh_count(), 6);
        let body = &out.children[0];
        let head = &out.children[1];
        assert!((body.transform.scale.y - 2.0).abs() < 1e-5);
        assert_eq!(head.transform.translation, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(head.transform.rotation, body.transform.rotation);
        let NodeKind::Mesh { geometry, .. } = &head.kind else {
            unreachable!("arrow heads are meshes");
        };
        assert_eq!(
            geometry.kind,
            GeometryKind::Cone {
                radius: 0.2,
                height: 0.2
            }
        );
    }

    #[test]
    fn zero_length_pair_is_finite() {
        let settings = RenderSettings::default();
        let d = Arrows {
            position_pairs: Some(vec![[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]]),
            ..Arrows::default()
        };
        let out = Builder::new(&settings)
            .make_arrows(&d, Object3D::group(None))
            .unwrap();
        for child in &out.children {
            assert!(child.transform.matrix().is_finite());
        }
    }

    #[test]
    fn missing_pairs_is_an_error() {
        let settings = RenderSettings::default();
        assert!(matches!(
            Builder::new(&settings)
                .make_cylinders(&Cylinders::default(), Object3D::group(None)),
            Err(SceneError::MissingField {
                kind: "cylinders",
                field: "positionPairs"
            })
        ));
    }
}
