use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Quat, Vec3};

use super::{required, vec3, Builder};
use crate::error::SceneError;
use crate::geometry::{box_geometry, sphere_geometry};
use crate::scene::descriptor::{Cubes, Ellipsoids, Spheres};
use crate::scene::object::{Object3D, Transform};

impl Builder<'_> {
    /// One sphere mesh per position, all sharing one geometry and material.
    pub(super) fn make_spheres(
        &self,
        d: &Spheres,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let positions =
            required(d.positions.as_deref(), "spheres", "positions")?;
        let radius = d.radius.unwrap_or(1.0) * self.settings.sphere_scale;
        let (sphere_segments, _) = self.settings.segments();
        let geometry = Arc::new(sphere_geometry(
            radius,
            sphere_segments,
            d.phi_start.unwrap_or(0.0),
            d.phi_end.unwrap_or(TAU),
        ));
        let material = Arc::new(self.materials.surface(
            d.common.color.as_deref(),
            d.common.opacity,
        )?);
        for &p in positions {
            parent.add(
                Object3D::mesh(Arc::clone(&geometry), Arc::clone(&material))
                    .at(Transform::from_translation(vec3(p))),
            );
        }
        Ok(parent)
    }

    /// Unit spheres scaled per axis by `scale` and rotated so their +Z axis
    /// points along `rotate_to[i]`.
    pub(super) fn make_ellipsoids(
        &self,
        d: &Ellipsoids,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let positions =
            required(d.positions.as_deref(), "ellipsoids", "positions")?;
        if let Some(rotations) = &d.rotate_to {
            if rotations.len() != positions.len() {
                return Err(SceneError::MismatchedLengths {
                    kind: "ellipsoids",
                    expected_field: "positions",
                    expected: positions.len(),
                    actual_field: "rotate_to",
                    actual: rotations.len(),
                });
            }
        }
        let (sphere_segments, _) = self.settings.segments();
        let geometry = Arc::new(sphere_geometry(
            self.settings.sphere_scale,
            sphere_segments,
            d.phi_start.unwrap_or(0.0),
            d.phi_end.unwrap_or(TAU),
        ));
        let material = Arc::new(self.materials.surface(
            d.common.color.as_deref(),
            d.common.opacity,
        )?);
        let scale = d.scale.map_or(Vec3::ONE, vec3);
        for (i, &p) in positions.iter().enumerate() {
            let rotation = d
                .rotate_to
                .as_ref()
                .and_then(|r| vec3(r[i]).try_normalize())
                .map_or(Quat::IDENTITY, |dir| {
                    Quat::from_rotation_arc(Vec3::Z, dir)
                });
            parent.add(
                Object3D::mesh(Arc::clone(&geometry), Arc::clone(&material))
                    .at(Transform {
                        translation: vec3(p),
                        rotation,
                        scale,
                    }),
            );
        }
        Ok(parent)
    }

    /// One cube per position, edge `width × sphereScale`.
    pub(super) fn make_cubes(
        &self,
        d: &Cubes,
        mut parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        let positions =
            required(d.positions.as_deref(), "cubes", "positions")?;
        let width = *required(d.width.as_ref(), "cubes", "width")?;
        let geometry =
            Arc::new(box_geometry(width * self.settings.sphere_scale));
        let material = Arc::new(self.materials.surface(
            d.common.color.as_deref(),
            d.common.opacity,
        )?);
        for &p in positions {
            parent.add(
                Object3D::mesh(Arc::clone(&geometry), Arc::clone(&material))
                    .at(Transform::from_translation(vec3(p))),
            );
        }
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RenderSettings;
    use crate::scene::descriptor::ObjectCommon;
    use crate::scene::object::NodeKind;

    fn positions(n: usize) -> Option<Vec<[f32; 3]>> {
        Some((0..n).map(|i| [i as f32, 0.0, 0.0]).collect())
    }

    #[test]
    fn spheres_share_geometry_and_material() {
        let settings = RenderSettings::default();
        let d = Spheres {
            positions: positions(3),
            radius: Some(0.5),
            ..Spheres::default()
        };
        let out = Builder::new(&settings)
            .make_spheres(&d, Object3D::group(None))
            .unwrap();
        assert_eq!(out.children.len(), 3);
        let meshes: Vec<_> = out
            .children
            .iter()
            .filter_map(|c| match &c.kind {
                NodeKind::Mesh { geometry, material } => {
                    Some((Arc::clone(geometry), Arc::clone(material)))
                }
                _ => None,
            })
            .collect();
        assert_eq!(meshes.len(), 3);
        assert!(Arc::ptr_eq(&meshes[0].0, &meshes[2].0));
        assert!(Arc::ptr_eq(&meshes[0].1, &meshes[1].1));
        assert_eq!(
            out.children[2].transform.translation,
            Vec3::new(2.0, 0.0, 0.0)
        );
        let (_, r) = meshes[0].0.bounding_sphere();
        assert!((r - 0.5).abs() < 1e-4);
    }

    #[test]
    fn spheres_keep_parent_contents() {
        let settings = RenderSettings::default();
        let parent = Object3D::group(Some("p".into()))
            .with_child(Object3D::group(Some("existing".into())));
        let out = Builder::new(&settings)
            .make_spheres(
                &Spheres {
                    positions: positions(1),
                    ..Spheres::default()
                },
                parent,
            )
            .unwrap();
        assert_eq!(out.name.as_deref(), Some("p"));
        assert_eq!(out.children.len(), 2);
    }

    #[test]
    fn ellipsoid_rotation_count_must_match_positions() {
        let settings = RenderSettings::default();
        let d = Ellipsoids {
            positions: positions(2),
            scale: Some([1.0, 2.0, 3.0]),
            rotate_to: Some(vec![[1.0, 0.0, 0.0]]),
            ..Ellipsoids::default()
        };
        let err = Builder::new(&settings)
            .make_ellipsoids(&d, Object3D::group(None))
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::MismatchedLengths {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn ellipsoids_rotate_z_onto_target() {
        let settings = RenderSettings::default();
        let d = Ellipsoids {
            positions: positions(1),
            scale: Some([1.0, 1.0, 3.0]),
            rotate_to: Some(vec![[2.0, 0.0, 0.0]]),
            ..Ellipsoids::default()
        };
        let out = Builder::new(&settings)
            .make_ellipsoids(&d, Object3D::group(None))
            .unwrap();
        let t = out.children[0].transform;
        assert_eq!(t.scale, Vec3::new(1.0, 1.0, 3.0));
        assert!((t.rotation * Vec3::Z).distance(Vec3::X) < 1e-5);
    }

    #[test]
    fn cubes_need_width() {
        let settings = RenderSettings::default();
        let builder = Builder::new(&settings);
        let mut d = Cubes {
            positions: positions(2),
            width: None,
            common: ObjectCommon::default(),
        };
        assert!(matches!(
            builder.make_cubes(&d, Object3D::group(None)),
            Err(SceneError::MissingField { field: "width", .. })
        ));
        d.width = Some(2.0);
        let out = builder.make_cubes(&d, Object3D::group(None)).unwrap();
        assert_eq!(out.mesh_count(), 2);
    }
}
