//! Primitive builders: scene descriptors to detached [`Object3D`] trees.
//!
//! Each builder follows the same contract: it takes the descriptor and the
//! parent it should append to, and hands the parent back with the new
//! subtree attached. Builders are pure; nothing here touches a live graph,
//! so a failure anywhere in a scene aborts the whole rebuild cleanly.
//!
//! The builders are split by family:
//!
//! - `solids`: spheres, ellipsoids, cubes
//! - `bonds`: cylinders, arrows
//! - `lines`: line segments
//! - `surfaces`: triangle surfaces, convex hulls
//! - `label`: overlay text

mod bonds;
mod label;
mod lines;
mod material;
mod solids;
mod surfaces;

use glam::{Quat, Vec3};

pub use material::{
    MaterialFactory, DEFAULT_DASHED_LINE_COLOR, DEFAULT_LINE_COLOR,
    DEFAULT_MESH_COLOR,
};

use crate::animation::KeyframeTrack;
use crate::error::SceneError;
use crate::options::RenderSettings;
use crate::scene::descriptor::{Point, SceneEntry, SceneGroup, SceneObject};
use crate::scene::object::{Object3D, Transform};

/// Translates descriptors into object trees for one set of render settings.
#[derive(Debug, Clone, Copy)]
pub struct Builder<'a> {
    settings: &'a RenderSettings,
    materials: MaterialFactory<'a>,
}

impl<'a> Builder<'a> {
    /// Builder bound to `settings`.
    #[must_use]
    pub fn new(settings: &'a RenderSettings) -> Self {
        Self {
            settings,
            materials: MaterialFactory::new(settings),
        }
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        self.settings
    }

    /// Build a whole container tree. Each container becomes a named group;
    /// each object is built into its own unnamed group carrying the
    /// object's `id` and keyframe track.
    pub fn build_root(
        &self,
        root: &SceneGroup,
    ) -> Result<Object3D, SceneError> {
        let mut group = Object3D::group(Some(root.name.clone()));
        group.visible = root.visible;
        if let Some(origin) = root.origin {
            group.transform = Transform::from_translation(vec3(origin));
        }
        for entry in &root.contents {
            let child = match entry {
                SceneEntry::Group(nested) => self.build_root(nested)?,
                SceneEntry::Object(object) => self.build_object(object)?,
            };
            group.add(child);
        }
        Ok(group)
    }

    fn build_object(
        &self,
        object: &SceneObject,
    ) -> Result<Object3D, SceneError> {
        let mut wrapper = self.make_object(object, Object3D::group(None))?;
        if let Some(common) = object.common() {
            wrapper.pick_id.clone_from(&common.id);
            wrapper.track = common.animate.as_deref().and_then(|animate| {
                KeyframeTrack::from_descriptor(
                    animate,
                    common.keyframes.as_deref(),
                )
            });
        }
        Ok(wrapper)
    }

    /// Append the subtree for `object` to `parent`. Unknown kinds return
    /// `parent` unchanged.
    pub fn make_object(
        &self,
        object: &SceneObject,
        parent: Object3D,
    ) -> Result<Object3D, SceneError> {
        match object {
            SceneObject::Spheres(d) => self.make_spheres(d, parent),
            SceneObject::Ellipsoids(d) => self.make_ellipsoids(d, parent),
            SceneObject::Cylinders(d) => self.make_cylinders(d, parent),
            SceneObject::Cubes(d) => self.make_cubes(d, parent),
            SceneObject::Lines(d) => self.make_lines(d, parent),
            SceneObject::Surfaces(d) => self.make_surfaces(d, parent),
            SceneObject::Convex(d) => self.make_convex(d, parent),
            SceneObject::Arrows(d) => self.make_arrows(d, parent),
            SceneObject::Label(d) => self.make_label(d, parent),
            SceneObject::Unknown => {
                log::debug!("skipping scene object of unknown type");
                Ok(parent)
            }
        }
    }
}

fn vec3(p: Point) -> Vec3 {
    Vec3::from_array(p)
}

/// A required descriptor field, or [`SceneError::MissingField`].
fn required<'d, T: ?Sized>(
    value: Option<&'d T>,
    kind: &'static str,
    field: &'static str,
) -> Result<&'d T, SceneError> {
    value.ok_or(SceneError::MissingField { kind, field })
}

/// Transform placing a unit-height, +Y-aligned body between `start` and
/// `end`: midpoint translation, shortest-arc rotation, `scale.y` = distance.
/// Coincident endpoints give an unrotated body of zero length.
fn segment_transform(start: Vec3, end: Vec3) -> Transform {
    let diff = end - start;
    let length = diff.length();
    let rotation = if length < 1e-6 {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::Y, diff / length)
    };
    Transform {
        translation: start + diff * 0.5,
        rotation,
        scale: Vec3::new(1.0, length, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scene::object::NodeKind;

    fn build(value: serde_json::Value) -> Result<Object3D, SceneError> {
        let settings = RenderSettings::default();
        let root = SceneGroup::from_value(&value).unwrap().unwrap();
        Builder::new(&settings).build_root(&root)
    }

    #[test]
    fn segment_transform_spans_endpoints() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 6.0, 3.0);
        let t = segment_transform(a, b);
        assert!((t.scale.y - 5.0).abs() < 1e-5);
        let m = t.matrix();
        let top = m.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        let bottom = m.transform_point3(Vec3::new(0.0, -0.5, 0.0));
        assert!(top.distance(b) < 1e-4);
        assert!(bottom.distance(a) < 1e-4);
    }

    #[test]
    fn segment_transform_handles_degenerate_and_antiparallel() {
        let t = segment_transform(Vec3::ONE, Vec3::ONE);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale.y, 0.0);
        assert!(t.translation.is_finite());

        let t = segment_transform(Vec3::ZERO, Vec3::NEG_Y);
        assert!(t.rotation.is_finite());
        let top = t.matrix().transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!(top.distance(Vec3::NEG_Y) < 1e-5);
    }

    #[test]
    fn containers_become_named_groups() {
        let tree = build(json!({
            "name": "structure",
            "origin": [1.0, 0.0, 0.0],
            "contents": [
                { "name": "atoms", "visible": false, "contents": [
                    { "type": "spheres", "positions": [[0, 0, 0]], "id": "Fe1" }
                ]},
                { "type": "no-such-kind" }
            ]
        }))
        .unwrap();
        assert_eq!(tree.name.as_deref(), Some("structure"));
        assert_eq!(tree.transform.translation, Vec3::X);
        assert_eq!(tree.children.len(), 2);
        let atoms = &tree.children[0];
        assert_eq!(atoms.name.as_deref(), Some("atoms"));
        assert!(!atoms.visible);
        assert_eq!(atoms.children[0].pick_id.as_deref(), Some("Fe1"));
        // Unknown kind passes through as an empty wrapper
        assert!(tree.children[1].children.is_empty());
        assert_eq!(tree.mesh_count(), 1);
    }

    #[test]
    fn animate_attaches_track_to_wrapper() {
        let tree = build(json!({
            "name": "s",
            "contents": [{
                "type": "spheres",
                "positions": [[0, 0, 0]],
                "animate": [[0, 0, 0], [1, 0, 0]]
            }]
        }))
        .unwrap();
        let wrapper = &tree.children[0];
        assert!(wrapper.track.is_some());
        assert!(matches!(wrapper.kind, NodeKind::Group));
    }

    #[test]
    fn malformed_object_fails_whole_build() {
        let err = build(json!({
            "name": "s",
            "contents": [
                { "type": "spheres", "positions": [[0, 0, 0]] },
                { "type": "cubes", "positions": [[0, 0, 0]] }
            ]
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SceneError::MissingField {
                kind: "cubes",
                field: "width"
            }
        ));
    }
}
