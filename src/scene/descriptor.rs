//! Scene JSON data model.
//!
//! Descriptors are plain serde values: geometry fields are optional at parse
//! time and validated by the builder that needs them, so a malformed object
//! surfaces as a descriptive [`SceneError`] rather than an opaque
//! "did not match any variant".

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// A 3-vector as it appears on the wire.
pub type Point = [f32; 3];

/// Fields every scene object may carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectCommon {
    /// Color string (`#rrggbb`, `#rgb` or a CSS name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Identifier reported back in object-click notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Keyframe translation offsets applied to the whole object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animate: Option<Vec<Point>>,
    /// Normalized keyframe times matching `animate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframes: Option<Vec<f32>>,
}

/// `spheres`: one sphere per position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spheres {
    /// Sphere centers.
    pub positions: Option<Vec<Point>>,
    /// Radius before `sphereScale`.
    pub radius: Option<f32>,
    /// Start of the azimuthal sweep (radians).
    pub phi_start: Option<f32>,
    /// Length of the azimuthal sweep (radians).
    pub phi_end: Option<f32>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `ellipsoids`: scaled, oriented spheres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipsoids {
    /// Ellipsoid centers.
    pub positions: Option<Vec<Point>>,
    /// Per-axis scale applied to every ellipsoid.
    pub scale: Option<Point>,
    /// Direction each ellipsoid's +Z axis is rotated onto.
    #[serde(rename = "rotate_to")]
    pub rotate_to: Option<Vec<Point>>,
    /// Start of the azimuthal sweep (radians).
    pub phi_start: Option<f32>,
    /// Length of the azimuthal sweep (radians).
    pub phi_end: Option<f32>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `cylinders`: one cylinder per endpoint pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cylinders {
    /// Endpoint pairs.
    pub position_pairs: Option<Vec<[Point; 2]>>,
    /// Radius before `cylinderScale`.
    pub radius: Option<f32>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `cubes`: one axis-aligned cube per position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cubes {
    /// Cube centers.
    pub positions: Option<Vec<Point>>,
    /// Edge length before `sphereScale`.
    pub width: Option<f32>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `lines`: line segments from consecutive position pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lines {
    /// Flat vertex list, two per segment.
    pub positions: Option<Vec<Point>>,
    /// Dash length; presence selects the dashed material.
    pub dash_size: Option<f32>,
    /// Dash pattern scale; presence selects the dashed material.
    pub scale: Option<f32>,
    /// Gap length; presence selects the dashed material.
    pub gap_size: Option<f32>,
    /// Line width in pixels.
    #[serde(rename = "line_width")]
    pub line_width: Option<f32>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `surface`: a triangle soup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surfaces {
    /// Flat vertex list, three per triangle.
    pub positions: Option<Vec<Point>>,
    /// Optional per-vertex normals.
    pub normals: Option<Vec<Point>>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `convex`: the convex hull of a point set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Convex {
    /// Hull input points.
    pub positions: Option<Vec<Point>>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `arrows`: cylinder bodies with cone heads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrows {
    /// Tail/tip pairs.
    pub position_pairs: Option<Vec<[Point; 2]>>,
    /// Body radius before `cylinderScale`.
    pub radius: Option<f32>,
    /// Head length before `cylinderScale`.
    pub head_length: Option<f32>,
    /// Head radius before `cylinderScale`.
    pub head_width: Option<f32>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// `labels`: an overlay text annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Visible text.
    pub label: Option<String>,
    /// Secondary text shown on hover.
    pub hover_label: Option<String>,
    /// Anchor relative to the parent container.
    pub position: Option<Point>,
    /// Shared object fields.
    #[serde(flatten)]
    pub common: ObjectCommon,
}

/// One primitive in the scene, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneObject {
    /// Sphere set.
    Spheres(Spheres),
    /// Ellipsoid set.
    Ellipsoids(Ellipsoids),
    /// Cylinder set.
    Cylinders(Cylinders),
    /// Cube set.
    Cubes(Cubes),
    /// Line segments.
    Lines(Lines),
    /// Triangle surface.
    #[serde(rename = "surface", alias = "surfaces")]
    Surfaces(Surfaces),
    /// Convex hull.
    Convex(Convex),
    /// Arrow set.
    Arrows(Arrows),
    /// Text label.
    #[serde(rename = "labels", alias = "label")]
    Label(Label),
    /// Any other `type`; passed through without building anything.
    #[serde(other)]
    Unknown,
}

impl SceneObject {
    /// Wire name of the object kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spheres(_) => "spheres",
            Self::Ellipsoids(_) => "ellipsoids",
            Self::Cylinders(_) => "cylinders",
            Self::Cubes(_) => "cubes",
            Self::Lines(_) => "lines",
            Self::Surfaces(_) => "surface",
            Self::Convex(_) => "convex",
            Self::Arrows(_) => "arrows",
            Self::Label(_) => "labels",
            Self::Unknown => "unknown",
        }
    }

    /// Shared fields, if the kind is known.
    #[must_use]
    pub fn common(&self) -> Option<&ObjectCommon> {
        match self {
            Self::Spheres(o) => Some(&o.common),
            Self::Ellipsoids(o) => Some(&o.common),
            Self::Cylinders(o) => Some(&o.common),
            Self::Cubes(o) => Some(&o.common),
            Self::Lines(o) => Some(&o.common),
            Self::Surfaces(o) => Some(&o.common),
            Self::Convex(o) => Some(&o.common),
            Self::Arrows(o) => Some(&o.common),
            Self::Label(o) => Some(&o.common),
            Self::Unknown => None,
        }
    }
}

/// A named container of objects and nested containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGroup {
    /// Container name; visibility maps address nodes by this.
    pub name: String,
    /// Children in draw order.
    pub contents: Vec<SceneEntry>,
    /// Initial visibility.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Translation applied to the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point>,
}

fn default_visible() -> bool {
    true
}

/// An element of a container's `contents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneEntry {
    /// Nested container (has `name` and `contents`).
    Group(SceneGroup),
    /// Primitive object (has `type`).
    Object(SceneObject),
}

/// The top-level scene snapshot supplied by the host.
pub type SceneGraphRoot = SceneGroup;

impl SceneGroup {
    /// Decode a host snapshot.
    ///
    /// Returns `Ok(None)` when the value is not a usable root, i.e. it is not
    /// an object, or lacks a non-empty `name` or a `contents` list. Such a
    /// snapshot means "no update" and is not an error.
    pub fn from_value(
        value: &serde_json::Value,
    ) -> Result<Option<Self>, SceneError> {
        let has_name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|n| !n.is_empty());
        let has_contents =
            value.get("contents").is_some_and(serde_json::Value::is_array);
        if !has_name || !has_contents {
            log::debug!(
                "no scene data passed (or missing name/contents), scene will \
                 not be updated"
            );
            return Ok(None);
        }
        Ok(Some(Self::deserialize(value)?))
    }

    /// Decode a root from JSON text; see [`SceneGroup::from_value`].
    pub fn from_json_str(text: &str) -> Result<Option<Self>, SceneError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Depth-first visit of every object in the tree.
    pub fn for_each_object(&self, f: &mut impl FnMut(&SceneObject)) {
        for entry in &self.contents {
            match entry {
                SceneEntry::Group(group) => group.for_each_object(f),
                SceneEntry::Object(object) => f(object),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_nested_scene() {
        let value = json!({
            "name": "structure",
            "origin": [1.0, 0.0, 0.0],
            "contents": [
                {
                    "name": "atoms",
                    "contents": [{
                        "type": "spheres",
                        "positions": [[0.0, 0.0, 0.0]],
                        "radius": 0.5,
                        "color": "#ff0000"
                    }]
                },
                {
                    "type": "cylinders",
                    "positionPairs": [[[0, 0, 0], [1, 1, 1]]]
                },
                { "type": "labels", "label": "Fe", "hoverLabel": "iron" }
            ]
        });
        let root = SceneGroup::from_value(&value).unwrap().unwrap();
        assert_eq!(root.name, "structure");
        assert_eq!(root.origin, Some([1.0, 0.0, 0.0]));
        assert_eq!(root.contents.len(), 3);

        let SceneEntry::Group(atoms) = &root.contents[0] else {
            panic!("expected nested group");
        };
        assert!(atoms.visible);
        let SceneEntry::Object(SceneObject::Spheres(spheres)) =
            &atoms.contents[0]
        else {
            panic!("expected spheres");
        };
        assert_eq!(spheres.radius, Some(0.5));
        assert_eq!(spheres.common.color.as_deref(), Some("#ff0000"));

        let SceneEntry::Object(SceneObject::Cylinders(cyl)) =
            &root.contents[1]
        else {
            panic!("expected cylinders");
        };
        assert_eq!(cyl.position_pairs.as_ref().unwrap().len(), 1);

        let SceneEntry::Object(SceneObject::Label(label)) = &root.contents[2]
        else {
            panic!("expected label");
        };
        assert_eq!(label.hover_label.as_deref(), Some("iron"));
    }

    #[test]
    fn unknown_type_is_accepted() {
        let value = json!({
            "name": "s",
            "contents": [{ "type": "teapot", "spout": true }]
        });
        let root = SceneGroup::from_value(&value).unwrap().unwrap();
        assert_eq!(
            root.contents,
            vec![SceneEntry::Object(SceneObject::Unknown)]
        );
    }

    #[test]
    fn missing_geometry_still_parses() {
        let value = json!({ "name": "s", "contents": [{ "type": "cubes" }] });
        let root = SceneGroup::from_value(&value).unwrap().unwrap();
        let SceneEntry::Object(SceneObject::Cubes(cubes)) = &root.contents[0]
        else {
            panic!("expected cubes");
        };
        assert!(cubes.positions.is_none());
        assert!(cubes.width.is_none());
    }

    #[test]
    fn incomplete_roots_are_absent() {
        for value in [
            serde_json::Value::Null,
            json!({}),
            json!({ "name": "only-name" }),
            json!({ "contents": [] }),
            json!({ "name": "", "contents": [] }),
            json!([1, 2, 3]),
        ] {
            assert!(SceneGroup::from_value(&value).unwrap().is_none());
        }
    }

    #[test]
    fn wrong_field_types_are_parse_errors() {
        let value = json!({
            "name": "s",
            "contents": [{ "type": "spheres", "positions": "nope" }]
        });
        assert!(SceneGroup::from_value(&value).is_err());
    }

    #[test]
    fn for_each_object_visits_depth_first() {
        let value = json!({
            "name": "s",
            "contents": [
                { "name": "a", "contents": [{ "type": "convex" }] },
                { "type": "lines" }
            ]
        });
        let root = SceneGroup::from_value(&value).unwrap().unwrap();
        let mut kinds = Vec::new();
        root.for_each_object(&mut |o| kinds.push(o.kind()));
        assert_eq!(kinds, vec!["convex", "lines"]);
    }
}
