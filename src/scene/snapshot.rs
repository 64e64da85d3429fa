//! Serializable view of a live graph, used for the JSON scene file export
//! and for comparing graphs structurally.

use serde::Serialize;

use super::graph::{NodeId, SceneGraph};
use super::material::{LineStyle, Shading};
use super::object::{Light, NodeKind};
use crate::geometry::{Geometry, GeometryKind, Topology};

/// Geometry payload of a snapshot node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometrySnapshot {
    /// Generator name.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `triangles` or `lineSegments`.
    pub topology: &'static str,
    /// Flattened xyz positions.
    pub positions: Vec<f32>,
    /// Flattened xyz normals (empty for lines).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<f32>,
    /// Index buffer.
    pub indices: Vec<u32>,
}

impl From<&Geometry> for GeometrySnapshot {
    fn from(g: &Geometry) -> Self {
        let kind = match g.kind {
            GeometryKind::Sphere { .. } => "SphereGeometry",
            GeometryKind::Cylinder { .. } => "CylinderGeometry",
            GeometryKind::Cone { .. } => "ConeGeometry",
            GeometryKind::Box { .. } => "BoxGeometry",
            GeometryKind::Buffer => "BufferGeometry",
            GeometryKind::ConvexHull => "ConvexGeometry",
            GeometryKind::Edges => "EdgesGeometry",
        };
        let (topology, normals) = match g.topology {
            Topology::Triangles => (
                "triangles",
                g.vertices.iter().flat_map(|v| v.normal).collect(),
            ),
            Topology::LineSegments => ("lineSegments", Vec::new()),
        };
        Self {
            kind,
            topology,
            positions: g.vertices.iter().flat_map(|v| v.position).collect(),
            normals,
            indices: g.indices.clone(),
        }
    }
}

/// Material payload of a snapshot node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSnapshot {
    /// Material class name.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `#rrggbb`.
    pub color: String,
    /// Opacity.
    pub opacity: f32,
    /// Blended.
    pub transparent: bool,
}

/// One node of a serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    /// Node kind (`group`, `mesh`, ...).
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Node name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Descriptor id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Local translation.
    pub position: [f32; 3],
    /// Local rotation (x, y, z, w).
    pub quaternion: [f32; 4],
    /// Local scale.
    pub scale: [f32; 3],
    /// Own visibility flag.
    pub visible: bool,
    /// Geometry for meshes and lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometrySnapshot>,
    /// Material for meshes and lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialSnapshot>,
    /// Label text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Children in draw order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl SceneGraph {
    /// Serializable copy of the subtree rooted at `id`.
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.node(id)?;
        let (geometry, material, text) = match &node.kind {
            NodeKind::Mesh { geometry, material } => {
                let kind = match material.shading {
                    Shading::Flat => "MeshBasicMaterial",
                    Shading::Standard { .. } => "MeshStandardMaterial",
                };
                (
                    Some(GeometrySnapshot::from(geometry.as_ref())),
                    Some(MaterialSnapshot {
                        kind,
                        color: material.color.to_hex(),
                        opacity: material.opacity,
                        transparent: material.transparent,
                    }),
                    None,
                )
            }
            NodeKind::Lines {
                geometry, material, ..
            } => {
                let kind = match material.style {
                    LineStyle::Solid => "LineBasicMaterial",
                    LineStyle::Dashed { .. } => "LineDashedMaterial",
                };
                (
                    Some(GeometrySnapshot::from(geometry.as_ref())),
                    Some(MaterialSnapshot {
                        kind,
                        color: material.color.to_hex(),
                        opacity: 1.0,
                        transparent: false,
                    }),
                    None,
                )
            }
            NodeKind::Label(label) => (None, None, Some(label.text.clone())),
            NodeKind::Light(Light::Hemisphere { sky, .. }) => (
                None,
                Some(MaterialSnapshot {
                    kind: "HemisphereLight",
                    color: sky.to_hex(),
                    opacity: 1.0,
                    transparent: false,
                }),
                None,
            ),
            NodeKind::Light(Light::Directional { color, .. }) => (
                None,
                Some(MaterialSnapshot {
                    kind: "DirectionalLight",
                    color: color.to_hex(),
                    opacity: 1.0,
                    transparent: false,
                }),
                None,
            ),
            NodeKind::Group => (None, None, None),
        };
        let t = &node.transform;
        Some(NodeSnapshot {
            kind: node.kind.type_name(),
            name: node.name.clone(),
            id: node.pick_id.clone(),
            position: t.translation.to_array(),
            quaternion: t.rotation.to_array(),
            scale: t.scale.to_array(),
            visible: node.visible,
            geometry,
            material,
            text,
            children: node
                .children()
                .iter()
                .filter_map(|&c| self.snapshot(c))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::object::{LabelContent, Object3D};

    #[test]
    fn snapshot_serializes_tree() {
        let mut g = SceneGraph::new("scene");
        let _ = g.insert_tree(
            g.root(),
            Object3D::group(Some("atoms".into())).with_child(Object3D::label(
                LabelContent {
                    text: "Fe".into(),
                    hover_text: None,
                },
            )),
        );
        let snap = g.snapshot(g.root()).unwrap();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["type"], "group");
        assert_eq!(json["children"][0]["name"], "atoms");
        assert_eq!(json["children"][0]["children"][0]["text"], "Fe");
        assert!(json["children"][0]["children"][0].get("geometry").is_none());
    }
}
