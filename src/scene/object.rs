//! Detached object trees produced by the primitive builders.
//!
//! An [`Object3D`] is a plain owned value: builders append to it without
//! touching the live graph, so a failed rebuild never leaves partial state
//! behind. The scene store grafts finished trees into its
//! [`SceneGraph`](super::graph::SceneGraph).

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use super::material::{LineMaterial, SurfaceMaterial};
use crate::animation::KeyframeTrack;
use crate::geometry::Geometry;
use crate::util::color::Color;

/// Local translation/rotation/scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

/// Text content of an overlay label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelContent {
    /// Always-visible text.
    pub text: String,
    /// Text revealed on hover.
    pub hover_text: Option<String>,
}

/// A persistent light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Sky/ground gradient ambient light.
    Hemisphere {
        /// Color from above.
        sky: Color,
        /// Color from below.
        ground: Color,
        /// Intensity.
        intensity: f32,
    },
    /// Directional light shining from the node position toward the origin.
    Directional {
        /// Light color.
        color: Color,
        /// Intensity.
        intensity: f32,
    },
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure container.
    Group,
    /// Triangle mesh.
    Mesh {
        /// Shared geometry.
        geometry: Arc<Geometry>,
        /// Shared material.
        material: Arc<SurfaceMaterial>,
    },
    /// Line segments.
    Lines {
        /// Shared geometry.
        geometry: Arc<Geometry>,
        /// Shared material.
        material: Arc<LineMaterial>,
        /// Per-vertex distances; present for dashed lines.
        line_distances: Option<Arc<[f32]>>,
    },
    /// Overlay text anchored at the node origin.
    Label(LabelContent),
    /// Scene light.
    Light(Light),
}

impl NodeKind {
    /// Short name used in logs and scene files.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Mesh { .. } => "mesh",
            Self::Lines { .. } => "lines",
            Self::Label(_) => "label",
            Self::Light(_) => "light",
        }
    }
}

/// An owned node plus its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Object3D {
    /// Name addressed by visibility maps.
    pub name: Option<String>,
    /// Payload.
    pub kind: NodeKind,
    /// Local transform.
    pub transform: Transform,
    /// Own visibility flag.
    pub visible: bool,
    /// Descriptor `id`, reported when the node is picked.
    pub pick_id: Option<String>,
    /// Time-parameterized translation.
    pub track: Option<KeyframeTrack>,
    /// Children in draw order.
    pub children: Vec<Object3D>,
}

impl Object3D {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            transform: Transform::IDENTITY,
            visible: true,
            pick_id: None,
            track: None,
            children: Vec::new(),
        }
    }

    /// Empty container.
    #[must_use]
    pub fn group(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::with_kind(NodeKind::Group)
        }
    }

    /// Mesh node.
    #[must_use]
    pub fn mesh(
        geometry: Arc<Geometry>,
        material: Arc<SurfaceMaterial>,
    ) -> Self {
        Self::with_kind(NodeKind::Mesh { geometry, material })
    }

    /// Line node.
    #[must_use]
    pub fn lines(
        geometry: Arc<Geometry>,
        material: Arc<LineMaterial>,
        line_distances: Option<Arc<[f32]>>,
    ) -> Self {
        Self::with_kind(NodeKind::Lines {
            geometry,
            material,
            line_distances,
        })
    }

    /// Overlay label node.
    #[must_use]
    pub fn label(content: LabelContent) -> Self {
        Self::with_kind(NodeKind::Label(content))
    }

    /// Light node.
    #[must_use]
    pub fn light(name: &str, light: Light, position: Vec3) -> Self {
        Self {
            name: Some(name.to_owned()),
            transform: Transform::from_translation(position),
            ..Self::with_kind(NodeKind::Light(light))
        }
    }

    /// Builder-style transform setter.
    #[must_use]
    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Append a child and return `self`, the builder contract shape.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child in place.
    pub fn add(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Number of nodes in this tree (including `self`) matching `pred`.
    #[must_use]
    pub fn count(&self, pred: &impl Fn(&Self) -> bool) -> usize {
        usize::from(pred(self))
            + self.children.iter().map(|c| c.count(pred)).sum::<usize>()
    }

    /// Number of mesh nodes in the tree.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.count(&|o| matches!(o.kind, NodeKind::Mesh { .. }))
    }
}
