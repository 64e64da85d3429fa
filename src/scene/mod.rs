//! Scene data: descriptors in, retained graph out.
//!
//! [`descriptor`] holds the serde model of the host's scene JSON,
//! [`object`] the detached trees the builders produce, and [`graph`] the
//! live arena graph a [`SceneStore`](crate::store::SceneStore) owns.

pub mod descriptor;
pub mod graph;
pub mod material;
pub mod object;
mod snapshot;
mod visibility;

pub use descriptor::{SceneEntry, SceneGraphRoot, SceneGroup, SceneObject};
pub use graph::{GraphStats, Node, NodeId, SceneGraph};
pub use material::{LineMaterial, LineStyle, Shading, Side, SurfaceMaterial};
pub use object::{LabelContent, Light, NodeKind, Object3D, Transform};
pub use snapshot::{GeometrySnapshot, MaterialSnapshot, NodeSnapshot};
pub use visibility::VisibilityMap;
