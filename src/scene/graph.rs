//! Arena-backed retained scene graph.
//!
//! Nodes live in a flat map keyed by [`NodeId`]; parent/child links are
//! stored as ids. Ids are never reused, so a stale id simply resolves to
//! nothing after its node is removed.

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::object::{NodeKind, Object3D, Transform};
use crate::animation::KeyframeTrack;

/// Handle to a node in a [`SceneGraph`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct NodeId(u32);

/// Keyframe track plus the translation it offsets.
#[derive(Debug, Clone, PartialEq)]
struct Animated {
    track: KeyframeTrack,
    rest: Vec3,
}

/// A node stored in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Name addressed by visibility maps.
    pub name: Option<String>,
    /// Payload.
    pub kind: NodeKind,
    /// Local transform.
    pub transform: Transform,
    /// Own visibility flag. A node is drawn only if it and all its
    /// ancestors are visible.
    pub visible: bool,
    /// Descriptor `id` reported on pick.
    pub pick_id: Option<String>,
    animation: Option<Animated>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Parent, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in draw order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node carries a keyframe track.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

/// Node counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Container nodes (including the root).
    pub groups: usize,
    /// Triangle meshes.
    pub meshes: usize,
    /// Line-segment nodes.
    pub lines: usize,
    /// Overlay labels.
    pub labels: usize,
    /// Lights.
    pub lights: usize,
}

/// Retained scene graph with a single root group.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: FxHashMap<NodeId, Node>,
    root: NodeId,
    next_id: u32,
}

impl SceneGraph {
    /// Graph containing only a root group named `root_name`.
    #[must_use]
    pub fn new(root_name: &str) -> Self {
        let mut graph = Self {
            nodes: FxHashMap::default(),
            root: NodeId(0),
            next_id: 0,
        };
        graph.root =
            graph.alloc(Object3D::group(Some(root_name.to_owned())), None);
        graph
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Children of `id` (empty for unknown ids).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    fn alloc(&mut self, object: Object3D, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let animation = object.track.map(|track| Animated {
            track,
            rest: object.transform.translation,
        });
        let _ = self.nodes.insert(
            id,
            Node {
                name: object.name,
                kind: object.kind,
                transform: object.transform,
                visible: object.visible,
                pick_id: object.pick_id,
                animation,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    /// Graft a detached tree under `parent`. Returns the id of the tree's
    /// top node, or `None` when `parent` does not exist.
    pub fn insert_tree(
        &mut self,
        parent: NodeId,
        tree: Object3D,
    ) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let mut stack = vec![(parent, tree)];
        let mut top = None;
        while let Some((parent, mut object)) = stack.pop() {
            let children = std::mem::take(&mut object.children);
            let id = self.alloc(object, Some(parent));
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.push(id);
            }
            let _ = top.get_or_insert(id);
            // Reverse so children are allocated in draw order
            stack.extend(children.into_iter().rev().map(|c| (id, c)));
        }
        top
    }

    /// Remove `id` and its whole subtree. The root cannot be removed.
    /// Returns the number of nodes removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root {
            return 0;
        }
        let Some(parent) = self.nodes.get(&id).and_then(Node::parent) else {
            return 0;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != id);
        }
        let doomed = self.descendants(id);
        for d in &doomed {
            let _ = self.nodes.remove(d);
        }
        doomed.len()
    }

    /// Remove every child subtree of `id` for which `keep` returns false.
    pub fn remove_children_where(
        &mut self,
        id: NodeId,
        keep: impl Fn(&Node) -> bool,
    ) -> usize {
        let doomed: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|c| self.nodes.get(c).is_some_and(|n| !keep(n)))
            .collect();
        doomed.into_iter().map(|c| self.remove(c)).sum()
    }

    /// `id` followed by all its descendants, depth-first in draw order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Every node named `name`, in traversal order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .and_then(|n| n.name.as_deref())
                    .is_some_and(|n| n == name)
            })
            .collect()
    }

    /// Local-to-world matrix, composed root to node.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get(&c) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Whether the node and all its ancestors are visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get(&c) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Nodes whose effective visibility is true, with their world matrices,
    /// in draw order. Invisible subtrees are skipped entirely.
    #[must_use]
    pub fn visible_nodes(&self, from: NodeId) -> Vec<(NodeId, Mat4)> {
        let mut out = Vec::new();
        let parent_matrix = self
            .nodes
            .get(&from)
            .and_then(Node::parent)
            .map_or(Mat4::IDENTITY, |p| self.world_matrix(p));
        let mut stack = vec![(from, parent_matrix)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            out.push((id, world));
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
        out
    }

    /// Move every animated node to its rest translation plus the track
    /// offset at time `t`. Returns the number of nodes moved.
    pub fn apply_time(&mut self, t: f32) -> usize {
        let mut moved = 0;
        for node in self.nodes.values_mut() {
            if let Some(anim) = &node.animation {
                node.transform.translation = anim.rest + anim.track.sample(t);
                moved += 1;
            }
        }
        moved
    }

    /// Whether any node carries a keyframe track.
    #[must_use]
    pub fn has_tracks(&self) -> bool {
        self.nodes.values().any(Node::is_animated)
    }

    /// World-space axis-aligned bounds of drawable content under `id`.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Option<(Vec3, Vec3)> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut any = false;
        for node_id in self.descendants(id) {
            let Some(node) = self.nodes.get(&node_id) else {
                continue;
            };
            let world = self.world_matrix(node_id);
            let mut include = |p: Vec3| {
                let w = world.transform_point3(p);
                min = min.min(w);
                max = max.max(w);
                any = true;
            };
            match &node.kind {
                NodeKind::Mesh { geometry, .. }
                | NodeKind::Lines { geometry, .. } => {
                    geometry.vertices.iter().for_each(|v| include(v.pos()));
                }
                NodeKind::Label(_) => include(Vec3::ZERO),
                NodeKind::Group | NodeKind::Light(_) => {}
            }
        }
        any.then_some((min, max))
    }

    /// Node counts under `id`.
    #[must_use]
    pub fn stats(&self, id: NodeId) -> GraphStats {
        let mut stats = GraphStats::default();
        for node in self.descendants(id).iter().filter_map(|d| self.node(*d)) {
            match node.kind {
                NodeKind::Group => stats.groups += 1,
                NodeKind::Mesh { .. } => stats.meshes += 1,
                NodeKind::Lines { .. } => stats.lines += 1,
                NodeKind::Label(_) => stats.labels += 1,
                NodeKind::Light(_) => stats.lights += 1,
            }
        }
        stats
    }
}
