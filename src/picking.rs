//! Ray picking against visible meshes.
//!
//! Each mesh is first tested against its world-space bounding sphere, then
//! triangle by triangle. Hits carry the pick id of the nearest ancestor
//! that has one, which is the wrapper group each descriptor object is built
//! into.

use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;

use crate::camera::Camera;
use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::object::NodeKind;

/// One mesh under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickHit {
    /// Hit mesh node.
    pub node: NodeId,
    /// Pick id of the nearest tagged ancestor (or the mesh itself).
    pub id: Option<String>,
    /// Distance along the ray from the camera plane.
    pub distance: f32,
}

/// Every visible mesh under `root` hit by the ray through `ndc`, nearest
/// first.
#[must_use]
pub fn pick(
    graph: &SceneGraph,
    root: NodeId,
    camera: &Camera,
    ndc: Vec2,
) -> Vec<PickHit> {
    let (origin, dir) = camera.ray(ndc);
    let mut hits: Vec<PickHit> = graph
        .visible_nodes(root)
        .into_iter()
        .filter_map(|(id, world)| {
            let distance = hit_mesh(graph, id, world, origin, dir)?;
            Some(PickHit {
                node: id,
                id: pick_id(graph, id),
                distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

fn pick_id(graph: &SceneGraph, mut id: NodeId) -> Option<String> {
    loop {
        let node = graph.node(id)?;
        if let Some(pick) = &node.pick_id {
            return Some(pick.clone());
        }
        id = node.parent()?;
    }
}

fn hit_mesh(
    graph: &SceneGraph,
    id: NodeId,
    world: Mat4,
    origin: Vec3,
    dir: Vec3,
) -> Option<f32> {
    let NodeKind::Mesh { geometry, .. } = &graph.node(id)?.kind else {
        return None;
    };
    let (center, radius) = geometry.bounding_sphere();
    let (scale, _, _) = world.to_scale_rotation_translation();
    let world_center = world.transform_point3(center);
    let world_radius = radius * scale.abs().max_element();
    let _ = ray_sphere(origin, dir, world_center, world_radius)?;

    geometry
        .triangles()
        .filter_map(|tri| {
            let [a, b, c] = tri.map(|p| world.transform_point3(p));
            ray_triangle(origin, dir, a, b, c)
        })
        .min_by(f32::total_cmp)
}

/// Nearest non-negative hit distance of a ray with a sphere.
fn ray_sphere(
    origin: Vec3,
    dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = if -b - sq >= 0.0 { -b - sq } else { -b + sq };
    (t >= 0.0).then_some(t)
}

/// Möller-Trumbore, both windings.
fn ray_triangle(
    origin: Vec3,
    dir: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-9 {
        return None;
    }
    let inv = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::box_geometry;
    use crate::scene::material::{Shading, Side, SurfaceMaterial};
    use crate::scene::object::{Object3D, Transform};
    use crate::util::color::Color;

    fn cube_at(id: &str, z: f32) -> Object3D {
        let material = SurfaceMaterial {
            shading: Shading::Flat,
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            side: Side::Front,
        };
        let mut wrapper = Object3D::group(None)
            .at(Transform::from_translation(Vec3::new(0.0, 0.0, z)))
            .with_child(Object3D::mesh(
                Arc::new(box_geometry(1.0)),
                Arc::new(material),
            ));
        wrapper.pick_id = Some(id.to_owned());
        wrapper
    }

    fn camera() -> Camera {
        Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            half_extent: 2.0,
            ..Camera::default()
        }
    }

    #[test]
    fn hits_are_nearest_first_with_ancestor_ids() {
        let mut g = SceneGraph::new("scene");
        let _ = g.insert_tree(g.root(), cube_at("back", -3.0));
        let _ = g.insert_tree(g.root(), cube_at("front", 2.0));
        let hits = pick(&g, g.root(), &camera(), Vec2::ZERO);
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_deref()).collect();
        assert_eq!(ids, [Some("front"), Some("back")]);
        assert!((hits[0].distance - 7.5).abs() < 1e-4);
    }

    #[test]
    fn miss_and_hidden_return_nothing() {
        let mut g = SceneGraph::new("scene");
        let id = g.insert_tree(g.root(), cube_at("a", 0.0)).unwrap();
        assert!(pick(&g, g.root(), &camera(), Vec2::new(0.9, 0.9)).is_empty());
        g.node_mut(id).unwrap().visible = false;
        assert!(pick(&g, g.root(), &camera(), Vec2::ZERO).is_empty());
    }

    #[test]
    fn ray_triangle_accepts_both_windings() {
        let (a, b, c) =
            (Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        let o = Vec3::new(0.0, 0.0, 5.0);
        assert_eq!(ray_triangle(o, Vec3::NEG_Z, a, b, c), Some(5.0));
        assert_eq!(ray_triangle(o, Vec3::NEG_Z, a, c, b), Some(5.0));
        assert_eq!(ray_triangle(o, Vec3::Z, a, b, c), None);
    }
}
