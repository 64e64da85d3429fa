//! Incremental 3D convex hull.

use glam::Vec3;
use rustc_hash::FxHashSet;

use super::{Geometry, GeometryKind, Topology, Vertex};
use crate::error::SceneError;

#[derive(Debug, Clone, Copy)]
struct Face {
    v: [usize; 3],
    normal: Vec3,
    offset: f32,
}

impl Face {
    fn new(points: &[Vec3], v: [usize; 3], interior: Vec3) -> Self {
        let [a, b, c] = v.map(|i| points[i]);
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let mut v = v;
        if normal.dot(interior - a) > 0.0 {
            normal = -normal;
            v.swap(1, 2);
        }
        Self {
            v,
            normal,
            offset: normal.dot(a),
        }
    }

    fn distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

/// Triangles (indices into `points`) of the convex hull, wound so their
/// normals point outward.
///
/// Fails with [`SceneError::DegenerateHull`] when the points do not span a
/// volume (fewer than four, or all coplanar).
pub fn convex_hull(points: &[Vec3]) -> Result<Vec<[usize; 3]>, SceneError> {
    let degenerate = || SceneError::DegenerateHull(points.len());
    if points.len() < 4 {
        return Err(degenerate());
    }

    let extent = points
        .iter()
        .fold(0.0_f32, |m, p| m.max(p.abs().max_element()));
    let eps = 1e-5 * extent.max(1.0);

    // Initial tetrahedron from extreme points
    let i0 = (0..points.len())
        .min_by(|&a, &b| points[a].x.total_cmp(&points[b].x))
        .ok_or_else(degenerate)?;
    let i1 = farthest(points, |p| p.distance(points[i0]));
    let dir = (points[i1] - points[i0]).normalize_or_zero();
    let i2 = farthest(points, |p| {
        let rel = p - points[i0];
        (rel - dir * rel.dot(dir)).length()
    });
    let plane_n = (points[i1] - points[i0])
        .cross(points[i2] - points[i0])
        .normalize_or_zero();
    let i3 = farthest(points, |p| plane_n.dot(p - points[i0]).abs());

    if points[i1].distance(points[i0]) <= eps
        || plane_n == Vec3::ZERO
        || plane_n.dot(points[i3] - points[i0]).abs() <= eps
    {
        return Err(degenerate());
    }

    let interior = (points[i0] + points[i1] + points[i2] + points[i3]) / 4.0;
    let mut faces = vec![
        Face::new(points, [i0, i1, i2], interior),
        Face::new(points, [i0, i1, i3], interior),
        Face::new(points, [i0, i2, i3], interior),
        Face::new(points, [i1, i2, i3], interior),
    ];

    for (idx, &p) in points.iter().enumerate() {
        if [i0, i1, i2, i3].contains(&idx) {
            continue;
        }
        let (visible, hidden): (Vec<Face>, Vec<Face>) =
            faces.iter().partition(|f| f.distance(p) > eps);
        if visible.is_empty() {
            continue;
        }

        let visible_edges: FxHashSet<(usize, usize)> =
            visible.iter().flat_map(Face::edges).collect();
        faces = hidden;
        for &(a, b) in &visible_edges {
            if !visible_edges.contains(&(b, a)) {
                faces.push(Face::new(points, [a, b, idx], interior));
            }
        }
    }

    Ok(faces.into_iter().map(|f| f.v).collect())
}

fn farthest(points: &[Vec3], metric: impl Fn(Vec3) -> f32) -> usize {
    points
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| metric(**a).total_cmp(&metric(**b)))
        .map_or(0, |(i, _)| i)
}

/// Hull as a flat-shaded triangle geometry (three unshared vertices per
/// face).
pub fn convex_hull_geometry(points: &[Vec3]) -> Result<Geometry, SceneError> {
    let faces = convex_hull(points)?;
    let mut vertices = Vec::with_capacity(faces.len() * 3);
    for [a, b, c] in faces {
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        let normal = (pb - pa).cross(pc - pa).normalize_or_zero();
        vertices.extend([pa, pb, pc].map(|p| Vertex::new(p, normal)));
    }
    let count = vertices.len() as u32;
    Ok(Geometry {
        kind: GeometryKind::ConvexHull,
        topology: Topology::Triangles,
        vertices,
        indices: (0..count).collect(),
    })
}
