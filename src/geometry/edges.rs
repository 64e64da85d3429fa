use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{Geometry, GeometryKind, Topology, Vertex};

/// Feature edges crease angle (degrees). Edges between faces closer to
/// coplanar than this are dropped, so a triangulated quad shows no diagonal.
const THRESHOLD_ANGLE_DEG: f32 = 1.0;

/// Quantization for welding vertices that share a position.
const WELD_PRECISION: f32 = 1e4;

fn weld_key(p: Vec3) -> [i64; 3] {
    (p * WELD_PRECISION).round().to_array().map(|c| c as i64)
}

/// Outline of a triangle geometry: boundary edges plus edges whose adjacent
/// face normals differ by more than one degree.
#[must_use]
pub fn edges_geometry(source: &Geometry) -> Geometry {
    let threshold = THRESHOLD_ANGLE_DEG.to_radians().cos();

    let mut welded: FxHashMap<[i64; 3], usize> = FxHashMap::default();
    let mut welded_pos: Vec<Vec3> = Vec::new();
    let mut weld = |p: Vec3| -> usize {
        *welded.entry(weld_key(p)).or_insert_with(|| {
            welded_pos.push(p);
            welded_pos.len() - 1
        })
    };

    // Edge (min, max) -> (first face normal, emit?)
    let mut edges: FxHashMap<(usize, usize), (Vec3, bool)> =
        FxHashMap::default();
    let mut order: Vec<(usize, usize)> = Vec::new();

    for [a, b, c] in source.triangles() {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        if normal == Vec3::ZERO {
            continue;
        }
        let ids = [weld(a), weld(b), weld(c)];
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let key = (ids[i].min(ids[j]), ids[i].max(ids[j]));
            if key.0 == key.1 {
                continue;
            }
            match edges.get_mut(&key) {
                Some((first, emit)) => {
                    *emit = first.dot(normal) <= threshold;
                }
                None => {
                    // Boundary until a second face claims it
                    let _ = edges.insert(key, (normal, true));
                    order.push(key);
                }
            }
        }
    }

    let mut vertices = Vec::new();
    for key in order {
        if edges.get(&key).is_some_and(|&(_, emit)| emit) {
            vertices.push(Vertex::new(welded_pos[key.0], Vec3::ZERO));
            vertices.push(Vertex::new(welded_pos[key.1], Vec3::ZERO));
        }
    }
    let count = vertices.len() as u32;
    Geometry {
        kind: GeometryKind::Edges,
        topology: Topology::LineSegments,
        vertices,
        indices: (0..count).collect(),
    }
}
