//! CPU mesh generation for scene primitives.
//!
//! Every generator returns a [`Geometry`]: a packed vertex list plus indices
//! interpreted according to its [`Topology`]. Geometries are immutable once
//! built and shared between the meshes of one builder call.

mod edges;
mod hull;
mod primitives;

use glam::Vec3;

pub use edges::edges_geometry;
pub use hull::{convex_hull, convex_hull_geometry};
pub use primitives::{
    box_geometry, cone_geometry, cylinder_geometry, sphere_geometry,
};

/// Vertex layout shared by every geometry (position + normal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit normal (zero for line geometry).
    pub normal: [f32; 3],
}

impl Vertex {
    /// Vertex from position and normal vectors.
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    /// Position as a vector.
    #[must_use]
    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// How indices are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Three indices per triangle.
    Triangles,
    /// Two indices per segment.
    LineSegments,
}

/// What a geometry was generated from. Kept for inspection and export.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    /// UV sphere.
    Sphere {
        /// Radius.
        radius: f32,
        /// Width and height segments.
        segments: u32,
    },
    /// Capped cylinder along +Y, centered at the origin.
    Cylinder {
        /// Radius at +Y.
        radius_top: f32,
        /// Radius at -Y.
        radius_bottom: f32,
        /// Length along Y.
        height: f32,
    },
    /// Cone along +Y with its apex at +height/2.
    Cone {
        /// Base radius.
        radius: f32,
        /// Length along Y.
        height: f32,
    },
    /// Axis-aligned cube centered at the origin.
    Box {
        /// Edge length.
        size: f32,
    },
    /// Raw vertex buffer from a descriptor.
    Buffer,
    /// Convex hull of a point set.
    ConvexHull,
    /// Feature edges extracted from a triangle geometry.
    Edges,
}

/// An immutable vertex/index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Generator that produced this geometry.
    pub kind: GeometryKind,
    /// Index grouping.
    pub topology: Topology,
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Triangle soup: vertex `i` belongs to triangle `i / 3`. Normals are
    /// taken from `normals` when given, otherwise computed per face.
    /// Trailing vertices that do not form a whole triangle are dropped;
    /// builders reject such input before it gets here.
    #[must_use]
    pub fn from_triangle_soup(
        positions: &[Vec3],
        normals: Option<&[Vec3]>,
    ) -> Self {
        let usable = positions.len() - positions.len() % 3;
        let positions = &positions[..usable];
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let n = normals
                    .and_then(|n| n.get(i))
                    .copied()
                    .unwrap_or(Vec3::ZERO);
                Vertex::new(p, n)
            })
            .collect();
        let mut geometry = Self {
            kind: GeometryKind::Buffer,
            topology: Topology::Triangles,
            vertices,
            indices: (0..usable as u32).collect(),
        };
        if normals.is_none() {
            geometry.compute_vertex_normals();
        }
        geometry
    }

    /// Line segments from consecutive vertex pairs. A trailing unpaired
    /// vertex is kept in the buffer but not drawn.
    #[must_use]
    pub fn from_segments(positions: &[Vec3]) -> Self {
        let usable = positions.len() - positions.len() % 2;
        Self {
            kind: GeometryKind::Buffer,
            topology: Topology::LineSegments,
            vertices: positions
                .iter()
                .map(|&p| Vertex::new(p, Vec3::ZERO))
                .collect(),
            indices: (0..usable as u32).collect(),
        }
    }

    /// Recompute normals by accumulating area-weighted face normals onto
    /// each referenced vertex. Unshared vertices end up with flat normals.
    pub fn compute_vertex_normals(&mut self) {
        if self.topology != Topology::Triangles {
            return;
        }
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = self.vertices[a].pos();
            let pb = self.vertices[b].pos();
            let pc = self.vertices[c].pos();
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(acc) {
            vertex.normal = n.normalize_or_zero().to_array();
        }
    }

    /// Cumulative distance along the segments, one value per vertex, as
    /// needed by dashed line materials.
    #[must_use]
    pub fn line_distances(&self) -> Vec<f32> {
        let mut distances = vec![0.0; self.vertices.len()];
        let mut total = 0.0;
        for seg in self.indices.chunks_exact(2) {
            let (a, b) = (seg[0] as usize, seg[1] as usize);
            distances[a] = total;
            total += self.vertices[a].pos().distance(self.vertices[b].pos());
            distances[b] = total;
        }
        distances
    }

    /// Triangles as position triples. Empty for line geometry.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let indices: &[u32] = if self.topology == Topology::Triangles {
            &self.indices
        } else {
            &[]
        };
        indices.chunks_exact(3).map(|t| {
            [
                self.vertices[t[0] as usize].pos(),
                self.vertices[t[1] as usize].pos(),
                self.vertices[t[2] as usize].pos(),
            ]
        })
    }

    /// Segments as position pairs. Empty for triangle geometry.
    pub fn segments(&self) -> impl Iterator<Item = [Vec3; 2]> + '_ {
        let indices: &[u32] = if self.topology == Topology::LineSegments {
            &self.indices
        } else {
            &[]
        };
        indices.chunks_exact(2).map(|s| {
            [
                self.vertices[s[0] as usize].pos(),
                self.vertices[s[1] as usize].pos(),
            ]
        })
    }

    /// Number of triangles (or segments for line geometry).
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::LineSegments => self.indices.len() / 2,
        }
    }

    /// Bounding sphere around the vertex centroid.
    #[must_use]
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, 0.0);
        }
        let center = self.vertices.iter().map(Vertex::pos).sum::<Vec3>()
            / self.vertices.len() as f32;
        let radius = self
            .vertices
            .iter()
            .map(|v| v.pos().distance(center))
            .fold(0.0_f32, f32::max);
        (center, radius)
    }
}
