use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::{Geometry, GeometryKind, Topology, Vertex};

/// UV sphere of `radius` with `segments` width and height segments, sweeping
/// `phi_length` radians of azimuth starting at `phi_start`.
#[must_use]
pub fn sphere_geometry(
    radius: f32,
    segments: u32,
    phi_start: f32,
    phi_length: f32,
) -> Geometry {
    let width = segments.max(3);
    let height = segments.max(2);
    let mut vertices =
        Vec::with_capacity(((width + 1) * (height + 1)) as usize);
    let mut indices = Vec::with_capacity((width * height * 6) as usize);

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        let theta = v * PI;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let phi = phi_start + u * phi_length;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(Vertex::new(normal * radius, normal));
        }
    }

    let row = width + 1;
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Skip the degenerate triangles at the poles
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Geometry {
        kind: GeometryKind::Sphere { radius, segments },
        topology: Topology::Triangles,
        vertices,
        indices,
    }
}

/// Capped cylinder along +Y centered at the origin. A zero radius leaves that
/// end open (a cone apex).
#[must_use]
pub fn cylinder_geometry(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> Geometry {
    let radial = radial_segments.max(3);
    let half = height / 2.0;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Torso: row 0 at +Y, row 1 at -Y
    for row in 0..2u32 {
        let v = row as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex::new(
                Vec3::new(radius * sin, half - v * height, radius * cos),
                Vec3::new(sin, slope, cos).normalize(),
            ));
        }
    }
    let row = radial + 1;
    for x in 0..radial {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if radius_top > 0.0 {
        push_cap(&mut vertices, &mut indices, radius_top, half, radial, true);
    }
    if radius_bottom > 0.0 {
        push_cap(
            &mut vertices,
            &mut indices,
            radius_bottom,
            -half,
            radial,
            false,
        );
    }

    Geometry {
        kind: GeometryKind::Cylinder {
            radius_top,
            radius_bottom,
            height,
        },
        topology: Topology::Triangles,
        vertices,
        indices,
    }
}

/// Fan cap for a cylinder end at height `y`, facing +Y when `top`.
fn push_cap(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    radial: u32,
    top: bool,
) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = vertices.len() as u32;
    vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
    let first = center + 1;
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex::new(
            Vec3::new(radius * sin, y, radius * cos),
            normal,
        ));
    }
    for x in 0..radial {
        let (p0, p1) = (first + x, first + x + 1);
        if top {
            indices.extend_from_slice(&[center, p0, p1]);
        } else {
            indices.extend_from_slice(&[center, p1, p0]);
        }
    }
}

/// Cone along +Y centered at the origin, apex at `+height / 2`.
#[must_use]
pub fn cone_geometry(
    radius: f32,
    height: f32,
    radial_segments: u32,
) -> Geometry {
    Geometry {
        kind: GeometryKind::Cone { radius, height },
        ..cylinder_geometry(0.0, radius, height, radial_segments)
    }
}

/// Axis-aligned cube of edge `size` centered at the origin.
#[must_use]
pub fn box_geometry(size: f32) -> Geometry {
    // (normal, u, v) with u × v = normal so every face winds outward
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let h = size / 2.0;
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for corner in [-u - v, u - v, u + v, -u + v] {
            vertices.push(Vertex::new((normal + corner) * h, normal));
        }
        indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
    }
    Geometry {
        kind: GeometryKind::Box { size },
        topology: Topology::Triangles,
        vertices,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outward(g: &Geometry) -> bool {
        let (center, _) = g.bounding_sphere();
        g.triangles().all(|[a, b, c]| {
            let n = (b - a).cross(c - a);
            n.length() < 1e-9 || n.dot((a + b + c) / 3.0 - center) > 0.0
        })
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let g = sphere_geometry(2.0, 8, 0.0, TAU);
        assert_eq!(g.vertices.len(), 9 * 9);
        for v in &g.vertices {
            assert!((v.pos().length() - 2.0).abs() < 1e-5);
        }
        // Poles contribute one triangle per quad, the rest two
        assert_eq!(g.primitive_count(), 8 * 8 * 2 - 2 * 8);
    }

    #[test]
    fn sphere_winds_outward() {
        assert!(outward(&sphere_geometry(1.0, 12, 0.0, TAU)));
    }

    #[test]
    fn cylinder_spans_unit_height() {
        let g = cylinder_geometry(1.0, 1.0, 1.0, 16);
        let ys: Vec<f32> = g.vertices.iter().map(|v| v.position[1]).collect();
        let max = ys.iter().copied().fold(f32::MIN, f32::max);
        let min = ys.iter().copied().fold(f32::MAX, f32::min);
        assert_eq!(max, 0.5);
        assert_eq!(min, -0.5);
        assert!(outward(&g));
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = cone_geometry(1.0, 2.0, 8);
        let cylinder = cylinder_geometry(1.0, 1.0, 2.0, 8);
        assert!(cone.primitive_count() < cylinder.primitive_count());
        assert_eq!(cone.kind, GeometryKind::Cone { radius: 1.0, height: 2.0 });
    }

    #[test]
    fn box_has_twelve_outward_triangles() {
        let g = box_geometry(2.0);
        assert_eq!(g.primitive_count(), 12);
        assert!(outward(&g));
        for v in &g.vertices {
            assert!(v.position.iter().all(|c| c.abs() == 1.0));
        }
    }
}
