//! CPU triangle and line rasterizer.
//!
//! Orthographic projection keeps every vertex at `w = 1`, so screen-space
//! interpolation is exact and no perspective correction or near-plane
//! clipping is needed: depth outside `[0, 1]` is simply rejected per pixel.
//!
//! With antialiasing on, every pixel holds a `SUPERSAMPLE × SUPERSAMPLE`
//! grid of samples that [`Framebuffer::rgba`] box-filters down.

use glam::{Mat4, Vec3};

use super::{DrawPass, Viewport};
use crate::geometry::Geometry;
use crate::scene::graph::NodeId;
use crate::scene::material::{LineMaterial, Shading, Side, SurfaceMaterial};
use crate::scene::object::{Light, NodeKind};
use crate::util::color::Color;

/// Depth offset pulling lines in front of coplanar faces.
const LINE_DEPTH_BIAS: f32 = 1e-4;

/// Samples per pixel edge when antialiasing.
pub const SUPERSAMPLE: u32 = 2;

/// Color and depth storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// Samples per pixel edge: 1, or [`SUPERSAMPLE`] when antialiased.
    scale: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl Framebuffer {
    /// Transparent-black buffer with far depth, one sample per pixel.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_antialias(width, height, false)
    }

    /// Buffer of `width × height` pixels, supersampled when `antialias`.
    #[must_use]
    pub fn with_antialias(width: u32, height: u32, antialias: bool) -> Self {
        let scale = if antialias { SUPERSAMPLE } else { 1 };
        let n = (width * scale) as usize * (height * scale) as usize;
        Self {
            width,
            height,
            scale,
            color: vec![[0; 4]; n],
            depth: vec![1.0; n],
        }
    }

    /// Size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether pixels are supersampled.
    #[must_use]
    pub fn is_antialiased(&self) -> bool {
        self.scale > 1
    }

    fn sample_width(&self) -> u32 {
        self.width * self.scale
    }

    /// Pixels as packed RGBA bytes, resolved from the samples.
    #[must_use]
    pub fn rgba(&self) -> Vec<u8> {
        if self.scale == 1 {
            return bytemuck::cast_slice(&self.color).to_vec();
        }
        let n = self.scale * self.scale;
        let len = (self.width * self.height * 4) as usize;
        let mut out = Vec::with_capacity(len);
        for y in 0..self.height {
            for x in 0..self.width {
                let mut sum = [0u32; 4];
                for sy in 0..self.scale {
                    let row = (y * self.scale + sy) * self.sample_width();
                    for sx in 0..self.scale {
                        let i = (row + x * self.scale + sx) as usize;
                        for (acc, c) in sum.iter_mut().zip(self.color[i]) {
                            *acc += u32::from(c);
                        }
                    }
                }
                out.extend(sum.map(|c| ((c + n / 2) / n) as u8));
            }
        }
        out
    }

    /// `viewport` in sample coordinates.
    fn samples(&self, viewport: Viewport) -> Viewport {
        Viewport {
            x: viewport.x.saturating_mul(self.scale),
            y: viewport.y.saturating_mul(self.scale),
            width: viewport.width.saturating_mul(self.scale),
            height: viewport.height.saturating_mul(self.scale),
        }
    }

    /// Sample-space bounds of `viewport`, clipped to the buffer.
    fn clip(&self, viewport: Viewport) -> (u32, u32, u32, u32) {
        let (w, h) = (self.sample_width(), self.height * self.scale);
        let x0 = viewport.x.min(w);
        let y0 = viewport.y.min(h);
        let x1 = viewport.x.saturating_add(viewport.width).min(w);
        let y1 = viewport.y.saturating_add(viewport.height).min(h);
        (x0, y0, x1, y1)
    }

    /// Fill `viewport` with `rgba` and far depth.
    pub fn clear(&mut self, viewport: Viewport, rgba: [u8; 4]) {
        let (x0, y0, x1, y1) = self.clip(self.samples(viewport));
        let stride = self.sample_width();
        for y in y0..y1 {
            let row = (y * stride) as usize;
            for x in x0..x1 {
                self.color[row + x as usize] = rgba;
                self.depth[row + x as usize] = 1.0;
            }
        }
    }

    fn plot(
        &mut self,
        x: u32,
        y: u32,
        z: f32,
        rgba: [f32; 4],
        write_depth: bool,
    ) {
        let i = (y * self.sample_width() + x) as usize;
        if !(0.0..=1.0).contains(&z) || z >= self.depth[i] {
            return;
        }
        let dst = self.color[i];
        let a = rgba[3].clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for c in 0..3 {
            let blended = rgba[c].clamp(0.0, 1.0) * 255.0 * a
                + f32::from(dst[c]) * (1.0 - a);
            out[c] = blended.round() as u8;
        }
        out[3] = (a * 255.0 + f32::from(dst[3]) * (1.0 - a)).round() as u8;
        self.color[i] = out;
        if write_depth {
            self.depth[i] = z;
        }
    }

    /// Draw every visible mesh and line node of the pass.
    pub fn draw(&mut self, pass: &DrawPass<'_>) {
        let nodes = pass.graph.visible_nodes(pass.root);
        let lights = Lights::collect(pass, &nodes);
        let view_proj = pass.camera.build_matrix();
        let to_viewer = -pass.camera.forward();
        let viewport = self.samples(pass.viewport);

        // Opaque first, then blended surfaces, then lines on top of both
        let mut blended = Vec::new();
        let mut lines = Vec::new();
        for (id, world) in &nodes {
            let Some(node) = pass.graph.node(*id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Mesh { geometry, material } => {
                    let target = Target {
                        world: *world,
                        view_proj,
                        viewport,
                    };
                    if material.transparent {
                        blended.push((target, geometry, material));
                    } else {
                        self.draw_mesh(
                            &target, geometry, material, &lights, to_viewer,
                        );
                    }
                }
                NodeKind::Lines {
                    geometry,
                    material,
                    line_distances,
                } => lines.push((*world, geometry, material, line_distances)),
                NodeKind::Group | NodeKind::Label(_) | NodeKind::Light(_) => {}
            }
        }
        for (target, geometry, material) in blended {
            self.draw_mesh(&target, geometry, material, &lights, to_viewer);
        }
        for (world, geometry, material, distances) in lines {
            let target = Target {
                world,
                view_proj,
                viewport,
            };
            self.draw_lines(
                &target,
                geometry,
                material,
                distances.as_deref(),
            );
        }
    }

    fn draw_mesh(
        &mut self,
        target: &Target,
        geometry: &Geometry,
        material: &SurfaceMaterial,
        lights: &Lights,
        to_viewer: Vec3,
    ) {
        let normal_matrix = target.world.inverse().transpose();
        for tri in geometry.indices.chunks_exact(3) {
            let verts = [tri[0], tri[1], tri[2]]
                .map(|i| geometry.vertices[i as usize]);
            let screen = verts.map(|v| target.to_screen(v.pos()));
            let area = edge(screen[0], screen[1], screen[2]);
            if area.abs() < f32::EPSILON {
                continue;
            }
            // Screen y points down, so front faces have negative area
            let front = area < 0.0;
            if !front && material.side == Side::Front {
                continue;
            }
            let mut normal = verts
                .iter()
                .map(|v| Vec3::from_array(v.normal))
                .sum::<Vec3>();
            if normal.length_squared() < f32::EPSILON {
                let [a, b, c] = verts.map(|v| v.pos());
                normal = (b - a).cross(c - a);
            }
            let mut normal =
                normal_matrix.transform_vector3(normal).normalize_or_zero();
            if normal.dot(to_viewer) < 0.0 {
                normal = -normal;
            }
            let rgba = shade(material, normal, to_viewer, lights);
            self.fill_triangle(
                target.viewport,
                screen,
                rgba,
                material.depth_write,
            );
        }
    }

    fn fill_triangle(
        &mut self,
        viewport: Viewport,
        [a, b, c]: [Vec3; 3],
        rgba: [f32; 4],
        write_depth: bool,
    ) {
        let (x0, y0, x1, y1) = self.clip(viewport);
        let min_x = a.x.min(b.x).min(c.x).floor().max(x0 as f32) as u32;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(x1 as f32) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(y0 as f32) as u32;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(y1 as f32) as u32;
        let area = edge(a, b, c);
        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * a.z + w1 * b.z + w2 * c.z;
                self.plot(x, y, z, rgba, write_depth);
            }
        }
    }

    fn draw_lines(
        &mut self,
        target: &Target,
        geometry: &Geometry,
        material: &LineMaterial,
        distances: Option<&[f32]>,
    ) {
        let (x0, y0, x1, y1) = self.clip(target.viewport);
        let rgba = material.color.to_vec3().extend(1.0).to_array();
        let width = material.line_width.round().max(1.0) as i64;
        let samples = width * i64::from(self.scale);
        let (lo, hi) = (-(samples - 1) / 2, samples / 2);
        let xs = i64::from(x0)..i64::from(x1);
        let ys = i64::from(y0)..i64::from(y1);
        for seg in geometry.indices.chunks_exact(2) {
            let (ia, ib) = (seg[0] as usize, seg[1] as usize);
            let a = target.to_screen(geometry.vertices[ia].pos());
            let b = target.to_screen(geometry.vertices[ib].pos());
            let at = |i: usize| {
                distances.and_then(|d| d.get(i)).copied().unwrap_or(0.0)
            };
            let (da, db) = (at(ia), at(ib));
            let steps =
                (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0);
            for s in 0..=steps as u32 {
                let t = s as f32 / steps;
                let dashed_out = distances.is_some()
                    && !material.is_dash_visible(da + (db - da) * t);
                if dashed_out {
                    continue;
                }
                let p = a.lerp(b, t);
                let z = p.z - LINE_DEPTH_BIAS;
                for oy in lo..=hi {
                    for ox in lo..=hi {
                        let px = p.x.floor() as i64 + ox;
                        let py = p.y.floor() as i64 + oy;
                        if xs.contains(&px) && ys.contains(&py) {
                            self.plot(px as u32, py as u32, z, rgba, true);
                        }
                    }
                }
            }
        }
    }
}

/// Per-node transform chain from object space to viewport pixels.
#[derive(Debug, Clone, Copy)]
struct Target {
    world: Mat4,
    view_proj: Mat4,
    viewport: Viewport,
}

impl Target {
    /// Sample x, sample y (down), NDC depth.
    fn to_screen(&self, p: Vec3) -> Vec3 {
        let ndc =
            self.view_proj.project_point3(self.world.transform_point3(p));
        let vp = self.viewport;
        Vec3::new(
            vp.x as f32 + (ndc.x * 0.5 + 0.5) * vp.width as f32,
            vp.y as f32 + (0.5 - ndc.y * 0.5) * vp.height as f32,
            ndc.z,
        )
    }
}

fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Lights gathered from the visible light nodes of a pass.
#[derive(Debug, Clone, Default)]
struct Lights {
    hemispheres: Vec<(Color, Color, f32)>,
    directional: Vec<(Vec3, Color, f32)>,
}

impl Lights {
    fn collect(pass: &DrawPass<'_>, nodes: &[(NodeId, Mat4)]) -> Self {
        let mut lights = Self::default();
        for (id, world) in nodes {
            let kind = pass.graph.node(*id).map(|n| &n.kind);
            let Some(NodeKind::Light(light)) = kind else {
                continue;
            };
            match *light {
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => lights.hemispheres.push((sky, ground, intensity)),
                Light::Directional { color, intensity } => {
                    let dir =
                        world.transform_point3(Vec3::ZERO).normalize_or_zero();
                    lights.directional.push((dir, color, intensity));
                }
            }
        }
        lights
    }

    fn is_empty(&self) -> bool {
        self.hemispheres.is_empty() && self.directional.is_empty()
    }
}

/// Blinn-Phong approximation of the standard material.
fn shade(
    material: &SurfaceMaterial,
    normal: Vec3,
    to_viewer: Vec3,
    lights: &Lights,
) -> [f32; 4] {
    let base = material.color.to_vec3();
    let alpha = if material.transparent {
        material.opacity
    } else {
        1.0
    };
    let Shading::Standard {
        roughness,
        metalness,
    } = material.shading
    else {
        return base.extend(alpha).to_array();
    };
    if lights.is_empty() {
        return base.extend(alpha).to_array();
    }

    let mut diffuse = Vec3::ZERO;
    for &(sky, ground, intensity) in &lights.hemispheres {
        let w = normal.y * 0.5 + 0.5;
        diffuse += ground.to_vec3().lerp(sky.to_vec3(), w) * intensity;
    }
    let mut specular = Vec3::ZERO;
    let shininess =
        (2.0 / (roughness * roughness).max(1e-4) - 2.0).clamp(1.0, 256.0);
    for &(dir, color, intensity) in &lights.directional {
        let n_dot_l = normal.dot(dir).max(0.0);
        diffuse += color.to_vec3() * (n_dot_l * intensity);
        let half = (dir + to_viewer).normalize_or_zero();
        let spec =
            normal.dot(half).max(0.0).powf(shininess) * (1.0 - roughness);
        specular += color.to_vec3() * (spec * intensity);
    }
    let spec_tint = Vec3::ONE.lerp(base, metalness);
    let rgb = base * diffuse * (1.0 - metalness) + spec_tint * specular;
    rgb.extend(alpha).to_array()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::camera::Camera;
    use crate::geometry::box_geometry;
    use crate::scene::graph::SceneGraph;
    use crate::scene::material::LineStyle;
    use crate::scene::object::{Object3D, Transform};

    fn flat(color: Color) -> Arc<SurfaceMaterial> {
        Arc::new(SurfaceMaterial {
            shading: Shading::Flat,
            color,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            side: Side::Front,
        })
    }

    fn camera() -> Camera {
        Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            half_extent: 2.0,
            ..Camera::default()
        }
    }

    fn render(graph: &SceneGraph) -> Framebuffer {
        render_with(graph, false)
    }

    fn render_with(graph: &SceneGraph, antialias: bool) -> Framebuffer {
        let mut fb = Framebuffer::with_antialias(32, 32, antialias);
        let viewport = Viewport::full(32, 32);
        fb.clear(viewport, [255, 255, 255, 255]);
        let cam = camera();
        fb.draw(&DrawPass {
            graph,
            root: graph.root(),
            camera: &cam,
            viewport,
        });
        fb
    }

    fn px(fb: &Framebuffer, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * fb.width + x) * 4) as usize;
        let bytes = fb.rgba();
        [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
    }

    /// Pixels that are neither the white background nor pure red.
    fn blended_edge_pixels(fb: &Framebuffer) -> usize {
        fb.rgba()
            .chunks_exact(4)
            .filter(|p| *p != [255, 255, 255, 255] && *p != [255, 0, 0, 255])
            .count()
    }

    #[test]
    fn antialiasing_softens_edges() {
        let mut g = SceneGraph::new("scene");
        let tilted = Object3D::mesh(
            Arc::new(box_geometry(2.0)),
            flat(Color::rgb8(255, 0, 0)),
        )
        .at(Transform {
            rotation: glam::Quat::from_rotation_z(0.4),
            ..Transform::IDENTITY
        });
        let _ = g.insert_tree(g.root(), tilted);

        let aliased = render_with(&g, false);
        assert_eq!(blended_edge_pixels(&aliased), 0);

        let smooth = render_with(&g, true);
        assert!(smooth.is_antialiased());
        assert_eq!(smooth.size(), (32, 32));
        assert_eq!(smooth.rgba().len(), 32 * 32 * 4);
        assert!(blended_edge_pixels(&smooth) > 0);
        // Interiors resolve to the flat fill
        assert_eq!(px(&smooth, 16, 16), [255, 0, 0, 255]);
    }

    #[test]
    fn cube_covers_center_not_corner() {
        let mut g = SceneGraph::new("scene");
        let _ = g.insert_tree(
            g.root(),
            Object3D::mesh(
                Arc::new(box_geometry(2.0)),
                flat(Color::rgb8(255, 0, 0)),
            ),
        );
        let fb = render(&g);
        assert_eq!(px(&fb, 16, 16), [255, 0, 0, 255]);
        assert_eq!(px(&fb, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn nearer_mesh_wins_depth_test() {
        let mut g = SceneGraph::new("scene");
        let far = Object3D::mesh(
            Arc::new(box_geometry(2.0)),
            flat(Color::rgb8(0, 0, 255)),
        )
        .at(Transform::from_translation(Vec3::new(0.0, 0.0, -3.0)));
        let near = Object3D::mesh(
            Arc::new(box_geometry(1.0)),
            flat(Color::rgb8(0, 255, 0)),
        );
        // Insert near first so draw order alone would lose
        let _ = g.insert_tree(g.root(), near);
        let _ = g.insert_tree(g.root(), far);
        let fb = render(&g);
        assert_eq!(px(&fb, 16, 16), [0, 255, 0, 255]);
    }

    #[test]
    fn hidden_nodes_are_not_drawn() {
        let mut g = SceneGraph::new("scene");
        let id = g
            .insert_tree(
                g.root(),
                Object3D::mesh(Arc::new(box_geometry(2.0)), flat(Color::BLACK)),
            )
            .unwrap();
        g.node_mut(id).unwrap().visible = false;
        let fb = render(&g);
        assert_eq!(px(&fb, 16, 16), [255, 255, 255, 255]);
    }

    #[test]
    fn translucent_mesh_blends() {
        let mut g = SceneGraph::new("scene");
        let material = SurfaceMaterial {
            opacity: 0.5,
            ..(*flat(Color::BLACK)).clone()
        }
        .translucent();
        let _ = g.insert_tree(
            g.root(),
            Object3D::mesh(Arc::new(box_geometry(2.0)), Arc::new(material)),
        );
        let fb = render(&g);
        let [r, ..] = px(&fb, 16, 16);
        assert!((100..=155).contains(&r), "got {r}");
    }

    #[test]
    fn lines_are_drawn() {
        let mut g = SceneGraph::new("scene");
        let geometry = Geometry::from_segments(&[
            Vec3::new(-1.5, 0.0, 0.0),
            Vec3::new(1.5, 0.0, 0.0),
        ]);
        let material = LineMaterial {
            color: Color::BLACK,
            line_width: 1.0,
            style: LineStyle::Solid,
        };
        let _ = g.insert_tree(
            g.root(),
            Object3D::lines(Arc::new(geometry), Arc::new(material), None),
        );
        let fb = render(&g);
        assert_eq!(px(&fb, 16, 16), [0, 0, 0, 255]);
        assert_eq!(px(&fb, 16, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn viewport_limits_drawing() {
        let mut g = SceneGraph::new("scene");
        let _ = g.insert_tree(
            g.root(),
            Object3D::mesh(Arc::new(box_geometry(2.0)), flat(Color::BLACK)),
        );
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Viewport::full(32, 32), [255, 255, 255, 255]);
        let cam = camera();
        let viewport = Viewport {
            x: 24,
            y: 24,
            width: 8,
            height: 8,
        };
        fb.draw(&DrawPass {
            graph: &g,
            root: g.root(),
            camera: &cam,
            viewport,
        });
        assert_eq!(px(&fb, 28, 28), [0, 0, 0, 255]);
        assert_eq!(px(&fb, 16, 16), [255, 255, 255, 255]);
    }
}
