use glam::Vec3;
use serde::Serialize;

use super::Viewport;
use crate::camera::Camera;
use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::object::NodeKind;

/// A text label placed in viewport pixels. Hosts draw these as an HTML or
/// text overlay on top of the rendered image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelOverlay {
    /// Visible text.
    pub text: String,
    /// Tooltip text, if any.
    pub hover_text: Option<String>,
    /// Anchor x in pixels from the viewport's left edge.
    pub x: f32,
    /// Anchor y in pixels from the viewport's top edge.
    pub y: f32,
    /// Normalized depth, for ordering overlapping labels.
    pub depth: f32,
}

/// Project every visible label under `root`. Labels outside the clip
/// volume are dropped; the rest come back far to near.
#[must_use]
pub fn project_labels(
    graph: &SceneGraph,
    root: NodeId,
    camera: &Camera,
    viewport: Viewport,
) -> Vec<LabelOverlay> {
    let view_proj = camera.build_matrix();
    let mut out: Vec<LabelOverlay> = graph
        .visible_nodes(root)
        .into_iter()
        .filter_map(|(id, world)| {
            let NodeKind::Label(content) = &graph.node(id)?.kind else {
                return None;
            };
            let ndc =
                view_proj.project_point3(world.transform_point3(Vec3::ZERO));
            let inside = ndc.x.abs() <= 1.0
                && ndc.y.abs() <= 1.0
                && (0.0..=1.0).contains(&ndc.z);
            inside.then(|| LabelOverlay {
                text: content.text.clone(),
                hover_text: content.hover_text.clone(),
                x: (ndc.x * 0.5 + 0.5) * viewport.width as f32,
                y: (0.5 - ndc.y * 0.5) * viewport.height as f32,
                depth: ndc.z,
            })
        })
        .collect();
    out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::object::{LabelContent, Object3D, Transform};

    fn label(text: &str, at: Vec3) -> Object3D {
        Object3D::label(LabelContent {
            text: text.to_owned(),
            hover_text: None,
        })
        .at(Transform::from_translation(at))
    }

    #[test]
    fn labels_project_to_pixels_far_to_near() {
        let mut g = SceneGraph::new("scene");
        let root = g.root();
        let _ = g.insert_tree(root, label("near", Vec3::new(0.0, 0.0, 1.0)));
        let _ = g.insert_tree(root, label("far", Vec3::new(1.0, 1.0, -1.0)));
        let _ = g.insert_tree(root, label("off", Vec3::new(50.0, 0.0, 0.0)));
        let cam = Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            half_extent: 2.0,
            ..Camera::default()
        };
        let labels =
            project_labels(&g, g.root(), &cam, Viewport::full(100, 100));
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["far", "near"]);
        assert!((labels[1].x - 50.0).abs() < 1e-3);
        assert!((labels[0].x - 75.0).abs() < 1e-3);
        assert!((labels[0].y - 25.0).abs() < 1e-3);
    }
}
