//! Frame rendering and artifact capture.

use serde_json::json;

use super::SceneStore;
use crate::error::SceneError;
use crate::export::ExportFormat;
use crate::render::{
    encode_png, project_labels, DrawPass, LabelOverlay, RenderSurface,
    Viewport,
};
use crate::util::color::Color;

impl<S: RenderSurface> SceneStore<S> {
    /// Draw the main scene, then the axis inset over its corner.
    pub fn render(&mut self) -> Result<(), SceneError> {
        self.ensure_live()?;
        let (width, height) = self.surface.size();
        let full = Viewport::full(width, height);
        let background = self.background()?;

        self.surface.clear(full, background);
        self.surface.draw(&DrawPass {
            graph: &self.graph,
            root: self.graph.root(),
            camera: &self.controller.camera,
            viewport: full,
        });

        if self.inset.has_content() {
            if let Some(viewport) = self.inset_viewport() {
                let camera = self.inset.camera(&self.controller.camera);
                self.surface.clear(viewport, background);
                self.surface.draw(&DrawPass {
                    graph: self.inset.graph(),
                    root: self.inset.graph().root(),
                    camera: &camera,
                    viewport,
                });
            }
        }
        self.needs_render = false;
        Ok(())
    }

    /// Render when something changed, or on every call for non-static
    /// scenes. Returns whether a frame was drawn.
    pub fn render_if_needed(&mut self) -> Result<bool, SceneError> {
        self.ensure_live()?;
        if self.settings.static_scene && !self.needs_render {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    fn background(&self) -> Result<[u8; 4], SceneError> {
        if self.settings.transparent_background {
            return Ok([0; 4]);
        }
        Ok(Color::parse(&self.settings.background)?.to_rgba8(1.0))
    }

    /// Labels of the main scene in surface pixels, far to near.
    #[must_use]
    pub fn labels(&self) -> Vec<LabelOverlay> {
        let (width, height) = self.surface.size();
        project_labels(
            &self.graph,
            self.graph.root(),
            &self.controller.camera,
            Viewport::full(width, height),
        )
    }

    /// Export bytes in `format`: a freshly rendered PNG of the surface, or
    /// the live graph as a JSON scene file.
    pub fn capture(
        &mut self,
        format: ExportFormat,
    ) -> Result<Vec<u8>, SceneError> {
        self.ensure_live()?;
        match format {
            ExportFormat::Png => {
                self.render()?;
                encode_png(&self.surface.capture()?)
            }
            ExportFormat::Json => {
                let file = json!({
                    "metadata": {
                        "type": "Object",
                        "generator": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "object": self.graph.snapshot(self.graph.root()),
                    "camera": self.controller.pose(),
                });
                Ok(serde_json::to_vec_pretty(&file)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use serde_json::json;

    use crate::export::ExportFormat;
    use crate::options::RenderSettings;
    use crate::scene::descriptor::SceneGroup;
    use crate::scene::VisibilityMap;
    use crate::store::{InsetSettings, SceneStore};
    use crate::options::AxisView;

    fn scene(value: serde_json::Value) -> SceneGroup {
        SceneGroup::from_value(&value).unwrap().unwrap()
    }

    fn sphere_and_line() -> SceneGroup {
        scene(json!({
            "name": "structure",
            "contents": [
                {"name": "atoms", "contents": [
                    {"type": "spheres", "positions": [[0, 0, 0]], "radius": 0.5,
                     "color": "#ff0000", "id": "Fe"}
                ]},
                {"name": "bonds", "contents": [
                    {"type": "lines", "positions": [[0, 0, 0], [1, 1, 1]]}
                ]}
            ]
        }))
    }

    fn store() -> SceneStore {
        SceneStore::headless(RenderSettings::default(), 64, 64).unwrap()
    }

    #[test]
    fn sphere_and_line_scenario() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let stats = s.graph().stats(s.graph().root());
        assert_eq!(stats.meshes, 1);
        assert_eq!(stats.lines, 1);

        let mut map = VisibilityMap::new();
        map.set("not-in-scene", false);
        assert_eq!(s.set_visibility(&map).unwrap(), 0);

        assert!(!s.resize(64, 64).unwrap());
        assert!(!s.resize(64, 64).unwrap());
        assert_eq!(s.surface().allocations(), 1);
    }

    #[test]
    fn rebuild_twice_equals_once() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let once = (s.graph().len(), s.graph().stats(s.graph().root()));
        let pose = s.camera_pose();
        s.rebuild(&sphere_and_line(), true).unwrap();
        assert_eq!((s.graph().len(), s.graph().stats(s.graph().root())), once);
        assert_eq!(s.camera_pose(), pose);
    }

    #[test]
    fn rebuild_without_clear_appends() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        s.rebuild(&sphere_and_line(), false).unwrap();
        assert_eq!(s.graph().stats(s.graph().root()).meshes, 2);
        assert_eq!(s.graph().stats(s.graph().root()).lights, 2);
    }

    #[test]
    fn failed_rebuild_keeps_previous_graph() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let before = s.graph().len();
        let bad = scene(json!({
            "name": "bad",
            "contents": [
                {"type": "spheres", "positions": [[0, 0, 0]]},
                {"type": "ellipsoids", "positions": [[0, 0, 0], [1, 0, 0]],
                 "rotate_to": [[0, 0, 1]]}
            ]
        }));
        assert!(s.rebuild(&bad, true).is_err());
        assert_eq!(s.graph().len(), before);
    }

    #[test]
    fn absent_root_is_skipped() {
        let mut s = store();
        assert!(!s.rebuild_from_value(&json!({"contents": []}), true).unwrap());
        assert!(!s.rebuild_from_value(&json!(null), true).unwrap());
        assert!(s.graph().stats(s.graph().root()).meshes == 0);
    }

    #[test]
    fn visibility_hides_named_group_and_survives_rebuild() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let mut map = VisibilityMap::new();
        map.set("atoms", false);
        assert_eq!(s.set_visibility(&map).unwrap(), 1);
        assert!(s.pick(Vec2::ZERO).unwrap().is_empty());

        s.rebuild(&sphere_and_line(), true).unwrap();
        let atoms = s.graph().find_by_name("atoms");
        assert!(!s.graph().node(atoms[0]).unwrap().visible);
    }

    #[test]
    fn latest_visibility_map_replaces_older_one() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let mut hide_atoms = VisibilityMap::new();
        hide_atoms.set("atoms", false);
        let _ = s.set_visibility(&hide_atoms).unwrap();
        let mut hide_bonds = VisibilityMap::new();
        hide_bonds.set("bonds", false);
        let _ = s.set_visibility(&hide_bonds).unwrap();

        s.rebuild(&sphere_and_line(), true).unwrap();
        let visible = |name: &str| {
            let id = s.graph().find_by_name(name)[0];
            s.graph().node(id).unwrap().visible
        };
        assert!(visible("atoms"));
        assert!(!visible("bonds"));
    }

    #[test]
    fn click_reports_descriptor_id() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let hits = s.pick(Vec2::ZERO).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_deref(), Some("Fe"));
    }

    #[test]
    fn update_time_moves_tracked_objects() {
        let mut s = store();
        assert_eq!(s.update_time(0.5).unwrap(), 0);
        let animated = scene(json!({
            "name": "a",
            "contents": [
                {"type": "spheres", "positions": [[0, 0, 0]],
                 "animate": [[0, 0, 0], [2, 0, 0]]}
            ]
        }));
        s.rebuild(&animated, true).unwrap();
        assert_eq!(s.update_time(7.0).unwrap(), 1);
        let moved = s.graph().bounds(s.graph().root()).unwrap();
        assert!((moved.0.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn png_capture_has_surface_size() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let bytes = s.capture(ExportFormat::Png).unwrap();
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (64, 64));
        // Background stays white in the corner, the sphere colors the middle
        let rgba = image.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_ne!(rgba.get_pixel(32, 32).0, [255, 255, 255, 255]);
    }

    #[test]
    fn json_capture_describes_graph() {
        let mut s = store();
        s.rebuild(&sphere_and_line(), true).unwrap();
        let bytes = s.capture(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["object"]["name"], "scene");
        assert!(value["camera"]["zoom"].is_number());
    }

    #[test]
    fn extracted_axes_draw_in_inset() {
        let settings = RenderSettings {
            extract_axis: true,
            ..RenderSettings::default()
        };
        let mut s = SceneStore::headless(settings, 64, 64).unwrap();
        let root = scene(json!({
            "name": "structure",
            "contents": [
                {"name": "axes", "contents": [
                    {
                        "type": "arrows",
                        "positionPairs": [[[0, 0, 0], [1, 0, 0]]]
                    }
                ]},
                {"name": "atoms", "contents": [
                    {"type": "spheres", "positions": [[0, 0, 0]]}
                ]}
            ]
        }));
        s.rebuild(&root, true).unwrap();
        assert!(s.graph().find_by_name("axes").is_empty());
        assert_eq!(s.inset_graph().find_by_name("axes").len(), 1);

        s.update_inset(InsetSettings {
            size: 20,
            padding: 2,
            axis_view: AxisView::NE,
        })
        .unwrap();
        let viewport = s.inset_viewport().unwrap();
        assert_eq!((viewport.x, viewport.y), (42, 2));
        s.render().unwrap();
    }

    #[test]
    fn static_scene_renders_only_after_changes() {
        let mut s = store();
        assert!(s.render_if_needed().unwrap());
        assert!(!s.render_if_needed().unwrap());
        let _ = s.zoom(1.0).unwrap();
        assert!(s.render_if_needed().unwrap());
    }
}
