//! Descriptor reconciliation, visibility and animation time.

use super::{is_persistent, lights, SceneStore};
use crate::builders::{Builder, MaterialFactory};
use crate::error::SceneError;
use crate::options::RenderSettings;
use crate::render::RenderSurface;
use crate::scene::descriptor::SceneGroup;
use crate::scene::object::Object3D;
use crate::scene::VisibilityMap;

/// Top-level container moved into the inset when axis extraction is on.
pub const AXES_GROUP_NAME: &str = "axes";

impl<S: RenderSurface> SceneStore<S> {
    /// Build `root` and graft it into the scene.
    ///
    /// The whole tree is built before the live graph is touched, so a
    /// builder error leaves the previous scene in place. With `clear`, all
    /// previously built content is removed first (lights stay) and the
    /// camera is fitted to the new content; without it the tree is
    /// appended.
    pub fn rebuild(
        &mut self,
        root: &SceneGroup,
        clear: bool,
    ) -> Result<(), SceneError> {
        self.ensure_live()?;
        let mut tree = Builder::new(&self.settings).build_root(root)?;
        let axes = if self.settings.extract_axis {
            take_child(&mut tree, AXES_GROUP_NAME)
        } else {
            None
        };

        if clear {
            let graph_root = self.graph.root();
            let removed = self
                .graph
                .remove_children_where(graph_root, |n| is_persistent(&n.kind));
            log::debug!("rebuild: cleared {removed} nodes");
            self.inset.clear();
        }
        let meshes = tree.mesh_count();
        let _ = self.graph.insert_tree(self.graph.root(), tree);
        if let Some(axes) = axes {
            self.inset.set_axes(axes);
        }
        log::debug!("rebuild of `{}`: {meshes} meshes", root.name);

        if clear {
            if let Some(bounds) = self.graph.bounds(self.graph.root()) {
                self.controller
                    .fit_to_bounds(bounds, self.settings.default_zoom);
            }
        }
        self.reapply_visibility();
        self.last_root = Some(root.clone());
        self.needs_render = true;
        Ok(())
    }

    /// Decode a host snapshot and rebuild from it. An absent snapshot
    /// (no name or no contents) is skipped; returns whether a rebuild ran.
    pub fn rebuild_from_value(
        &mut self,
        value: &serde_json::Value,
        clear: bool,
    ) -> Result<bool, SceneError> {
        self.ensure_live()?;
        let Some(root) = SceneGroup::from_value(value)? else {
            return Ok(false);
        };
        self.rebuild(&root, clear)?;
        Ok(true)
    }

    /// Show or hide nodes by name. Names absent from the scene are ignored.
    /// `map` replaces the previous one and is re-applied after each
    /// rebuild. Returns the number of nodes touched.
    pub fn set_visibility(
        &mut self,
        map: &VisibilityMap,
    ) -> Result<usize, SceneError> {
        self.ensure_live()?;
        self.visibility = map.clone();
        let touched = self.apply_visibility(map);
        if touched > 0 {
            self.needs_render = true;
        }
        Ok(touched)
    }

    fn apply_visibility(&mut self, map: &VisibilityMap) -> usize {
        let mut touched = 0;
        for (name, visible) in map.iter() {
            for id in self.graph.find_by_name(name) {
                if let Some(node) = self.graph.node_mut(id) {
                    node.visible = visible;
                    touched += 1;
                }
            }
            touched += self.inset.set_visible(name, visible);
        }
        touched
    }

    fn reapply_visibility(&mut self) {
        let map = std::mem::take(&mut self.visibility);
        let _ = self.apply_visibility(&map);
        self.visibility = map;
    }

    /// Move every keyframed node to time `t` (clamped to `[0, 1]`).
    /// Returns the number of nodes moved; zero when nothing is animated.
    pub fn update_time(&mut self, t: f32) -> Result<usize, SceneError> {
        self.ensure_live()?;
        if !self.graph.has_tracks() {
            return Ok(0);
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let moved = self.graph.apply_time(t);
        self.needs_render = true;
        Ok(moved)
    }

    /// Swap in new render settings. Lights are replaced and the last
    /// accepted root is rebuilt with the new materials. On failure the old
    /// settings and scene stay. Returns whether anything changed.
    pub fn set_settings(
        &mut self,
        settings: RenderSettings,
    ) -> Result<bool, SceneError> {
        self.ensure_live()?;
        if settings == self.settings {
            return Ok(false);
        }
        let new_lights = lights(&settings.lighting)?;
        let _ = MaterialFactory::new(&settings).surface(None, None)?;
        let previous = std::mem::replace(&mut self.settings, settings);
        if let Some(root) = self.last_root.clone() {
            if let Err(e) = self.rebuild(&root, true) {
                self.settings = previous;
                return Err(e);
            }
        }
        let graph_root = self.graph.root();
        let _ = self
            .graph
            .remove_children_where(graph_root, |n| !is_persistent(&n.kind));
        for light in new_lights {
            let _ = self.graph.insert_tree(graph_root, light);
        }
        self.inset.set_lighting(&self.settings.lighting)?;
        let _ = self.surface.set_antialias(self.settings.antialias);
        self.needs_render = true;
        Ok(true)
    }
}

/// Detach the first direct child of `tree` named `name`.
fn take_child(tree: &mut Object3D, name: &str) -> Option<Object3D> {
    let index = tree
        .children
        .iter()
        .position(|c| c.name.as_deref() == Some(name))?;
    Some(tree.children.remove(index))
}
