//! Orientation-axis inset: a second, small scene drawn in a corner of the
//! surface with a camera that copies the main camera's orientation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{lights, SceneStore};
use crate::camera::Camera;
use crate::error::SceneError;
use crate::options::{AxisView, LightingOptions};
use crate::render::{RenderSurface, Viewport};
use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::object::{NodeKind, Object3D};

/// Placement of the inset viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsetSettings {
    /// Edge length of the square inset, in pixels.
    pub size: u32,
    /// Gap between the inset and the surface edges, in pixels.
    pub padding: u32,
    /// Corner the inset sits in.
    pub axis_view: AxisView,
}

impl Default for InsetSettings {
    fn default() -> Self {
        Self {
            size: 100,
            padding: 10,
            axis_view: AxisView::SW,
        }
    }
}

impl InsetSettings {
    /// Inset rectangle on a `width × height` surface, or `None` when it
    /// does not fit.
    #[must_use]
    pub fn viewport(&self, width: u32, height: u32) -> Option<Viewport> {
        let extent = self.size.checked_add(self.padding.saturating_mul(2))?;
        if self.size == 0 || extent > width || extent > height {
            return None;
        }
        let far_x = width - self.size - self.padding;
        let far_y = height - self.size - self.padding;
        let (x, y) = match self.axis_view {
            AxisView::NW => (self.padding, self.padding),
            AxisView::NE => (far_x, self.padding),
            AxisView::SW => (self.padding, far_y),
            AxisView::SE => (far_x, far_y),
        };
        Some(Viewport {
            x,
            y,
            width: self.size,
            height: self.size,
        })
    }
}

/// The inset's own graph: lights plus the extracted axes container.
#[derive(Debug)]
pub(crate) struct InsetScene {
    graph: SceneGraph,
    axes: Option<NodeId>,
    settings: InsetSettings,
}

impl InsetScene {
    pub(crate) fn new(lighting: &LightingOptions) -> Result<Self, SceneError> {
        let mut scene = Self {
            graph: SceneGraph::new("inset"),
            axes: None,
            settings: InsetSettings::default(),
        };
        scene.set_lighting(lighting)?;
        Ok(scene)
    }

    pub(crate) fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub(crate) fn has_content(&self) -> bool {
        self.axes.is_some()
    }

    pub(crate) fn clear(&mut self) {
        if let Some(axes) = self.axes.take() {
            let _ = self.graph.remove(axes);
        }
    }

    pub(crate) fn set_axes(&mut self, axes: Object3D) {
        self.clear();
        self.axes = self.graph.insert_tree(self.graph.root(), axes);
    }

    /// Replace the light nodes; the axes stay.
    pub(crate) fn set_lighting(
        &mut self,
        lighting: &LightingOptions,
    ) -> Result<(), SceneError> {
        let new_lights = lights(lighting)?;
        let root = self.graph.root();
        let _ = self.graph.remove_children_where(root, |n| {
            !matches!(n.kind, NodeKind::Light(_))
        });
        for light in new_lights {
            let _ = self.graph.insert_tree(root, light);
        }
        Ok(())
    }

    pub(crate) fn set_visible(&mut self, name: &str, visible: bool) -> usize {
        let ids = self.graph.find_by_name(name);
        for &id in &ids {
            if let Some(node) = self.graph.node_mut(id) {
                node.visible = visible;
            }
        }
        ids.len()
    }

    /// Camera framing the axes with `main`'s orientation.
    pub(crate) fn camera(&self, main: &Camera) -> Camera {
        let (center, radius) = self
            .axes
            .and_then(|id| self.graph.bounds(id))
            .map_or((Vec3::ZERO, 1.0), |(min, max)| {
                ((min + max) * 0.5, ((max - min).length() * 0.5).max(1e-3))
            });
        let distance = radius * 2.0 + 1.0;
        Camera {
            position: center - main.forward() * distance,
            orientation: main.orientation,
            zoom: 1.0,
            half_extent: radius * 1.1,
            aspect: 1.0,
            znear: 0.01,
            zfar: distance + radius * 2.0,
        }
    }
}

impl<S: RenderSurface> SceneStore<S> {
    /// Move or resize the axis inset. Independent of rebuilds.
    pub fn update_inset(
        &mut self,
        settings: InsetSettings,
    ) -> Result<(), SceneError> {
        self.ensure_live()?;
        if self.inset.settings != settings {
            log::debug!(
                "inset: {}px, padding {}, {:?}",
                settings.size,
                settings.padding,
                settings.axis_view
            );
            self.inset.settings = settings;
            self.needs_render = true;
        }
        Ok(())
    }

    /// Current inset placement.
    #[must_use]
    pub fn inset_settings(&self) -> InsetSettings {
        self.inset.settings
    }

    /// Inset rectangle on the current surface, when it fits.
    #[must_use]
    pub fn inset_viewport(&self) -> Option<Viewport> {
        let (width, height) = self.surface.size();
        self.inset.settings.viewport(width, height)
    }

    /// The inset graph; holds the axes container when extraction is on.
    #[must_use]
    pub fn inset_graph(&self) -> &SceneGraph {
        self.inset.graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(axis_view: AxisView) -> Option<(u32, u32)> {
        let settings = InsetSettings {
            size: 20,
            padding: 5,
            axis_view,
        };
        settings.viewport(100, 50).map(|v| (v.x, v.y))
    }

    #[test]
    fn corners_are_padded() {
        assert_eq!(at(AxisView::NW), Some((5, 5)));
        assert_eq!(at(AxisView::NE), Some((75, 5)));
        assert_eq!(at(AxisView::SW), Some((5, 25)));
        assert_eq!(at(AxisView::SE), Some((75, 25)));
    }

    #[test]
    fn oversized_inset_is_skipped() {
        let settings = InsetSettings {
            size: 60,
            ..InsetSettings::default()
        };
        assert_eq!(settings.viewport(100, 50), None);
        let hidden = InsetSettings { size: 0, ..settings };
        assert_eq!(hidden.viewport(100, 50), None);
    }

    #[test]
    fn inset_camera_follows_main_orientation() {
        let scene = InsetScene::new(&LightingOptions::default()).unwrap();
        let main = Camera {
            orientation: glam::Quat::from_rotation_y(0.7),
            ..Camera::default()
        };
        let cam = scene.camera(&main);
        assert_eq!(cam.orientation, main.orientation);
        assert!(cam.forward().distance(main.forward()) < 1e-6);
    }
}
