//! Surface size, camera interaction and picking.

use glam::Vec2;

use super::SceneStore;
use crate::camera::CameraPose;
use crate::error::SceneError;
use crate::picking::{pick, PickHit};
use crate::render::RenderSurface;

impl<S: RenderSurface> SceneStore<S> {
    /// Match the surface to a mount point of `width × height`. Returns
    /// whether the surface was reallocated; an unchanged size is a no-op.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<bool, SceneError> {
        self.ensure_live()?;
        self.controller.resize(width, height);
        let reallocated = self.surface.resize(width, height);
        if reallocated {
            self.needs_render = true;
        }
        Ok(reallocated)
    }

    /// Orbit by a pointer delta in pixels. Returns the new pose for
    /// publication to other instances.
    pub fn orbit(&mut self, delta: Vec2) -> Result<CameraPose, SceneError> {
        self.ensure_live()?;
        self.controller.rotate(delta);
        self.needs_render = true;
        Ok(self.controller.pose())
    }

    /// Pan by a pointer delta in pixels.
    pub fn pan(&mut self, delta: Vec2) -> Result<CameraPose, SceneError> {
        self.ensure_live()?;
        self.controller.pan(delta);
        self.needs_render = true;
        Ok(self.controller.pose())
    }

    /// Zoom by wheel steps.
    pub fn zoom(&mut self, delta: f32) -> Result<CameraPose, SceneError> {
        self.ensure_live()?;
        self.controller.zoom(delta);
        self.needs_render = true;
        Ok(self.controller.pose())
    }

    /// Set the camera from a pose received from another instance. Nothing
    /// is published back.
    pub fn apply_camera_pose(
        &mut self,
        pose: &CameraPose,
    ) -> Result<(), SceneError> {
        self.ensure_live()?;
        self.controller.set_pose(pose);
        self.needs_render = true;
        Ok(())
    }

    /// Current camera pose.
    #[must_use]
    pub fn camera_pose(&self) -> CameraPose {
        self.controller.pose()
    }

    /// Visible meshes under a normalized device coordinate, nearest first.
    pub fn pick(&self, ndc: Vec2) -> Result<Vec<PickHit>, SceneError> {
        self.ensure_live()?;
        Ok(pick(
            &self.graph,
            self.graph.root(),
            &self.controller.camera,
            ndc,
        ))
    }

    /// Visible meshes under a surface pixel, nearest first.
    pub fn pick_pixel(
        &self,
        x: f32,
        y: f32,
    ) -> Result<Vec<PickHit>, SceneError> {
        let (width, height) = self.surface.size();
        if width == 0 || height == 0 {
            self.ensure_live()?;
            return Ok(Vec::new());
        }
        let ndc = Vec2::new(
            x / width as f32 * 2.0 - 1.0,
            1.0 - y / height as f32 * 2.0,
        );
        self.pick(ndc)
    }
}
