use glam::{Quat, Vec2, Vec3};

use super::core::{Camera, CameraPose};

/// Distance from the focus point to the camera. Orthographic projection
/// ignores it for sizing; it only has to keep content between the clip
/// planes.
const MIN_DISTANCE: f32 = 1.0;

/// Orbit controller: the camera circles a focus point, pans across the view
/// plane and zooms by scaling the orthographic extent.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Controlled camera.
    pub camera: Camera,
    focus_point: Vec3,
    distance: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    /// Controller looking at the origin from +Z.
    #[must_use]
    pub fn new() -> Self {
        let mut controller = Self {
            camera: Camera::default(),
            focus_point: Vec3::ZERO,
            distance: 10.0,
            rotate_speed: 0.01,
            pan_speed: 0.002,
            zoom_speed: 0.05,
        };
        controller.update_camera_pos();
        controller
    }

    /// Point the camera orbits around.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    fn update_camera_pos(&mut self) {
        let back = self.camera.orientation * Vec3::Z;
        self.camera.position = self.focus_point + back * self.distance;
    }

    /// Match the viewport aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit around the focus point by a pointer delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let up = self.camera.orientation * Vec3::Y;
        let horizontal =
            Quat::from_axis_angle(up, -delta.x * self.rotate_speed);
        self.camera.orientation = horizontal * self.camera.orientation;

        let right = self.camera.orientation * Vec3::X;
        let vertical =
            Quat::from_axis_angle(right, -delta.y * self.rotate_speed);
        self.camera.orientation =
            (vertical * self.camera.orientation).normalize();

        self.update_camera_pos();
    }

    /// Slide the focus point across the view plane by a pointer delta in
    /// pixels, scaled by the visible extent.
    pub fn pan(&mut self, delta: Vec2) {
        let half = self.camera.half_size();
        let scale = half.y * self.pan_speed * 2.0;
        let translation = self.camera.right() * (-delta.x * scale)
            + self.camera.up() * (delta.y * scale);
        self.focus_point += translation;
        self.update_camera_pos();
    }

    /// Zoom in (positive) or out (negative) by wheel steps.
    pub fn zoom(&mut self, delta: f32) {
        let factor = 1.0 + delta * self.zoom_speed;
        if factor > 0.0 {
            self.camera.zoom = (self.camera.zoom * factor).clamp(1e-3, 1e3);
        }
    }

    /// Center on the bounds `(min, max)` and size the view so the bounding
    /// sphere fills it at zoom 1, then apply `zoom`. The orientation is
    /// kept.
    pub fn fit_to_bounds(&mut self, bounds: (Vec3, Vec3), zoom: f32) {
        let (min, max) = bounds;
        let center = (min + max) * 0.5;
        let radius = ((max - min).length() * 0.5).max(1e-3);
        self.focus_point = center;
        self.distance = (radius * 2.0).max(MIN_DISTANCE);
        self.camera.half_extent = radius;
        self.camera.znear = 0.01;
        self.camera.zfar = self.distance + radius * 2.0;
        if zoom.is_finite() && zoom > 0.0 {
            self.camera.zoom = zoom;
        }
        self.update_camera_pos();
    }

    /// Current camera pose.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        self.camera.pose()
    }

    /// Apply a pose received from elsewhere. The focus point follows the
    /// camera so later orbits stay consistent.
    pub fn set_pose(&mut self, pose: &CameraPose) {
        self.camera.set_pose(pose);
        self.focus_point =
            self.camera.position + self.camera.forward() * self.distance;
    }
}
