use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera state exchanged between instances: position, orientation and
/// orthographic zoom. Copied per instance, never shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// World-space camera position.
    pub position: [f32; 3],
    /// Orientation quaternion `(x, y, z, w)`.
    pub quaternion: [f32; 4],
    /// Orthographic zoom factor.
    pub zoom: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 1.0],
            quaternion: Quat::IDENTITY.to_array(),
            zoom: 1.0,
        }
    }
}

/// Orthographic camera looking down its local -Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Orientation; local +Y is up, local -Z is the view direction.
    pub orientation: Quat,
    /// Zoom factor dividing the visible extent.
    pub zoom: f32,
    /// Half of the visible height at zoom 1, in world units.
    pub half_extent: f32,
    /// Viewport width / height.
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::Z,
            orientation: Quat::IDENTITY,
            zoom: 1.0,
            half_extent: 1.0,
            aspect: 1.0,
            znear: 0.01,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Unit up direction.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Unit right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Half width and half height of the visible area in world units.
    #[must_use]
    pub fn half_size(&self) -> Vec2 {
        let h = self.half_extent / self.zoom.max(f32::EPSILON);
        Vec2::new(h * self.aspect, h)
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
            .inverse()
    }

    /// Orthographic projection with a `[0, 1]` depth range.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        let half = self.half_size();
        Mat4::orthographic_rh(
            -half.x, half.x, -half.y, half.y, self.znear, self.zfar,
        )
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray through a normalized device coordinate
    /// (`[-1, 1]` on both axes, +Y up). Orthographic rays are parallel.
    #[must_use]
    pub fn ray(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let half = self.half_size();
        let origin = self.position
            + self.right() * (ndc.x * half.x)
            + self.up() * (ndc.y * half.y);
        (origin, self.forward())
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position.to_array(),
            quaternion: self.orientation.to_array(),
            zoom: self.zoom,
        }
    }

    /// Overwrite position, orientation and zoom from `pose`. Non-finite or
    /// non-positive values are ignored field by field.
    pub fn set_pose(&mut self, pose: &CameraPose) {
        let position = Vec3::from_array(pose.position);
        if position.is_finite() {
            self.position = position;
        }
        let q = Quat::from_array(pose.quaternion);
        if q.is_finite() && q.length_squared() > f32::EPSILON {
            self.orientation = q.normalize();
        }
        if pose.zoom.is_finite() && pose.zoom > 0.0 {
            self.zoom = pose.zoom;
        }
    }
}
