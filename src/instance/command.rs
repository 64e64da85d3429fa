use glam::Vec2;

use crate::animation::AnimationMode;
use crate::camera::CameraPose;
use crate::export::DownloadRequest;
use crate::options::RenderSettings;
use crate::picking::PickHit;
use crate::scene::VisibilityMap;
use crate::store::InsetSettings;

/// An inbound update from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// New scene snapshot; absent snapshots (no name or contents) are
    /// skipped.
    SetRoot(serde_json::Value),
    /// Show/hide nodes by name.
    SetVisibility(VisibilityMap),
    /// Mount point size in pixels.
    Resize {
        /// Width.
        width: u32,
        /// Height.
        height: u32,
    },
    /// Axis inset placement.
    SetInset(InsetSettings),
    /// Animation mode.
    SetAnimation(AnimationMode),
    /// Normalized slider time in `[0, 1]`.
    SetSlider(f32),
    /// Download trigger.
    Download(DownloadRequest),
    /// Replacement render settings.
    SetRenderSettings(Box<RenderSettings>),
    /// Pointer drag that orbits, in pixels.
    Orbit(Vec2),
    /// Pointer drag that pans, in pixels.
    Pan(Vec2),
    /// Wheel steps.
    Zoom(f32),
    /// Click at a surface pixel.
    Click {
        /// Pixel x.
        x: f32,
        /// Pixel y.
        y: f32,
    },
}

/// An outbound notification to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Meshes under a click, nearest first.
    ObjectClicked(Vec<PickHit>),
    /// The user moved this instance's camera.
    CameraChanged(CameraPose),
    /// A rebuild was rejected; the previous scene is still shown.
    Warning(String),
}
