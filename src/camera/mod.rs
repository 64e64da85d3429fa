//! Orthographic orbit camera.
//!
//! Provides the camera itself, its exchangeable [`CameraPose`], and an orbit
//! controller with rotate, pan, zoom and fit-to-bounds.

/// Orbit controller (rotate, pan, zoom, fit).
pub mod controller;
/// Camera struct and pose type.
pub mod core;

pub use self::controller::CameraController;
pub use self::core::{Camera, CameraPose};
