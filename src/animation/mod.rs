//! Scene time: keyframe tracks and the NONE / PLAY / SLIDER controller.

mod controller;
mod track;

pub use controller::{AnimationController, AnimationMode};
pub use track::KeyframeTrack;
