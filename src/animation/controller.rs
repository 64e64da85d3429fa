//! Time advancement for animated scenes.

use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

/// How scene time advances.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Time is frozen.
    #[default]
    None,
    /// Time loops continuously with the configured period.
    Play,
    /// Time follows the host slider.
    Slider,
}

impl AnimationMode {
    /// Parse the host's mode string; anything unrecognized is `None`.
    #[must_use]
    pub fn from_host(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("play") => Self::Play,
            Some("slider") => Self::Slider,
            _ => Self::None,
        }
    }
}

/// Drives `update_time` from either a slider or a looping schedule.
///
/// The controller never reads the clock itself: callers pass the frame
/// timestamp to [`tick`](Self::tick) and [`set_mode`](Self::set_mode).
#[derive(Debug, Clone)]
pub struct AnimationController {
    mode: AnimationMode,
    period: Duration,
    /// Start of the running PLAY loop.
    started: Option<Instant>,
}

impl AnimationController {
    /// Controller in [`AnimationMode::None`] with a loop of `period_secs`.
    #[must_use]
    pub fn new(period_secs: f32) -> Self {
        Self {
            mode: AnimationMode::None,
            period: Duration::try_from_secs_f32(period_secs.max(0.0))
                .unwrap_or_default(),
            started: None,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// Switch mode. Entering PLAY starts the loop at `now`; leaving it
    /// cancels the schedule. Re-entering the current mode is a no-op.
    pub fn set_mode(&mut self, mode: AnimationMode, now: Instant) {
        if mode == self.mode {
            return;
        }
        log::debug!("animation mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.started = (mode == AnimationMode::Play).then_some(now);
    }

    /// Slider time clamped to `[0, 1]`, or `None` outside SLIDER mode.
    /// NaN maps to 0.
    #[must_use]
    pub fn slider(&self, position: f32) -> Option<f32> {
        (self.mode == AnimationMode::Slider).then(|| {
            if position.is_nan() {
                0.0
            } else {
                position.clamp(0.0, 1.0)
            }
        })
    }

    /// Looping time `fract(elapsed / period)` while PLAY is scheduled.
    #[must_use]
    pub fn tick(&self, now: Instant) -> Option<f32> {
        let started = self.started?;
        if self.period.is_zero() {
            return Some(0.0);
        }
        let elapsed = now.saturating_duration_since(started);
        Some((elapsed.as_secs_f32() / self.period.as_secs_f32()).fract())
    }

    /// Whether a PLAY loop is running.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.started.is_some()
    }

    /// Stop any running loop and return to NONE.
    pub fn cancel(&mut self) {
        self.started = None;
        self.mode = AnimationMode::None;
    }
}
