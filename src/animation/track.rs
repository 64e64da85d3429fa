//! Keyframed translation tracks attached to animated scene objects.

use glam::Vec3;

use crate::scene::descriptor::Point;

/// Piecewise-linear translation offsets over normalized time.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack {
    /// Strictly sorted keyframe times in `[0, 1]`.
    times: Vec<f32>,
    /// Offset at each keyframe, added to the node's rest translation.
    offsets: Vec<Vec3>,
}

impl KeyframeTrack {
    /// Track from descriptor `animate` offsets and optional `keyframes`
    /// times. Times are evenly spaced over `[0, 1]` when omitted or when
    /// their count does not match. Returns `None` for an empty `animate`.
    #[must_use]
    pub fn from_descriptor(
        animate: &[Point],
        keyframes: Option<&[f32]>,
    ) -> Option<Self> {
        if animate.is_empty() {
            return None;
        }
        let offsets: Vec<Vec3> =
            animate.iter().copied().map(Vec3::from_array).collect();
        let times = match keyframes {
            Some(k) if k.len() == offsets.len() => {
                let mut t: Vec<f32> =
                    k.iter().map(|v| v.clamp(0.0, 1.0)).collect();
                t.sort_by(f32::total_cmp);
                t
            }
            _ => evenly_spaced(offsets.len()),
        };
        Some(Self { times, offsets })
    }

    /// Offset at normalized time `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let upper = self.times.partition_point(|&k| k <= t);
        match upper {
            0 => self.offsets[0],
            n if n >= self.times.len() => self.offsets[self.offsets.len() - 1],
            n => {
                let (t0, t1) = (self.times[n - 1], self.times[n]);
                let span = t1 - t0;
                let local = if span > 0.0 { (t - t0) / span } else { 0.0 };
                self.offsets[n - 1].lerp(self.offsets[n], local)
            }
        }
    }

    /// Number of keyframes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false; empty tracks are never constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

fn evenly_spaced(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![0.0];
    }
    let last = (n - 1) as f32;
    (0..n).map(|i| i as f32 / last).collect()
}
