//! Instance lifecycle: one [`SceneInstance`] per mount point.
//!
//! An instance owns a [`SceneStore`](crate::store::SceneStore), its camera
//! bus subscription, an animation controller and an export service. Hosts
//! feed it [`SceneCommand`]s, call [`SceneInstance::frame`] from their frame
//! callback, and drain [`SceneEvent`]s.

mod command;
mod lifecycle;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub use self::command::{SceneCommand, SceneEvent};
pub use self::lifecycle::SceneInstance;

/// Identity of one scene instance; tags camera bus messages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene-{}", self.0)
    }
}

/// Source of fresh instance ids.
pub trait IdGenerator {
    /// A new id, distinct from every id handed out before.
    fn next_id(&self) -> InstanceId;
}

/// Monotonic atomic counter starting at 1.
#[derive(Debug)]
pub struct CounterIdGenerator {
    next: AtomicU64,
}

impl Default for CounterIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterIdGenerator {
    /// Counter whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Restart numbering at 1.
    pub fn reset(&self) {
        self.next.store(1, Ordering::Relaxed);
    }
}

impl IdGenerator for CounterIdGenerator {
    fn next_id(&self) -> InstanceId {
        InstanceId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
