//! Camera pose publish/subscribe between scene instances.
//!
//! Every mounted instance subscribes once with its [`InstanceId`] and
//! publishes its pose after each user interaction. Each subscriber has its
//! own FIFO channel; messages that originated from the subscriber itself
//! are dropped when drained, so an instance never re-applies its own pose.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::camera::CameraPose;
use crate::instance::InstanceId;

/// A pose broadcast on the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMessage {
    /// Instance that published the pose.
    pub source: InstanceId,
    /// Published pose.
    pub pose: CameraPose,
}

#[derive(Debug)]
struct Subscriber {
    key: u64,
    tx: mpsc::Sender<CameraMessage>,
}

#[derive(Debug, Default)]
struct BusInner {
    subscribers: Vec<Subscriber>,
    next_key: u64,
}

/// Process-wide camera channel. Cloning yields another handle to the same
/// bus.
#[derive(Debug, Clone, Default)]
pub struct CameraSyncBus {
    inner: Arc<Mutex<BusInner>>,
}

impl CameraSyncBus {
    /// A fresh, private bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default bus shared by every instance in the process.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<CameraSyncBus> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `id` as a subscriber.
    #[must_use]
    pub fn subscribe(&self, id: InstanceId) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();
        let key = inner.next_key;
        inner.next_key += 1;
        inner.subscribers.push(Subscriber { key, tx });
        log::debug!("camera bus: {id} subscribed");
        Subscription {
            bus: self.clone(),
            key,
            id,
            rx,
        }
    }

    /// Send `pose` from `source` to every subscriber. Returns the number of
    /// subscribers reached.
    pub fn publish(&self, source: InstanceId, pose: CameraPose) -> usize {
        let message = CameraMessage { source, pose };
        let mut inner = self.lock();
        inner.subscribers.retain(|s| s.tx.send(message).is_ok());
        inner.subscribers.len()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn remove(&self, key: u64) {
        self.lock().subscribers.retain(|s| s.key != key);
    }
}

/// A live registration on a [`CameraSyncBus`]. Released by
/// [`unsubscribe`](Self::unsubscribe) or on drop.
#[derive(Debug)]
pub struct Subscription {
    bus: CameraSyncBus,
    key: u64,
    id: InstanceId,
    rx: mpsc::Receiver<CameraMessage>,
}

impl Subscription {
    /// Subscriber identity.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Pending poses from other instances, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<CameraPose> {
        self.rx
            .try_iter()
            .filter(|m| m.source != self.id)
            .map(|m| m.pose)
            .collect()
    }

    /// Leave the bus.
    pub fn unsubscribe(self) {
        log::debug!("camera bus: {} unsubscribed", self.id);
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.remove(self.key);
    }
}
