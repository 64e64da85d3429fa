//! Mounted scene instances and their teardown.

use web_time::Instant;

use super::{IdGenerator, InstanceId, SceneCommand, SceneEvent};
use crate::animation::AnimationController;
use crate::camera::CameraPose;
use crate::error::SceneError;
use crate::export::{ExportService, ExportSink};
use crate::options::RenderSettings;
use crate::render::{HeadlessSurface, RenderSurface};
use crate::store::{SceneStore, StoreState};
use crate::sync::{CameraSyncBus, Subscription};

/// One mounted scene: store, bus subscription, animation and exports.
///
/// Dropping an instance tears it down the same way as
/// [`destroy`](Self::destroy).
pub struct SceneInstance<S: RenderSurface = HeadlessSurface> {
    id: InstanceId,
    store: SceneStore<S>,
    animation: AnimationController,
    subscription: Option<Subscription>,
    bus: CameraSyncBus,
    exports: ExportService,
    sink: Box<dyn ExportSink>,
    events: Vec<SceneEvent>,
}

impl SceneInstance<HeadlessSurface> {
    /// Mount a headless instance of `width × height` pixels.
    pub fn headless(
        ids: &dyn IdGenerator,
        bus: &CameraSyncBus,
        settings: RenderSettings,
        size: (u32, u32),
        sink: Box<dyn ExportSink>,
    ) -> Result<Self, SceneError> {
        let store = SceneStore::headless(settings, size.0, size.1)?;
        Self::mount(ids, bus, store, sink)
    }
}

impl<S: RenderSurface> SceneInstance<S> {
    /// Bind `store` to a fresh identity and subscribe it to `bus`.
    pub fn mount(
        ids: &dyn IdGenerator,
        bus: &CameraSyncBus,
        store: SceneStore<S>,
        sink: Box<dyn ExportSink>,
    ) -> Result<Self, SceneError> {
        if store.state() == StoreState::Destroyed {
            return Err(SceneError::Destroyed);
        }
        let id = ids.next_id();
        log::debug!("mounting {id}");
        let animation =
            AnimationController::new(store.settings().animation_period);
        Ok(Self {
            id,
            animation,
            store,
            subscription: Some(bus.subscribe(id)),
            bus: bus.clone(),
            exports: ExportService::new(),
            sink,
            events: Vec::new(),
        })
    }

    /// This instance's identity.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The owned scene store.
    #[must_use]
    pub fn store(&self) -> &SceneStore<S> {
        &self.store
    }

    /// The animation controller.
    #[must_use]
    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.store.state() == StoreState::Destroyed
    }

    /// Apply one host update. `now` drives the PLAY schedule.
    ///
    /// A rejected rebuild is returned as an error and also queued as
    /// [`SceneEvent::Warning`]; the previous scene stays.
    pub fn execute(
        &mut self,
        command: SceneCommand,
        now: Instant,
    ) -> Result<(), SceneError> {
        if self.is_destroyed() {
            return Err(SceneError::Destroyed);
        }
        match command {
            SceneCommand::SetRoot(value) => {
                let result = self.store.rebuild_from_value(&value, true);
                let _ = self.warn_on_error(result)?;
            }
            SceneCommand::SetVisibility(map) => {
                let _ = self.store.set_visibility(&map)?;
            }
            SceneCommand::Resize { width, height } => {
                let _ = self.store.resize(width, height)?;
            }
            SceneCommand::SetInset(inset) => self.store.update_inset(inset)?,
            SceneCommand::SetAnimation(mode) => {
                self.animation.set_mode(mode, now);
            }
            SceneCommand::SetSlider(position) => {
                if let Some(t) = self.animation.slider(position) {
                    let _ = self.store.update_time(t)?;
                }
            }
            SceneCommand::Download(request) => {
                let _ = self.exports.handle(
                    &request,
                    &mut self.store,
                    self.sink.as_mut(),
                )?;
            }
            SceneCommand::SetRenderSettings(settings) => {
                let previous = self.store.settings().animation_period;
                let period = settings.animation_period;
                let result = self.store.set_settings(*settings);
                if self.warn_on_error(result)? && period != previous {
                    let mode = self.animation.mode();
                    self.animation = AnimationController::new(period);
                    self.animation.set_mode(mode, now);
                }
            }
            SceneCommand::Orbit(delta) => {
                let pose = self.store.orbit(delta)?;
                self.publish(pose);
            }
            SceneCommand::Pan(delta) => {
                let pose = self.store.pan(delta)?;
                self.publish(pose);
            }
            SceneCommand::Zoom(delta) => {
                let pose = self.store.zoom(delta)?;
                self.publish(pose);
            }
            SceneCommand::Click { x, y } => {
                let hits = self.store.pick_pixel(x, y)?;
                if !hits.is_empty() {
                    self.events.push(SceneEvent::ObjectClicked(hits));
                }
            }
        }
        Ok(())
    }

    fn warn_on_error<T>(
        &mut self,
        result: Result<T, SceneError>,
    ) -> Result<T, SceneError> {
        result.inspect_err(|e| {
            log::warn!("{}: scene update rejected: {e}", self.id);
            self.events.push(SceneEvent::Warning(e.to_string()));
        })
    }

    fn publish(&mut self, pose: CameraPose) {
        let _ = self.bus.publish(self.id, pose);
        self.events.push(SceneEvent::CameraChanged(pose));
    }

    /// Per-frame work: apply poses from other instances, advance PLAY
    /// animation, then draw if needed. Returns whether a frame was drawn.
    pub fn frame(&mut self, now: Instant) -> Result<bool, SceneError> {
        if self.is_destroyed() {
            return Err(SceneError::Destroyed);
        }
        if let Some(subscription) = &self.subscription {
            for pose in subscription.drain() {
                self.store.apply_camera_pose(&pose)?;
            }
        }
        if let Some(t) = self.animation.tick(now) {
            let _ = self.store.update_time(t)?;
        }
        self.store.render_if_needed()
    }

    /// Take the queued outbound events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tear down: cancel animation, leave the camera bus, then release
    /// the store. Runs at most once; returns whether this call did it.
    pub fn destroy(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.animation.cancel();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        let _ = self.store.destroy();
        log::debug!("{} destroyed", self.id);
        true
    }
}

impl<S: RenderSurface> Drop for SceneInstance<S> {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}
