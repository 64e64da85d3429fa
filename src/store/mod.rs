//! The live scene of one instance.
//!
//! A [`SceneStore`] owns the retained graph, the orbit camera, the axis
//! inset and the render surface. Its methods are split by concern across
//! the files of this module:
//!
//! - `content` reconciles incoming descriptors, visibility and time
//! - `view` handles resize, camera interaction and picking
//! - `inset` places and draws the orientation-axis inset
//! - `output` renders frames and captures artifacts

mod content;
mod inset;
mod output;
mod view;

use glam::Vec3;

pub use self::inset::InsetSettings;
use self::inset::InsetScene;
use crate::builders::MaterialFactory;
use crate::camera::CameraController;
use crate::error::SceneError;
use crate::options::{LightingOptions, RenderSettings};
use crate::render::{HeadlessSurface, RenderSurface};
use crate::scene::descriptor::SceneGroup;
use crate::scene::graph::SceneGraph;
use crate::scene::object::{Light, NodeKind, Object3D};
use crate::scene::VisibilityMap;
use crate::util::color::Color;

/// Name of the main graph's root group.
pub const SCENE_ROOT_NAME: &str = "scene";

/// Where a store is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Created but not yet attached to a sized mount point.
    Unmounted,
    /// Attached and drawing.
    Mounted,
    /// Torn down; every further operation fails.
    Destroyed,
}

/// Retained scene graph, camera and surface of one scene instance.
#[derive(Debug)]
pub struct SceneStore<S: RenderSurface = HeadlessSurface> {
    settings: RenderSettings,
    state: StoreState,
    surface: S,
    graph: SceneGraph,
    inset: InsetScene,
    controller: CameraController,
    /// Latest host visibility map; re-applied after every rebuild.
    visibility: VisibilityMap,
    /// Last accepted root, kept so a settings change can rebuild it.
    last_root: Option<SceneGroup>,
    needs_render: bool,
}

impl SceneStore<HeadlessSurface> {
    /// Store drawing into an offscreen surface of `width × height`.
    pub fn headless(
        settings: RenderSettings,
        width: u32,
        height: u32,
    ) -> Result<Self, SceneError> {
        let surface =
            HeadlessSurface::with_antialias(width, height, settings.antialias);
        let mut store = Self::new(settings, surface)?;
        store.mount(width, height)?;
        Ok(store)
    }
}

impl<S: RenderSurface> SceneStore<S> {
    /// Unmounted store over `surface`. Fails when the configured material
    /// or light colors are unusable.
    pub fn new(
        settings: RenderSettings,
        mut surface: S,
    ) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new(SCENE_ROOT_NAME);
        for light in lights(&settings.lighting)? {
            let _ = graph.insert_tree(graph.root(), light);
        }
        let inset = InsetScene::new(&settings.lighting)?;
        // Surface the material kind error at construction rather than on
        // the first rebuild
        let _ = MaterialFactory::new(&settings).surface(None, None)?;
        let _ = surface.set_antialias(settings.antialias);
        Ok(Self {
            settings,
            state: StoreState::Unmounted,
            surface,
            graph,
            inset,
            controller: CameraController::new(),
            visibility: VisibilityMap::new(),
            last_root: None,
            needs_render: true,
        })
    }

    /// Attach to a mount point of `width × height` pixels.
    pub fn mount(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<(), SceneError> {
        match self.state {
            StoreState::Destroyed => return Err(SceneError::Destroyed),
            StoreState::Mounted => {}
            StoreState::Unmounted => {
                log::debug!("scene store mounted at {width}x{height}");
                self.state = StoreState::Mounted;
            }
        }
        let _ = self.resize(width, height)?;
        Ok(())
    }

    /// Current life-cycle state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The main scene graph.
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The render surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The camera controller.
    #[must_use]
    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    /// Whether something changed since the last rendered frame.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    fn ensure_live(&self) -> Result<(), SceneError> {
        if self.state == StoreState::Destroyed {
            Err(SceneError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Release the surface and the graph. Runs at most once; returns
    /// whether this call did the teardown.
    pub fn destroy(&mut self) -> bool {
        if self.state == StoreState::Destroyed {
            return false;
        }
        self.surface.release();
        self.graph = SceneGraph::new(SCENE_ROOT_NAME);
        self.inset.clear();
        self.last_root = None;
        self.state = StoreState::Destroyed;
        log::debug!("scene store destroyed");
        true
    }
}

/// Persistent light nodes for `lighting`.
fn lights(lighting: &LightingOptions) -> Result<[Object3D; 2], SceneError> {
    let hemisphere = Light::Hemisphere {
        sky: Color::parse(&lighting.sky_color)?,
        ground: Color::parse(&lighting.ground_color)?,
        intensity: lighting.ambient,
    };
    let key = Light::Directional {
        color: Color::WHITE,
        intensity: lighting.key_intensity,
    };
    Ok([
        Object3D::light("hemisphere", hemisphere, Vec3::ZERO),
        Object3D::light("key", key, Vec3::from_array(lighting.key_position)),
    ])
}

/// Helper nodes that survive a clearing rebuild.
fn is_persistent(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Light(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MaterialOptions;

    #[test]
    fn new_store_has_lights_only() {
        let store =
            SceneStore::headless(RenderSettings::default(), 8, 8).unwrap();
        assert_eq!(store.state(), StoreState::Mounted);
        assert!(store.surface().is_antialiased());
        assert_eq!(store.surface().allocations(), 1);
        let stats = store.graph().stats(store.graph().root());
        assert_eq!(stats.lights, 2);
        assert_eq!(stats.meshes, 0);
    }

    #[test]
    fn unsupported_material_fails_construction() {
        let settings = RenderSettings {
            material: MaterialOptions {
                kind: "MeshPhongMaterial".to_owned(),
                ..MaterialOptions::default()
            },
            ..RenderSettings::default()
        };
        let err = SceneStore::headless(settings, 8, 8).unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedMaterialKind(_)));
    }

    #[test]
    fn antialias_setting_reaches_surface() {
        let plain = RenderSettings {
            antialias: false,
            ..RenderSettings::default()
        };
        let mut store = SceneStore::new(plain, HeadlessSurface::new(8, 8))
            .unwrap();
        assert!(!store.surface().is_antialiased());

        assert!(store.set_settings(RenderSettings::default()).unwrap());
        assert!(store.surface().is_antialiased());
        assert_eq!(store.surface().size(), (8, 8));
    }

    #[test]
    fn destroy_runs_once_and_blocks_operations() {
        let mut store =
            SceneStore::headless(RenderSettings::default(), 8, 8).unwrap();
        assert!(store.destroy());
        assert!(!store.destroy());
        assert_eq!(store.state(), StoreState::Destroyed);
        assert!(store.surface().is_released());
        assert!(matches!(store.mount(8, 8), Err(SceneError::Destroyed)));
        assert!(matches!(store.render(), Err(SceneError::Destroyed)));
    }
}
