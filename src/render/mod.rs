//! Render surfaces.
//!
//! The scene store draws through the [`RenderSurface`] trait: a host embeds
//! its own surface (a canvas, a window), while [`HeadlessSurface`] is a CPU
//! rasterizer used for captures, the command-line renderer and tests.

mod headless;
mod labels;
mod png;
mod raster;

pub use headless::HeadlessSurface;
pub use labels::{project_labels, LabelOverlay};
pub use png::encode_png;
pub use raster::Framebuffer;

use crate::camera::Camera;
use crate::error::SceneError;
use crate::scene::graph::{NodeId, SceneGraph};

/// Pixel rectangle inside a surface, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Viewport covering a whole `width × height` surface.
    #[must_use]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Width over height (1 for an empty viewport).
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// One draw of a graph subtree through a camera into a viewport.
#[derive(Debug, Clone, Copy)]
pub struct DrawPass<'a> {
    /// Graph to draw.
    pub graph: &'a SceneGraph,
    /// Subtree root; lights anywhere under it apply to the pass.
    pub root: NodeId,
    /// Viewing camera.
    pub camera: &'a Camera,
    /// Target rectangle.
    pub viewport: Viewport,
}

/// RGBA8 pixels read back from a surface, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA bytes.
    pub rgba: Vec<u8>,
}

impl Capture {
    /// Pixel at `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Drawing target owned by one scene store.
pub trait RenderSurface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Match `width × height`. Returns whether storage was reallocated;
    /// an unchanged size must not reallocate.
    fn resize(&mut self, width: u32, height: u32) -> bool;

    /// Turn antialiasing on or off. Returns whether storage was
    /// reallocated; an unchanged setting must not reallocate.
    fn set_antialias(&mut self, antialias: bool) -> bool;

    /// Fill `viewport` with `rgba` and reset its depth.
    fn clear(&mut self, viewport: Viewport, rgba: [u8; 4]);

    /// Draw a pass over whatever the viewport already holds.
    fn draw(&mut self, pass: &DrawPass<'_>);

    /// Read the current pixels back.
    fn capture(&self) -> Result<Capture, SceneError>;

    /// Free all storage. Later captures fail with
    /// [`SceneError::Destroyed`].
    fn release(&mut self);
}
