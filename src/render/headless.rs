//! Offscreen surface for captures and tests.

use super::{Capture, DrawPass, Framebuffer, RenderSurface, Viewport};
use crate::error::SceneError;

/// Offscreen surface backed by a CPU [`Framebuffer`].
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    framebuffer: Option<Framebuffer>,
    antialias: bool,
    allocations: usize,
}

impl HeadlessSurface {
    /// Surface of `width × height` pixels, not antialiased.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_antialias(width, height, false)
    }

    /// Surface of `width × height` pixels, supersampled when `antialias`.
    #[must_use]
    pub fn with_antialias(width: u32, height: u32, antialias: bool) -> Self {
        Self {
            framebuffer: Some(Framebuffer::with_antialias(
                width, height, antialias,
            )),
            antialias,
            allocations: 1,
        }
    }

    /// Whether draws are supersampled.
    #[must_use]
    pub fn is_antialiased(&self) -> bool {
        self.antialias
    }

    fn reallocate(&mut self, width: u32, height: u32) {
        self.framebuffer =
            Some(Framebuffer::with_antialias(width, height, self.antialias));
        self.allocations += 1;
    }

    /// Number of times storage has been (re)allocated.
    #[must_use]
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Whether [`release`](RenderSurface::release) has been called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.framebuffer.is_none()
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        self.framebuffer.as_ref().map_or((0, 0), Framebuffer::size)
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        let current = self.framebuffer.as_ref().map(Framebuffer::size);
        if current == Some((width, height)) {
            return false;
        }
        log::debug!("headless surface: {width}x{height}");
        self.reallocate(width, height);
        true
    }

    fn set_antialias(&mut self, antialias: bool) -> bool {
        if antialias == self.antialias {
            return false;
        }
        self.antialias = antialias;
        let Some((width, height)) =
            self.framebuffer.as_ref().map(Framebuffer::size)
        else {
            return false;
        };
        log::debug!("headless surface: antialias {antialias}");
        self.reallocate(width, height);
        true
    }

    fn clear(&mut self, viewport: Viewport, rgba: [u8; 4]) {
        if let Some(fb) = &mut self.framebuffer {
            fb.clear(viewport, rgba);
        }
    }

    fn draw(&mut self, pass: &DrawPass<'_>) {
        if let Some(fb) = &mut self.framebuffer {
            fb.draw(pass);
        }
    }

    fn capture(&self) -> Result<Capture, SceneError> {
        let fb = self.framebuffer.as_ref().ok_or(SceneError::Destroyed)?;
        let (width, height) = fb.size();
        Ok(Capture {
            width,
            height,
            rgba: fb.rgba(),
        })
    }

    fn release(&mut self) {
        self.framebuffer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_to_same_size_does_not_reallocate() {
        let mut s = HeadlessSurface::new(4, 4);
        assert!(!s.resize(4, 4));
        assert_eq!(s.allocations(), 1);
        assert!(s.resize(8, 2));
        assert!(!s.resize(8, 2));
        assert_eq!(s.allocations(), 2);
        assert_eq!(s.size(), (8, 2));
    }

    #[test]
    fn capture_reflects_clear() {
        let mut s = HeadlessSurface::new(2, 2);
        s.clear(Viewport::full(2, 2), [1, 2, 3, 4]);
        let c = s.capture().unwrap();
        assert_eq!(c.rgba.len(), 16);
        assert_eq!(c.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(c.pixel(2, 0), None);
    }

    #[test]
    fn antialias_toggle_reallocates_once() {
        let mut s = HeadlessSurface::new(4, 4);
        assert!(!s.set_antialias(false));
        assert!(s.set_antialias(true));
        assert!(!s.set_antialias(true));
        assert!(s.is_antialiased());
        assert_eq!(s.allocations(), 2);
        // Resizing keeps the sampling mode and the logical size
        assert!(s.resize(6, 2));
        assert_eq!(s.size(), (6, 2));
        assert_eq!(s.capture().unwrap().rgba.len(), 6 * 2 * 4);
    }

    #[test]
    fn released_surface_refuses_capture() {
        let mut s = HeadlessSurface::new(2, 2);
        s.release();
        assert!(s.is_released());
        assert!(matches!(s.capture(), Err(SceneError::Destroyed)));
        assert_eq!(s.size(), (0, 0));
    }
}
