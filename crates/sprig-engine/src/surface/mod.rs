//! Raster surfaces the scene draws into.
//!
//! `RasterSurface` is the contract the scene and its nodes depend on; `Canvas`
//! is the software implementation used by the windowed host (uploaded to the
//! GPU each frame) and by headless runs.

mod canvas;

pub use canvas::Canvas;

use crate::coords::Rect;
use crate::pixels::PixelBuffer;

/// Draw target accepting clear and scaled blit operations.
pub trait RasterSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Whether the surface can currently be drawn to.
    ///
    /// A scene refuses to start on an unavailable surface.
    fn is_available(&self) -> bool {
        let (w, h) = self.size();
        w > 0 && h > 0
    }

    /// Resets every pixel to the surface's clear color.
    fn clear(&mut self);

    /// Draws `buffer` stretched over `dest` (screen pixels).
    ///
    /// `dest` may be partially or fully off-surface and may differ in size
    /// from the buffer.
    fn blit(&mut self, buffer: &PixelBuffer, dest: Rect);
}
