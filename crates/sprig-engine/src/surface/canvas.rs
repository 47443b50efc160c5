use std::path::Path;

use anyhow::{Context, Result};

use crate::coords::Rect;
use crate::pixels::{PixelBuffer, Rgba};

use super::RasterSurface;

/// CPU RGBA8 raster.
///
/// Blits use nearest-neighbour sampling and straight-alpha source-over
/// compositing, so opaque content drawn later fully covers earlier content.
#[derive(Debug, Clone)]
pub struct Canvas {
    frame: PixelBuffer,
    width: u32,
    height: u32,
    clear_color: Rgba,
}

impl Canvas {
    /// Creates a canvas. A zero dimension yields an unavailable surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_clear_color(width, height, Rgba::TRANSPARENT)
    }

    pub fn with_clear_color(width: u32, height: u32, clear_color: Rgba) -> Self {
        Self {
            frame: PixelBuffer::filled(width, height, clear_color),
            width,
            height,
            clear_color,
        }
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    /// Resizes the backing raster. Contents are reset to the clear color.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        log::debug!("canvas resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.frame = PixelBuffer::filled(width, height, self.clear_color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.frame.pixel(x, y)
    }

    /// RGBA8 bytes, row-major. Empty when the canvas is unavailable.
    pub fn as_bytes(&self) -> &[u8] {
        if self.is_available() { self.frame.as_bytes() } else { &[] }
    }

    /// Writes the current raster as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        anyhow::ensure!(self.is_available(), "canvas has zero size");
        self.frame
            .clone()
            .into_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl RasterSurface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.frame.fill(self.clear_color);
    }

    fn blit(&mut self, buffer: &PixelBuffer, dest: Rect) {
        if !self.is_available() {
            return;
        }
        let dest = dest.normalized();
        let Some(span) = dest.pixel_span(self.width, self.height) else {
            return;
        };

        // Source texel for each covered destination pixel center.
        let sx = buffer.width() as f64 / dest.size.x;
        let sy = buffer.height() as f64 / dest.size.y;

        for y in span.y0..span.y1 {
            let v = ((y as f64 + 0.5 - dest.origin.y) * sy).floor() as i64;
            for x in span.x0..span.x1 {
                let u = ((x as f64 + 0.5 - dest.origin.x) * sx).floor() as i64;
                let src = buffer.pixel_clamped(u, v);
                if let Some(dst) = self.frame.pixel(x, y) {
                    self.frame.set_pixel(x, y, src.over(dst));
                }
            }
        }
    }
}
