//! Owned RGBA rasters.
//!
//! Scope:
//! - `PixelBuffer`: row-major RGBA8 storage backing a sprite image
//! - `Rgba`: straight-alpha 8-bit color
//!
//! Buffers are plain owned values. Code outside the owning sprite replaces a
//! buffer as a whole and never edits one in place.

mod buffer;
mod color;

pub use buffer::{PixelBuffer, PixelBufferError};
pub use color::Rgba;
