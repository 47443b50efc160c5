//! Procedural pixel resampling.
//!
//! A `PixelEffect` rewrites a subset of a destination buffer each frame from
//! jittered samples of a source buffer, mixed with uniform noise.
//!
//! Out-of-range sample coordinates are clamped to the nearest edge pixel.

mod params;
mod pixel;

pub use params::{DrivePolicy, EffectParams};
pub use pixel::PixelEffect;
