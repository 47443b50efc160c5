//! Coordinate and geometry types shared by the scene, camera and surfaces.
//!
//! Canonical space:
//! - world units for node positions, screen pixels after the camera transform
//! - origin top-left
//! - +X right, +Y down

mod rect;
mod vec2;

pub use rect::{PixelSpan, Rect};
pub use vec2::Vec2;
