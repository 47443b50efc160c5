//! Sprig engine crate.
//!
//! A small 2D scene graph rendered on the CPU:
//! - `scene`: nodes, sprites, camera and the per-frame update/draw cycle
//! - `effect`: procedural resampling of sprite pixel buffers
//! - `load`: background image loading
//! - `surface`: raster targets (`Canvas`)
//! - `window`/`device`/`render`: optional windowed host presenting a canvas
//!   through wgpu

pub mod coords;
pub mod effect;
pub mod load;
pub mod pixels;
pub mod scene;
pub mod surface;
pub mod tick;
pub mod time;

pub mod core;
pub mod device;
pub mod input;
pub mod render;
pub mod window;

pub mod logging;
