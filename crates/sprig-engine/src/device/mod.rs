//! GPU device + window surface.
//!
//! Only used by the windowed host to show a `Canvas`; all scene drawing
//! happens on the CPU.

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
