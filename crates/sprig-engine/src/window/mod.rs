//! Window + runtime loop.
//!
//! Owns the `winit` event loop and windows, and wires them to the GPU layer.
//! Redraws are demand-driven: a window redraws when a tick was requested
//! for it (or the platform asks, e.g. after a resize).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
