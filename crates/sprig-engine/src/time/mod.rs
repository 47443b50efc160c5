//! Frame timing.
//!
//! One `FrameClock` per scene; `tick()` (or `tick_at()` with a host-provided
//! timestamp) once per frame yields the `FrameTime` handed to update hooks.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
