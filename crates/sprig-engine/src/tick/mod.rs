//! Host tick scheduling.
//!
//! The host (window runtime, headless driver, test harness) owns the frame
//! cadence. A scene asks for exactly one tick at a time through
//! `TickSource::request_tick` and withdraws it on teardown.

mod manual;

pub use manual::ManualTicks;

/// Identifies one outstanding tick request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TickHandle(pub u64);

/// Scheduling primitives provided by the host.
pub trait TickSource {
    /// Schedules one future invocation of the scene's tick callback.
    fn request_tick(&mut self) -> TickHandle;

    /// Withdraws a request. Unknown or already-fired handles are ignored.
    fn cancel_tick(&mut self, handle: TickHandle);
}
