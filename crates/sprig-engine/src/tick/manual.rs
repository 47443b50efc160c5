use std::time::{Duration, Instant};

use super::{TickHandle, TickSource};

/// Tick source driven explicitly by the caller.
///
/// Used by headless runs and tests: `fire()` consumes the pending request
/// and returns the timestamp to pass to `Scene::on_tick`, advancing a
/// synthetic clock by the configured frame interval.
#[derive(Debug, Clone)]
pub struct ManualTicks {
    next_id: u64,
    pending: Option<TickHandle>,
    now: Instant,
    interval: Duration,
    requested: u64,
    canceled: u64,
}

impl ManualTicks {
    /// Fixed-rate source starting at `start`.
    pub fn new(start: Instant, interval: Duration) -> Self {
        Self {
            next_id: 0,
            pending: None,
            now: start,
            interval,
            requested: 0,
            canceled: 0,
        }
    }

    /// Source advancing at `fps` frames per second (60 when not positive).
    pub fn at_fps(start: Instant, fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self::new(start, Duration::from_secs_f64(1.0 / fps))
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Total requests received so far.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total cancellations of a pending request.
    pub fn canceled(&self) -> u64 {
        self.canceled
    }

    /// Consumes the pending request. `None` when nothing was requested.
    pub fn fire(&mut self) -> Option<Instant> {
        self.pending.take()?;
        self.now += self.interval;
        Some(self.now)
    }
}

impl TickSource for ManualTicks {
    fn request_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        if let Some(prev) = self.pending.replace(handle) {
            log::warn!("tick {prev:?} replaced by {handle:?} before firing");
        }
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.canceled += 1;
        }
    }
}
