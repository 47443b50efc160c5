use std::time::{Duration, Instant};

/// Timing passed to a scene's update hook.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started. Never decreases.
    pub now: f64,

    /// Seconds since the previous tick, after clamping.
    pub delta: f64,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots from host timestamps.
///
/// Delta time is clamped so a stalled host (debugger, minimized window)
/// does not hand effects a huge step, and so back-to-back ticks never
/// report zero elapsed time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    /// Clock whose `now == 0` corresponds to `origin`.
    pub fn starting_at(origin: Instant) -> Self {
        Self::with_clamps(origin, Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    /// Clock with custom delta clamps. An inverted pair is reordered.
    pub fn with_clamps(origin: Instant, dt_min: Duration, dt_max: Duration) -> Self {
        Self {
            origin,
            last: origin,
            frame_index: 0,
            dt_min: dt_min.min(dt_max),
            dt_max: dt_max.max(dt_min),
        }
    }

    /// Advances using a host timestamp. Timestamps earlier than the previous
    /// tick are treated as equal to it.
    pub fn tick_at(&mut self, at: Instant) -> FrameTime {
        let at = at.max(self.last);
        let dt = at
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = at;

        let ft = FrameTime {
            now: at.saturating_duration_since(self.origin).as_secs_f64(),
            delta: dt.as_secs_f64(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn reports_elapsed_since_previous_tick() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let a = clock.tick_at(t0 + ms(16));
        let b = clock.tick_at(t0 + ms(40));
        assert!((a.delta - 0.016).abs() < 1e-9);
        assert!((b.delta - 0.024).abs() < 1e-9);
        assert!((b.now - 0.040).abs() < 1e-9);
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
    }

    #[test]
    fn delta_is_clamped_after_stall() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(ft.delta, FrameClock::DEFAULT_DT_MAX.as_secs_f64());
        assert!((ft.now - 5.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_clamps_are_reordered() {
        let t0 = Instant::now();
        let mut clock = FrameClock::with_clamps(t0, ms(50), ms(10));
        let a = clock.tick_at(t0 + ms(1));
        let b = clock.tick_at(t0 + ms(500));
        assert!((a.delta - 0.010).abs() < 1e-9);
        assert!((b.delta - 0.050).abs() < 1e-9);
    }

    #[test]
    fn now_never_decreases() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let a = clock.tick_at(t0 + ms(50));
        let b = clock.tick_at(t0 + ms(10));
        assert!(b.now >= a.now);
        assert_eq!(b.delta, FrameClock::DEFAULT_DT_MIN.as_secs_f64());
    }
}
