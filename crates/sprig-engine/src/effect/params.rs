/// How a pass picks which destination pixels to touch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrivePolicy {
    /// Visit every destination pixel once; touch it with this probability.
    FullScan { probability: f64 },

    /// Touch `rate * delta` random destination pixels per frame.
    Sampled { rate: f64 },
}

impl DrivePolicy {
    /// Switches to the other policy, preserving the expected touches per
    /// second for a buffer of `pixel_count` pixels ticking at `fps`.
    pub fn toggled(self, pixel_count: u64, fps: f64) -> DrivePolicy {
        let per_frame_pixels = pixel_count as f64;
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        match self {
            DrivePolicy::FullScan { probability } => DrivePolicy::Sampled {
                rate: probability * per_frame_pixels * fps,
            },
            DrivePolicy::Sampled { rate } => {
                let p = if per_frame_pixels > 0.0 { rate / (per_frame_pixels * fps) } else { 0.0 };
                DrivePolicy::FullScan { probability: p.clamp(0.0, 1.0) }
            }
        }
    }
}

/// Effect parameters.
///
/// - `blend` (`s`, `[0, 1]`): share of each written channel taken from the
///   sampled source pixel. The rest is uniform noise in `[0, 255)`.
/// - `jitter` (`v`, `[0, 1]`): sample offset as a fraction of the buffer
///   dimension, uniform in `±v/2` per axis.
/// - `policy`: touch probability `p ∈ [0, 1]` or touch rate
///   `n ∈ [0, MAX_RATE]` (pixels per second).
///
/// The setters are the input boundary for interactive controls. Values are
/// clamped into range; non-finite values are ignored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EffectParams {
    blend: f64,
    jitter: f64,
    policy: DrivePolicy,
}

impl EffectParams {
    /// Upper bound on the sampling rate, in touches per second.
    pub const MAX_RATE: f64 = 10_000_000.0;

    pub fn new(blend: f64, jitter: f64, policy: DrivePolicy) -> Self {
        let mut p = Self {
            blend: 1.0,
            jitter: 0.0,
            policy: DrivePolicy::FullScan { probability: 0.0 },
        };
        p.set_blend(blend);
        p.set_jitter(jitter);
        p.set_policy(policy);
        p
    }

    /// Slow fade toward noise with light smearing.
    pub fn dissolve() -> Self {
        Self::new(0.9, 0.02, DrivePolicy::FullScan { probability: 0.05 })
    }

    /// Pure noise speckle.
    pub fn static_noise() -> Self {
        Self::new(0.0, 0.0, DrivePolicy::FullScan { probability: 0.01 })
    }

    /// Noise-free pixel migration.
    pub fn drift() -> Self {
        Self::new(1.0, 0.1, DrivePolicy::Sampled { rate: 20_000.0 })
    }

    pub fn blend(&self) -> f64 {
        self.blend
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn policy(&self) -> DrivePolicy {
        self.policy
    }

    pub fn set_blend(&mut self, s: f64) {
        if let Some(s) = unit(s, "blend") {
            self.blend = s;
        }
    }

    pub fn set_jitter(&mut self, v: f64) {
        if let Some(v) = unit(v, "jitter") {
            self.jitter = v;
        }
    }

    /// Selects the full-scan policy with touch probability `p`.
    pub fn set_probability(&mut self, p: f64) {
        if let Some(p) = unit(p, "probability") {
            self.policy = DrivePolicy::FullScan { probability: p };
        }
    }

    /// Selects the sampling policy with touch rate `n` pixels per second.
    pub fn set_rate(&mut self, n: f64) {
        if !n.is_finite() {
            log::warn!("ignoring non-finite rate {n}");
            return;
        }
        self.policy = DrivePolicy::Sampled { rate: n.clamp(0.0, Self::MAX_RATE) };
    }

    pub fn set_policy(&mut self, policy: DrivePolicy) {
        match policy {
            DrivePolicy::FullScan { probability } => self.set_probability(probability),
            DrivePolicy::Sampled { rate } => self.set_rate(rate),
        }
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::dissolve()
    }
}

fn unit(value: f64, name: &str) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(0.0, 1.0))
    } else {
        log::warn!("ignoring non-finite {name} {value}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp_into_range() {
        let mut p = EffectParams::dissolve();
        p.set_blend(1.7);
        p.set_jitter(-0.3);
        assert_eq!(p.blend(), 1.0);
        assert_eq!(p.jitter(), 0.0);

        p.set_probability(2.0);
        assert_eq!(p.policy(), DrivePolicy::FullScan { probability: 1.0 });

        p.set_rate(-5.0);
        assert_eq!(p.policy(), DrivePolicy::Sampled { rate: 0.0 });
    }

    #[test]
    fn rate_is_capped() {
        let mut p = EffectParams::drift();
        p.set_rate(1e12);
        assert_eq!(p.policy(), DrivePolicy::Sampled { rate: EffectParams::MAX_RATE });

        let huge = DrivePolicy::FullScan { probability: 1.0 }.toggled(1 << 30, 60.0);
        let p = EffectParams::new(1.0, 0.0, huge);
        assert_eq!(p.policy(), DrivePolicy::Sampled { rate: EffectParams::MAX_RATE });
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let mut p = EffectParams::dissolve();
        p.set_blend(f64::NAN);
        p.set_jitter(f64::INFINITY);
        p.set_rate(f64::NAN);
        assert_eq!(p, EffectParams::dissolve());
    }

    #[test]
    fn presets() {
        let d = EffectParams::dissolve();
        assert_eq!((d.blend(), d.jitter()), (0.9, 0.02));
        assert_eq!(d.policy(), DrivePolicy::FullScan { probability: 0.05 });

        let s = EffectParams::static_noise();
        assert_eq!(s.blend(), 0.0);
        assert_eq!(s.policy(), DrivePolicy::FullScan { probability: 0.01 });

        let f = EffectParams::drift();
        assert_eq!(f.blend(), 1.0);
        assert_eq!(f.policy(), DrivePolicy::Sampled { rate: 20_000.0 });
    }

    #[test]
    fn toggle_preserves_touch_rate() {
        let full = DrivePolicy::FullScan { probability: 0.05 };
        let sampled = full.toggled(10_000, 60.0);
        assert_eq!(sampled, DrivePolicy::Sampled { rate: 30_000.0 });
        assert_eq!(sampled.toggled(10_000, 60.0), full);
    }

    #[test]
    fn toggle_to_full_scan_saturates() {
        let sampled = DrivePolicy::Sampled { rate: 1e9 };
        assert_eq!(sampled.toggled(100, 60.0), DrivePolicy::FullScan { probability: 1.0 });
    }
}
