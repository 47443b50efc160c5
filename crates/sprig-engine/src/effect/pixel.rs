use rand::Rng;

use crate::pixels::{PixelBuffer, Rgba};
use crate::scene::BufferPair;

use super::{DrivePolicy, EffectParams};

/// Stateful resampling pass.
///
/// The only state besides the parameters is the fractional sample count
/// carried between frames under the sampling policy, so `n * delta` touches
/// are honored on average even when each frame asks for less than one.
#[derive(Debug, Clone)]
pub struct PixelEffect {
    params: EffectParams,
    carry: f64,
}

impl PixelEffect {
    pub fn new(params: EffectParams) -> Self {
        Self { params, carry: 0.0 }
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    pub fn carry(&self) -> f64 {
        self.carry
    }

    /// Resamples `src` into `dst`. Returns the number of touches.
    ///
    /// The buffers may have different sizes: jittered positions are mapped
    /// into source space proportionally.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        src: &PixelBuffer,
        dst: &mut PixelBuffer,
        delta: f64,
        rng: &mut R,
    ) -> usize {
        let (dw, dh) = (dst.width(), dst.height());
        let (sw, sh) = (src.width(), src.height());
        let (blend, jitter) = (self.params.blend(), self.params.jitter());

        self.drive(dw, dh, delta, rng, |x, y, rng| {
            let (sx, sy) = sample_coords(x, y, (dw, dh), (sw, sh), jitter, rng);
            let color = mix(src.pixel_clamped(sx, sy), blend, rng);
            dst.set_pixel(x, y, color);
        })
    }

    /// Resamples a buffer from itself. Touches later in the pass see the
    /// writes of earlier ones.
    pub fn apply_in_place<R: Rng + ?Sized>(
        &mut self,
        buf: &mut PixelBuffer,
        delta: f64,
        rng: &mut R,
    ) -> usize {
        let dims = (buf.width(), buf.height());
        let (blend, jitter) = (self.params.blend(), self.params.jitter());

        self.drive(dims.0, dims.1, delta, rng, |x, y, rng| {
            let (sx, sy) = sample_coords(x, y, dims, dims, jitter, rng);
            let color = mix(buf.pixel_clamped(sx, sy), blend, rng);
            buf.set_pixel(x, y, color);
        })
    }

    /// Applies to the buffers handed out by `Nodes::with_buffers`.
    pub fn apply_pair<R: Rng + ?Sized>(
        &mut self,
        pair: BufferPair<'_>,
        delta: f64,
        rng: &mut R,
    ) -> usize {
        match pair {
            BufferPair::Same(buf) => self.apply_in_place(buf, delta, rng),
            BufferPair::Split { src, dst } => self.apply(src, dst, delta, rng),
        }
    }

    fn drive<R: Rng + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        delta: f64,
        rng: &mut R,
        mut touch: impl FnMut(u32, u32, &mut R),
    ) -> usize {
        match self.params.policy() {
            DrivePolicy::FullScan { probability } => {
                if probability <= 0.0 {
                    return 0;
                }
                let mut touched = 0;
                for y in 0..height {
                    for x in 0..width {
                        if rng.gen_range(0.0..1.0) <= probability {
                            touch(x, y, rng);
                            touched += 1;
                        }
                    }
                }
                touched
            }
            DrivePolicy::Sampled { rate } => {
                let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
                let want = rate * delta + self.carry;
                if !want.is_finite() {
                    self.carry = 0.0;
                    return 0;
                }
                let count = want.floor();
                self.carry = want - count;

                let count = count as usize;
                for _ in 0..count {
                    let x = rng.gen_range(0..width);
                    let y = rng.gen_range(0..height);
                    touch(x, y, rng);
                }
                count
            }
        }
    }
}

impl Default for PixelEffect {
    fn default() -> Self {
        Self::new(EffectParams::default())
    }
}

/// Jittered, clamped source coordinates for destination pixel `(x, y)`.
fn sample_coords<R: Rng + ?Sized>(
    x: u32,
    y: u32,
    (dw, dh): (u32, u32),
    (sw, sh): (u32, u32),
    jitter: f64,
    rng: &mut R,
) -> (i64, i64) {
    let jx = (rng.gen_range(0.0..1.0) - 0.5) * jitter * dw as f64;
    let jy = (rng.gen_range(0.0..1.0) - 0.5) * jitter * dh as f64;

    let sx = ((x as f64 + jx) * sw as f64 / dw as f64).floor();
    let sy = ((y as f64 + jy) * sh as f64 / dh as f64).floor();

    (
        (sx as i64).clamp(0, sw as i64 - 1),
        (sy as i64).clamp(0, sh as i64 - 1),
    )
}

/// `floor(c * s + 255 * r * (1 - s))` per color channel; alpha passes through.
fn mix<R: Rng + ?Sized>(src: Rgba, blend: f64, rng: &mut R) -> Rgba {
    let mut out = src;
    if blend >= 1.0 {
        return out;
    }
    for k in 0..3 {
        let noise = 255.0 * rng.gen_range(0.0..1.0) * (1.0 - blend);
        out.0[k] = (src.0[k] as f64 * blend + noise).floor().clamp(0.0, 255.0) as u8;
    }
    out
}
