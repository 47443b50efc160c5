use sprig_engine::effect::{DrivePolicy, EffectParams, PixelEffect};
use sprig_engine::input::Key;
use sprig_engine::scene::{SpriteId, UpdateCtx, UpdateFn};

const BLEND_STEP: f64 = 0.05;
const JITTER_STEP: f64 = 0.01;

/// Effect configurations selectable from the keyboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Preset {
    Dissolve,
    Static,
    Drift,
    Off,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dissolve" => Some(Preset::Dissolve),
            "static" => Some(Preset::Static),
            "drift" => Some(Preset::Drift),
            "off" => Some(Preset::Off),
            _ => None,
        }
    }

    pub fn params(self) -> Option<EffectParams> {
        match self {
            Preset::Dissolve => Some(EffectParams::dissolve()),
            Preset::Static => Some(EffectParams::static_noise()),
            Preset::Drift => Some(EffectParams::drift()),
            Preset::Off => None,
        }
    }
}

/// The sprites an effect pass reads from and writes into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Targets {
    /// Source for presets that copy between sprites.
    pub source: SpriteId,
    pub dest: SpriteId,
}

/// Keyboard-bound effect parameters.
///
/// Every change marks the controls dirty; the app then installs a freshly
/// built hook, so parameters are never mutated under a running hook.
#[derive(Debug)]
pub struct EffectControls {
    preset: Preset,
    params: Option<EffectParams>,
    targets: Targets,
    /// Pixels in the destination and tick rate, for policy conversion.
    pixel_count: u64,
    fps: f64,
    dirty: bool,
}

impl EffectControls {
    pub fn new(preset: Preset, targets: Targets, fps: f64) -> Self {
        Self {
            preset,
            params: preset.params(),
            targets,
            pixel_count: 0,
            fps,
            dirty: true,
        }
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn params(&self) -> Option<&EffectParams> {
        self.params.as_ref()
    }

    pub fn set_pixel_count(&mut self, pixel_count: u64) {
        self.pixel_count = pixel_count;
    }

    pub fn select(&mut self, preset: Preset) {
        self.preset = preset;
        self.params = preset.params();
        self.dirty = true;
    }

    /// Applies a key press. Returns whether it was bound.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Digit1 => self.select(Preset::Dissolve),
            Key::Digit2 => self.select(Preset::Static),
            Key::Digit3 => self.select(Preset::Drift),
            Key::Digit4 => self.select(Preset::Off),
            Key::P => self.edit(|p, count, fps| p.set_policy(p.policy().toggled(count, fps))),
            Key::ArrowUp => self.edit(|p, _, _| p.set_blend(p.blend() + BLEND_STEP)),
            Key::ArrowDown => self.edit(|p, _, _| p.set_blend(p.blend() - BLEND_STEP)),
            Key::ArrowRight => self.edit(|p, _, _| p.set_jitter(p.jitter() + JITTER_STEP)),
            Key::ArrowLeft => self.edit(|p, _, _| p.set_jitter(p.jitter() - JITTER_STEP)),
            Key::PageUp => self.edit(|p, _, _| scale_density(p, 2.0)),
            Key::PageDown => self.edit(|p, _, _| scale_density(p, 0.5)),
            _ => return false,
        }
        true
    }

    fn edit(&mut self, f: impl FnOnce(&mut EffectParams, u64, f64)) {
        if let Some(params) = self.params.as_mut() {
            f(params, self.pixel_count, self.fps);
            self.dirty = true;
        }
    }

    /// Takes the pending change, if any.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Update hook running the current configuration; `None` when off.
    pub fn build_hook(&self) -> Option<UpdateFn> {
        let params = self.params?;
        let Targets { source, dest } = self.targets;
        // Drift migrates pixels across sprites; the others work in place.
        let source = if self.preset == Preset::Drift { source } else { dest };
        let mut effect = PixelEffect::new(params);

        Some(Box::new(move |ctx: &mut UpdateCtx<'_>| {
            let ready = [source, dest]
                .iter()
                .all(|id| ctx.nodes.sprite(*id).is_some_and(|s| s.is_loaded()));
            if !ready {
                return;
            }
            let delta = ctx.time.delta;
            let rng = &mut *ctx.rng;
            ctx.nodes
                .with_buffers(source, dest, |pair| effect.apply_pair(pair, delta, rng));
        }))
    }

    /// One-line status for the window title.
    pub fn describe(&self) -> String {
        let Some(p) = self.params else {
            return "effect off".to_string();
        };
        let policy = match p.policy() {
            DrivePolicy::FullScan { probability } => format!("p={probability:.4}"),
            DrivePolicy::Sampled { rate } => format!("n={rate:.0}/s"),
        };
        format!(
            "{:?}  s={:.2}  v={:.2}  {policy}",
            self.preset,
            p.blend(),
            p.jitter()
        )
    }
}

fn scale_density(p: &mut EffectParams, factor: f64) {
    match p.policy() {
        DrivePolicy::FullScan { probability } => p.set_probability(probability * factor),
        DrivePolicy::Sampled { rate } => p.set_rate(rate * factor),
    }
}
