use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::coords::Vec2;
use crate::load::{ImageLoader, LoadCompletion, LoadQueue};
use crate::surface::RasterSurface;
use crate::tick::{TickHandle, TickSource};
use crate::time::{FrameClock, FrameTime};

use super::{Camera, Node, Nodes, Sprite, SpriteId};

/// Per-frame update hook.
pub type UpdateFn = Box<dyn FnMut(&mut UpdateCtx<'_>)>;

/// Scene construction failure.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("raster surface unavailable ({width}x{height})")]
    SurfaceUnavailable { width: u32, height: u32 },

    #[error("frame delta clamps inverted (min {min:?} > max {max:?})")]
    InvalidClamps { min: Duration, max: Duration },
}

/// Scene configuration.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Seed for the random source handed to update hooks. `None` seeds from
    /// OS entropy.
    pub seed: Option<u64>,

    /// Frame delta clamps, see `FrameClock`.
    pub dt_min: Duration,
    pub dt_max: Duration,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            dt_min: FrameClock::DEFAULT_DT_MIN,
            dt_max: FrameClock::DEFAULT_DT_MAX,
        }
    }
}

/// What an update hook can touch during a tick.
pub struct UpdateCtx<'a> {
    pub time: FrameTime,
    pub nodes: &'a mut Nodes,
    pub camera: &'a mut Camera,
    pub rng: &'a mut StdRng,
    next_update: &'a mut Option<UpdateFn>,
}

impl UpdateCtx<'_> {
    /// Replaces the running hook starting with the next tick.
    pub fn replace_update(&mut self, f: impl FnMut(&mut UpdateCtx<'_>) + 'static) {
        *self.next_update = Some(Box::new(f));
    }
}

/// Camera-transformed drawing surface holding a tree of drawable nodes.
///
/// Lifecycle: `new` → `start` → host calls `on_tick` for each granted tick →
/// `teardown`. After teardown, ticks and load completions are no-ops.
pub struct Scene<S: RasterSurface> {
    surface: S,
    camera: Camera,
    nodes: Nodes,
    update: Option<UpdateFn>,
    next_update: Option<UpdateFn>,
    rng: StdRng,
    config: SceneConfig,
    clock: Option<FrameClock>,
    loads: LoadQueue,
    outstanding: Option<TickHandle>,
    torn_down: bool,
}

impl<S: RasterSurface> Scene<S> {
    /// Builds a scene over `surface`. Fails before anything is scheduled when
    /// the surface is unavailable.
    pub fn new(
        surface: S,
        loader: Arc<dyn ImageLoader>,
        config: SceneConfig,
    ) -> Result<Self, SceneError> {
        let (width, height) = surface.size();
        if !surface.is_available() {
            return Err(SceneError::SurfaceUnavailable { width, height });
        }
        if config.dt_min > config.dt_max {
            return Err(SceneError::InvalidClamps { min: config.dt_min, max: config.dt_max });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!("scene created on {width}x{height} surface");

        Ok(Self {
            surface,
            camera: Camera::centered(Vec2::new(width as f64, height as f64)),
            nodes: Nodes::new(),
            update: None,
            next_update: None,
            rng,
            config,
            clock: None,
            loads: LoadQueue::new(loader),
            outstanding: None,
            torn_down: false,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn nodes(&self) -> &Nodes {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Nodes {
        &mut self.nodes
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.nodes.sprite(id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.nodes.sprite_mut(id)
    }

    pub fn is_running(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Loads still running on worker threads.
    pub fn loads_in_flight(&self) -> usize {
        self.loads.in_flight()
    }

    // ── tree ──────────────────────────────────────────────────────────────

    /// Appends a node; it draws on top of everything added before it.
    pub fn add(&mut self, node: impl Into<Node>) {
        self.nodes.push(node);
    }

    /// Adds a pending sprite at `position` and starts loading `url` into it.
    pub fn spawn_sprite(&mut self, url: &str, position: Vec2) -> SpriteId {
        let sprite = Sprite::new(position);
        let id = sprite.id();
        self.nodes.push(sprite);
        self.loads.request(id, url);
        id
    }

    /// Issues another load for an existing sprite. When several loads for
    /// one sprite overlap, the last completion to arrive wins.
    pub fn reload(&mut self, id: SpriteId, url: &str) {
        if self.nodes.sprite(id).is_none() {
            log::warn!("reload of {url}: no sprite {id:?} in scene");
            return;
        }
        self.loads.request(id, url);
    }

    pub fn remove_sprite(&mut self, id: SpriteId) -> Option<Sprite> {
        self.nodes.remove_sprite(id)
    }

    // ── update hook ───────────────────────────────────────────────────────

    /// Installs the per-frame update hook, replacing any previous one.
    ///
    /// Takes effect from the next tick.
    pub fn set_update(&mut self, f: impl FnMut(&mut UpdateCtx<'_>) + 'static) {
        self.next_update = None;
        self.update = Some(Box::new(f));
    }

    pub fn clear_update(&mut self) {
        self.next_update = None;
        self.update = None;
    }

    // ── loads ─────────────────────────────────────────────────────────────

    /// Applies load completions that have arrived. Returns how many were
    /// applied to a sprite.
    pub fn poll_loads(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        let done = self.loads.drain();
        self.apply_completions(done)
    }

    /// Waits up to `timeout` for in-flight loads, then applies them.
    pub fn settle_loads(&mut self, timeout: Duration) -> usize {
        if self.torn_down {
            return 0;
        }
        let done = self.loads.settle(timeout);
        self.apply_completions(done)
    }

    fn apply_completions(&mut self, done: Vec<LoadCompletion>) -> usize {
        let mut applied = 0;
        for c in done {
            // Checked per completion: the flag is shared with the workers.
            if self.torn_down || self.loads.is_canceled() {
                break;
            }
            match self.nodes.sprite_mut(c.sprite) {
                Some(sprite) => {
                    sprite.finish_load(&c.url, c.result);
                    applied += 1;
                }
                None => log::debug!("load of {} finished for removed sprite {:?}", c.url, c.sprite),
            }
        }
        applied
    }

    // ── frame loop ────────────────────────────────────────────────────────

    /// Requests the first tick. No-op while a tick is outstanding or after
    /// teardown.
    pub fn start(&mut self, ticks: &mut dyn TickSource) {
        self.start_at(ticks, Instant::now());
    }

    /// Like `start`, with the host timestamp used as the clock origin.
    pub fn start_at(&mut self, ticks: &mut dyn TickSource, at: Instant) {
        if self.torn_down {
            log::debug!("start ignored: scene torn down");
            return;
        }
        if self.outstanding.is_some() {
            return;
        }
        if self.clock.is_none() {
            self.clock = Some(FrameClock::with_clamps(at, self.config.dt_min, self.config.dt_max));
        }
        self.outstanding = Some(ticks.request_tick());
    }

    /// Runs one frame for a granted tick, then requests the next one.
    ///
    /// Returns `false` (and does nothing) when no tick was outstanding, which
    /// covers stray host callbacks and ticks arriving after teardown.
    pub fn on_tick(&mut self, ticks: &mut dyn TickSource, at: Instant) -> bool {
        if self.torn_down || self.outstanding.take().is_none() {
            return false;
        }

        if let Some(next) = self.next_update.take() {
            self.update = Some(next);
        }

        self.poll_loads();

        let (dt_min, dt_max) = (self.config.dt_min, self.config.dt_max);
        let time = self
            .clock
            .get_or_insert_with(|| FrameClock::with_clamps(at, dt_min, dt_max))
            .tick_at(at);

        self.run_update(time);
        self.draw();

        self.outstanding = Some(ticks.request_tick());
        true
    }

    fn run_update(&mut self, time: FrameTime) {
        let Some(update) = self.update.as_mut() else { return };
        let mut ctx = UpdateCtx {
            time,
            nodes: &mut self.nodes,
            camera: &mut self.camera,
            rng: &mut self.rng,
            next_update: &mut self.next_update,
        };
        update(&mut ctx);
    }

    /// Clears the surface and draws every node in insertion order.
    pub fn draw(&mut self) {
        self.surface.clear();
        self.nodes.draw(&self.camera, &mut self.surface);
    }

    /// Stops the loop and fences off late load completions. Idempotent.
    pub fn teardown(&mut self, ticks: &mut dyn TickSource) {
        if let Some(handle) = self.outstanding.take() {
            ticks.cancel_tick(handle);
        }
        if !self.torn_down {
            log::debug!("scene teardown ({} load(s) in flight)", self.loads.in_flight());
        }
        self.torn_down = true;
        self.loads.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::LoadError;
    use crate::pixels::{PixelBuffer, Rgba};
    use crate::surface::Canvas;
    use crate::tick::ManualTicks;

    fn solid_loader() -> Arc<dyn ImageLoader> {
        Arc::new(|url: &str| -> Result<PixelBuffer, LoadError> {
            match url {
                "red" => Ok(PixelBuffer::filled(4, 4, Rgba::opaque(255, 0, 0))),
                "blue" => Ok(PixelBuffer::filled(4, 4, Rgba::opaque(0, 0, 255))),
                _ => Err(LoadError::NotFound { url: url.to_string() }),
            }
        })
    }

    fn scene(w: u32, h: u32) -> Scene<Canvas> {
        let config = SceneConfig { seed: Some(7), ..SceneConfig::default() };
        Scene::new(Canvas::new(w, h), solid_loader(), config).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn zero_sized_surface_is_rejected() {
        let err = Scene::new(Canvas::new(0, 10), solid_loader(), SceneConfig::default());
        assert!(matches!(err, Err(SceneError::SurfaceUnavailable { width: 0, height: 10 })));
    }

    #[test]
    fn inverted_delta_clamps_are_rejected() {
        let config = SceneConfig {
            dt_min: Duration::from_millis(50),
            dt_max: Duration::from_millis(10),
            ..SceneConfig::default()
        };
        let err = Scene::new(Canvas::new(4, 4), solid_loader(), config);
        assert!(matches!(err, Err(SceneError::InvalidClamps { .. })));
    }

    #[test]
    fn camera_starts_centered_on_surface() {
        let s = scene(900, 600);
        assert_eq!(s.camera().position, Vec2::new(450.0, 300.0));
        assert_eq!(s.camera().zoom, 1.0);
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn start_requests_exactly_one_tick() {
        let mut s = scene(8, 8);
        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        s.start(&mut ticks);
        s.start(&mut ticks);
        assert_eq!(ticks.requested(), 1);
        assert!(s.is_running());
    }

    #[test]
    fn each_tick_requests_the_next() {
        let mut s = scene(8, 8);
        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        s.start(&mut ticks);
        for _ in 0..5 {
            let at = ticks.fire().unwrap();
            assert!(s.on_tick(&mut ticks, at));
        }
        assert_eq!(ticks.requested(), 6);
    }

    #[test]
    fn stray_tick_is_ignored() {
        let mut s = scene(8, 8);
        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        assert!(!s.on_tick(&mut ticks, Instant::now()));
        assert_eq!(ticks.requested(), 0);
    }

    #[test]
    fn update_hook_sees_increasing_frames() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);

        let mut s = scene(8, 8);
        s.set_update(move |ctx| log.borrow_mut().push(ctx.time.frame_index));

        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        s.start(&mut ticks);
        for _ in 0..3 {
            let at = ticks.fire().unwrap();
            s.on_tick(&mut ticks, at);
        }
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn replace_update_takes_effect_next_tick() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let calls = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&calls);
        let second = Rc::clone(&calls);

        let mut s = scene(8, 8);
        s.set_update(move |ctx| {
            first.borrow_mut().push("a");
            let second = Rc::clone(&second);
            ctx.replace_update(move |_| second.borrow_mut().push("b"));
        });

        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        s.start(&mut ticks);
        for _ in 0..3 {
            let at = ticks.fire().unwrap();
            s.on_tick(&mut ticks, at);
        }
        assert_eq!(*calls.borrow(), vec!["a", "b", "b"]);
    }

    // ── loads ─────────────────────────────────────────────────────────────

    #[test]
    fn spawned_sprite_loads_and_draws() {
        let mut s = scene(8, 8);
        // Top-left of world maps to screen origin when the camera is centered.
        let id = s.spawn_sprite("red", Vec2::zero());
        assert!(!s.sprite(id).unwrap().is_loaded());

        assert_eq!(s.settle_loads(Duration::from_secs(5)), 1);
        assert!(s.sprite(id).unwrap().is_loaded());
        assert_eq!(s.loads_in_flight(), 0);

        s.draw();
        assert_eq!(s.surface().pixel(0, 0), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(s.surface().pixel(5, 5), Some(s.surface().clear_color()));
    }

    #[test]
    fn failed_load_keeps_placeholder() {
        let mut s = scene(8, 8);
        let id = s.spawn_sprite("missing", Vec2::zero());
        s.settle_loads(Duration::from_secs(5));
        let sprite = s.sprite(id).unwrap();
        assert!(!sprite.is_loaded());
        assert_eq!(sprite.size(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn reload_swaps_buffer() {
        let mut s = scene(8, 8);
        let id = s.spawn_sprite("red", Vec2::zero());
        s.settle_loads(Duration::from_secs(5));
        s.reload(id, "blue");
        s.settle_loads(Duration::from_secs(5));
        assert_eq!(s.sprite(id).unwrap().buffer().pixel(0, 0), Some(Rgba::opaque(0, 0, 255)));
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn teardown_cancels_tick_and_is_idempotent() {
        let mut s = scene(8, 8);
        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        s.start(&mut ticks);
        s.teardown(&mut ticks);
        s.teardown(&mut ticks);

        assert!(ticks.pending().is_none());
        assert_eq!(ticks.canceled(), 1);
        assert!(!s.is_running());
        assert!(s.is_torn_down());

        s.start(&mut ticks);
        assert_eq!(ticks.requested(), 1);
        assert!(!s.on_tick(&mut ticks, Instant::now()));
    }

    #[test]
    fn loads_after_teardown_are_dropped() {
        let mut s = scene(8, 8);
        let id = s.spawn_sprite("red", Vec2::zero());
        let mut ticks = ManualTicks::at_fps(Instant::now(), 60.0);
        s.teardown(&mut ticks);
        assert_eq!(s.settle_loads(Duration::from_millis(200)), 0);
        assert!(!s.sprite(id).unwrap().is_loaded());
    }
}
