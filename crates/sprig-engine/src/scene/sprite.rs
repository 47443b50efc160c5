use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Vec2;
use crate::load::LoadError;
use crate::pixels::PixelBuffer;
use crate::surface::RasterSurface;

use super::{Camera, Drawable};

/// Process-unique sprite handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u64);

impl SpriteId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SpriteId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Whether a sprite's image has arrived.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadState {
    Pending,
    Loaded,
}

/// Drawable image node.
///
/// Starts as a 1×1 transparent placeholder in `Pending` state. A successful
/// load swaps in the decoded buffer and flips to `Loaded`; a failed one
/// leaves the sprite pending for good.
#[derive(Debug, Clone)]
pub struct Sprite {
    id: SpriteId,
    pub position: Vec2,
    buffer: PixelBuffer,
    state: LoadState,
}

impl Sprite {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: SpriteId::next(),
            position,
            buffer: PixelBuffer::placeholder(),
            state: LoadState::Pending,
        }
    }

    /// Sprite whose image is already available (procedural content).
    pub fn with_buffer(position: Vec2, buffer: PixelBuffer) -> Self {
        Self {
            id: SpriteId::next(),
            position,
            buffer,
            state: LoadState::Loaded,
        }
    }

    #[inline]
    pub fn id(&self) -> SpriteId {
        self.id
    }

    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    #[inline]
    pub fn load_state(&self) -> LoadState {
        self.state
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// World-space size (one world unit per buffer pixel).
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.buffer.width() as f64, self.buffer.height() as f64)
    }

    /// Swaps in a whole new buffer and returns the old one.
    pub fn replace_buffer(&mut self, buffer: PixelBuffer) -> PixelBuffer {
        std::mem::replace(&mut self.buffer, buffer)
    }

    /// Moves the buffer out, leaving the placeholder until it is put back
    /// with `replace_buffer`.
    pub(crate) fn take_buffer(&mut self) -> PixelBuffer {
        std::mem::take(&mut self.buffer)
    }

    /// Applies a load outcome. Failures are logged and leave state untouched.
    pub(crate) fn finish_load(&mut self, url: &str, result: Result<PixelBuffer, LoadError>) {
        match result {
            Ok(buffer) => {
                log::debug!(
                    "sprite {:?} loaded {url} ({}x{})",
                    self.id,
                    buffer.width(),
                    buffer.height()
                );
                self.buffer = buffer;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                log::warn!("sprite {:?}: {}", self.id, e.report());
            }
        }
    }
}

impl Drawable for Sprite {
    fn draw(&self, camera: &Camera, surface: &mut dyn RasterSurface) {
        let dest = camera.screen_rect(self.position, self.size());
        surface.blit(&self.buffer, dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;

    #[test]
    fn new_sprite_is_pending_placeholder() {
        let s = Sprite::new(Vec2::new(5.0, 6.0));
        assert_eq!(s.load_state(), LoadState::Pending);
        assert_eq!(s.buffer(), &PixelBuffer::placeholder());
        assert_eq!(s.size(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn ids_are_unique() {
        let a = Sprite::new(Vec2::zero());
        let b = Sprite::new(Vec2::zero());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn successful_load_swaps_buffer_and_flips_state() {
        let mut s = Sprite::new(Vec2::zero());
        s.finish_load("x.png", Ok(PixelBuffer::filled(7, 3, Rgba::WHITE)));
        assert!(s.is_loaded());
        assert_eq!(s.size(), Vec2::new(7.0, 3.0));
    }

    #[test]
    fn failed_load_stays_pending() {
        let mut s = Sprite::new(Vec2::zero());
        s.finish_load("x.png", Err(LoadError::NotFound { url: "x.png".into() }));
        assert_eq!(s.load_state(), LoadState::Pending);
        assert_eq!(s.buffer(), &PixelBuffer::placeholder());
    }

    #[test]
    fn take_then_replace_round_trips() {
        let mut s = Sprite::with_buffer(Vec2::zero(), PixelBuffer::filled(2, 2, Rgba::BLACK));
        let buf = s.take_buffer();
        assert_eq!(s.buffer(), &PixelBuffer::placeholder());
        s.replace_buffer(buf);
        assert_eq!(s.size(), Vec2::new(2.0, 2.0));
    }
}
