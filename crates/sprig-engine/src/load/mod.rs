//! Asynchronous image loading.
//!
//! Responsibilities:
//! - `ImageLoader`: fetch + decode a resource into a `PixelBuffer`
//! - `FileLoader`: filesystem-backed loader decoding with the `image` crate
//! - `LoadQueue`: runs loads off the frame loop and hands completions back
//!   at tick boundaries, honoring a shared cancellation flag

mod error;
mod file;
mod queue;

pub use error::LoadError;
pub use file::FileLoader;
pub use queue::{LoadCompletion, LoadQueue};

use crate::pixels::PixelBuffer;

/// Fetches and decodes an image resource.
///
/// Called from worker threads; implementations must not touch scene state.
/// No retry is expected: a failed load is reported once.
pub trait ImageLoader: Send + Sync {
    fn load(&self, url: &str) -> Result<PixelBuffer, LoadError>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> Result<PixelBuffer, LoadError> + Send + Sync,
{
    fn load(&self, url: &str) -> Result<PixelBuffer, LoadError> {
        self(url)
    }
}
