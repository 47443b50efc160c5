//! GPU presentation.
//!
//! Scenes rasterize on the CPU into a `Canvas`; this module uploads the
//! canvas into a texture and draws it over the whole window.

mod ctx;
mod present;

pub use ctx::PresentCtx;
pub use present::CanvasPresenter;
