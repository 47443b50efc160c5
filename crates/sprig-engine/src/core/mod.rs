//! Contract between the windowed runtime and an application.
//!
//! The runtime owns the platform loop; apps receive one `FrameCtx` per
//! redraw and hand back a `Canvas` to show.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
