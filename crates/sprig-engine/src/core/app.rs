use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by hosts such as the studio.
pub trait App {
    /// Raw window events, after input state has been updated.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called for every redraw. `ctx.tick` is set when the redraw answers a
    /// tick requested through `ctx.runtime`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once as the event loop shuts down. Pending tick requests can
    /// still be canceled through `runtime`.
    fn on_exit(&mut self, runtime: &mut RuntimeCtx) {
        let _ = runtime;
    }
}
