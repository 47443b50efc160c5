use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{CanvasPresenter, PresentCtx};
use crate::surface::Canvas;
use crate::tick::TickHandle;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Drawable size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-redraw context passed to `App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window borrow carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub presenter: &'a mut CanvasPresenter,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,

    /// The granted tick, when this redraw was requested through `runtime`.
    pub tick: Option<TickHandle>,

    /// Tick source for the next frame; implements `TickSource`.
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Uploads `canvas` and presents it to the window.
    ///
    /// Surface loss is handled here; only an unrecoverable surface error
    /// asks the runtime to exit.
    pub fn present(&mut self, canvas: &Canvas) -> AppControl {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        {
            let mut pctx = PresentCtx::for_frame(self.gpu, &mut frame);
            self.presenter.present(&mut pctx, canvas);
        }

        self.gpu.submit(frame);
        AppControl::Continue
    }
}
