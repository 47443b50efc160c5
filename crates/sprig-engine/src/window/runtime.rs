use std::collections::HashMap;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::render::CanvasPresenter;
use crate::tick::{TickHandle, TickSource};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial drawable size in physical pixels.
    pub initial_size: PhysicalSize<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "sprig".to_string(),
            initial_size: PhysicalSize::new(900, 600),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
/// As a `TickSource`, a requested tick becomes a redraw of the window the
/// context was created for.
pub struct RuntimeCtx {
    window: Option<WindowId>,
    next_tick: u64,
    commands: Vec<Command>,
}

impl RuntimeCtx {
    fn new(window: Option<WindowId>, next_tick: u64) -> Self {
        Self {
            window,
            next_tick,
            commands: Vec::new(),
        }
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

impl TickSource for RuntimeCtx {
    fn request_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_tick);
        self.next_tick += 1;
        match self.window {
            Some(window) => self.commands.push(Command::RequestTick { window, handle }),
            None => log::warn!("tick {handle:?} requested outside a window callback; it will not fire"),
        }
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        let before = self.commands.len();
        self.commands
            .retain(|c| !matches!(c, Command::RequestTick { handle: h, .. } if *h == handle));
        if self.commands.len() == before {
            self.commands.push(Command::CancelTick(handle));
        }
    }
}

enum Command {
    RequestTick { window: WindowId, handle: TickHandle },
    CancelTick(TickHandle),
    Exit,
}

/// Entry point for the windowed runtime.
///
/// `run` fails without calling the app when the initial window or its GPU
/// surface cannot be created.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(initial, gpu_init, app);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    presenter: CanvasPresenter,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    /// At most one granted-but-unfired tick per window.
    pending_ticks: HashMap<WindowId, TickHandle>,
    next_tick: u64,
    exit_requested: bool,
    /// Failure creating the initial window; returned from `Runtime::run`.
    startup_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            pending_ticks: HashMap::new(),
            next_tick: 0,
            exit_requested: false,
            startup_error: None,
        }
    }

    fn runtime_ctx(&self, window: Option<WindowId>) -> RuntimeCtx {
        RuntimeCtx::new(window, self.next_tick)
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            presenter: CanvasPresenter::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        entry.with_window(|w| w.request_redraw());
        self.windows.insert(id, entry);
        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        self.pending_ticks.remove(&id);
        self.windows.remove(&id);
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        self.next_tick = self.next_tick.max(ctx.next_tick);

        for cmd in ctx.commands {
            match cmd {
                Command::RequestTick { window, handle } => {
                    let Some(entry) = self.windows.get(&window) else {
                        log::debug!("tick {handle:?} for closed window dropped");
                        continue;
                    };
                    if let Some(prev) = self.pending_ticks.insert(window, handle) {
                        log::warn!("tick {prev:?} superseded by {handle:?}");
                    }
                    entry.with_window(|w| w.request_redraw());
                }
                Command::CancelTick(handle) => self.pending_ticks.retain(|_, h| *h != handle),
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.windows.is_empty() {
            self.exit_requested = true;
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let tick = self.pending_ticks.remove(&window_id);
        let mut runtime_ctx = self.runtime_ctx(Some(window_id));
        let mut app_control = AppControl::Continue;

        // Split borrows to avoid capturing `self` inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);

        if let Some(entry) = windows.get_mut(&window_id) {
            entry.with_mut(|fields| {
                {
                    let mut ctx = FrameCtx {
                        window: WindowCtx {
                            id: window_id,
                            window: fields.window,
                        },
                        gpu: fields.gpu,
                        presenter: fields.presenter,
                        input: fields.input_state,
                        input_frame: fields.input_frame,
                        tick,
                        runtime: &mut runtime_ctx,
                    };
                    app_control = app.on_frame(&mut ctx);
                }

                // Deltas are consumed by the frame that saw them.
                fields.input_frame.clear();
            });
        }

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop, self.initial.clone()) {
            self.startup_error = Some(e.context("failed to create initial window"));
            self.exit_requested = true;
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let (app, windows) = (&mut self.app, &mut self.windows);
        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        let mut control = AppControl::Continue;
        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
            control = app.on_window_event(window_id, &event);
        });

        if control == AppControl::Exit {
            let mut ctx = self.runtime_ctx(Some(window_id));
            ctx.exit();
            self.apply_commands(event_loop, ctx);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let mut ctx = self.runtime_ctx(None);
        self.app.on_exit(&mut ctx);
        self.pending_ticks.clear();
        log::debug!("event loop exiting");
    }
}
