use std::time::Instant;

use winit::event::WindowEvent;
use winit::window::WindowId;

use sprig_engine::coords::Vec2;
use sprig_engine::core::{App, AppControl, FrameCtx};
use sprig_engine::input::{Key, MouseButton};
use sprig_engine::window::RuntimeCtx;

use crate::studio::Studio;

/// Zoom factor per wheel line.
const ZOOM_STEP: f64 = 1.1;

/// Windowed front end: input handling plus one scene tick per granted redraw.
pub struct StudioApp {
    studio: Studio,
    started: bool,
}

impl StudioApp {
    pub fn new(studio: Studio) -> Self {
        Self {
            studio,
            started: false,
        }
    }

    fn handle_input(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let keys: Vec<Key> = ctx.input_frame.keys_pressed.iter().copied().collect();
        for key in keys {
            match key {
                Key::Escape => return AppControl::Exit,
                Key::R => self.studio.reload(),
                other => {
                    self.studio.controls.handle_key(other);
                }
            }
        }

        let camera = self.studio.scene.camera_mut();
        if ctx.input.button_down(MouseButton::Left) {
            let (dx, dy) = ctx.input_frame.pointer_delta;
            if dx != 0.0 || dy != 0.0 {
                camera.pan_by_screen(Vec2::new(dx as f64, dy as f64));
            }
        }
        let lines = ctx.input_frame.wheel_lines;
        if lines != 0.0 {
            camera.zoom_by(ZOOM_STEP.powf(lines as f64));
        }

        AppControl::Continue
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::Resized(size) = event {
            if size.width > 0 && size.height > 0 {
                self.studio.scene.surface_mut().resize(size.width, size.height);
                self.studio.scene.camera_mut().viewport_size =
                    Vec2::new(size.width as f64, size.height as f64);
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.started {
            self.studio.scene.start(ctx.runtime);
            self.started = true;
        }

        if self.handle_input(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        if self.studio.apply_controls() {
            ctx.window.set_title(&format!("sprig  ·  {}", self.studio.controls.describe()));
        }

        if ctx.tick.is_some() {
            self.studio.scene.on_tick(ctx.runtime, Instant::now());
        } else {
            // Platform redraw (resize, expose): refresh without advancing time.
            self.studio.scene.draw();
        }

        ctx.present(self.studio.scene.surface())
    }

    fn on_exit(&mut self, runtime: &mut RuntimeCtx) {
        self.studio.scene.teardown(runtime);
    }
}
