use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, HarnessCtx};
use crate::device::{Gpu, GpuInit};
use crate::fatal::{self, PlatformError, check};
use crate::input::{InputState, translate_window_event};
use crate::present::paint_needed;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Client area size in physical pixels.
    pub initial_size: PhysicalSize<u32>,
    /// Outer window position; `None` lets the platform choose.
    pub position: Option<PhysicalPosition<i32>>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Tiled Texture Test".to_string(),
            initial_size: PhysicalSize::new(600, 600),
            position: Some(PhysicalPosition::new(100, 100)),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window is closed.
    ///
    /// Errors raised by `app` callbacks terminate the process through
    /// [`fatal::fail`]; the returned error covers the event loop itself.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().map_err(|e| PlatformError {
            what: "event loop",
            message: e.to_string(),
        })?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .map_err(|e| PlatformError {
                what: "event loop",
                message: e.to_string(),
            })
            .context("winit event loop terminated with error")?;

        check(state.exit_requested, "event loop exited without a close request")?;
        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    /// Set when the contents changed since the last paint.
    invalid: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);
        if let Some(position) = self.config.position {
            attrs = attrs.with_position(position);
        }

        let window = event_loop.create_window(attrs).map_err(|e| PlatformError {
            what: "create window",
            message: e.to_string(),
        })?;
        log::info!(
            "window '{}' created ({}x{})",
            self.config.title,
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            input_state: InputState::default(),
            invalid: true,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        self.window = None;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut entry = self
            .create_window_entry(event_loop)
            .unwrap_or_else(|e| fatal::fail(e));

        let app = &mut self.app;
        entry
            .with_mut(|fields| {
                let mut ctx = HarnessCtx {
                    window: fields.window,
                    gpu: fields.gpu,
                };
                app.on_start(&mut ctx)
            })
            .context("harness startup failed")
            .unwrap_or_else(|e| fatal::fail(e));

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Paints are driven by invalidation only.
        event_loop.set_control_flow(ControlFlow::Wait);
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

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);

        let Some(entry) = window.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        let control = entry.with_mut(|fields| -> Result<AppControl> {
            let mut ctx = HarnessCtx {
                window: fields.window,
                gpu: fields.gpu,
            };

            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                if let Some(button) = fields.input_state.apply_event(ev) {
                    log::debug!("{:?} {:?} at ({}, {})", button.button, button.state, button.x, button.y);
                    let control = app
                        .on_pointer_button(&mut ctx, button)
                        .context("pointer input handling failed")?;
                    if control == AppControl::Invalidate {
                        *fields.invalid = true;
                        ctx.request_redraw();
                    }
                    return Ok(control);
                }
            }

            match &event {
                WindowEvent::Resized(new_size) => {
                    app.on_resize(&mut ctx, *new_size).context("resize failed")?;
                    *fields.invalid = true;
                    ctx.request_redraw();
                }

                WindowEvent::ScaleFactorChanged { .. } => {
                    let new_size = fields.window.inner_size();
                    app.on_resize(&mut ctx, new_size).context("resize failed")?;
                    *fields.invalid = true;
                    ctx.request_redraw();
                }

                WindowEvent::RedrawRequested => {
                    // winit delivers a redraw both for our own requests and
                    // for window-system damage (expose, uncover).
                    let invalid = paint_needed(std::mem::take(fields.invalid), true);
                    app.on_paint(&mut ctx, invalid).context("paint failed")?;
                }

                _ => {}
            }

            Ok(AppControl::Continue)
        });

        let control = control.unwrap_or_else(|e| fatal::fail(e));

        match (&event, control) {
            (WindowEvent::CloseRequested, _) | (_, AppControl::Exit) => {
                log::info!("close requested");
                self.request_exit(event_loop);
            }
            _ => {}
        }
    }
}
