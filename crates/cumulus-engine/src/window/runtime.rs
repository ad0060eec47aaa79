use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cumulus".to_string(),
            initial_size: LogicalSize::new(1000.0, 1000.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are recorded during the callback and applied once it returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    close: Option<WindowId>,
}

impl RuntimeCtx {
    pub fn close_window(&mut self, id: WindowId) {
        self.close = Some(id);
    }

    fn should_close(&self, id: WindowId) -> bool {
        self.close == Some(id)
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it closes.
    ///
    /// Frames are drawn on demand (see [`CoreApp::wants_redraw`]); between frames
    /// the event loop sleeps until the next input or the app's next wakeup.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            surface: None,
            error: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        match driver.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The window together with the GPU surface that borrows it.
#[self_referencing]
struct Surface {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Surface {
    fn open(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gpu_init: GpuInit,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        SurfaceTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    /// Feeds one window event to the input state. Returns true if it needs a frame.
    fn record_input(&mut self, event: &WindowEvent) -> bool {
        self.with_mut(|fields| {
            let Some(ev) = translate_window_event(fields.window, event) else {
                return false;
            };
            log::trace!("input: {ev:?}");
            fields.input_state.apply_event(fields.input_frame, ev);
            fields.input_frame.needs_frame()
        })
    }

    /// Re-reads the window size and reconfigures the swapchain for it.
    fn sync_size(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        self.with_gpu_mut(|gpu| gpu.resize(size));
        log::debug!("surface resized to {}x{}", size.width, size.height);
    }

    /// Runs one app frame. The input gathered since the last frame is consumed.
    fn draw<A: CoreApp>(&mut self, app: &mut A) -> (AppControl, RuntimeCtx) {
        let mut runtime = RuntimeCtx::default();

        let control = self.with_mut(|fields| {
            let time = fields.clock.tick();
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: fields.window.id(),
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime,
                };
                app.on_frame(&mut ctx)
            };
            fields.input_frame.clear();
            control
        });

        (control, runtime)
    }
}

struct Driver<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<Surface>,
    // First unrecoverable error; returned from `Runtime::run`.
    error: Option<anyhow::Error>,
}

impl<A: CoreApp> Driver<A> {
    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.take().is_some() {
            log::info!("window closed");
        }
        event_loop.exit();
    }

    fn poll_app(&self) {
        let Some(surface) = self.surface.as_ref() else { return };
        if self.app.wants_redraw(Instant::now()) {
            surface.request_redraw();
        }
    }
}

impl<A: CoreApp> ApplicationHandler for Driver<A> {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // A scheduled deadline passed: let the app decide if that means a frame.
        if let StartCause::ResumeTimeReached { .. } = cause {
            self.poll_app();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }

        match Surface::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(surface) => {
                surface.request_redraw();
                self.surface = Some(surface);
            }
            Err(err) => {
                log::error!("failed to open window: {err:#}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_none() {
            return;
        }

        self.poll_app();

        let flow = match self.app.next_wakeup() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(flow);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(surface) = self.surface.as_mut() else { return };
        if surface.id() != window_id {
            return;
        }

        if surface.record_input(&event) {
            surface.request_redraw();
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.shut_down(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.shut_down(event_loop),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                surface.sync_size();
                surface.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let (control, runtime) = surface.draw(&mut self.app);
                if control == AppControl::Exit || runtime.should_close(window_id) {
                    self.shut_down(event_loop);
                }
            }

            _ => {}
        }
    }
}
