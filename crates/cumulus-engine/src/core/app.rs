use std::time::Instant;

use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The runtime only draws on demand: after input that needs a frame, after a
/// resize, or whenever [`wants_redraw`](App::wants_redraw) says so. Between
/// frames it sleeps until [`next_wakeup`](App::next_wakeup).
pub trait App {
    /// Called for every raw window event, before the runtime handles it.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// True if the app has work that needs a frame at `now`.
    ///
    /// The default keeps redrawing continuously.
    fn wants_redraw(&self, now: Instant) -> bool {
        let _ = now;
        true
    }

    /// Next instant the app needs to be woken for, if any.
    fn next_wakeup(&self) -> Option<Instant> {
        None
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
