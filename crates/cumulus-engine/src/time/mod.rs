//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! - `FrameClock`: one per window, `tick()` once per presented frame
//! - `Ticker`: start/stop periodic timer polled by the app, scheduled by the runtime

mod frame_clock;
mod ticker;

pub use frame_clock::{FrameClock, FrameTime};
pub use ticker::Ticker;
