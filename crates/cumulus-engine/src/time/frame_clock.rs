use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Smoothed frame rate, see [`FrameClock::fps`].
    pub fps: f32,
}

/// Per-window frame clock.
///
/// Frames are only drawn on demand, so gaps between ticks can be arbitrarily
/// long. The rate estimate only counts frames that arrive within `dt_max`
/// of each other, with intervals floored at `dt_min`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    fps: f32,
}

impl FrameClock {
    // Weight of the newest sample in the rate estimate.
    const FPS_SMOOTHING: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            last: None,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            fps: 0.0,
        }
    }

    /// Advances the clock using the current time.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => self.dt_min,
        };
        let dt = raw.clamp(self.dt_min, self.dt_max);

        if self.last.is_some() && raw <= self.dt_max {
            let sample = 1.0 / dt.as_secs_f32();
            self.fps = if self.fps == 0.0 {
                sample
            } else {
                self.fps + Self::FPS_SMOOTHING * (sample - self.fps)
            };
        }
        self.last = Some(now);

        let ft = FrameTime {
            now,
            frame_index: self.frame_index,
            fps: self.fps,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Smoothed frame rate over continuously drawn frames; 0 until two close frames.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
