use std::time::{Duration, Instant};

/// Fixed-interval timer that can be started and stopped.
///
/// The runtime has no timer thread: callers ask for [`Ticker::next_deadline`]
/// to schedule a wakeup and then [`Ticker::poll`] to learn how many intervals
/// elapsed. After a long stall, at most `max_catch_up` ticks are reported and
/// the schedule restarts from `now` rather than replaying the backlog.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
    max_catch_up: u32,
}

impl Ticker {
    /// Creates a stopped ticker firing every `interval`.
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            next: None,
            max_catch_up: 4,
        }
    }

    /// Creates a stopped ticker firing `hz` times per second.
    pub fn from_hz(hz: f32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / f64::from(hz.max(f32::EPSILON))))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Starts the ticker; the first tick is due one interval after `now`.
    ///
    /// No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Flips between running and stopped. Returns the new running state.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
        self.is_running()
    }

    /// Instant of the next pending tick, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// True if at least one tick is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next.is_some_and(|next| now >= next)
    }

    /// Consumes the ticks due at `now` and returns how many fired.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else { return 0 };

        let mut fired = 0;
        while now >= next {
            fired += 1;
            next += self.interval;
            if fired == self.max_catch_up {
                if now >= next {
                    next = now + self.interval;
                }
                break;
            }
        }

        self.next = Some(next);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(10);

    #[test]
    fn starts_stopped() {
        let t = Ticker::new(STEP);
        assert!(!t.is_running());
        assert_eq!(t.next_deadline(), None);
    }

    #[test]
    fn stopped_ticker_never_fires() {
        let mut t = Ticker::new(STEP);
        let now = Instant::now();
        assert_eq!(t.poll(now + STEP * 10), 0);
        assert!(!t.is_due(now + STEP * 10));
    }

    #[test]
    fn first_tick_after_one_interval() {
        let mut t = Ticker::new(STEP);
        let t0 = Instant::now();
        t.start(t0);
        assert_eq!(t.poll(t0), 0);
        assert!(t.is_due(t0 + STEP));
        assert_eq!(t.poll(t0 + STEP), 1);
        assert_eq!(t.next_deadline(), Some(t0 + STEP * 2));
    }

    #[test]
    fn multiple_intervals_fire_multiple_ticks() {
        let mut t = Ticker::new(STEP);
        let t0 = Instant::now();
        t.start(t0);
        assert_eq!(t.poll(t0 + STEP * 3), 3);
        assert_eq!(t.next_deadline(), Some(t0 + STEP * 4));
    }

    #[test]
    fn long_stall_is_capped_and_rescheduled() {
        let mut t = Ticker::new(STEP);
        let t0 = Instant::now();
        t.start(t0);
        let late = t0 + STEP * 100;
        assert_eq!(t.poll(late), 4);
        assert_eq!(t.next_deadline(), Some(late + STEP));
    }

    #[test]
    fn toggle_flips_state() {
        let mut t = Ticker::new(STEP);
        let now = Instant::now();
        assert!(t.toggle(now));
        assert!(t.is_running());
        assert!(!t.toggle(now));
        assert!(!t.is_running());
    }

    #[test]
    fn start_is_idempotent() {
        let mut t = Ticker::new(STEP);
        let t0 = Instant::now();
        t.start(t0);
        t.start(t0 + STEP * 5);
        assert_eq!(t.next_deadline(), Some(t0 + STEP));
    }

    #[test]
    fn from_hz_interval() {
        let t = Ticker::from_hz(50.0);
        let diff = t.interval().abs_diff(Duration::from_millis(20));
        assert!(diff < Duration::from_micros(1), "interval {:?}", t.interval());
    }
}
