use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::input::Key;
use crate::time::Ticker;

use super::transforms::{model_matrix, projection_matrix, view_matrix, CameraParams, Transforms};

/// Rotation timer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    /// Timer frequency.
    pub tick_hz: f32,
    /// Degrees added to both rotation angles per tick.
    pub step_degrees: f32,
    /// Start rotating without waiting for the toggle key.
    pub autostart: bool,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            step_degrees: 0.5,
            autostart: false,
        }
    }
}

/// GPU-side state touched since the last [`CloudScene::take_changes`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SceneChanges {
    /// Any of model / view / projection.
    pub transforms: bool,
    /// Displayed marker sizes.
    pub sizes: bool,
}

impl SceneChanges {
    pub fn any(&self) -> bool {
        self.transforms || self.sizes
    }
}

/// Event-driven state of the rotating point cloud.
///
/// Each handler updates only the matrix it owns and records what must be
/// re-uploaded; the caller drains that with [`take_changes`](Self::take_changes)
/// before drawing.
#[derive(Debug, Clone)]
pub struct CloudScene {
    camera: CameraParams,
    step_degrees: f32,

    theta: f32,
    phi: f32,
    translate: f32,

    transforms: Transforms,
    ticker: Ticker,
    pending: SceneChanges,
}

impl CloudScene {
    pub fn new(camera: CameraParams, animation: &AnimationParams) -> Self {
        let translate = camera.distance.max(camera.min_distance);
        Self {
            transforms: Transforms {
                view: view_matrix(translate),
                ..Transforms::default()
            },
            camera,
            step_degrees: animation.step_degrees,
            theta: 0.0,
            phi: 0.0,
            translate,
            ticker: Ticker::from_hz(animation.tick_hz),
            pending: SceneChanges {
                transforms: true,
                sizes: true,
            },
        }
    }

    /// Starts the timer if `animation.autostart` asked for it.
    pub fn start(&mut self, animation: &AnimationParams, now: Instant) {
        if animation.autostart {
            self.ticker.start(now);
        }
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.theta, self.phi)
    }

    pub fn translate(&self) -> f32 {
        self.translate
    }

    pub fn is_rotating(&self) -> bool {
        self.ticker.is_running()
    }

    /// Factor applied to base marker sizes: `reference_distance / translate`.
    pub fn size_scale(&self) -> f32 {
        self.camera.reference_distance / self.translate
    }

    /// Rebuilds the projection for a new drawable size.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.transforms.projection = projection_matrix(&self.camera, width, height);
        self.pending.transforms = true;
        log::debug!("projection rebuilt for {width}x{height}");
    }

    /// Advances both rotation angles by one step and rebuilds the model matrix.
    pub fn on_timer(&mut self) {
        self.theta += self.step_degrees;
        self.phi += self.step_degrees;
        self.transforms.model = model_matrix(self.theta, self.phi);
        self.pending.transforms = true;
    }

    /// Moves the eye by `delta` (wheel lines), never closer than `min_distance`.
    ///
    /// Also rescales marker sizes inversely with the new distance.
    pub fn on_mouse_wheel(&mut self, delta: f32) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        self.translate = (self.translate + delta).max(self.camera.min_distance);
        self.transforms.view = view_matrix(self.translate);
        self.pending.transforms = true;
        self.pending.sizes = true;
    }

    /// Handles a key press. Returns `true` if the key was consumed.
    ///
    /// Space toggles the rotation timer.
    pub fn on_key(&mut self, key: Key, now: Instant) -> bool {
        match key {
            Key::Space => {
                let running = self.ticker.toggle(now);
                log::info!("rotation {}", if running { "started" } else { "paused" });
                true
            }
            _ => false,
        }
    }

    /// Runs every timer tick due at `now`. Returns the number of ticks.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let ticks = self.ticker.poll(now);
        for _ in 0..ticks {
            self.on_timer();
        }
        ticks
    }

    /// True if a frame is needed at `now`: pending changes or a due tick.
    pub fn wants_redraw(&self, now: Instant) -> bool {
        self.pending.any() || self.ticker.is_due(now)
    }

    /// When the runtime should wake up next for the timer.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.ticker.next_deadline()
    }

    /// Returns and clears the set of pending GPU updates.
    pub fn take_changes(&mut self) -> SceneChanges {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Mat4;

    use super::*;

    fn scene() -> CloudScene {
        CloudScene::new(CameraParams::default(), &AnimationParams::default())
    }

    #[test]
    fn initial_state() {
        let s = scene();
        assert_eq!(s.translate(), 5.0);
        assert_eq!(s.angles(), (0.0, 0.0));
        assert_eq!(s.transforms().model, Mat4::IDENTITY);
        assert_eq!(s.transforms().view, view_matrix(5.0));
        assert_eq!(s.size_scale(), 1.0);
        assert!(!s.is_rotating());
    }

    #[test]
    fn first_take_uploads_everything() {
        let mut s = scene();
        assert_eq!(
            s.take_changes(),
            SceneChanges {
                transforms: true,
                sizes: true
            }
        );
        assert!(!s.take_changes().any());
    }

    #[test]
    fn wheel_clamps_to_min_distance() {
        let mut s = scene();
        s.on_mouse_wheel(-10.0);
        assert_eq!(s.translate(), 2.0);
        s.on_mouse_wheel(-1.0);
        assert_eq!(s.translate(), 2.0);
        assert_eq!(s.transforms().view, view_matrix(2.0));
    }

    #[test]
    fn wheel_rescales_sizes_inversely() {
        let mut s = scene();
        s.take_changes();

        s.on_mouse_wheel(5.0);
        assert_eq!(s.translate(), 10.0);
        assert_eq!(s.size_scale(), 0.5);
        assert_eq!(
            s.take_changes(),
            SceneChanges {
                transforms: true,
                sizes: true
            }
        );

        s.on_mouse_wheel(-8.0);
        // base * 5 / 2
        assert_eq!(s.size_scale(), 2.5);
    }

    #[test]
    fn zero_wheel_delta_is_ignored() {
        let mut s = scene();
        s.take_changes();
        s.on_mouse_wheel(0.0);
        assert!(!s.take_changes().any());
    }

    #[test]
    fn timer_advances_both_angles() {
        let mut s = scene();
        s.on_timer();
        s.on_timer();
        assert_eq!(s.angles(), (1.0, 1.0));
        assert_eq!(s.transforms().model, model_matrix(1.0, 1.0));
    }

    #[test]
    fn timer_does_not_touch_view_or_projection() {
        let mut s = scene();
        s.on_resize(800.0, 600.0);
        let before = *s.transforms();
        s.take_changes();

        s.on_timer();
        let after = s.transforms();
        assert_eq!(after.view, before.view);
        assert_eq!(after.projection, before.projection);
        assert_eq!(
            s.take_changes(),
            SceneChanges {
                transforms: true,
                sizes: false
            }
        );
    }

    #[test]
    fn resize_only_touches_projection() {
        let mut s = scene();
        let before = *s.transforms();
        s.on_resize(1024.0, 512.0);
        assert_eq!(s.transforms().model, before.model);
        assert_eq!(s.transforms().view, before.view);
        assert_eq!(
            s.transforms().projection,
            projection_matrix(&CameraParams::default(), 1024.0, 512.0)
        );
    }

    #[test]
    fn space_toggles_rotation() {
        let mut s = scene();
        let t0 = Instant::now();
        assert!(s.on_key(Key::Space, t0));
        assert!(s.is_rotating());
        assert_eq!(s.next_wakeup(), Some(t0 + Ticker::from_hz(60.0).interval()));

        assert!(s.on_key(Key::Space, t0));
        assert!(!s.is_rotating());
        assert_eq!(s.next_wakeup(), None);
    }

    #[test]
    fn other_keys_are_not_consumed() {
        let mut s = scene();
        assert!(!s.on_key(Key::Unknown, Instant::now()));
        assert!(!s.is_rotating());
    }

    #[test]
    fn advance_runs_due_ticks() {
        let mut s = scene();
        let t0 = Instant::now();
        s.on_key(Key::Space, t0);
        s.take_changes();

        let interval = Ticker::from_hz(60.0).interval();
        assert!(!s.wants_redraw(t0));
        assert!(s.wants_redraw(t0 + interval * 2));
        assert_eq!(s.advance(t0 + interval * 2), 2);
        assert_eq!(s.angles(), (1.0, 1.0));
    }

    #[test]
    fn paused_scene_does_not_advance() {
        let mut s = scene();
        assert_eq!(s.advance(Instant::now() + Duration::from_secs(1)), 0);
        assert_eq!(s.angles(), (0.0, 0.0));
    }

    #[test]
    fn autostart_starts_timer() {
        let animation = AnimationParams {
            autostart: true,
            ..AnimationParams::default()
        };
        let mut s = CloudScene::new(CameraParams::default(), &animation);
        s.start(&animation, Instant::now());
        assert!(s.is_rotating());
    }
}
