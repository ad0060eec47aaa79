use std::time::Instant;

use cumulus_engine::cloud::PointCloud;
use cumulus_engine::coords::Viewport;
use cumulus_engine::core::{App, AppControl, FrameCtx};
use cumulus_engine::input::{InputFrame, Key};
use cumulus_engine::paint::Color;
use cumulus_engine::render::SpriteRenderer;
use cumulus_engine::scene::CloudScene;

// Frames between rate reports while rotating.
const FPS_LOG_INTERVAL: u64 = 600;

/// What the frame's input asked of the window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum InputOutcome {
    Continue,
    Close,
}

/// Buffer work to do before drawing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Upload {
    Nothing,
    Cloud,
    Sizes,
}

/// Rotating point cloud viewer.
///
/// Input is read from the frame's `InputFrame`: Space toggles rotation, the
/// wheel zooms, Escape closes the window.
pub struct CloudApp {
    cloud: PointCloud,
    scene: CloudScene,
    renderer: SpriteRenderer,
    background: Color,

    viewport: Option<Viewport>,
    uploaded: bool,
}

impl CloudApp {
    pub fn new(cloud: PointCloud, scene: CloudScene, renderer: SpriteRenderer) -> Self {
        Self {
            cloud,
            scene,
            renderer,
            background: Color::WHITE,
            viewport: None,
            uploaded: false,
        }
    }

    /// Feeds one frame of input to the scene. Escape wins over everything else.
    fn apply_input(&mut self, input: &InputFrame, now: Instant) -> InputOutcome {
        if input.keys_pressed.contains(&Key::Escape) {
            return InputOutcome::Close;
        }

        for key in &input.keys_pressed {
            self.scene.on_key(*key, now);
        }

        if input.wheel_lines != 0.0 {
            self.scene.on_mouse_wheel(input.wheel_lines);
            log::debug!(
                "zoom: translate {:.2}, size scale {:.3}",
                self.scene.translate(),
                self.scene.size_scale()
            );
        }

        InputOutcome::Continue
    }

    /// Rebuilds the projection when the drawable size changed.
    ///
    /// Returns false for an empty viewport; nothing is drawn then.
    fn sync_viewport(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            return false;
        }
        if self.viewport != Some(viewport) {
            self.scene.on_resize(viewport.width, viewport.height);
            self.viewport = Some(viewport);
        }
        true
    }

    /// Runs due timer ticks, hands new transforms to the renderer and reports
    /// which point buffers need writing.
    fn prepare(&mut self, now: Instant) -> Upload {
        self.scene.advance(now);

        let changes = self.scene.take_changes();
        if changes.transforms {
            self.renderer.set_transforms(self.scene.transforms());
        }

        if !self.uploaded {
            self.uploaded = true;
            Upload::Cloud
        } else if changes.sizes {
            Upload::Sizes
        } else {
            Upload::Nothing
        }
    }
}

impl App for CloudApp {
    fn wants_redraw(&self, now: Instant) -> bool {
        self.scene.wants_redraw(now)
    }

    fn next_wakeup(&self) -> Option<Instant> {
        self.scene.next_wakeup()
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let now = ctx.time.now;

        if self.apply_input(ctx.input_frame, now) == InputOutcome::Close {
            log::info!("escape pressed; closing");
            ctx.window.request_close(ctx.runtime);
            return AppControl::Continue;
        }

        if !self.sync_viewport(ctx.viewport()) {
            return AppControl::Continue;
        }

        let upload = self.prepare(now);
        {
            let rctx = ctx.render_ctx();
            let scale = self.scene.size_scale();
            match upload {
                Upload::Cloud => self.renderer.upload_cloud(&rctx, &self.cloud, scale),
                Upload::Sizes => self.renderer.update_sizes(&rctx, &self.cloud, scale),
                Upload::Nothing => {}
            }
        }

        if self.scene.is_rotating()
            && ctx.time.frame_index > 0
            && ctx.time.frame_index % FPS_LOG_INTERVAL == 0
        {
            log::debug!("{:.1} fps", ctx.time.fps);
        }

        let renderer = &mut self.renderer;
        let background = self.background;
        ctx.render(|rctx, target| renderer.render(rctx, target, background))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cumulus_engine::cloud::CloudParams;
    use cumulus_engine::scene::{projection_matrix, AnimationParams, CameraParams};
    use cumulus_engine::sprite::{Shape, StrokeStyle};

    use super::*;

    fn app() -> CloudApp {
        let params = CloudParams {
            count: 32,
            seed: Some(7),
            ..CloudParams::default()
        };
        let cloud = PointCloud::generate(&params).unwrap();
        let scene = CloudScene::new(CameraParams::default(), &AnimationParams::default());
        let renderer = SpriteRenderer::new(Shape::Disc, StrokeStyle::default());
        CloudApp::new(cloud, scene, renderer)
    }

    fn pressed(keys: &[Key]) -> InputFrame {
        InputFrame {
            keys_pressed: keys.iter().copied().collect(),
            ..InputFrame::default()
        }
    }

    fn wheel(lines: f32) -> InputFrame {
        InputFrame {
            wheel_lines: lines,
            ..InputFrame::default()
        }
    }

    #[test]
    fn escape_closes_without_touching_the_scene() {
        let mut app = app();
        let out = app.apply_input(&pressed(&[Key::Escape, Key::Space]), Instant::now());
        assert_eq!(out, InputOutcome::Close);
        assert!(!app.scene.is_rotating());
    }

    #[test]
    fn space_toggles_rotation() {
        let mut app = app();
        let t0 = Instant::now();

        assert_eq!(app.apply_input(&pressed(&[Key::Space]), t0), InputOutcome::Continue);
        assert!(app.scene.is_rotating());

        // One tick at 60 Hz later the model matrix has moved.
        app.prepare(t0);
        let later = t0 + Duration::from_millis(20);
        assert!(app.scene.wants_redraw(later));
        app.prepare(later);
        assert_ne!(app.scene.angles(), (0.0, 0.0));

        app.apply_input(&pressed(&[Key::Space]), later);
        assert!(!app.scene.is_rotating());
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut app = app();
        let out = app.apply_input(&pressed(&[Key::Unknown]), Instant::now());
        assert_eq!(out, InputOutcome::Continue);
        assert!(!app.scene.is_rotating());
    }

    #[test]
    fn first_frame_uploads_whole_cloud() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.prepare(now), Upload::Cloud);
        assert_eq!(app.prepare(now), Upload::Nothing);
    }

    #[test]
    fn wheel_zooms_and_rewrites_sizes() {
        let mut app = app();
        let now = Instant::now();
        app.prepare(now);

        app.apply_input(&wheel(5.0), now);
        assert_eq!(app.scene.translate(), 10.0);
        assert_eq!(app.scene.size_scale(), 0.5);
        assert_eq!(app.prepare(now), Upload::Sizes);
        assert_eq!(app.prepare(now), Upload::Nothing);
    }

    #[test]
    fn wheel_cannot_pass_the_near_limit() {
        let mut app = app();
        let now = Instant::now();
        app.prepare(now);

        app.apply_input(&wheel(-100.0), now);
        assert_eq!(app.scene.translate(), 2.0);
        assert_eq!(app.prepare(now), Upload::Sizes);
    }

    #[test]
    fn viewport_change_rebuilds_projection() {
        let mut app = app();
        let camera = CameraParams::default();

        assert!(app.sync_viewport(Viewport::new(800.0, 800.0)));
        assert_eq!(
            app.scene.transforms().projection,
            projection_matrix(&camera, 800.0, 800.0)
        );

        app.prepare(Instant::now());
        assert!(app.sync_viewport(Viewport::new(800.0, 800.0)));
        assert!(!app.scene.take_changes().any());

        assert!(app.sync_viewport(Viewport::new(1600.0, 800.0)));
        assert_eq!(
            app.scene.transforms().projection,
            projection_matrix(&camera, 1600.0, 800.0)
        );
    }

    #[test]
    fn empty_viewport_skips_the_frame() {
        let mut app = app();
        assert!(!app.sync_viewport(Viewport::new(0.0, 0.0)));
        assert_eq!(app.viewport, None);
    }
}
