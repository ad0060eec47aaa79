mod app;

use std::time::Instant;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use cumulus_engine::cloud::PointCloud;
use cumulus_engine::config::CumulusConfig;
use cumulus_engine::device::GpuInit;
use cumulus_engine::logging::{init_logging, LoggingConfig};
use cumulus_engine::render::SpriteRenderer;
use cumulus_engine::scene::CloudScene;
use cumulus_engine::window::{Runtime, RuntimeConfig};

use crate::app::CloudApp;

fn main() -> Result<()> {
    let config = CumulusConfig::load().context("failed to load configuration")?;
    init_logging(LoggingConfig::with_filter(config.logging.filter.clone()));

    log::info!(
        "cloud: {} points, shape {}, linewidth {}, antialias {}",
        config.cloud.count,
        config.sprite.shape,
        config.sprite.linewidth,
        config.sprite.antialias
    );

    let started = Instant::now();
    let cloud = PointCloud::generate(&config.cloud)?;
    log::info!("generated {} points in {:.2?}", cloud.len(), started.elapsed());

    let mut scene = CloudScene::new(config.camera.clone(), &config.animation);
    scene.start(&config.animation, Instant::now());
    log::info!("press space to toggle rotation, scroll to zoom, escape to quit");

    let renderer = SpriteRenderer::new(config.sprite.shape, config.sprite.stroke());
    let app = CloudApp::new(cloud, scene, renderer);

    let runtime = RuntimeConfig {
        title: config.window.title.clone(),
        initial_size: LogicalSize::new(config.window.width, config.window.height),
    };

    Runtime::run(runtime, GpuInit::default(), app)
}
