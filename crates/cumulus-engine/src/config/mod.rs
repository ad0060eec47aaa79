//! Application configuration.
//!
//! Sources, lowest to highest priority:
//! 1. built-in defaults
//! 2. a TOML file: `$CUMULUS_CONFIG` if set, else `./cumulus.toml` if present
//! 3. environment variables `CUMULUS_SECTION__KEY` (e.g. `CUMULUS_SPRITE__SHAPE=ring`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use crate::cloud::CloudParams;
use crate::scene::{AnimationParams, CameraParams};
use crate::sprite::{Shape, StrokeStyle};

pub const ENV_PREFIX: &str = "CUMULUS_";
pub const CONFIG_PATH_VAR: &str = "CUMULUS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cumulus.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CumulusConfig {
    pub window: WindowConfig,
    pub cloud: CloudParams,
    pub sprite: SpriteConfig,
    pub camera: CameraParams,
    pub animation: AnimationParams,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: f64,
    /// Initial inner height in logical pixels.
    pub height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cumulus".to_string(),
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// Marker appearance, fixed for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub shape: Shape,
    pub linewidth: f32,
    pub antialias: f32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        let stroke = StrokeStyle::default();
        Self {
            shape: Shape::default(),
            linewidth: stroke.linewidth,
            antialias: stroke.antialias,
        }
    }
}

impl SpriteConfig {
    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle {
            linewidth: self.linewidth,
            antialias: self.antialias,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `env_logger` filter string; `RUST_LOG` applies when unset.
    pub filter: Option<String>,
}

impl CumulusConfig {
    /// Loads from the default locations and validates the result.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(p) => Some(PathBuf::from(p)),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            }
        };
        Self::load_from(path.as_deref())
    }

    /// Loads from an optional TOML file plus environment overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(path) = path {
            ensure!(path.exists(), "config file {} does not exist", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
            .with_context(|| match path {
                Some(p) => format!("invalid configuration (file {})", p.display()),
                None => "invalid configuration".to_string(),
            })
    }

    /// Extracts and validates a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: CumulusConfig = figment.extract().context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.window.width > 0.0 && self.window.height > 0.0,
            "window size must be positive (got {}x{})",
            self.window.width,
            self.window.height
        );

        self.cloud.validate()?;

        ensure!(
            self.sprite.stroke().is_valid(),
            "sprite.linewidth must be >= 0 and sprite.antialias > 0 (got {} / {})",
            self.sprite.linewidth,
            self.sprite.antialias
        );

        let cam = &self.camera;
        ensure!(
            cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0,
            "camera.fov_degrees must be in (0, 180) (got {})",
            cam.fov_degrees
        );
        ensure!(
            0.0 < cam.near && cam.near < cam.far,
            "camera clip planes must satisfy 0 < near < far (got {} / {})",
            cam.near,
            cam.far
        );
        ensure!(
            cam.min_distance > 0.0 && cam.reference_distance > 0.0,
            "camera.min_distance and camera.reference_distance must be positive"
        );

        let anim = &self.animation;
        ensure!(
            anim.tick_hz.is_finite() && anim.tick_hz > 0.0,
            "animation.tick_hz must be positive (got {})",
            anim.tick_hz
        );
        ensure!(anim.step_degrees.is_finite(), "animation.step_degrees must be finite");

        Ok(())
    }
}
