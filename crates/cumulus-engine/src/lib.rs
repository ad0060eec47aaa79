//! Cumulus engine crate.
//!
//! Platform + GPU runtime, plus the point cloud, sprite and scene pieces the
//! viewer binary wires together.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod config;
pub mod coords;
pub mod render;
pub mod paint;

pub mod cloud;
pub mod sprite;
pub mod scene;
