//! Random point cloud generation.
//!
//! Produces the CPU-side attribute arrays uploaded once by the sprite renderer:
//! Gaussian positions, a shared outline color, per-point pale background colors
//! and uniformly distributed marker sizes.

mod points;

pub use points::{CloudParams, PointAttributes, PointCloud};
