//! Point-cloud scene state.
//!
//! Owns the camera transforms and the rotation timer, and reacts to resize,
//! timer, wheel and key events. Holds no GPU resources: renderers read
//! `Transforms` and the size scale after draining `SceneChanges`.

mod controller;
mod transforms;

pub use controller::{AnimationParams, CloudScene, SceneChanges};
pub use transforms::{model_matrix, projection_matrix, view_matrix, CameraParams, Transforms};
