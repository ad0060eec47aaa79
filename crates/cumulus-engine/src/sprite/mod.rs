//! Point-sprite marker model.
//!
//! CPU reference for what `render::sprites` draws on the GPU:
//! - `Shape`: signed distance functions for the marker outline
//! - `StrokeStyle`: stroke width, AA band and the distance-to-color shading rule
//!
//! The WGSL shader is a line-for-line port of these functions; keep both in sync.

mod shape;
mod stroke;

pub use shape::{Shape, ShapeParseError};
pub use stroke::{Fragment, StrokeStyle};
