//! Point sprite renderer.

mod common;
mod renderer;

pub use renderer::SpriteRenderer;
