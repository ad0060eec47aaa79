//! Color model shared between configuration, CPU shading and renderers.

pub mod color;

pub use color::Color;
