//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, depth target)
//! and creates them lazily on first use, recreating them when the surface
//! format or size changes.
//!
//! Convention:
//! - world geometry is transformed by model/view/projection uniforms
//! - screen-space sizes are in physical pixels

mod ctx;
mod depth;
mod sprites;

pub use ctx::{RenderCtx, RenderTarget};
pub use depth::DepthTarget;
pub use sprites::SpriteRenderer;
