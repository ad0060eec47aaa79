//! GPU-side types shared by the sprite pipeline.

use bytemuck::{Pod, Zeroable};

use crate::cloud::PointAttributes;
use crate::coords::Viewport;
use crate::scene::Transforms;
use crate::sprite::StrokeStyle;

/// WGSL for the sprite pipeline; the marker is picked by the `SHAPE` override.
pub(super) const SHADER_SOURCE: &str = include_str!("shaders/point_sprite.wgsl");

// ── uniform ───────────────────────────────────────────────────────────────

/// Mirrors `Uniforms` in `point_sprite.wgsl` (208 bytes).
///
///  offset   0  model       mat4x4
///  offset  64  view        mat4x4
///  offset 128  projection  mat4x4
///  offset 192  viewport    vec2   (physical pixels)
///  offset 200  linewidth   f32
///  offset 204  antialias   f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct SpriteUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub linewidth: f32,
    pub antialias: f32,
}

impl SpriteUniform {
    pub(super) fn new(transforms: &Transforms, viewport: Viewport, stroke: StrokeStyle) -> Self {
        Self {
            model: transforms.model.to_cols_array_2d(),
            view: transforms.view.to_cols_array_2d(),
            projection: transforms.projection.to_cols_array_2d(),
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            linewidth: stroke.linewidth,
            antialias: stroke.antialias,
        }
    }

    pub(super) fn min_binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<Self>() as u64)
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── per-point streams ─────────────────────────────────────────────────────

const POINT_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    1 => Float32x3, // position
    2 => Float32x4, // fg_color
    3 => Float32x4  // bg_color
];

pub(super) fn point_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PointAttributes>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &POINT_ATTRS,
    }
}

const SIZE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![4 => Float32];

pub(super) fn size_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<f32>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &SIZE_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;

    #[test]
    fn uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<SpriteUniform>(), 208);
        assert_eq!(std::mem::size_of::<SpriteUniform>() % 16, 0);
        assert!(SpriteUniform::min_binding_size().is_some());
    }

    #[test]
    fn uniform_clamps_empty_viewport() {
        let u = SpriteUniform::new(
            &Transforms::default(),
            Viewport::new(0.0, 0.0),
            StrokeStyle::default(),
        );
        assert_eq!(u.viewport, [1.0, 1.0]);
        assert_eq!(u.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn instance_strides() {
        assert_eq!(point_layout().array_stride, 44);
        assert_eq!(size_layout().array_stride, 4);
        assert_eq!(QuadVertex::layout().array_stride, 8);
    }

    #[test]
    fn shader_locations_are_distinct() {
        let mut locations: Vec<u32> = QuadVertex::ATTRS
            .iter()
            .chain(POINT_ATTRS.iter())
            .chain(SIZE_ATTRS.iter())
            .map(|a| a.shader_location)
            .collect();
        locations.sort_unstable();
        assert_eq!(locations, vec![0, 1, 2, 3, 4]);
    }
}
