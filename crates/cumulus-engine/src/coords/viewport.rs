use winit::dpi::PhysicalSize;

/// Drawable size in physical pixels.
///
/// Sprite sizes are specified in pixels, so renderers need the physical
/// extent to convert them to clip-space offsets.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    /// Size of a texture, e.g. the acquired surface texture.
    #[inline]
    pub fn from_extent(extent: wgpu::Extent3d) -> Self {
        Self::new(extent.width as f32, extent.height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Extent as whole pixels, at least 1x1.
    #[inline]
    pub fn extent(self) -> (u32, u32) {
        ((self.width as u32).max(1), (self.height as u32).max(1))
    }
}
