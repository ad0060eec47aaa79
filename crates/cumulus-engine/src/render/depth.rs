use crate::coords::Viewport;

/// Depth attachment sized to the surface.
pub struct DepthTarget {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    extent: (u32, u32),
}

impl DepthTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, viewport: Viewport) -> Self {
        let (width, height) = viewport.extent();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cumulus depth target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("depth target {width}x{height}");

        Self {
            _texture: texture,
            view,
            extent: (width, height),
        }
    }

    /// True if this target no longer matches `viewport`.
    pub fn is_stale(&self, viewport: Viewport) -> bool {
        self.extent != viewport.extent()
    }
}
