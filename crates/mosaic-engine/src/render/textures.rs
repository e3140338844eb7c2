use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::backend::{validate_rgba, TextureId};

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Textures created through [`Backend::create_texture`](crate::backend::Backend::create_texture).
///
/// Images are stored as `Rgba8UnormSrgb`, so sampling yields linear color.
pub(super) struct TextureTable {
    next_id: u64,
    entries: HashMap<TextureId, GpuTexture>,
}

impl TextureTable {
    pub(super) fn new() -> Self {
        Self { next_id: 1, entries: HashMap::new() }
    }

    pub(super) fn create(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureId> {
        validate_rgba(width, height, rgba)?;
        let max = device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max && height <= max,
            "texture {width}x{height} exceeds the device limit of {max}"
        );

        let texture = upload_rgba(
            device,
            queue,
            "mosaic texture",
            wgpu::TextureFormat::Rgba8UnormSrgb,
            width,
            height,
            rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let id = TextureId(self.next_id);
        self.next_id = self.next_id.checked_add(1).context("texture ids exhausted")?;
        self.entries.insert(id, GpuTexture { texture, view });

        log::trace!("created {id} ({width}x{height})");
        Ok(id)
    }

    pub(super) fn destroy(&mut self, id: TextureId) {
        match self.entries.remove(&id) {
            Some(t) => {
                t.texture.destroy();
                log::trace!("destroyed {id}");
            }
            None => log::debug!("destroy_texture: unknown {id}"),
        }
    }

    pub(super) fn view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.entries.get(&id).map(|t| &t.view)
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Creates a sampled texture and fills it with `rgba`.
pub(super) fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_region(queue, &texture, 0, 0, width, height, rgba);
    texture
}

/// Writes an RGBA8 region of `texture` at `(x, y)`.
pub(super) fn write_region(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rgba: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
}
