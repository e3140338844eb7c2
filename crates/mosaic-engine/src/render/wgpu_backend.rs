use anyhow::Result;

use crate::backend::{Backend, DrawCall, TextRun, TextureId};
use crate::batch::{Geometry, Vertex, MAX_TEXTURE_SLOTS};
use crate::coords::{ScissorRect, Viewport};
use crate::paint::Color;
use crate::text::{FontId, FontLoadError, FontSystem};

use super::arena::{ArenaSpan, FrameArena};
use super::common::{clear_color, logical_clip_to_scissor};
use super::pipeline::BatchPipeline;
use super::text::{GlyphAtlas, ATLAS_SLOT};
use super::textures::{upload_rgba, TextureTable};

const INITIAL_ARENA_VERTICES: u64 = 32 * 1024;
const INITIAL_ARENA_INDICES: u64 = 96 * 1024;

/// Encoder and target of the frame being recorded.
struct FrameTarget {
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// [`Backend`] that renders through wgpu.
///
/// Frames are bracketed by [`begin`](Self::begin) and
/// [`finish`](Self::finish). Each `draw` / `draw_text` in between records one
/// render pass (loading the previous contents) with exactly one
/// `draw_indexed`. Text is laid out with fontdue and drawn from a glyph
/// atlas through the same pipeline.
///
/// Geometry arrives in logical pixels; `scale_factor` maps clips to the
/// physical surface of size `target_size`.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    viewport: Viewport,
    scale_factor: f32,
    target_size: (u32, u32),

    pipeline: BatchPipeline,
    arena: FrameArena,
    textures: TextureTable,
    /// Bound to every slot a draw does not use.
    filler: wgpu::TextureView,

    fonts: FontSystem,
    atlas: GlyphAtlas,
    text_geometry: Geometry,

    frame: Option<FrameTarget>,
    warned_outside_frame: bool,
}

impl WgpuBackend {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        viewport: Viewport,
        scale_factor: f32,
        target_size: (u32, u32),
    ) -> Self {
        let filler = upload_rgba(
            device,
            queue,
            "mosaic filler texture",
            wgpu::TextureFormat::Rgba8UnormSrgb,
            1,
            1,
            &[255; 4],
        )
        .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            device: device.clone(),
            queue: queue.clone(),
            viewport,
            scale_factor,
            target_size,
            pipeline: BatchPipeline::new(device, format),
            arena: FrameArena::new(device, INITIAL_ARENA_VERTICES, INITIAL_ARENA_INDICES),
            textures: TextureTable::new(),
            filler,
            fonts: FontSystem::new(),
            atlas: GlyphAtlas::new(device, queue),
            text_geometry: Geometry::new(),
            frame: None,
            warned_outside_frame: false,
        }
    }

    /// Updates the logical size, DPI scale and physical target size. Takes
    /// effect at the next [`begin`](Self::begin).
    pub fn set_viewport(&mut self, viewport: Viewport, scale_factor: f32, target_size: (u32, u32)) {
        self.viewport = viewport;
        self.scale_factor = scale_factor;
        self.target_size = target_size;
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        self.fonts.load_font(bytes)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Starts recording a frame into `view`, cleared to `clear`.
    pub fn begin(&mut self, view: wgpu::TextureView, clear: Color) {
        if self.frame.is_some() {
            log::warn!("WgpuBackend::begin called twice; discarding the unfinished frame");
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mosaic frame encoder"),
        });
        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mosaic clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(clear, self.pipeline.format())),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.pipeline.write_globals(&self.queue, self.viewport);
        self.arena.reset();
        self.frame = Some(FrameTarget { view, encoder });
    }

    /// Ends the frame, returning its commands for submission.
    pub fn finish(&mut self) -> Option<wgpu::CommandBuffer> {
        self.frame.take().map(|f| f.encoder.finish())
    }

    fn frame_scissor(&mut self, clip: ScissorRect) -> Option<(u32, u32, u32, u32)> {
        if self.frame.is_none() {
            if !self.warned_outside_frame {
                log::warn!("draw outside WgpuBackend::begin/finish ignored");
                self.warned_outside_frame = true;
            }
            return None;
        }
        let scissor = logical_clip_to_scissor(clip, self.target_size, self.scale_factor);
        if scissor.is_none() {
            log::trace!("draw skipped: clip {clip:?} has no visible area");
        }
        scissor
    }

    /// Uploads one draw and records its render pass.
    fn record(
        &mut self,
        vertices: &[Vertex],
        indices: &[u32],
        textures: &wgpu::BindGroup,
        scissor: (u32, u32, u32, u32),
    ) {
        let span = self.arena.upload(&self.device, &self.queue, vertices, indices);
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        encode_pass(frame, &self.pipeline, &self.arena, textures, span, scissor);
    }
}

fn encode_pass(
    frame: &mut FrameTarget,
    pipeline: &BatchPipeline,
    arena: &FrameArena,
    textures: &wgpu::BindGroup,
    span: ArenaSpan,
    (x, y, w, h): (u32, u32, u32, u32),
) {
    let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("mosaic batch pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &frame.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    pipeline.bind(&mut rpass, textures);
    rpass.set_vertex_buffer(0, arena.vertex_buffer().slice(..));
    rpass.set_index_buffer(arena.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
    rpass.set_scissor_rect(x, y, w, h);
    rpass.draw_indexed(span.indices, span.base_vertex, 0..1);
}

impl Backend for WgpuBackend {
    fn framebuffer_size(&self) -> Viewport {
        self.viewport
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId> {
        self.textures.create(&self.device, &self.queue, width, height, rgba)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.textures.destroy(id);
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        if call.indices.is_empty() {
            return;
        }
        let Some(scissor) = self.frame_scissor(call.scissor) else {
            return;
        };

        let mut views = [&self.filler; MAX_TEXTURE_SLOTS];
        for (slot, &id) in call.textures.iter().take(MAX_TEXTURE_SLOTS).enumerate() {
            match self.textures.view(id) {
                Some(view) => views[slot] = view,
                None => log::warn!("draw references unknown {id}; sampling white instead"),
            }
        }
        let bind_group = self.pipeline.textures_bind_group(&self.device, &views);

        self.record(call.vertices, call.indices, &bind_group, scissor);
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        let Some(scissor) = self.frame_scissor(run.clip) else {
            return;
        };
        let Some(font) = self.fonts.get(run.font) else {
            log::warn!("draw_text: unknown font {:?}, skipping", run.font);
            return;
        };

        self.text_geometry.clear();
        let glyphs = self.atlas.append_run(&self.queue, font, run, &mut self.text_geometry);
        if glyphs == 0 {
            return;
        }

        let mut views = [&self.filler; MAX_TEXTURE_SLOTS];
        views[ATLAS_SLOT as usize] = self.atlas.view();
        let bind_group = self.pipeline.textures_bind_group(&self.device, &views);

        let geometry = std::mem::take(&mut self.text_geometry);
        self.record(geometry.vertices(), geometry.indices(), &bind_group, scissor);
        self.text_geometry = geometry;
    }
}
