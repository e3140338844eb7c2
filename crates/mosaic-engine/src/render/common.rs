//! GPU-side helpers shared by the batch and text paths.

use bytemuck::{Pod, Zeroable};

use crate::coords::{ScissorRect, Viewport};
use crate::paint::Color;

// ── blend ─────────────────────────────────────────────────────────────────

/// The fragment shader outputs premultiplied color.
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── globals uniform ───────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct GlobalsUniform {
    /// Logical viewport size.
    pub viewport: [f32; 2],
    /// Non-zero when the target is not an sRGB format and the shader must
    /// encode its output itself.
    pub encode_srgb: u32,
    pub _pad: u32, // 16-byte alignment
}

impl GlobalsUniform {
    pub(super) fn new(viewport: Viewport, target: wgpu::TextureFormat) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            encode_srgb: u32::from(!target.is_srgb()),
            _pad: 0,
        }
    }

    pub(super) fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<Self>() as u64)
    }
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical-pixel scissor to physical `set_scissor_rect` arguments.
///
/// `target` is the physical size of the render target. Returns `None` when
/// nothing of `clip` is visible (the draw must be skipped); otherwise
/// `(x, y, w, h)` clamped to the target.
pub(super) fn logical_clip_to_scissor(
    clip: ScissorRect,
    (phys_vw, phys_vh): (u32, u32),
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    if !clip.is_valid() {
        return None;
    }

    let x = ((clip.x * scale).max(0.0) as u32).min(phys_vw);
    let y = ((clip.y * scale).max(0.0) as u32).min(phys_vh);
    let x2 = ((clip.right() * scale).max(0.0).ceil() as u32).min(phys_vw);
    let y2 = ((clip.bottom() * scale).max(0.0).ceil() as u32).min(phys_vh);
    let (w, h) = (x2.saturating_sub(x), y2.saturating_sub(y));

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

// ── color ─────────────────────────────────────────────────────────────────

fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// Clear value for a render target of `format`.
///
/// sRGB targets expect linear values and encode on store; other formats take
/// the sRGB bytes as-is.
pub(super) fn clear_color(c: Color, format: wgpu::TextureFormat) -> wgpu::Color {
    let a = f64::from(c.a) / 255.0;
    if format.is_srgb() {
        wgpu::Color { r: srgb_to_linear(c.r), g: srgb_to_linear(c.g), b: srgb_to_linear(c.b), a }
    } else {
        let [r, g, b, _] = c.to_f32_array();
        wgpu::Color { r: f64::from(r), g: f64::from(g), b: f64::from(b), a }
    }
}
