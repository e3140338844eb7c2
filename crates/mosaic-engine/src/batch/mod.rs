//! The batching renderer.
//!
//! [`Batcher`] accumulates shapes into one vertex/index stream and hands it to
//! a [`Backend`](crate::backend::Backend) as a single draw call whenever the
//! stream can no longer grow: a ninth texture, a scissor change, a text
//! submission, an explicit flush, or the end of the frame.
//!
//! Callers program against [`BatchSurface`], so the same drawing code runs on
//! the wgpu backend, the recording backend, or anything else implementing
//! `Backend`.

mod batcher;
mod config;
mod geometry;
mod phase;
mod slots;
mod state;
mod surface;
mod vertex;

pub mod tessellate;

pub use batcher::Batcher;
pub use config::BatchConfig;
pub use geometry::Geometry;
pub use phase::{Phase, PhaseError};
pub use slots::{TextureSlots, MAX_TEXTURE_SLOTS};
pub use state::BatchMetrics;
pub use surface::BatchSurface;
pub use vertex::{Fill, Vertex};
