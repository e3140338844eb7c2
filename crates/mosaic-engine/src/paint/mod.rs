//! Paint model shared between the batcher and backends.
//!
//! Colors are straight (non-premultiplied) sRGB bytes. Inside a batch they
//! travel as a single packed `u32` per vertex.

pub mod color;

pub use color::{pack_rgba, unpack_rgba, Color};
