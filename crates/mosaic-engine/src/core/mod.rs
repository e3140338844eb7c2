//! Contract between the runtime (platform loop) and applications.

mod app;
mod ctx;

pub(crate) use ctx::logical_size;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
