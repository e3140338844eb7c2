/// Batcher configuration.
///
/// Capacities are reservation hints, not limits: a batch may grow past them,
/// it just reallocates when it does.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Vertices reserved up front.
    pub vertex_capacity: usize,

    /// Indices reserved up front (three per triangle).
    pub index_capacity: usize,

    /// Fan resolution used by `submit_circle` when the caller passes `None`.
    pub circle_segments: u32,

    /// Arc resolution per corner used by `submit_rounded_rect` when the caller passes `None`.
    pub corner_segments: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: 32 * 1024,
            index_capacity: 96 * 1024,
            circle_segments: 32,
            corner_segments: 8,
        }
    }
}
