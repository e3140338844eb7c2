use crate::coords::Vec2;

use super::vertex::{Fill, Vertex};

/// Accumulated vertices and indices of the batch being built.
///
/// Indices are absolute into `vertices`; tessellators read [`Geometry::base`]
/// before pushing and offset their local indices by it.
#[derive(Debug, Default)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Index the next pushed vertex will get.
    #[inline]
    pub fn base(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn push_vertex(&mut self, pos: Vec2, uv: [f32; 2], fill: Fill) -> u32 {
        let idx = self.base();
        self.vertices.push(Vertex::new(pos, uv, fill));
        idx
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert!(
            a.max(b).max(c) < self.base(),
            "triangle ({a}, {b}, {c}) references a vertex not yet pushed"
        );
        self.indices.extend_from_slice(&[a, b, c]);
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Drops all geometry. Capacity is kept for the next batch.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn reserve(&mut self, vertices: usize, indices: usize) {
        self.vertices.reserve(vertices);
        self.indices.reserve(indices);
    }

    /// Releases the backing allocations.
    pub fn release(&mut self) {
        self.vertices = Vec::new();
        self.indices = Vec::new();
    }
}
