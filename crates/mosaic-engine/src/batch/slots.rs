use crate::backend::TextureId;

/// Number of textures one draw call can address.
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// Texture-id → slot map for the batch being built.
///
/// Slots are handed out in first-use order, so `as_slice()[slot]` is the
/// texture a vertex with `tex_index == slot` samples. Lookups are a linear
/// scan over at most eight entries.
#[derive(Debug, Clone, Default)]
pub struct TextureSlots {
    bound: Vec<TextureId>,
}

impl TextureSlots {
    pub fn new() -> Self {
        Self { bound: Vec::with_capacity(MAX_TEXTURE_SLOTS) }
    }

    /// Slot already assigned to `id`, if any.
    #[inline]
    pub fn slot_of(&self, id: TextureId) -> Option<u8> {
        self.bound.iter().position(|&t| t == id).map(|i| i as u8)
    }

    /// Returns the slot for `id`, assigning the next free one if needed.
    ///
    /// Returns `None` when `id` is new and every slot is taken; the caller must
    /// flush and retry.
    pub fn acquire(&mut self, id: TextureId) -> Option<u8> {
        if let Some(slot) = self.slot_of(id) {
            return Some(slot);
        }
        if self.bound.len() == MAX_TEXTURE_SLOTS {
            return None;
        }
        self.bound.push(id);
        Some((self.bound.len() - 1) as u8)
    }

    /// `true` when acquiring `id` would need a flush first.
    #[inline]
    pub fn would_overflow(&self, id: TextureId) -> bool {
        self.bound.len() == MAX_TEXTURE_SLOTS && self.slot_of(id).is_none()
    }

    /// Bound textures in slot order.
    #[inline]
    pub fn as_slice(&self) -> &[TextureId] {
        &self.bound
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Frees every slot. Capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.bound.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_reuses_existing_slot() {
        let mut slots = TextureSlots::new();
        assert_eq!(slots.acquire(TextureId(10)), Some(0));
        assert_eq!(slots.acquire(TextureId(20)), Some(1));
        assert_eq!(slots.acquire(TextureId(10)), Some(0));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.as_slice(), &[TextureId(10), TextureId(20)]);
    }

    #[test]
    fn ninth_distinct_texture_is_refused() {
        let mut slots = TextureSlots::new();
        for i in 0..MAX_TEXTURE_SLOTS as u64 {
            assert_eq!(slots.acquire(TextureId(i + 1)), Some(i as u8));
        }
        assert!(slots.would_overflow(TextureId(99)));
        assert_eq!(slots.acquire(TextureId(99)), None);
        // Known textures still resolve when full.
        assert!(!slots.would_overflow(TextureId(3)));
        assert_eq!(slots.acquire(TextureId(3)), Some(2));
    }

    #[test]
    fn clear_frees_every_slot() {
        let mut slots = TextureSlots::new();
        slots.acquire(TextureId(1));
        slots.acquire(TextureId(2));
        slots.clear();
        assert!(slots.is_empty());
        assert!(slots.as_slice().is_empty());
        assert_eq!(slots.acquire(TextureId(2)), Some(0));
    }
}
