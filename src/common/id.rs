//! Document-scoped id allocation for comments and revision wrappers.
//!
//! WordprocessingML requires every `w:ins`, `w:del` and `w:comment` to carry a
//! `w:id` that is unique within the document. A single [`IdAllocator`] per
//! document hands out strictly increasing positive ids and remembers every id
//! it has issued or seen while loading, so it never returns one twice.

use roaring::RoaringBitmap;

/// Monotonic allocator of positive `u32` ids.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// Next candidate id
    next: u32,
    /// Every id issued, claimed or observed so far
    taken: RoaringBitmap,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: 1,
            taken: RoaringBitmap::new(),
        }
    }

    /// Issue the next free id.
    ///
    /// Returns `None` only when the `u32` space above the highest taken id is
    /// exhausted.
    pub fn next_id(&mut self) -> Option<u32> {
        let mut candidate = self.next;
        while self.taken.contains(candidate) {
            candidate = candidate.checked_add(1)?;
        }
        self.taken.insert(candidate);
        self.next = candidate.saturating_add(1);
        Some(candidate)
    }

    /// Record an id found in existing content.
    ///
    /// Collisions are tolerated here: Word keeps comment ids and revision ids in
    /// separate spaces, so a loaded document may legitimately reuse a value.
    /// The id is simply never handed out again.
    pub fn observe(&mut self, id: u32) {
        self.taken.insert(id);
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
    }

    /// Claim an explicit id. Returns `false` if it is already taken.
    pub fn claim(&mut self, id: u32) -> bool {
        if id == 0 || !self.taken.insert(id) {
            return false;
        }
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
        true
    }

    /// Whether `id` has been issued, claimed or observed.
    #[inline]
    pub fn is_taken(&self, id: u32) -> bool {
        self.taken.contains(id)
    }

    /// Number of ids taken so far.
    #[inline]
    pub fn len(&self) -> u64 {
        self.taken.len()
    }

    /// Whether no id has been taken yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), Some(1));
        assert_eq!(ids.next_id(), Some(2));
        assert_eq!(ids.next_id(), Some(3));
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_observed_ids_are_skipped() {
        let mut ids = IdAllocator::new();
        ids.observe(1);
        ids.observe(7);
        assert_eq!(ids.next_id(), Some(8));
        assert!(ids.is_taken(7));
    }

    #[test]
    fn test_claim_rejects_taken_and_zero() {
        let mut ids = IdAllocator::new();
        assert!(ids.claim(5));
        assert!(!ids.claim(5));
        assert!(!ids.claim(0));
        assert_eq!(ids.next_id(), Some(6));
    }

    #[test]
    fn test_exhaustion() {
        let mut ids = IdAllocator::new();
        ids.observe(u32::MAX);
        assert_eq!(ids.next_id(), None);
    }
}
