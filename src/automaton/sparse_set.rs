//! Sparse set for frontier deduplication with O(1) clear.
//!
//! Based on: https://research.swtch.com/sparse
//!
//! Both matchers clear their visited/frontier sets once per input position,
//! so clearing must not cost O(states). Insertion order is preserved, which
//! keeps frontier iteration deterministic.

/// A set of indices below a fixed capacity.
#[derive(Clone, Debug)]
pub struct SparseSet {
    len: usize,
    /// Members in insertion order.
    dense: Vec<usize>,
    /// `sparse[id]` is the slot of `id` in `dense`, when `id` is a member.
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Create a set for indices in `[0, capacity)`.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        SparseSet {
            len: 0,
            dense: vec![0; capacity],
            sparse: vec![0; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `id`; returns true if it was not already present.
    ///
    /// Panics if `id >= capacity`.
    #[inline]
    pub fn insert(&mut self, id: usize) -> bool {
        if self.contains(id) {
            return false;
        }
        debug_assert!(
            self.len < self.capacity(),
            "sparse set overflow: len={}, capacity={}",
            self.len,
            self.capacity()
        );
        self.dense[self.len] = id;
        self.sparse[id] = self.len;
        self.len += 1;
        true
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        let slot = self.sparse[id];
        slot < self.len && self.dense[slot] == id
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Members in insertion order, as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.dense[..self.len]
    }
}

/// Current and next frontier for one simulation.
#[derive(Clone, Debug)]
pub struct Frontiers {
    pub current: SparseSet,
    pub next: SparseSet,
}

impl Frontiers {
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Frontiers {
            current: SparseSet::new(capacity),
            next: SparseSet::new(capacity),
        }
    }

    /// Make `next` the current frontier and empty the new `next`.
    #[inline]
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_set_basic() {
        let mut set = SparseSet::new(10);
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 10);

        assert!(set.insert(3));
        assert!(set.insert(7));
        assert!(set.insert(1));
        assert_eq!(set.len(), 3);
        assert!(set.contains(7));
        assert!(!set.contains(5));

        assert!(!set.insert(3));
        assert_eq!(set.len(), 3);
    }

    #[test]
    #[should_panic]
    fn test_sparse_set_rejects_out_of_range() {
        let mut set = SparseSet::new(4);
        for id in 0..4 {
            assert!(set.insert(id));
        }
        assert_eq!(set.len(), set.capacity());
        set.insert(4);
    }

    #[test]
    fn test_sparse_set_insertion_order() {
        let mut set = SparseSet::new(10);
        for id in [5, 2, 8, 1] {
            set.insert(id);
        }
        assert_eq!(set.as_slice(), &[5, 2, 8, 1]);
    }

    #[test]
    fn test_sparse_set_clear_and_reuse() {
        let mut set = SparseSet::new(4);
        set.insert(1);
        set.insert(2);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(1));

        set.insert(3);
        assert_eq!(set.len(), 1);
        assert!(set.contains(3));
    }

    #[test]
    fn test_frontiers_advance() {
        let mut frontiers = Frontiers::new(8);
        frontiers.current.insert(1);
        frontiers.next.insert(4);
        frontiers.next.insert(6);

        frontiers.advance();

        assert_eq!(frontiers.current.as_slice(), &[4, 6]);
        assert!(frontiers.next.is_empty());
    }
}
