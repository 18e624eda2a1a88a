//! Ascending reconstruction of the values stored in a compact set.

use std::iter::FusedIterator;

use crate::error::CompactSetError;
use crate::layout::Layout;

/// An iterator over the values of a [`CompactSet`](crate::CompactSet) in
/// ascending order.
///
/// The iterator owns a snapshot of the set's layout, so it does not borrow
/// the set and can be moved to another thread. It is single use: once it has
/// produced every value, a new traversal needs a new iterator from
/// [`CompactSet::iter`](crate::CompactSet::iter).
///
/// # Examples
///
/// ```rust
/// use compact_set::{CompactSet, CompactSetError};
///
/// let set = CompactSet::try_from(vec![20, 5, 6, 7, 8, 10, 11]).unwrap();
/// let mut iterator = set.iter();
/// assert_eq!(iterator.len(), 7);
///
/// let values: Vec<i32> = iterator.by_ref().collect();
/// assert_eq!(values, vec![5, 6, 7, 8, 10, 11, 20]);
///
/// assert!(!iterator.has_next());
/// assert_eq!(iterator.try_next(), Err(CompactSetError::IteratorExhausted));
/// ```
#[derive(Debug, Clone)]
pub struct CompactSetIterator {
    snapshot: Option<Layout>,
    run_index: usize,
    delta_index: usize,
    current: i32,
    countdown: u32,
    remaining: usize,
}

impl CompactSetIterator {
    pub(crate) const fn empty() -> Self {
        Self {
            snapshot: None,
            run_index: 0,
            delta_index: 0,
            current: 0,
            countdown: 0,
            remaining: 0,
        }
    }

    pub(crate) fn new(snapshot: Layout, len: usize) -> Self {
        Self {
            snapshot: Some(snapshot),
            run_index: 0,
            delta_index: 0,
            current: 0,
            countdown: 0,
            remaining: len,
        }
    }

    /// Returns `true` if another value is available.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.remaining > 0
    }

    /// Returns the next value.
    ///
    /// # Errors
    ///
    /// Returns [`CompactSetError::IteratorExhausted`] once every value has
    /// been produced.
    pub fn try_next(&mut self) -> Result<i32, CompactSetError> {
        self.next().ok_or(CompactSetError::IteratorExhausted)
    }
}

impl Iterator for CompactSetIterator {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.countdown > 0 {
            self.countdown -= 1;
            self.current += 1;
            self.remaining -= 1;
            return Some(self.current);
        }

        let snapshot = self.snapshot.as_ref()?;
        let start = snapshot.run_start(self.run_index)?;
        if let Some(entry) = snapshot.delta_entry(self.delta_index)
            && usize::from(entry.position) == self.run_index
        {
            self.countdown = u32::from(entry.extra);
            self.delta_index += 1;
        }
        self.run_index += 1;
        self.current = start;
        self.remaining -= 1;
        Some(start)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CompactSetIterator {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for CompactSetIterator {}

static_assertions::assert_impl_all!(CompactSetIterator: Send, Sync);

#[cfg(test)]
mod tests {
    use crate::CompactSet;
    use crate::error::CompactSetError;
    use rstest::rstest;

    #[rstest]
    fn test_iterates_reference_scenario() {
        let set = CompactSet::try_from(vec![5, 6, 7, 8, 10, 11, 20]).unwrap();
        let values: Vec<i32> = set.iter().collect();
        assert_eq!(values, vec![5, 6, 7, 8, 10, 11, 20]);
    }

    #[rstest]
    fn test_empty_iterator_is_exhausted_immediately() {
        let set = CompactSet::new();
        let mut iterator = set.iter();
        assert!(!iterator.has_next());
        assert_eq!(iterator.len(), 0);
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.try_next(), Err(CompactSetError::IteratorExhausted));
    }

    #[rstest]
    fn test_len_counts_down() {
        let set = CompactSet::try_from(vec![1, 2, 3, 10]).unwrap();
        let mut iterator = set.iter();
        for expected in (0..4).rev() {
            assert!(iterator.has_next());
            iterator.try_next().unwrap();
            assert_eq!(iterator.len(), expected);
        }
        assert!(!iterator.has_next());
    }

    #[rstest]
    fn test_fused_after_exhaustion() {
        let set = CompactSet::try_from(vec![1]).unwrap();
        let mut iterator = set.iter();
        assert_eq!(iterator.next(), Some(1));
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.try_next(), Err(CompactSetError::IteratorExhausted));
    }

    #[rstest]
    fn test_singletons_between_runs() {
        let set = CompactSet::try_from(vec![0, 2, 3, 5, 7, 8, 9, 11]).unwrap();
        let values: Vec<i32> = set.iter().collect();
        assert_eq!(values, vec![0, 2, 3, 5, 7, 8, 9, 11]);
    }

    #[rstest]
    fn test_run_ending_at_i32_max() {
        let set = CompactSet::try_from(vec![i32::MAX - 2, i32::MAX - 1, i32::MAX]).unwrap();
        let values: Vec<i32> = set.iter().collect();
        assert_eq!(values, vec![i32::MAX - 2, i32::MAX - 1, i32::MAX]);
    }

    #[rstest]
    fn test_independent_iterators() {
        let set = CompactSet::try_from(vec![1, 2, 3]).unwrap();
        let mut first = set.iter();
        let mut second = set.iter();
        assert_eq!(first.next(), Some(1));
        assert_eq!(first.next(), Some(2));
        assert_eq!(second.next(), Some(1));
        assert_eq!(first.next(), Some(3));
        assert_eq!(second.next(), Some(2));
    }

    #[rstest]
    fn test_iterator_outlives_set() {
        let iterator = {
            let set = CompactSet::try_from(vec![4, 5, 9]).unwrap();
            set.iter()
        };
        assert_eq!(iterator.collect::<Vec<_>>(), vec![4, 5, 9]);
    }

    #[rstest]
    fn test_iterator_moves_across_threads() {
        let set = CompactSet::try_from((0..1000).collect::<Vec<_>>()).unwrap();
        let iterator = set.iter();
        let handle = std::thread::spawn(move || iterator.sum::<i32>());
        assert_eq!(handle.join().unwrap(), (0..1000).sum::<i32>());
    }
}
