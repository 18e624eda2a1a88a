//! An immutable set of `i32` values stored as runs of consecutive integers.
//!
//! This module provides [`CompactSet`], a build-once collection that keeps
//! only the first value of every maximal run plus a side table recording how
//! long the multi-value runs are. Inputs made of long runs (sorted ids,
//! bitmap-like ranges) shrink from four bytes per value to four bytes per
//! run; inputs with no adjacent values degrade to one run per value and stay
//! correct.
//!
//! # Functional Programming Principles
//!
//! - **Immutability**: there is no way to change a set after it is built
//! - **Referential Transparency**: every query is a pure function of the
//!   set and its argument
//! - **No Shared Cursors**: queries read the layout by offset, so any number
//!   of threads can query one set without locking
//!
//! # Time Complexity
//!
//! | Operation          | Complexity             |
//! |--------------------|------------------------|
//! | `try_from_iter`    | O(n log n)             |
//! | `from_sorted_slice`| O(n)                   |
//! | `len`              | O(1)                   |
//! | `is_empty`         | O(1)                   |
//! | `min` / `max`      | O(1)                   |
//! | `contains`         | O(log r)               |
//! | `contains_by_scan` | O(r)                   |
//! | `iter`             | O(1) + O(1) per value  |
//!
//! where `r` is the number of runs.
//!
//! # Examples
//!
//! ```rust
//! use compact_set::CompactSet;
//!
//! let set = CompactSet::try_from(vec![5, 6, 7, 8, 10, 11, 20]).unwrap();
//! assert_eq!(set.len(), 7);
//! assert_eq!(set.run_count(), 3);
//!
//! assert!(set.contains(7));
//! assert!(!set.contains(9));
//! assert!(set.contains(11));
//! assert!(!set.contains(21));
//!
//! let values: Vec<i32> = set.iter().collect();
//! assert_eq!(values, vec![5, 6, 7, 8, 10, 11, 20]);
//! ```

use std::any::Any;
use std::fmt;

use crate::error::CompactSetError;
use crate::iter::CompactSetIterator;
use crate::layout::Layout;
use crate::run::{Run, segment_runs, segment_sorted};

/// Internal representation of the set.
#[derive(Clone, PartialEq, Eq, Hash)]
enum CompactSetInner {
    Empty,
    Encoded { layout: Layout, len: usize, max: i32 },
}

/// An immutable set of distinct `i32` values, stored as runs.
///
/// Built once from any collection of integers (any order, duplicates
/// allowed); every later operation only reads. Cloning shares the encoded
/// buffers.
///
/// Two sets are equal exactly when they hold the same values: the encoding
/// of a given set of values is unique.
///
/// # Examples
///
/// ```rust
/// use compact_set::CompactSet;
///
/// let left = CompactSet::try_from(vec![3, 1, 2, 2]).unwrap();
/// let right = CompactSet::try_from_iter(1..=3).unwrap();
/// assert_eq!(left, right);
/// assert_eq!(left.to_string(), "{1, 2, 3}");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CompactSet {
    inner: CompactSetInner,
}

impl CompactSet {
    /// Creates the empty set. It holds no buffers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let set = CompactSet::new();
    /// assert!(set.is_empty());
    /// assert!(set.layout().is_none());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: CompactSetInner::Empty,
        }
    }

    /// Builds a set from integers in any order, ignoring duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`CompactSetError::CapacityExceeded`] if the distinct values
    /// form more than [`MAX_RUN_COUNT`](crate::layout::MAX_RUN_COUNT) runs
    /// or a run whose extra count exceeds
    /// [`MAX_RUN_EXTRA`](crate::layout::MAX_RUN_EXTRA).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let set = CompactSet::try_from_iter([10, -1, 0, 10, 1]).unwrap();
    /// assert_eq!(set.len(), 4);
    /// assert_eq!(set.run_count(), 2);
    /// ```
    pub fn try_from_iter<I>(values: I) -> Result<Self, CompactSetError>
    where
        I: IntoIterator<Item = i32>,
    {
        Self::from_runs(&segment_runs(values))
    }

    /// Builds a set from a strictly ascending slice without sorting it.
    ///
    /// # Preconditions
    ///
    /// `values` must be strictly ascending. In debug builds this is checked
    /// with `debug_assert!`; in release builds invalid input yields a set
    /// that does not describe the input.
    ///
    /// # Errors
    ///
    /// Same as [`try_from_iter`](Self::try_from_iter).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let set = CompactSet::from_sorted_slice(&[1, 2, 3, 7]).unwrap();
    /// assert_eq!(set.max(), Some(7));
    /// ```
    pub fn from_sorted_slice(values: &[i32]) -> Result<Self, CompactSetError> {
        Self::from_runs(&segment_sorted(values))
    }

    /// Builds a set from ascending runs that are separated by at least one
    /// missing value.
    ///
    /// # Errors
    ///
    /// See [`Layout::encode`].
    pub fn from_runs(runs: &[Run]) -> Result<Self, CompactSetError> {
        Layout::encode(runs).map(Self::from_layout)
    }

    /// Wraps an already encoded layout.
    ///
    /// A [`Layout`] can only be obtained by encoding runs or by decoding and
    /// validating bytes, so this cannot fail.
    #[must_use]
    pub fn from_layout(layout: Layout) -> Self {
        if layout.is_empty() {
            return Self::new();
        }

        let extra_total: usize = layout
            .delta_entries()
            .map(|entry| usize::from(entry.extra))
            .sum();
        let len = layout.run_count() + extra_total;
        let last_index = layout.run_count() - 1;
        let max = layout
            .read_run_start(last_index)
            .wrapping_add_unsigned(layout.extra_of(last_index));

        log::debug!(
            "compact set of {len} values in {} runs ({} delta entries, {} bytes)",
            layout.run_count(),
            layout.delta_count(),
            layout.encoded_len()
        );

        Self {
            inner: CompactSetInner::Encoded { layout, len, max },
        }
    }

    /// Decodes a set from persisted run-start and delta blocks.
    ///
    /// # Errors
    ///
    /// See [`Layout::from_bytes`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let original = CompactSet::try_from(vec![5, 6, 7, 8, 10, 11, 20]).unwrap();
    /// let layout = original.layout().unwrap();
    /// let restored =
    ///     CompactSet::from_bytes(layout.run_starts_bytes(), layout.deltas_bytes()).unwrap();
    /// assert_eq!(restored, original);
    /// ```
    pub fn from_bytes(run_starts: &[u8], deltas: &[u8]) -> Result<Self, CompactSetError> {
        Layout::from_bytes(run_starts, deltas).map(Self::from_layout)
    }

    /// Returns the number of values in the set.
    ///
    /// # Complexity
    ///
    /// O(1); the count is computed once at construction.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        match &self.inner {
            CompactSetInner::Empty => 0,
            CompactSetInner::Encoded { len, .. } => *len,
        }
    }

    /// Returns `true` if the set holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.inner, CompactSetInner::Empty)
    }

    /// Returns the smallest value, or `None` for the empty set.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<i32> {
        self.layout().map(|layout| layout.read_run_start(0))
    }

    /// Returns the largest value, or `None` for the empty set.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> Option<i32> {
        match &self.inner {
            CompactSetInner::Empty => None,
            CompactSetInner::Encoded { max, .. } => Some(*max),
        }
    }

    /// Returns the number of runs.
    #[inline]
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.layout().map_or(0, Layout::run_count)
    }

    /// Iterates over the runs in ascending order.
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    /// use compact_set::run::Run;
    ///
    /// let set = CompactSet::try_from(vec![1, 2, 3, 9]).unwrap();
    /// let runs: Vec<Run> = set.runs().collect();
    /// assert_eq!(runs, vec![Run::new(1, 2), Run::singleton(9)]);
    /// ```
    pub fn runs(&self) -> impl Iterator<Item = Run> + '_ {
        self.layout().into_iter().flat_map(Layout::runs)
    }

    /// Returns the encoded layout, or `None` for the empty set.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> Option<&Layout> {
        match &self.inner {
            CompactSetInner::Empty => None,
            CompactSetInner::Encoded { layout, .. } => Some(layout),
        }
    }

    /// Returns the size of the encoded buffers in bytes.
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// // One run: four bytes for its start plus four for its delta entry.
    /// let set = CompactSet::try_from_iter(0..10_000).unwrap();
    /// assert_eq!(set.encoded_len(), 8);
    /// ```
    #[inline]
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.layout().map_or(0, Layout::encoded_len)
    }

    /// Returns `true` if `value` is in the set.
    ///
    /// Rejects values outside `min..=max` immediately, then binary searches
    /// the run starts for the last run starting at or below `value` and
    /// checks that run's extent.
    ///
    /// # Complexity
    ///
    /// O(log r) for r runs. No allocation and no shared state.
    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        let CompactSetInner::Encoded { layout, max, .. } = &self.inner else {
            return false;
        };
        let min = layout.read_run_start(0);
        if value < min || value > *max {
            return false;
        }
        if value == min || value == *max {
            return true;
        }

        layout.floor_run_index(value).is_some_and(|run_index| {
            let run = Run {
                start: layout.read_run_start(run_index),
                extra: layout.extra_of(run_index),
            };
            run.contains(value)
        })
    }

    /// Returns `true` if `value` is in the set, walking the runs in order.
    ///
    /// Reads the run-start and delta blocks in lockstep from the first run,
    /// keeping its position in locals. Always agrees with
    /// [`contains`](Self::contains); it exists for layouts with few runs
    /// where a sequential walk beats a search.
    ///
    /// # Complexity
    ///
    /// O(r) for r runs.
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let set = CompactSet::try_from(vec![5, 6, 7, 8, 10, 11, 20]).unwrap();
    /// for value in 0..25 {
    ///     assert_eq!(set.contains_by_scan(value), set.contains(value));
    /// }
    /// ```
    #[must_use]
    pub fn contains_by_scan(&self, value: i32) -> bool {
        let CompactSetInner::Encoded { layout, max, .. } = &self.inner else {
            return false;
        };
        let min = layout.read_run_start(0);
        if value < min || value > *max {
            return false;
        }
        if value == min || value == *max {
            return true;
        }

        let mut delta_index = 0;
        for run_index in 0..layout.run_count() {
            let start = layout.read_run_start(run_index);
            if start > value {
                return false;
            }
            match layout.delta_entry(delta_index) {
                Some(entry) if usize::from(entry.position) == run_index => {
                    if Run::new(start, u32::from(entry.extra)).contains(value) {
                        return true;
                    }
                    delta_index += 1;
                }
                _ => {
                    if start == value {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Returns `true` if `value` converts to an `i32` that is in the set.
    ///
    /// Values of other integer types that do not fit in an `i32` are never
    /// members, so they yield `false` rather than an error.
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let set = CompactSet::try_from(vec![1, 2, 3]).unwrap();
    /// assert!(set.contains_integer(2_u8));
    /// assert!(set.contains_integer(3_i64));
    /// assert!(!set.contains_integer(1_i64 << 40));
    /// assert!(!set.contains_integer(u32::MAX));
    /// ```
    #[must_use]
    pub fn contains_integer<Q>(&self, value: Q) -> bool
    where
        Q: TryInto<i32>,
    {
        value.try_into().is_ok_and(|value| self.contains(value))
    }

    /// Returns `true` if `value` is an `i32` that is in the set.
    ///
    /// For callers holding values of unknown type: anything that is not an
    /// `i32` is simply not a member.
    ///
    /// ```rust
    /// use compact_set::CompactSet;
    ///
    /// let set = CompactSet::try_from(vec![1, 2, 3]).unwrap();
    /// assert!(set.contains_dyn(&2_i32));
    /// assert!(!set.contains_dyn(&"2"));
    /// assert!(!set.contains_dyn(&2.0_f64));
    /// ```
    #[must_use]
    pub fn contains_dyn(&self, value: &dyn Any) -> bool {
        value
            .downcast_ref::<i32>()
            .is_some_and(|value| self.contains(*value))
    }

    /// Returns an iterator over the values in ascending order.
    ///
    /// Each call returns an independent iterator over a snapshot of the
    /// layout.
    ///
    /// # Complexity
    ///
    /// O(1) to create, O(1) per value.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> CompactSetIterator {
        match &self.inner {
            CompactSetInner::Empty => CompactSetIterator::empty(),
            CompactSetInner::Encoded { layout, len, .. } => {
                CompactSetIterator::new(layout.clone(), *len)
            }
        }
    }
}

impl Default for CompactSet {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<i32>> for CompactSet {
    type Error = CompactSetError;

    fn try_from(values: Vec<i32>) -> Result<Self, Self::Error> {
        Self::try_from_iter(values)
    }
}

impl TryFrom<&[i32]> for CompactSet {
    type Error = CompactSetError;

    fn try_from(values: &[i32]) -> Result<Self, Self::Error> {
        Self::try_from_iter(values.iter().copied())
    }
}

impl<const N: usize> TryFrom<[i32; N]> for CompactSet {
    type Error = CompactSetError;

    fn try_from(values: [i32; N]) -> Result<Self, Self::Error> {
        Self::try_from_iter(values)
    }
}

impl IntoIterator for &CompactSet {
    type Item = i32;
    type IntoIter = CompactSetIterator;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for CompactSet {
    type Item = i32;
    type IntoIter = CompactSetIterator;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        match self.inner {
            CompactSetInner::Empty => CompactSetIterator::empty(),
            CompactSetInner::Encoded { layout, len, .. } => CompactSetIterator::new(layout, len),
        }
    }
}

impl fmt::Debug for CompactSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for CompactSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for value in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(CompactSet: Send, Sync, Clone);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for CompactSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct CompactSetVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for CompactSetVisitor {
    type Value = CompactSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of i32 values")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<i32>()? {
            values.push(value);
        }
        CompactSet::try_from(values).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CompactSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(CompactSetVisitor)
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_empty() {
        let json = serde_json::to_string(&CompactSet::new()).unwrap();
        assert_eq!(json, "[]");
    }

    #[rstest]
    fn test_serialize_ascending() {
        let set = CompactSet::try_from(vec![20, 5, 6, 7, 8, 11, 10]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[5,6,7,8,10,11,20]");
    }

    #[rstest]
    fn test_deserialize_unsorted_with_duplicates() {
        let set: CompactSet = serde_json::from_str("[3, 1, 2, 2, 9]").unwrap();
        assert_eq!(set, CompactSet::try_from(vec![1, 2, 3, 9]).unwrap());
    }

    #[rstest]
    fn test_deserialize_empty() {
        let set: CompactSet = serde_json::from_str("[]").unwrap();
        assert!(set.is_empty());
    }

    #[rstest]
    fn test_deserialize_rejects_non_integers() {
        let result: Result<CompactSet, _> = serde_json::from_str("[1, \"two\"]");
        assert!(result.is_err());
    }

    #[rstest]
    fn test_deserialize_reports_capacity_error() {
        let values: Vec<i32> = (0..=65_536).collect();
        let json = serde_json::to_string(&values).unwrap();
        let error = serde_json::from_str::<CompactSet>(&json).unwrap_err();
        assert!(error.to_string().contains("capacity exceeded"));
    }

    #[rstest]
    fn test_round_trip() {
        let set = CompactSet::try_from_iter((-50..50).filter(|value| value % 4 != 1)).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        let restored: CompactSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);
    }
}
