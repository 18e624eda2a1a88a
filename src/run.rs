//! Segmentation of integers into maximal runs of consecutive values.
//!
//! A [`Run`] is a maximal ascending sequence with step exactly 1. It is
//! described by its first value and the number of values that follow it,
//! so `{start: 5, extra: 3}` stands for `5, 6, 7, 8`.
//!
//! # Examples
//!
//! ```rust
//! use compact_set::run::{Run, segment_runs};
//!
//! let runs = segment_runs(vec![20, 5, 6, 10, 7, 8, 11, 6]);
//! assert_eq!(
//!     runs,
//!     vec![Run::new(5, 3), Run::new(10, 1), Run::singleton(20)]
//! );
//! ```

use std::ops::RangeInclusive;

/// Inputs at least this long are sorted on the rayon pool when the `rayon`
/// feature is enabled.
#[cfg(feature = "rayon")]
const PARALLEL_SORT_THRESHOLD: usize = 1 << 16;

/// A maximal run of consecutive integers.
///
/// `extra` counts the values after `start`, so a singleton run has
/// `extra == 0` and the run covers `start..=start + extra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Run {
    /// First value of the run.
    pub start: i32,
    /// Number of consecutive values after `start`.
    pub extra: u32,
}

impl Run {
    /// Creates a run covering `start..=start + extra`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the run would extend past `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn new(start: i32, extra: u32) -> Self {
        debug_assert!(
            start.checked_add_unsigned(extra).is_some(),
            "run extends past i32::MAX"
        );
        Self { start, extra }
    }

    /// Creates a run holding exactly one value.
    #[inline]
    #[must_use]
    pub const fn singleton(value: i32) -> Self {
        Self {
            start: value,
            extra: 0,
        }
    }

    /// Returns the last value of the run.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> i32 {
        // A valid run never extends past i32::MAX, so this never wraps.
        self.start.wrapping_add_unsigned(self.extra)
    }

    /// Returns the number of values in the run.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.extra as usize + 1
    }

    /// Returns `true` if `value` lies within the run.
    ///
    /// ```rust
    /// use compact_set::run::Run;
    ///
    /// let run = Run::new(-2, 4);
    /// assert!(run.contains(-2));
    /// assert!(run.contains(2));
    /// assert!(!run.contains(3));
    /// ```
    #[inline]
    #[must_use]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.start && value.abs_diff(self.start) <= self.extra
    }

    /// Returns the run as an inclusive range.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> RangeInclusive<i32> {
        self.start..=self.last()
    }
}

impl From<Run> for RangeInclusive<i32> {
    #[inline]
    fn from(run: Run) -> Self {
        run.range()
    }
}

/// Splits an arbitrary collection of integers into maximal runs.
///
/// The input may be in any order and may contain duplicates; it is sorted
/// and deduplicated first. The returned runs are in ascending order and
/// never touch: the value after each run is absent from the input.
///
/// # Complexity
///
/// O(n log n) for the sort, O(n) for the scan.
///
/// # Examples
///
/// ```rust
/// use compact_set::run::segment_runs;
///
/// assert!(segment_runs(Vec::<i32>::new()).is_empty());
/// assert_eq!(segment_runs([3, 1, 2]).len(), 1);
/// ```
#[must_use]
pub fn segment_runs<I>(values: I) -> Vec<Run>
where
    I: IntoIterator<Item = i32>,
{
    let mut sorted: Vec<i32> = values.into_iter().collect();
    sort_values(&mut sorted);
    sorted.dedup();
    segment_sorted(&sorted)
}

/// Splits a strictly ascending slice into maximal runs.
///
/// # Preconditions
///
/// `values` must be strictly ascending (sorted, no duplicates). This is
/// checked with `debug_assert!`; release builds given unsorted input
/// produce runs that do not describe the input.
///
/// # Examples
///
/// ```rust
/// use compact_set::run::{Run, segment_sorted};
///
/// let runs = segment_sorted(&[5, 6, 7, 8, 10, 11, 20]);
/// assert_eq!(runs, vec![Run::new(5, 3), Run::new(10, 1), Run::singleton(20)]);
/// ```
#[must_use]
pub fn segment_sorted(values: &[i32]) -> Vec<Run> {
    debug_assert!(
        values.windows(2).all(|window| window[0] < window[1]),
        "segment_sorted requires strictly increasing values"
    );

    let mut runs: Vec<Run> = Vec::new();
    for &value in values {
        match runs.last_mut() {
            Some(run) if run.last().checked_add(1) == Some(value) => run.extra += 1,
            _ => runs.push(Run::singleton(value)),
        }
    }
    runs
}

#[cfg(feature = "rayon")]
fn sort_values(values: &mut [i32]) {
    if values.len() >= PARALLEL_SORT_THRESHOLD {
        use rayon::slice::ParallelSliceMut;
        values.par_sort_unstable();
    } else {
        values.sort_unstable();
    }
}

#[cfg(not(feature = "rayon"))]
fn sort_values(values: &mut [i32]) {
    values.sort_unstable();
}
