//! The two-block binary layout behind a compact set.
//!
//! A [`Layout`] stores a list of runs as two immutable byte blocks:
//!
//! - the **run-start block**: one 4-byte big-endian signed integer per run,
//!   strictly ascending;
//! - the **delta block**: one 4-byte entry per run that has more than one
//!   value, made of two 2-byte big-endian unsigned integers
//!   `(position, extra)`. `position` is the run's index in the run-start
//!   block and `extra` is the number of values after the run's start.
//!   Entries are strictly ascending by `position`.
//!
//! Singleton runs have no delta entry. An empty layout has two empty blocks.
//!
//! ```text
//! values      5 6 7 8   10 11   20
//! run starts  [00 00 00 05][00 00 00 0A][00 00 00 14]
//! deltas      [00 00 00 03][00 01 00 01]
//! ```
//!
//! Both blocks are reference counted, so cloning a layout never copies the
//! bytes and any number of readers may share one layout across threads.
//! Reads are random access by offset; nothing in a layout keeps a cursor.

use std::sync::Arc;

use crate::error::{CapacityLimit, CompactSetError};
use crate::run::Run;

/// Width in bytes of one run-start entry.
pub const RUN_START_WIDTH: usize = 4;

/// Width in bytes of one delta entry (`position` plus `extra`).
pub const DELTA_ENTRY_WIDTH: usize = 4;

/// Maximum number of runs a layout can address with a 16-bit position.
pub const MAX_RUN_COUNT: usize = 1 << 16;

/// Maximum `extra` count a single run can record in a 16-bit field.
pub const MAX_RUN_EXTRA: u32 = u16::MAX as u32;

/// A `(position, extra)` pair from the delta block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeltaEntry {
    /// Index of the run in the run-start block.
    pub position: u16,
    /// Number of consecutive values after the run's start; at least 1.
    pub extra: u16,
}

/// The encoded run-start and delta blocks.
///
/// # Examples
///
/// ```rust
/// use compact_set::layout::{DeltaEntry, Layout};
/// use compact_set::run::segment_runs;
///
/// let layout = Layout::encode(&segment_runs([5, 6, 7, 8, 10, 11, 20])).unwrap();
/// assert_eq!(layout.run_starts().collect::<Vec<_>>(), vec![5, 10, 20]);
/// assert_eq!(
///     layout.delta_entries().collect::<Vec<_>>(),
///     vec![
///         DeltaEntry { position: 0, extra: 3 },
///         DeltaEntry { position: 1, extra: 1 },
///     ]
/// );
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    run_starts: Arc<[u8]>,
    deltas: Arc<[u8]>,
}

impl Layout {
    /// Encodes ascending, non-touching runs into the two blocks.
    ///
    /// # Errors
    ///
    /// Returns [`CompactSetError::CapacityExceeded`] if there are more than
    /// [`MAX_RUN_COUNT`] runs or any run's `extra` exceeds [`MAX_RUN_EXTRA`].
    /// Nothing is truncated. Returns [`CompactSetError::MalformedLayout`] if
    /// the runs are not ascending and separated by at least one missing
    /// value, or a run extends past `i32::MAX`.
    pub fn encode(runs: &[Run]) -> Result<Self, CompactSetError> {
        check_runs(runs.iter().copied())?;

        if runs.len() > MAX_RUN_COUNT {
            log::warn!(
                "rejecting {} runs: the layout addresses at most {MAX_RUN_COUNT}",
                runs.len()
            );
            return Err(CompactSetError::CapacityExceeded {
                limit: CapacityLimit::RunCount,
                actual: runs.len(),
                maximum: MAX_RUN_COUNT,
            });
        }

        let mut run_starts = Vec::with_capacity(runs.len() * RUN_START_WIDTH);
        let mut deltas = Vec::new();
        for (index, run) in runs.iter().enumerate() {
            run_starts.extend_from_slice(&run.start.to_be_bytes());
            if run.extra == 0 {
                continue;
            }
            let extra = u16::try_from(run.extra).map_err(|_| {
                log::warn!(
                    "rejecting run starting at {}: {} extra values, the layout stores at most {MAX_RUN_EXTRA}",
                    run.start,
                    run.extra
                );
                CompactSetError::CapacityExceeded {
                    limit: CapacityLimit::RunLength,
                    actual: run.extra as usize,
                    maximum: MAX_RUN_EXTRA as usize,
                }
            })?;
            let position = u16::try_from(index).map_err(|_| CompactSetError::CapacityExceeded {
                limit: CapacityLimit::RunCount,
                actual: runs.len(),
                maximum: MAX_RUN_COUNT,
            })?;
            deltas.extend_from_slice(&position.to_be_bytes());
            deltas.extend_from_slice(&extra.to_be_bytes());
        }

        Ok(Self {
            run_starts: run_starts.into(),
            deltas: deltas.into(),
        })
    }

    /// Decodes a persisted layout, validating every layout invariant.
    ///
    /// # Errors
    ///
    /// Returns [`CompactSetError::MalformedLayout`] if a block length is not
    /// a multiple of its entry width, the run starts are not strictly
    /// ascending, a delta entry has a zero `extra` or a position outside the
    /// run-start block, positions are not strictly ascending, or a run
    /// reaches into the next one. Returns
    /// [`CompactSetError::CapacityExceeded`] if there are more runs than a
    /// position can address.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_set::layout::Layout;
    ///
    /// let layout = Layout::from_bytes(&[0, 0, 0, 5, 0, 0, 0, 20], &[0, 0, 0, 3]).unwrap();
    /// assert_eq!(layout.run_count(), 2);
    ///
    /// // A run of 5..=8 swallowing the next start is rejected.
    /// assert!(Layout::from_bytes(&[0, 0, 0, 5, 0, 0, 0, 7], &[0, 0, 0, 3]).is_err());
    /// ```
    pub fn from_bytes(run_starts: &[u8], deltas: &[u8]) -> Result<Self, CompactSetError> {
        if run_starts.len() % RUN_START_WIDTH != 0 {
            return Err(CompactSetError::malformed(format!(
                "run-start block is {} bytes, not a multiple of {RUN_START_WIDTH}",
                run_starts.len()
            )));
        }
        if deltas.len() % DELTA_ENTRY_WIDTH != 0 {
            return Err(CompactSetError::malformed(format!(
                "delta block is {} bytes, not a multiple of {DELTA_ENTRY_WIDTH}",
                deltas.len()
            )));
        }

        let layout = Self {
            run_starts: run_starts.into(),
            deltas: deltas.into(),
        };
        layout.validate()?;
        log::trace!(
            "decoded layout with {} runs and {} delta entries",
            layout.run_count(),
            layout.delta_count()
        );
        Ok(layout)
    }

    fn validate(&self) -> Result<(), CompactSetError> {
        let run_count = self.run_count();
        if run_count > MAX_RUN_COUNT {
            return Err(CompactSetError::CapacityExceeded {
                limit: CapacityLimit::RunCount,
                actual: run_count,
                maximum: MAX_RUN_COUNT,
            });
        }
        if self.delta_count() > run_count {
            return Err(CompactSetError::malformed(format!(
                "{} delta entries for {run_count} runs",
                self.delta_count()
            )));
        }

        let mut previous_position: Option<u16> = None;
        for entry in self.delta_entries() {
            if entry.extra == 0 {
                return Err(CompactSetError::malformed(format!(
                    "delta entry for run {} has zero extra",
                    entry.position
                )));
            }
            if usize::from(entry.position) >= run_count {
                return Err(CompactSetError::malformed(format!(
                    "delta position {} is outside {run_count} runs",
                    entry.position
                )));
            }
            if previous_position.is_some_and(|previous| previous >= entry.position) {
                return Err(CompactSetError::malformed(format!(
                    "delta position {} is not strictly ascending",
                    entry.position
                )));
            }
            previous_position = Some(entry.position);
        }

        check_runs(self.runs())
    }

    /// Returns the number of runs.
    #[inline]
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.run_starts.len() / RUN_START_WIDTH
    }

    /// Returns the number of delta entries.
    #[inline]
    #[must_use]
    pub fn delta_count(&self) -> usize {
        self.deltas.len() / DELTA_ENTRY_WIDTH
    }

    /// Returns `true` if the layout holds no runs.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.run_starts.is_empty()
    }

    /// Returns the start of the run at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn run_start(&self, index: usize) -> Option<i32> {
        (index < self.run_count()).then(|| self.read_run_start(index))
    }

    /// Returns the delta entry at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn delta_entry(&self, index: usize) -> Option<DeltaEntry> {
        (index < self.delta_count()).then(|| self.read_delta_entry(index))
    }

    /// Returns the `extra` of the run at `run_index`, or 0 for a singleton.
    ///
    /// Delta entries are sorted by position, so this is a binary search over
    /// the delta block.
    #[must_use]
    pub fn extra_of(&self, run_index: usize) -> u32 {
        let mut low = 0;
        let mut high = self.delta_count();
        while low < high {
            let middle = low + (high - low) / 2;
            let entry = self.read_delta_entry(middle);
            match usize::from(entry.position).cmp(&run_index) {
                std::cmp::Ordering::Less => low = middle + 1,
                std::cmp::Ordering::Greater => high = middle,
                std::cmp::Ordering::Equal => return u32::from(entry.extra),
            }
        }
        0
    }

    /// Returns the run at `index`, or `None` past the end.
    #[must_use]
    pub fn run(&self, index: usize) -> Option<Run> {
        self.run_start(index).map(|start| Run {
            start,
            extra: self.extra_of(index),
        })
    }

    /// Returns the index of the last run whose start is at most `value`.
    ///
    /// Returns `None` if `value` is below the first run start.
    #[must_use]
    pub fn floor_run_index(&self, value: i32) -> Option<usize> {
        let mut low = 0;
        let mut high = self.run_count();
        while low < high {
            let middle = low + (high - low) / 2;
            if self.read_run_start(middle) <= value {
                low = middle + 1;
            } else {
                high = middle;
            }
        }
        low.checked_sub(1)
    }

    /// Iterates over the run starts in ascending order.
    pub fn run_starts(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        (0..self.run_count()).map(move |index| self.read_run_start(index))
    }

    /// Iterates over the delta entries in ascending position order.
    pub fn delta_entries(&self) -> impl ExactSizeIterator<Item = DeltaEntry> + '_ {
        (0..self.delta_count()).map(move |index| self.read_delta_entry(index))
    }

    /// Iterates over the runs in ascending order.
    ///
    /// Walks both blocks in lockstep, so this is O(1) per run.
    #[must_use]
    pub fn runs(&self) -> LayoutRuns<'_> {
        LayoutRuns {
            layout: self,
            run_index: 0,
            delta_index: 0,
        }
    }

    /// Returns the raw run-start block.
    #[inline]
    #[must_use]
    pub fn run_starts_bytes(&self) -> &[u8] {
        &self.run_starts
    }

    /// Returns the raw delta block.
    #[inline]
    #[must_use]
    pub fn deltas_bytes(&self) -> &[u8] {
        &self.deltas
    }

    /// Returns the combined size of both blocks in bytes.
    #[inline]
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.run_starts.len() + self.deltas.len()
    }

    /// Reads a run start; `index` must be below `run_count()`.
    #[inline]
    pub(crate) fn read_run_start(&self, index: usize) -> i32 {
        let offset = index * RUN_START_WIDTH;
        let bytes = &self.run_starts[offset..offset + RUN_START_WIDTH];
        i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Reads a delta entry; `index` must be below `delta_count()`.
    #[inline]
    pub(crate) fn read_delta_entry(&self, index: usize) -> DeltaEntry {
        let offset = index * DELTA_ENTRY_WIDTH;
        let bytes = &self.deltas[offset..offset + DELTA_ENTRY_WIDTH];
        DeltaEntry {
            position: u16::from_be_bytes([bytes[0], bytes[1]]),
            extra: u16::from_be_bytes([bytes[2], bytes[3]]),
        }
    }
}

/// Checks that runs ascend, leave a gap between each other and stay within `i32`.
fn check_runs(runs: impl Iterator<Item = Run>) -> Result<(), CompactSetError> {
    let mut previous: Option<Run> = None;
    for run in runs {
        if run.start.checked_add_unsigned(run.extra).is_none() {
            return Err(CompactSetError::malformed(format!(
                "run starting at {} extends past i32::MAX",
                run.start
            )));
        }
        if let Some(previous) = previous
            && i64::from(previous.last()) + 1 >= i64::from(run.start)
        {
            return Err(CompactSetError::malformed(format!(
                "run ending at {} touches the run starting at {}",
                previous.last(),
                run.start
            )));
        }
        previous = Some(run);
    }
    Ok(())
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Layout")
            .field("run_starts", &self.run_starts().collect::<Vec<_>>())
            .field("deltas", &self.delta_entries().collect::<Vec<_>>())
            .finish()
    }
}

/// Iterator over the runs of a [`Layout`].
pub struct LayoutRuns<'a> {
    layout: &'a Layout,
    run_index: usize,
    delta_index: usize,
}

impl Iterator for LayoutRuns<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.layout.run_start(self.run_index)?;
        let extra = match self.layout.delta_entry(self.delta_index) {
            Some(entry) if usize::from(entry.position) == self.run_index => {
                self.delta_index += 1;
                u32::from(entry.extra)
            }
            _ => 0,
        };
        self.run_index += 1;
        Some(Run { start, extra })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.layout.run_count() - self.run_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LayoutRuns<'_> {}
