//! Error types for building and reading compact sets.
//!
//! Every error here is local and synchronous: it is returned at the point
//! where the offending input is seen and never retried internally.

/// The 16-bit field of the delta block that overflowed during encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityLimit {
    /// More runs than a 16-bit run position can address.
    RunCount,
    /// A run with more consecutive values than a 16-bit extra count can hold.
    RunLength,
}

impl std::fmt::Display for CapacityLimit {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RunCount => write!(formatter, "run count"),
            Self::RunLength => write!(formatter, "run length"),
        }
    }
}

/// Represents errors that can occur while building, decoding or iterating a
/// [`CompactSet`](crate::CompactSet).
///
/// # Examples
///
/// ```rust
/// use compact_set::{CapacityLimit, CompactSet, CompactSetError};
///
/// // 65_537 singleton runs cannot be addressed by a 16-bit position.
/// let values = (0..65_537).map(|value| value * 2);
/// let error = CompactSet::try_from_iter(values).unwrap_err();
/// assert_eq!(
///     error,
///     CompactSetError::CapacityExceeded {
///         limit: CapacityLimit::RunCount,
///         actual: 65_537,
///         maximum: 65_536,
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactSetError {
    /// The input needs more runs, or a longer run, than the fixed-width
    /// layout fields can store.
    CapacityExceeded {
        /// Which field overflowed.
        limit: CapacityLimit,
        /// The value the input required.
        actual: usize,
        /// The largest value the field supports.
        maximum: usize,
    },
    /// `try_next` was called on an iterator that had already produced every
    /// element.
    IteratorExhausted,
    /// A persisted layout violated one of the layout invariants.
    MalformedLayout {
        /// What was wrong with the bytes.
        reason: String,
    },
}

impl CompactSetError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedLayout {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for CompactSetError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded {
                limit,
                actual,
                maximum,
            } => write!(
                formatter,
                "capacity exceeded: {limit} is {actual}, the layout supports at most {maximum}"
            ),
            Self::IteratorExhausted => write!(formatter, "iterator exhausted"),
            Self::MalformedLayout { reason } => write!(formatter, "malformed layout: {reason}"),
        }
    }
}

impl std::error::Error for CompactSetError {}
