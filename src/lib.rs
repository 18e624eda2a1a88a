//! # compact-set
//!
//! An immutable set of `i32` values that stores runs of consecutive
//! integers instead of every integer.
//!
//! ## Overview
//!
//! A [`CompactSet`] is built once from any collection of integers. The
//! distinct values are split into maximal runs, and only two things are
//! kept:
//!
//! - **Run starts**: the first value of every run, four bytes each
//! - **Delta entries**: for every run with more than one value, its index
//!   and how many values follow its start, four bytes each
//!
//! Membership tests and ascending iteration work directly on those two
//! buffers. Nothing can be added or removed afterwards: the type simply has
//! no mutating methods.
//!
//! ## Modules
//!
//! - [`run`]: splitting integers into runs
//! - [`layout`]: the two-block binary encoding and its validation
//! - [`set`]: the [`CompactSet`] value
//! - [`iter`]: ascending reconstruction of the values
//! - [`view`]: the [`ReadOnlySet`] capability trait
//! - [`error`]: [`CompactSetError`]
//!
//! ## Feature Flags
//!
//! - `serde`: serialize a set as an ascending sequence of its values
//! - `rayon`: sort large inputs in parallel during construction
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use compact_set::prelude::*;
//!
//! let ids: Vec<i32> = (1_000..2_000).chain(5_000..5_010).collect();
//! let set = CompactSet::try_from(ids).unwrap();
//!
//! assert_eq!(set.len(), 1_010);
//! assert_eq!(set.run_count(), 2);
//! assert_eq!(set.encoded_len(), 16);
//! assert!(set.contains(1_500));
//! assert!(!set.contains(2_000));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use compact_set::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CapacityLimit, CompactSetError};
    pub use crate::iter::CompactSetIterator;
    pub use crate::layout::{DeltaEntry, Layout};
    pub use crate::run::Run;
    pub use crate::set::CompactSet;
    pub use crate::view::ReadOnlySet;
}

pub mod error;
pub mod iter;
pub mod layout;
pub mod run;
pub mod set;
pub mod view;

pub use error::{CapacityLimit, CompactSetError};
pub use iter::CompactSetIterator;
pub use set::CompactSet;
pub use view::ReadOnlySet;
