//! A read-only capability interface for integer sets.
//!
//! [`ReadOnlySet`] is the whole contract a compact set offers to callers:
//! size, emptiness, membership and ascending iteration. The trait has no
//! mutating methods, so code written against it cannot add, remove or clear
//! elements, and this is checked by the compiler:
//!
//! ```compile_fail
//! use compact_set::{CompactSet, ReadOnlySet};
//!
//! let set = CompactSet::try_from(vec![1, 2, 3]).unwrap();
//! set.insert(4);
//! ```
//!
//! ```compile_fail
//! use compact_set::{CompactSet, ReadOnlySet};
//!
//! fn clear_all<S: ReadOnlySet>(set: &mut S) {
//!     set.clear();
//! }
//! ```
//!
//! The trait is also implemented for the standard library's integer sets,
//! so generic read-only code accepts either.
//!
//! # Examples
//!
//! ```rust
//! use compact_set::{CompactSet, ReadOnlySet};
//! use std::collections::BTreeSet;
//!
//! fn describe<S: ReadOnlySet>(set: &S) -> String {
//!     let values: Vec<String> = set.iter_ascending().map(|value| value.to_string()).collect();
//!     format!("{} values: {}", set.len(), values.join(" "))
//! }
//!
//! let compact = CompactSet::try_from(vec![3, 1, 2]).unwrap();
//! let standard: BTreeSet<i32> = [1, 2, 3].into_iter().collect();
//! assert_eq!(describe(&compact), describe(&standard));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use crate::CompactSet;
use crate::iter::CompactSetIterator;

/// Read-only access to a finite set of distinct `i32` values.
pub trait ReadOnlySet {
    /// Iterator returned by [`iter_ascending`](Self::iter_ascending).
    type Iter<'a>: Iterator<Item = i32>
    where
        Self: 'a;

    /// Returns the number of values in the set.
    fn len(&self) -> usize;

    /// Returns `true` if the set holds no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `value` is in the set.
    fn contains_value(&self, value: i32) -> bool;

    /// Iterates over the values in ascending order, each exactly once.
    fn iter_ascending(&self) -> Self::Iter<'_>;
}

impl ReadOnlySet for CompactSet {
    type Iter<'a> = CompactSetIterator;

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    #[inline]
    fn contains_value(&self, value: i32) -> bool {
        self.contains(value)
    }

    #[inline]
    fn iter_ascending(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl ReadOnlySet for BTreeSet<i32> {
    type Iter<'a> = std::iter::Copied<std::collections::btree_set::Iter<'a, i32>>;

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    #[inline]
    fn contains_value(&self, value: i32) -> bool {
        self.contains(&value)
    }

    #[inline]
    fn iter_ascending(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }
}

impl<S: BuildHasher> ReadOnlySet for HashSet<i32, S> {
    type Iter<'a>
        = std::vec::IntoIter<i32>
    where
        Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    #[inline]
    fn contains_value(&self, value: i32) -> bool {
        self.contains(&value)
    }

    fn iter_ascending(&self) -> Self::Iter<'_> {
        let mut values: Vec<i32> = self.iter().copied().collect();
        values.sort_unstable();
        values.into_iter()
    }
}
