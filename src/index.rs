//! Sorted host index with logarithmic membership lookup.
//!
//! The index is built once at startup and never mutated afterwards, so a
//! plain sorted `Vec<String>` with binary search beats any tree or hash
//! structure here: O(log n) lookups, zero per-entry overhead, and the
//! whole list stays cache-friendly.

use std::cmp::Ordering;

/// Immutable, lexicographically sorted list of host names.
///
/// Lookup correctness depends on the backing sequence staying sorted
/// ascending (byte-wise ordering) and duplicate-free. The index never
/// re-checks this at runtime; see [`HostIndex::from_sorted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIndex {
    hosts: Vec<String>,
}

impl HostIndex {
    /// Creates an index from an already sorted, de-duplicated host list.
    ///
    /// # Precondition
    ///
    /// `hosts` must be sorted ascending by byte-wise string ordering and
    /// contain no duplicates. A violated precondition does not panic or
    /// error; [`contains`](Self::contains) simply returns wrong answers.
    /// Use [`from_unsorted`](Self::from_unsorted) when the input order is
    /// not guaranteed.
    pub fn from_sorted(hosts: Vec<String>) -> Self {
        debug_assert!(
            hosts.windows(2).all(|w| w[0] < w[1]),
            "host list must be sorted ascending and duplicate-free"
        );
        Self { hosts }
    }

    /// Creates an index from an arbitrary host list, sorting and
    /// de-duplicating it first.
    pub fn from_unsorted(mut hosts: Vec<String>) -> Self {
        hosts.sort_unstable();
        hosts.dedup();
        Self { hosts }
    }

    /// Returns true if `host` is present in the index.
    ///
    /// Classic binary search over inclusive `[left, right]` bounds; the
    /// search ends when the bounds invert. An empty index always yields
    /// false. O(log n) time, no side effects.
    pub fn contains(&self, host: &str) -> bool {
        let mut left: isize = 0;
        let mut right: isize = self.hosts.len() as isize - 1;

        while left <= right {
            // Floor midpoint; left + (right - left) / 2 cannot overflow.
            let mid = left + (right - left) / 2;
            match host.cmp(self.hosts[mid as usize].as_str()) {
                Ordering::Equal => return true,
                Ordering::Less => right = mid - 1,
                Ordering::Greater => left = mid + 1,
            }
        }

        false
    }

    /// Number of hosts in the index.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns true if the index holds no hosts.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// The underlying sorted host list.
    pub fn as_slice(&self) -> &[String] {
        &self.hosts
    }
}
