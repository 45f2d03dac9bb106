//! Ordering key for queue entries.

use std::cmp::Ordering;

/// Priority plus insertion sequence.
///
/// Ordered so that iteration runs from highest priority to lowest and, among
/// equal priorities, from earliest inserted to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryKey {
    pub(crate) priority: i64,
    pub(crate) seq: u64,
}

impl PartialOrd for EntryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse on priority: higher priorities sort first
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}
