//! Vector clocks and the shared clock table.
//!
//! A [`VectorClock`] is a fixed-length vector of event counters, one slot
//! per participating process. The [`ClockTable`] owns one clock row per
//! process and serializes every read and write behind a single lock, so
//! processes never hold a live alias to shared clock state.
//!
//! # Invariants
//!
//! - Every slot is monotonically non-decreasing over the life of the table.
//! - Slot `i` of row `i` increases by exactly 1 per local event (a send, or
//!   a merge-accepted receive), and only then.
//! - Row length equals the process count fixed at construction; rows are
//!   never resized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// Identifier of a participating process, valid in `[0, N)` for a table of
/// `N` processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// The row index this id addresses.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ProcessId {
    fn from(id: usize) -> Self {
        ProcessId(id)
    }
}

/// Fixed-length vector of per-process event counters.
///
/// Slot `i` counts events known to have occurred at process `i`. Values are
/// always handed out as independent copies; a snapshot embedded in a
/// dispatched message is never retroactively altered by later merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorClock(Vec<u64>);

impl VectorClock {
    /// A zero-filled clock for `n` processes.
    pub fn zeroed(n: usize) -> Self {
        VectorClock(vec![0; n])
    }

    /// Number of slots (the process count).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the clock has no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The counter in slot `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. Passing an invalid process id is a
    /// programmer error and fails fast rather than being clamped.
    pub fn slot(&self, id: ProcessId) -> u64 {
        self.0[id.index()]
    }

    /// All slots in process-id order.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Merge `other` into `self` by taking the component-wise maximum.
    ///
    /// # Panics
    ///
    /// Panics if the two clocks have different lengths. Clocks of mixed
    /// lengths cannot exist in a well-constructed system, so a mismatch is
    /// a programmer error.
    pub fn merge_from(&mut self, other: &VectorClock) {
        assert_eq!(
            self.0.len(),
            other.0.len(),
            "cannot merge clocks of different lengths"
        );
        for (slot, incoming) in self.0.iter_mut().zip(&other.0) {
            if *incoming > *slot {
                *slot = *incoming;
            }
        }
    }

    /// Record one local event at process `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn increment(&mut self, id: ProcessId) {
        self.0[id.index()] += 1;
    }

    /// Whether this clock carries causal information `local` lacks.
    ///
    /// True iff any slot of `self` is strictly greater than the matching
    /// slot of `local` — the incoming clock is not entirely dominated by
    /// the local one. This is deliberately an asymmetric novelty test, not
    /// the full three-way happens-before comparison: a clock that is
    /// concurrent with `local` still advances it.
    ///
    /// # Panics
    ///
    /// Panics if the two clocks have different lengths.
    pub fn advances(&self, local: &VectorClock) -> bool {
        assert_eq!(
            self.0.len(),
            local.0.len(),
            "cannot compare clocks of different lengths"
        );
        self.0.iter().zip(&local.0).any(|(r, l)| r > l)
    }
}

impl From<Vec<u64>> for VectorClock {
    fn from(slots: Vec<u64>) -> Self {
        VectorClock(slots)
    }
}

impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, slot) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{slot}")?;
        }
        write!(f, "]")
    }
}

/// Shared table of per-process vector clocks.
///
/// One row per process, all rows guarded by a single mutex: rows are small
/// and update frequency is low, so whole-table serialization buys a
/// trivially correct implementation at the cost of row-level parallelism.
/// All mutation of clock state goes through [`update`](ClockTable::update);
/// reads hand out copies, never live references.
///
/// The lock is a `std::sync::Mutex` and is never held across an await.
pub struct ClockTable {
    rows: Mutex<Vec<VectorClock>>,
    processes: usize,
}

impl ClockTable {
    /// A zero-initialized table for `n` processes.
    pub fn new(n: usize) -> Self {
        ClockTable {
            rows: Mutex::new(vec![VectorClock::zeroed(n); n]),
            processes: n,
        }
    }

    /// Number of processes the table was built for.
    pub fn len(&self) -> usize {
        self.processes
    }

    /// `true` if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.processes == 0
    }

    /// Merge-and-increment row `id` atomically, returning the resulting
    /// snapshot.
    ///
    /// If `incoming` is present its slots are merged into the row by
    /// component-wise maximum first; the row's own slot is then
    /// unconditionally incremented by 1, counting the local event (a send,
    /// or a merge-accepted receive). Atomic with respect to every other
    /// `update` and [`get`](ClockTable::get) on any row.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or `incoming` has the wrong length.
    pub fn update(&self, id: ProcessId, incoming: Option<&VectorClock>) -> VectorClock {
        let mut rows = self.rows.lock().expect("clock table lock poisoned");
        let row = &mut rows[id.index()];
        if let Some(incoming) = incoming {
            row.merge_from(incoming);
        }
        row.increment(id);
        row.clone()
    }

    /// An independent snapshot of row `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn get(&self, id: ProcessId) -> VectorClock {
        let rows = self.rows.lock().expect("clock table lock poisoned");
        rows[id.index()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_clock() {
        let clock = VectorClock::zeroed(3);
        assert_eq!(clock.as_slice(), &[0, 0, 0]);
        assert_eq!(clock.len(), 3);
    }

    #[test]
    fn test_merge_takes_componentwise_max() {
        let mut local = VectorClock::from(vec![3, 0, 5]);
        local.merge_from(&VectorClock::from(vec![1, 4, 5]));
        assert_eq!(local.as_slice(), &[3, 4, 5]);
    }

    #[test]
    fn test_advances_on_any_greater_component() {
        let local = VectorClock::from(vec![2, 2, 2]);
        assert!(VectorClock::from(vec![0, 0, 3]).advances(&local));
        assert!(VectorClock::from(vec![9, 0, 0]).advances(&local));
    }

    #[test]
    fn test_dominated_clock_does_not_advance() {
        let local = VectorClock::from(vec![2, 2, 2]);
        assert!(!VectorClock::from(vec![2, 2, 2]).advances(&local));
        assert!(!VectorClock::from(vec![0, 1, 2]).advances(&local));
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_advances_rejects_length_mismatch() {
        let local = VectorClock::zeroed(3);
        VectorClock::zeroed(2).advances(&local);
    }

    #[test]
    fn test_display_renders_bracketed_slots() {
        assert_eq!(VectorClock::from(vec![1, 0, 2]).to_string(), "[1, 0, 2]");
    }

    #[test]
    fn test_table_starts_zero_filled() {
        let table = ClockTable::new(3);
        for id in 0..3 {
            assert_eq!(table.get(ProcessId(id)).as_slice(), &[0, 0, 0]);
        }
    }

    #[test]
    fn test_update_without_incoming_increments_own_slot() {
        let table = ClockTable::new(3);
        let row = table.update(ProcessId(1), None);
        assert_eq!(row.as_slice(), &[0, 1, 0]);
        assert_eq!(table.get(ProcessId(1)), row);
    }

    #[test]
    fn test_update_merges_then_increments() {
        let table = ClockTable::new(3);
        table.update(ProcessId(2), None);
        let row = table.update(ProcessId(2), Some(&VectorClock::from(vec![4, 0, 0])));
        assert_eq!(row.as_slice(), &[4, 0, 2]);
    }

    #[test]
    fn test_snapshots_are_independent_copies() {
        let table = ClockTable::new(2);
        let before = table.get(ProcessId(0));
        table.update(ProcessId(0), None);
        assert_eq!(before.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_rows_are_monotonic_across_updates() {
        let table = ClockTable::new(3);
        let mut previous = table.get(ProcessId(0));
        for round in 0u64..4 {
            let incoming = VectorClock::from(vec![round, round * 2, 1]);
            let current = table.update(ProcessId(0), Some(&incoming));
            for (now, then) in current.as_slice().iter().zip(previous.as_slice()) {
                assert!(now >= then, "slot regressed: {current} vs {previous}");
            }
            previous = current;
        }
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_id_fails_fast() {
        let table = ClockTable::new(2);
        table.get(ProcessId(2));
    }
}
