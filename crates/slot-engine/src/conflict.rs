//! Detect bookings that would double-book a service.
//!
//! Slot generation already filters against the snapshot it was given, but a
//! slot can be taken between being shown and being committed. Callers re-check
//! the proposal against the latest bookings with [`find_conflicts`] before
//! writing. Adjacent bookings (one ends exactly when the other starts) are NOT
//! conflicts.

use crate::booking::Booking;

/// An existing booking that a proposed booking would overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub proposed: Booking,
    pub existing: Booking,
    pub overlap_minutes: i64,
}

/// Find every booking in `existing` that overlaps `proposed`.
///
/// Only bookings of the same service on the same date can conflict. The
/// overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(proposed: &Booking, existing: &[Booking]) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|b| proposed.overlaps(b))
        .map(|b| {
            let overlap_start = proposed.start.max(b.start);
            let overlap_end = proposed.end.min(b.end);
            Conflict {
                proposed: proposed.clone(),
                existing: b.clone(),
                overlap_minutes: i64::from(overlap_end) - i64::from(overlap_start),
            }
        })
        .collect()
}
