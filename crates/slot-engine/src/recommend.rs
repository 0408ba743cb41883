//! Pick slots that pack new appointments tightly around existing ones.
//!
//! Every candidate is scored by its distance in minutes to the nearest booking
//! boundary of the day, where a boundary is either a booking's start or its
//! end. Lower is tighter; ties go to the earlier start. This is the only
//! ranking rule in the crate.

use std::collections::HashSet;

use crate::booking::{Booking, Slot};
use crate::calendar::minutes_between;

/// Maximum number of recommended slots.
pub const RECOMMENDATION_LIMIT: usize = 4;

/// Recommend up to [`RECOMMENDATION_LIMIT`] slots from `slots`.
///
/// Returns an empty list when there are no slots or no bookings: on an
/// otherwise open day there is nothing to pack against.
pub fn recommend(slots: &[Slot], bookings: &[Booking]) -> Vec<Slot> {
    recommend_up_to(slots, bookings, RECOMMENDATION_LIMIT)
}

/// [`recommend`] with an explicit limit.
pub fn recommend_up_to(slots: &[Slot], bookings: &[Booking], limit: usize) -> Vec<Slot> {
    if slots.is_empty() || bookings.is_empty() || limit == 0 {
        return Vec::new();
    }

    let boundaries: Vec<_> = bookings
        .iter()
        .flat_map(|b| [b.start_at(), b.end_at()])
        .collect();

    let mut scored: Vec<(i64, Slot)> = slots
        .iter()
        .map(|slot| {
            let nearest = boundaries
                .iter()
                .map(|boundary| minutes_between(slot.start, *boundary).abs())
                .min()
                .unwrap_or(i64::MAX);
            (nearest, *slot)
        })
        .collect();
    scored.sort_by_key(|(distance, slot)| (*distance, slot.start));

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .map(|(_, slot)| slot)
        .filter(|slot| seen.insert(slot.start))
        .take(limit)
        .collect()
}

/// Slots from `slots` that are not in `recommended`, in their original order.
pub fn remaining_slots(slots: &[Slot], recommended: &[Slot]) -> Vec<Slot> {
    let picked: HashSet<_> = recommended.iter().map(|s| s.start).collect();
    slots
        .iter()
        .filter(|s| !picked.contains(&s.start))
        .copied()
        .collect()
}
