//! Storage seam for bookings.
//!
//! The engine never writes on its own. Callers load a snapshot, compute slots,
//! and commit through [`commit_bookings`], which re-validates each proposal
//! against the latest stored bookings before appending.

use std::convert::Infallible;

use tracing::debug;

use crate::booking::Booking;
use crate::calendar::{date_key, minutes_to_clock};
use crate::conflict::{find_conflicts, Conflict};

/// Load-on-start, save-on-write booking storage.
pub trait BookingRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_bookings(&self) -> Result<Vec<Booking>, Self::Error>;

    /// Replace the stored bookings with `bookings`.
    fn save_bookings(&mut self, bookings: &[Booking]) -> Result<(), Self::Error>;
}

/// Bookings held in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    bookings: Vec<Booking>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self { bookings }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }
}

impl BookingRepository for MemoryRepository {
    type Error = Infallible;

    fn load_bookings(&self) -> Result<Vec<Booking>, Infallible> {
        Ok(self.bookings.clone())
    }

    fn save_bookings(&mut self, bookings: &[Booking]) -> Result<(), Infallible> {
        self.bookings = bookings.to_vec();
        Ok(())
    }
}

/// Result of committing a batch of proposed bookings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitOutcome {
    pub accepted: Vec<Booking>,
    pub rejected: Vec<Conflict>,
}

impl CommitOutcome {
    pub fn is_fully_accepted(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Append `proposed` to the repository, skipping any booking that overlaps a
/// stored booking or an earlier proposal of the same batch.
///
/// The repository is saved once, and only if something was accepted.
///
/// # Errors
/// Propagates the repository's load or save error.
pub fn commit_bookings<R: BookingRepository>(
    repo: &mut R,
    proposed: &[Booking],
) -> Result<CommitOutcome, R::Error> {
    let mut bookings = repo.load_bookings()?;
    let mut outcome = CommitOutcome::default();

    for booking in proposed {
        let conflicts = find_conflicts(booking, &bookings);
        if conflicts.is_empty() {
            bookings.push(booking.clone());
            outcome.accepted.push(booking.clone());
        } else {
            debug!(
                service = %booking.service_id,
                day = %date_key(booking.date),
                start = %minutes_to_clock(booking.start),
                conflicts = conflicts.len(),
                "rejected overlapping booking"
            );
            outcome.rejected.extend(conflicts);
        }
    }

    if !outcome.accepted.is_empty() {
        repo.save_bookings(&bookings)?;
    }
    Ok(outcome)
}
