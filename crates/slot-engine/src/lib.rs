//! # slot-engine
//!
//! Bookable time slots for a small set of recurring weekly services.
//!
//! The engine reconciles a service's default weekly windows with
//! administrator overrides, blackout dates and existing bookings, then ranks
//! the resulting slots so new appointments land back-to-back with existing
//! ones. Every operation is a pure function of its inputs; the caller owns
//! storage and decides when to commit.
//!
//! ## Modules
//!
//! - [`calendar`] — date keys, Monday-aligned weeks, `HH:MM` ↔ minutes
//! - [`service`] — service catalog and default weekly windows
//! - [`availability`] — overrides, blackouts, effective windows for a day
//! - [`slots`] — grid-aligned slot generation with lead time and overlap filtering
//! - [`recommend`] — nearest-booking-boundary ranking
//! - [`recurring`] — weekly repetition of a chosen slot
//! - [`conflict`] — commit-time double-booking detection
//! - [`repository`] — booking storage seam and batch commit
//! - [`planner`] — day and grid queries over one state snapshot
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod conflict;
pub mod error;
pub mod planner;
pub mod recommend;
pub mod recurring;
pub mod repository;
pub mod service;
pub mod slots;

pub use availability::{effective_windows, BlackoutSet, DayOverride, OverrideSet};
pub use booking::{Booking, Slot};
pub use conflict::{find_conflicts, Conflict};
pub use error::SlotError;
pub use planner::{AvailabilitySnapshot, DayAvailability, DaySlots};
pub use recommend::recommend;
pub use recurring::expand_recurring;
pub use repository::{commit_bookings, BookingRepository, CommitOutcome, MemoryRepository};
pub use service::{Service, ServiceCatalog, Window};
pub use slots::generate_slots;
