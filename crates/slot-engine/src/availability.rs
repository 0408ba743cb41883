//! Effective opening hours for one service on one calendar day.
//!
//! Three tiers decide a day's windows, and exactly one of them is authoritative:
//!
//! 1. a blackout date closes every service,
//! 2. an administrator override for the service's weekday either closes it or
//!    replaces all default windows with a single window,
//! 3. otherwise the service's default windows for that weekday apply.
//!
//! Tiers never merge. An override window is the whole day, not an extra window.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calendar::{date_key, weekday_index};
use crate::error::SlotError;
use crate::service::{Service, Window};

/// Administrator override for one weekday of one service.
///
/// Serialized as the window itself, or `null` for a closed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Window>", into = "Option<Window>")]
pub enum DayOverride {
    /// No availability that weekday, whatever the defaults say.
    Closed,
    /// This window replaces every default window for that weekday.
    Open(Window),
}

impl From<Option<Window>> for DayOverride {
    fn from(value: Option<Window>) -> Self {
        match value {
            Some(w) => DayOverride::Open(w),
            None => DayOverride::Closed,
        }
    }
}

impl From<DayOverride> for Option<Window> {
    fn from(value: DayOverride) -> Self {
        match value {
            DayOverride::Open(w) => Some(w),
            DayOverride::Closed => None,
        }
    }
}

/// Per-service, per-weekday overrides.
///
/// A weekday with no entry falls back to the service defaults. The JSON form is
/// `{ serviceId: { weekday: {start,end} | null } }`; weekday keys outside
/// `0..=6` are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OverrideMap", into = "OverrideMap")]
pub struct OverrideSet {
    by_service: OverrideMap,
}

type OverrideMap = BTreeMap<String, BTreeMap<u8, DayOverride>>;

impl TryFrom<OverrideMap> for OverrideSet {
    type Error = SlotError;

    fn try_from(by_service: OverrideMap) -> Result<Self, SlotError> {
        for (service_id, days) in &by_service {
            if let Some(weekday) = days.keys().find(|d| **d > 6) {
                return Err(SlotError::Configuration(format!(
                    "override for '{}': weekday {} is outside 0..=6",
                    service_id, weekday
                )));
            }
        }
        Ok(Self { by_service })
    }
}

impl From<OverrideSet> for OverrideMap {
    fn from(set: OverrideSet) -> Self {
        set.by_service
    }
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, service_id: &str, weekday: u8) -> Option<DayOverride> {
        self.by_service
            .get(service_id)
            .and_then(|days| days.get(&weekday))
            .copied()
    }

    /// # Errors
    /// Returns `SlotError::Configuration` if `weekday` is outside `0..=6`.
    pub fn set(&mut self, service_id: &str, weekday: u8, value: DayOverride) -> Result<(), SlotError> {
        if weekday > 6 {
            return Err(SlotError::Configuration(format!(
                "override for '{}': weekday {} is outside 0..=6",
                service_id, weekday
            )));
        }
        self.by_service
            .entry(service_id.to_string())
            .or_default()
            .insert(weekday, value);
        Ok(())
    }

    /// Remove an override so the weekday reverts to the service defaults.
    /// Returns the override that was removed, if any.
    pub fn clear(&mut self, service_id: &str, weekday: u8) -> Option<DayOverride> {
        let days = self.by_service.get_mut(service_id)?;
        let removed = days.remove(&weekday);
        if days.is_empty() {
            self.by_service.remove(service_id);
        }
        removed
    }

    /// All overrides for one service, ordered by weekday.
    pub fn for_service(&self, service_id: &str) -> impl Iterator<Item = (u8, DayOverride)> + '_ {
        self.by_service
            .get(service_id)
            .into_iter()
            .flat_map(|days| days.iter().map(|(d, o)| (*d, *o)))
    }

    pub fn is_empty(&self) -> bool {
        self.by_service.values().all(BTreeMap::is_empty)
    }
}

/// Calendar dates on which every service is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlackoutSet {
    dates: BTreeSet<NaiveDate>,
}

impl BlackoutSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the date was already blacked out.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for BlackoutSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Resolve the open windows of `service` on `day`.
///
/// An empty result means the day is closed for this service, either by
/// blackout, by an explicit closure, or because the service has no default
/// windows on that weekday. It is never an error.
pub fn effective_windows(
    day: NaiveDate,
    service: &Service,
    overrides: &OverrideSet,
    blackouts: &BlackoutSet,
) -> Vec<Window> {
    if blackouts.contains(day) {
        trace!(service = %service.id, day = %date_key(day), "blackout date");
        return Vec::new();
    }

    let weekday = weekday_index(day);
    match overrides.get(&service.id, weekday) {
        Some(DayOverride::Closed) => {
            trace!(service = %service.id, weekday, "weekday closed by override");
            Vec::new()
        }
        Some(DayOverride::Open(window)) => vec![window],
        None => service.windows_for(weekday).to_vec(),
    }
}
