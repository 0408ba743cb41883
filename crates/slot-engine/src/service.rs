//! Service definitions and their default weekly windows.
//!
//! Services are static reference data. They are parsed from raw JSON records
//! (`ServiceConfig`) and validated once into immutable [`Service`] values, so
//! every configuration problem surfaces when the catalog is loaded rather than
//! during a slot query.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::calendar::{clock_to_minutes, minutes_to_clock, MINUTES_PER_DAY};
use crate::error::{Result, SlotError};

/// A contiguous open interval within one day, in minutes since midnight.
///
/// Serialized as `{"start": "HH:MM", "end": "HH:MM"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowConfig", into = "WindowConfig")]
pub struct Window {
    start: u32,
    end: u32,
}

impl Window {
    /// # Errors
    /// Returns `SlotError::Configuration` unless `start < end`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start >= end {
            return Err(SlotError::Configuration(format!(
                "window start {} must be before end {}",
                minutes_to_clock(start),
                minutes_to_clock(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a window from two `HH:MM` strings.
    ///
    /// # Errors
    /// `SlotError::Format` for a malformed clock string, `SlotError::Configuration`
    /// when the window is empty or inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(clock_to_minutes(start)?, clock_to_minutes(end)?)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn length_minutes(&self) -> u32 {
        self.end - self.start
    }
}

/// Wire shape of a [`Window`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: String,
    pub end: String,
}

impl TryFrom<WindowConfig> for Window {
    type Error = SlotError;

    fn try_from(raw: WindowConfig) -> Result<Self> {
        Window::parse(&raw.start, &raw.end)
    }
}

impl From<Window> for WindowConfig {
    fn from(w: Window) -> Self {
        Self {
            start: minutes_to_clock(w.start),
            end: minutes_to_clock(w.end),
        }
    }
}

/// Raw service record as it appears in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub id: String,
    pub name: String,
    pub duration_min: i64,
    pub slot_grid_min: i64,
    #[serde(default)]
    pub lead_time_min: i64,
    /// Weekday (0=Sunday..6=Saturday) to default windows.
    #[serde(default)]
    pub windows: BTreeMap<u8, Vec<WindowConfig>>,
}

/// A bookable service with validated scheduling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Appointment length, always positive.
    pub duration_min: u32,
    /// Step between candidate starts, always positive.
    pub slot_grid_min: u32,
    /// Minimum notice between "now" and a slot start.
    pub lead_time_min: u32,
    windows: BTreeMap<u8, Vec<Window>>,
}

impl Service {
    /// Validate and build a service.
    ///
    /// # Errors
    /// Returns `SlotError::Configuration` when the duration or grid is zero or
    /// longer than a day, or a weekday key is outside `0..=6`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration_min: u32,
        slot_grid_min: u32,
        lead_time_min: u32,
        windows: BTreeMap<u8, Vec<Window>>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SlotError::Configuration("service id must not be empty".to_string()));
        }
        if duration_min == 0 {
            return Err(SlotError::Configuration(format!(
                "service '{}': durationMin must be positive",
                id
            )));
        }
        if slot_grid_min == 0 {
            return Err(SlotError::Configuration(format!(
                "service '{}': slotGridMin must be positive",
                id
            )));
        }
        if duration_min > MINUTES_PER_DAY {
            return Err(SlotError::Configuration(format!(
                "service '{}': durationMin {} exceeds one day",
                id, duration_min
            )));
        }
        if slot_grid_min > MINUTES_PER_DAY {
            return Err(SlotError::Configuration(format!(
                "service '{}': slotGridMin {} exceeds one day",
                id, slot_grid_min
            )));
        }
        if let Some(weekday) = windows.keys().find(|d| **d > 6) {
            return Err(SlotError::Configuration(format!(
                "service '{}': weekday {} is outside 0..=6",
                id, weekday
            )));
        }

        let mut windows = windows;
        for day in windows.values_mut() {
            day.sort_by_key(|w| (w.start, w.end));
        }

        Ok(Self {
            id,
            name: name.into(),
            duration_min,
            slot_grid_min,
            lead_time_min,
            windows,
        })
    }

    /// Default windows for a weekday (0=Sunday..6=Saturday); empty when the
    /// service does not run that day.
    pub fn windows_for(&self, weekday: u8) -> &[Window] {
        self.windows.get(&weekday).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn weekly_windows(&self) -> &BTreeMap<u8, Vec<Window>> {
        &self.windows
    }
}

impl TryFrom<ServiceConfig> for Service {
    type Error = SlotError;

    fn try_from(raw: ServiceConfig) -> Result<Self> {
        let config_err =
            |msg: String| SlotError::Configuration(format!("service '{}': {}", raw.id, msg));

        // Negative numbers are configuration errors, not parse errors.
        let duration_min = u32::try_from(raw.duration_min)
            .map_err(|_| config_err(format!("durationMin must be positive, got {}", raw.duration_min)))?;
        let slot_grid_min = u32::try_from(raw.slot_grid_min)
            .map_err(|_| config_err(format!("slotGridMin must be positive, got {}", raw.slot_grid_min)))?;
        let lead_time_min = u32::try_from(raw.lead_time_min)
            .map_err(|_| config_err(format!("leadTimeMin must not be negative, got {}", raw.lead_time_min)))?;

        let mut windows = BTreeMap::new();
        for (weekday, raw_windows) in &raw.windows {
            let parsed = raw_windows
                .iter()
                .map(|w| {
                    Window::parse(&w.start, &w.end).map_err(|e| match e {
                        SlotError::Configuration(msg) => config_err(msg),
                        other => other,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            windows.insert(*weekday, parsed);
        }

        Service::new(
            raw.id.clone(),
            raw.name,
            duration_min,
            slot_grid_min,
            lead_time_min,
            windows,
        )
    }
}

/// The set of services offered by one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    /// Validate raw records into a catalog. Service ids must be unique.
    ///
    /// # Errors
    /// Returns the first `SlotError::Configuration` or `SlotError::Format`
    /// found in any record.
    pub fn from_configs(configs: Vec<ServiceConfig>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut services = Vec::with_capacity(configs.len());
        for raw in configs {
            if !seen.insert(raw.id.clone()) {
                return Err(SlotError::Configuration(format!(
                    "duplicate service id '{}'",
                    raw.id
                )));
            }
            services.push(Service::try_from(raw)?);
        }
        Ok(Self { services })
    }

    /// Parse and validate a JSON array of service records.
    ///
    /// # Errors
    /// `SlotError::Parse` for structurally invalid JSON, otherwise as
    /// [`ServiceCatalog::from_configs`].
    pub fn from_json(json: &str) -> Result<Self> {
        let configs: Vec<ServiceConfig> = serde_json::from_str(json)?;
        Self::from_configs(configs)
    }

    /// The two services of the PT studio deployment.
    pub fn builtin() -> Self {
        let weekdays = |days: &[u8], start: u32, end: u32| -> BTreeMap<u8, Vec<Window>> {
            days.iter()
                .map(|d| (*d, vec![Window { start, end }]))
                .collect()
        };
        Self {
            services: vec![
                Service {
                    id: "pt_private".to_string(),
                    name: "PT @ Private Gym".to_string(),
                    duration_min: 45,
                    slot_grid_min: 15,
                    lead_time_min: 60,
                    windows: weekdays(&[1, 2, 3, 4, 5], 7 * 60, 13 * 60),
                },
                Service {
                    id: "pt_local".to_string(),
                    name: "PT @ Local Gym".to_string(),
                    duration_min: 45,
                    slot_grid_min: 15,
                    lead_time_min: 60,
                    windows: weekdays(&[1, 2, 3, 4], 13 * 60 + 30, 16 * 60 + 30),
                },
            ],
        }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// # Errors
    /// Returns `SlotError::UnknownService` when no service has this id.
    pub fn require(&self, id: &str) -> Result<&Service> {
        self.get(id)
            .ok_or_else(|| SlotError::UnknownService(id.to_string()))
    }
}
