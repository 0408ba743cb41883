//! JSON directory store for bookings and administrator settings.
//!
//! ```text
//! <data-dir>/
//!   bookings.json    <- [{serviceId, date, start, end}, ...]
//!   overrides.json   <- {serviceId: {weekday: {start, end} | null}}
//!   blackouts.json   <- ["YYYY-MM-DD", ...]
//! ```
//!
//! A missing file reads as empty. Every write replaces the whole file; there is
//! no locking between concurrent processes.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use slot_engine::{BlackoutSet, Booking, BookingRepository, OverrideSet};
use thiserror::Error;
use tracing::debug;

const BOOKINGS_FILE: &str = "bookings.json";
const OVERRIDES_FILE: &str = "overrides.json";
const BLACKOUTS_FILE: &str = "blackouts.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn load_overrides(&self) -> Result<OverrideSet, StoreError> {
        self.read(OVERRIDES_FILE)
    }

    pub fn save_overrides(&self, overrides: &OverrideSet) -> Result<(), StoreError> {
        self.write(OVERRIDES_FILE, overrides)
    }

    pub fn load_blackouts(&self) -> Result<BlackoutSet, StoreError> {
        self.read(BLACKOUTS_FILE)
    }

    pub fn save_blackouts(&self, blackouts: &BlackoutSet) -> Result<(), StoreError> {
        self.write(BLACKOUTS_FILE, blackouts)
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.base_dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let json = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| StoreError::Json { path, source })
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.base_dir.join(name);
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }
}

impl BookingRepository for JsonStore {
    type Error = StoreError;

    fn load_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        self.read(BOOKINGS_FILE)
    }

    fn save_bookings(&mut self, bookings: &[Booking]) -> Result<(), StoreError> {
        let mut sorted = bookings.to_vec();
        sorted.sort_by(|a, b| (a.date, a.start, &a.service_id).cmp(&(b.date, b.start, &b.service_id)));
        self.write(BOOKINGS_FILE, &sorted)
    }
}
