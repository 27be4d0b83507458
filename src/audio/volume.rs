//! Saved volume preference
//!
//! The user-facing volume is persisted as a single string value. Zero means
//! "muted for now", never "forget my level", so it is never written.

use std::{collections::HashMap, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::constants::audio;

/// Key-value storage for user preferences
///
/// Stands in for whatever the host persists settings with.
pub trait PreferenceStore {
    /// Reads the value stored under `key`
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`
    fn write(&mut self, key: &str, value: &str);
}

/// Preference store kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// A stored volume that cannot be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{0}` is not a usable volume")]
pub struct InvalidVolume(pub String);

/// Last non-zero volume the user chose, in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavedVolume(f32);

impl Default for SavedVolume {
    fn default() -> Self {
        Self(audio::DEFAULT_VOLUME)
    }
}

impl FromStr for SavedVolume {
    type Err = InvalidVolume;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidVolume(s.to_owned()))
    }
}

impl SavedVolume {
    /// Creates a saved volume, `None` for zero or anything outside (0, 1]
    pub fn new(level: f32) -> Option<Self> {
        (level.is_finite() && level > 0.0 && level <= 1.0).then_some(Self(level))
    }

    /// The volume level
    pub fn get(self) -> f32 {
        self.0
    }

    /// Reads the saved volume, falling back to the default when it is
    /// missing or unusable
    pub fn restore<P: PreferenceStore>(store: &P) -> Self {
        match store.read(audio::VOLUME_KEY).map(|raw| raw.parse::<Self>()) {
            Some(Ok(volume)) => volume,
            Some(Err(e)) => {
                log::warn!("falling back to the default volume: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Writes the volume to `store`
    pub fn persist<P: PreferenceStore>(self, store: &mut P) {
        store.write(audio::VOLUME_KEY, &self.0.to_string());
    }
}
