/// Persistence of the muted domain list in `storage.local`
use std::collections::HashMap;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{STORAGE_AREA, Settings};
use crate::error::HostError;
use crate::host::KeyValueStore;
use crate::muted_set::MutedDomains;

/// One entry of a `storage.onChanged` notification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
}

/// Changed keys of one storage area
pub type StorageChanges = HashMap<String, StorageChange>;

/// Loads and saves the muted domain list under a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStateStore {
    key: String,
}

impl DomainStateStore {
    pub fn new(key: &str) -> Self {
        DomainStateStore {
            key: key.to_string(),
        }
    }

    /// Read the stored list. Absent, unreadable and malformed values all
    /// come back as an empty list.
    pub async fn load<S: KeyValueStore>(&self, store: &S) -> MutedDomains {
        match self.try_load(store).await {
            Ok(domains) => {
                info!("Loaded muted domains: {:?}", domains.as_slice());
                domains
            }
            Err(e) => {
                error!("Error loading muted domains: {}", e);
                MutedDomains::new()
            }
        }
    }

    async fn try_load<S: KeyValueStore>(&self, store: &S) -> Result<MutedDomains, HostError> {
        match store.get(&self.key).await? {
            None | Some(Value::Null) => Ok(MutedDomains::new()),
            Some(value) => decode_domains(value),
        }
    }

    /// Replace the stored list. Failures are logged and dropped; the caller's
    /// in-memory copy stays authoritative.
    pub async fn save<S: KeyValueStore>(&self, store: &S, domains: &MutedDomains) {
        let value = Value::from(domains.as_slice().to_vec());

        match store.set(&self.key, value).await {
            Ok(()) => info!("Saved muted domains: {:?}", domains.as_slice()),
            Err(e) => error!("Error saving muted domains: {}", e),
        }
    }

    /// The new list carried by a storage notification, if it touches our key
    ///
    /// A removed key reads as an empty list. A value that cannot be decoded
    /// is ignored so the current cache survives.
    pub fn decode_change(&self, area: &str, changes: &StorageChanges) -> Option<MutedDomains> {
        if area != STORAGE_AREA {
            return None;
        }

        let change = changes.get(&self.key)?;
        match &change.new_value {
            None | Some(Value::Null) => Some(MutedDomains::new()),
            Some(value) => match decode_domains(value.clone()) {
                Ok(domains) => Some(domains),
                Err(e) => {
                    warn!("Ignoring malformed muted domain change: {}", e);
                    None
                }
            },
        }
    }
}

fn decode_domains(value: Value) -> Result<MutedDomains, HostError> {
    serde_json::from_value(value).map_err(|e| HostError::Decode(e.to_string()))
}

/// Read user settings, falling back to defaults
pub async fn load_settings<S: KeyValueStore>(store: &S, key: &str) -> Settings {
    match store.get(key).await {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings: {}", e);
            Settings::default()
        }),
        Ok(None) => Settings::default(),
        Err(e) => {
            error!("Error loading settings: {}", e);
            Settings::default()
        }
    }
}

pub async fn save_settings<S: KeyValueStore>(store: &S, key: &str, settings: &Settings) {
    let value = match serde_json::to_value(settings) {
        Ok(value) => value,
        Err(e) => {
            error!("Error serializing settings: {}", e);
            return;
        }
    };

    match store.set(key, value).await {
        Ok(()) => debug!("Saved settings: {:?}", settings),
        Err(e) => error!("Error saving settings: {}", e),
    }
}

/// The new settings carried by a storage notification, if any
pub fn decode_settings_change(area: &str, key: &str, changes: &StorageChanges) -> Option<Settings> {
    if area != STORAGE_AREA {
        return None;
    }

    let change = changes.get(key)?;
    match &change.new_value {
        None | Some(Value::Null) => Some(Settings::default()),
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!("Ignoring malformed settings change: {}", e);
                None
            }
        },
    }
}
