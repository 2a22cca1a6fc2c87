use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Settings the translator writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    TopSitesSize,
    InstalledAddonsCount,
    InstalledAddonsList,
    EnabledAddonsCount,
    EnabledAddonsList,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::TopSitesSize => "topSitesSize",
            SettingKey::InstalledAddonsCount => "installedAddonsCount",
            SettingKey::InstalledAddonsList => "installedAddonsList",
            SettingKey::EnabledAddonsCount => "enabledAddonsCount",
            SettingKey::EnabledAddonsList => "enabledAddonsList",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    Text(String),
}

impl SettingValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(n) => Some(*n),
            SettingValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(text) => Some(text),
            SettingValue::Int(_) => None,
        }
    }
}

/// Key-value settings persistence owned by the host application.
pub trait SettingsStore: Send + Sync {
    fn put(&self, key: SettingKey, value: SettingValue);
    fn get(&self, key: SettingKey) -> Option<SettingValue>;
}

#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: Mutex<BTreeMap<SettingKey, SettingValue>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SettingKey, SettingValue>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn int(&self, key: SettingKey) -> Option<i64> {
        self.lock().get(&key).and_then(SettingValue::as_int)
    }

    pub fn text(&self, key: SettingKey) -> Option<String> {
        self.lock()
            .get(&key)
            .and_then(SettingValue::as_text)
            .map(str::to_string)
    }

    pub fn top_sites_size(&self) -> Option<i64> {
        self.int(SettingKey::TopSitesSize)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every stored value keyed by its settings name.
    pub fn snapshot(&self) -> BTreeMap<&'static str, SettingValue> {
        self.lock()
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect()
    }
}

impl SettingsStore for InMemorySettings {
    fn put(&self, key: SettingKey, value: SettingValue) {
        self.lock().insert(key, value);
    }

    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.lock().get(&key).cloned()
    }
}
