use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// How the release controller protects its running-state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleGuard {
    /// Lock only to read and to flip the flag. Assumes the host already
    /// serializes start/stop calls; two racing `start`s can both reach the
    /// services before either flips the flag.
    #[default]
    CheckAndSet,
    /// Hold the lock across the whole service fan-out, so concurrent
    /// start/stop calls for any type queue up behind each other.
    /// Services must not call back into the controller from start/stop.
    Serialized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// `false` builds the debug controller, which only logs.
    pub telemetry: bool,
    pub lifecycle_guard: LifecycleGuard,
    /// Queue depth of the async fact channel.
    pub channel_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            telemetry: true,
            lifecycle_guard: LifecycleGuard::default(),
            channel_capacity: 100,
        }
    }
}

impl ControllerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
