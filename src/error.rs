use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::controller::types::MetricServiceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Stop,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleAction::Start => f.write_str("start"),
            LifecycleAction::Stop => f.write_str("stop"),
        }
    }
}

/// A single service that failed during a start/stop fan-out.
#[derive(Debug, Error)]
#[error("service `{service}` failed: {error:#}")]
pub struct ServiceFailure {
    pub service: String,
    pub error: anyhow::Error,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Every matching service was attempted; these are the ones that failed.
    #[error("{} {kind} metrics service(s) failed to {action}", .failures.len())]
    Services {
        kind: MetricServiceType,
        action: LifecycleAction,
        failures: Vec<ServiceFailure>,
    },
}

impl LifecycleError {
    pub fn failures(&self) -> &[ServiceFailure] {
        match self {
            LifecycleError::Services { failures, .. } => failures,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("fact pump has shut down")]
    Closed,
    #[error("fact queue is full")]
    Full,
}
