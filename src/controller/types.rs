use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LifecycleError;
use crate::fact::FactProcessor;

/// Which consent category a backend service falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricServiceType {
    Data,
    Marketing,
}

impl fmt::Display for MetricServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricServiceType::Data => f.write_str("data"),
            MetricServiceType::Marketing => f.write_str("marketing"),
        }
    }
}

/// A pluggable metrics backend. The controller only ever starts and stops it.
pub trait MetricsService: Send + Sync {
    fn name(&self) -> &str;
    fn service_type(&self) -> MetricServiceType;
    fn start(&self) -> anyhow::Result<()>;
    fn stop(&self) -> anyhow::Result<()>;
}

/// Lifecycle contract shared by the release and debug controllers.
pub trait MetricController: FactProcessor {
    fn start(&self, kind: MetricServiceType) -> Result<(), LifecycleError>;
    fn stop(&self, kind: MetricServiceType) -> Result<(), LifecycleError>;
    fn is_running(&self, kind: MetricServiceType) -> bool;
}
