use tracing::debug;

use super::types::{MetricController, MetricServiceType};
use crate::error::LifecycleError;
use crate::fact::{Fact, FactProcessor};

/// Stand-in for builds without telemetry. Logs each call, records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugMetricController;

impl DebugMetricController {
    pub fn new() -> Self {
        Self
    }
}

impl MetricController for DebugMetricController {
    fn start(&self, kind: MetricServiceType) -> Result<(), LifecycleError> {
        debug!(%kind, "DebugMetricController: start");
        Ok(())
    }

    fn stop(&self, kind: MetricServiceType) -> Result<(), LifecycleError> {
        debug!(%kind, "DebugMetricController: stop");
        Ok(())
    }

    fn is_running(&self, _kind: MetricServiceType) -> bool {
        false
    }
}

impl FactProcessor for DebugMetricController {
    fn on_fact(&self, fact: &Fact) {
        debug!(?fact, "DebugMetricController: fact");
    }
}
