use std::sync::Arc;

use tracing::info;

use super::consent::Consent;
use super::debug::DebugMetricController;
use super::release::ReleaseMetricController;
use super::types::{MetricController, MetricsService};
use crate::config::ControllerConfig;
use crate::fact::{FactBus, FactProcessor};
use crate::metrics::{FactTranslator, MetricsRecorder};
use crate::settings::SettingsStore;

/// Collaborators a release controller is built from.
pub struct ControllerDeps {
    pub services: Vec<Arc<dyn MetricsService>>,
    pub consent: Consent,
    pub recorder: Arc<dyn MetricsRecorder>,
    pub settings: Arc<dyn SettingsStore>,
}

/// Builds the controller `config` asks for and registers it as the bus's
/// fact handler.
pub fn create(config: &ControllerConfig, deps: ControllerDeps, bus: &FactBus) -> Arc<dyn MetricController> {
    if !config.telemetry {
        info!("Telemetry disabled for this build, using debug metric controller");
        let controller = Arc::new(DebugMetricController::new());
        bus.register(controller.clone() as Arc<dyn FactProcessor>);
        return controller;
    }

    let translator = FactTranslator::new(deps.recorder, deps.settings);
    let controller = Arc::new(
        ReleaseMetricController::new(deps.services, deps.consent, translator)
            .with_guard(config.lifecycle_guard),
    );
    bus.register(controller.clone() as Arc<dyn FactProcessor>);
    info!(guard = ?config.lifecycle_guard, "Release metric controller registered");
    controller
}
