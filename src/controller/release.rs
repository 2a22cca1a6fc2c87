use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::consent::Consent;
use super::types::{MetricController, MetricServiceType, MetricsService};
use crate::config::LifecycleGuard;
use crate::error::{LifecycleAction, LifecycleError, ServiceFailure};
use crate::fact::{Fact, FactProcessor};
use crate::metrics::FactTranslator;

/// Production controller: translates every fact and starts/stops backend
/// services according to consent.
///
/// The controller never creates or drops services; it only tracks, per
/// service type, whether it has started them.
pub struct ReleaseMetricController {
    services: Vec<Arc<dyn MetricsService>>,
    consent: Consent,
    translator: FactTranslator,
    guard: LifecycleGuard,
    running: Mutex<HashSet<MetricServiceType>>,
}

impl ReleaseMetricController {
    pub fn new(
        services: Vec<Arc<dyn MetricsService>>,
        consent: Consent,
        translator: FactTranslator,
    ) -> Self {
        Self {
            services,
            consent,
            translator,
            guard: LifecycleGuard::default(),
            running: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_guard(mut self, guard: LifecycleGuard) -> Self {
        self.guard = guard;
        self
    }

    fn lock_running(&self) -> MutexGuard<'_, HashSet<MetricServiceType>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, kind: MetricServiceType, action: LifecycleAction) -> Result<(), LifecycleError> {
        match self.guard {
            LifecycleGuard::Serialized => {
                let mut running = self.lock_running();
                if !self.should_fan_out(kind, action, running.contains(&kind)) {
                    return Ok(());
                }
                let result = self.fan_out(kind, action);
                mark(&mut running, kind, action);
                result
            }
            LifecycleGuard::CheckAndSet => {
                let is_running = self.lock_running().contains(&kind);
                if !self.should_fan_out(kind, action, is_running) {
                    return Ok(());
                }
                let result = self.fan_out(kind, action);
                mark(&mut self.lock_running(), kind, action);
                result
            }
        }
    }

    fn should_fan_out(&self, kind: MetricServiceType, action: LifecycleAction, is_running: bool) -> bool {
        match action {
            LifecycleAction::Start if is_running => false,
            LifecycleAction::Start if !self.consent.is_enabled(kind) => {
                debug!(%kind, "Telemetry consent not given, services stay stopped");
                false
            }
            LifecycleAction::Start => true,
            // Stopping never asks for consent: a revoked opt-in must still shut things down
            LifecycleAction::Stop => is_running,
        }
    }

    /// Calls `action` on every service of `kind`. A failing service does not
    /// stop the others; failures are collected and returned together.
    fn fan_out(&self, kind: MetricServiceType, action: LifecycleAction) -> Result<(), LifecycleError> {
        let mut failures = Vec::new();

        for service in self.services.iter().filter(|s| s.service_type() == kind) {
            let result = match action {
                LifecycleAction::Start => service.start(),
                LifecycleAction::Stop => service.stop(),
            };
            match result {
                Ok(()) => info!(service = service.name(), %kind, %action, "Metrics service transitioned"),
                Err(error) => {
                    warn!(service = service.name(), %kind, %action, error = %error, "Metrics service failed");
                    failures.push(ServiceFailure {
                        service: service.name().to_string(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LifecycleError::Services { kind, action, failures })
        }
    }
}

// The flag flips even after partial failure so a later stop still reaches
// the services that did start.
fn mark(running: &mut HashSet<MetricServiceType>, kind: MetricServiceType, action: LifecycleAction) {
    match action {
        LifecycleAction::Start => {
            running.insert(kind);
        }
        LifecycleAction::Stop => {
            running.remove(&kind);
        }
    }
}

impl MetricController for ReleaseMetricController {
    fn start(&self, kind: MetricServiceType) -> Result<(), LifecycleError> {
        self.transition(kind, LifecycleAction::Start)
    }

    fn stop(&self, kind: MetricServiceType) -> Result<(), LifecycleError> {
        self.transition(kind, LifecycleAction::Stop)
    }

    fn is_running(&self, kind: MetricServiceType) -> bool {
        self.lock_running().contains(&kind)
    }
}

impl FactProcessor for ReleaseMetricController {
    /// Translation is independent of running state: facts are recorded even
    /// before any service has started.
    fn on_fact(&self, fact: &Fact) {
        self.translator.dispatch(fact);
    }
}

impl fmt::Debug for ReleaseMetricController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseMetricController")
            .field("services", &self.services.len())
            .field("guard", &self.guard)
            .field("running", &*self.lock_running())
            .finish()
    }
}
