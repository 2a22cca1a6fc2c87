use std::fmt;
use std::sync::Arc;

use super::types::MetricServiceType;

pub type ConsentPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// The user's telemetry opt-ins, as live predicates.
///
/// The predicates are called on every `start`, never cached, so a consent
/// toggle takes effect on the next start without rebuilding the controller.
#[derive(Clone)]
pub struct Consent {
    data: ConsentPredicate,
    marketing: ConsentPredicate,
}

impl Consent {
    pub fn new<D, M>(data: D, marketing: M) -> Self
    where
        D: Fn() -> bool + Send + Sync + 'static,
        M: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            data: Arc::new(data),
            marketing: Arc::new(marketing),
        }
    }

    /// Fixed answers, for hosts without a settings screen and for tests.
    pub fn fixed(data: bool, marketing: bool) -> Self {
        Self::new(move || data, move || marketing)
    }

    pub fn is_data_telemetry_enabled(&self) -> bool {
        (self.data)()
    }

    pub fn is_marketing_data_telemetry_enabled(&self) -> bool {
        (self.marketing)()
    }

    pub fn is_enabled(&self, kind: MetricServiceType) -> bool {
        match kind {
            MetricServiceType::Data => self.is_data_telemetry_enabled(),
            MetricServiceType::Marketing => self.is_marketing_data_telemetry_enabled(),
        }
    }
}

impl fmt::Debug for Consent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consent").finish_non_exhaustive()
    }
}
