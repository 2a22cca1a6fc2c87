use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use fact_metrics::controller::{Consent, MetricController, MetricServiceType, MetricsService, ReleaseMetricController};
use fact_metrics::fact::{Action, Component, Fact, FactProcessor, Item};
use fact_metrics::metrics::{EventMetric, FactTranslator, InMemoryRecorder};
use fact_metrics::settings::InMemorySettings;
use fact_metrics::LifecycleGuard;

struct CountingService {
    name: &'static str,
    kind: MetricServiceType,
    starts: AtomicUsize,
    stops: AtomicUsize,
    fail: bool,
}

impl CountingService {
    fn new(name: &'static str, kind: MetricServiceType) -> Arc<Self> {
        Arc::new(Self {
            name,
            kind,
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing(name: &'static str, kind: MetricServiceType) -> Arc<Self> {
        Arc::new(Self {
            name,
            kind,
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl MetricsService for CountingService {
    fn name(&self) -> &str {
        self.name
    }

    fn service_type(&self) -> MetricServiceType {
        self.kind
    }

    fn start(&self) -> anyhow::Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("{} could not start", self.name);
        }
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("{} could not stop", self.name);
        }
        Ok(())
    }
}

fn controller(services: &[Arc<CountingService>], consent: Consent) -> ReleaseMetricController {
    let services = services
        .iter()
        .map(|s| s.clone() as Arc<dyn MetricsService>)
        .collect();
    let translator = FactTranslator::new(Arc::new(InMemoryRecorder::new()), Arc::new(InMemorySettings::new()));
    ReleaseMetricController::new(services, consent, translator)
}

#[test]
fn test_start_only_touches_matching_type() {
    let data = CountingService::new("glean", MetricServiceType::Data);
    let marketing = CountingService::new("adjust", MetricServiceType::Marketing);
    let c = controller(&[data.clone(), marketing.clone()], Consent::fixed(true, true));

    c.start(MetricServiceType::Data).unwrap();

    assert_eq!(data.starts(), 1);
    assert_eq!(marketing.starts(), 0, "Marketing service must not start with data");
    assert!(c.is_running(MetricServiceType::Data));
    assert!(!c.is_running(MetricServiceType::Marketing));

    c.start(MetricServiceType::Marketing).unwrap();
    assert_eq!(data.starts(), 1);
    assert_eq!(marketing.starts(), 1);
}

#[test]
fn test_repeated_start_and_stop_are_idempotent() {
    let first = CountingService::new("first", MetricServiceType::Data);
    let second = CountingService::new("second", MetricServiceType::Data);
    let c = controller(&[first.clone(), second.clone()], Consent::fixed(true, true));

    for _ in 0..5 {
        c.start(MetricServiceType::Data).unwrap();
    }
    assert_eq!(first.starts(), 1);
    assert_eq!(second.starts(), 1);

    for _ in 0..5 {
        c.stop(MetricServiceType::Data).unwrap();
    }
    assert_eq!(first.stops(), 1);
    assert_eq!(second.stops(), 1);
    assert!(!c.is_running(MetricServiceType::Data));

    // A full cycle can happen again
    c.start(MetricServiceType::Data).unwrap();
    assert_eq!(first.starts(), 2);
}

#[test]
fn test_no_consent_means_no_service_calls() {
    let marketing = CountingService::new("adjust", MetricServiceType::Marketing);
    let c = controller(&[marketing.clone()], Consent::fixed(true, false));

    c.start(MetricServiceType::Marketing).unwrap();
    c.stop(MetricServiceType::Marketing).unwrap();

    assert_eq!(marketing.starts(), 0);
    assert_eq!(marketing.stops(), 0);
    assert!(!c.is_running(MetricServiceType::Marketing));
}

#[test]
fn test_stop_ignores_revoked_consent() {
    let granted = Arc::new(AtomicBool::new(true));
    let flag = granted.clone();
    let data = CountingService::new("glean", MetricServiceType::Data);
    let c = controller(&[data.clone()], Consent::new(move || flag.load(Ordering::SeqCst), || false));

    c.start(MetricServiceType::Data).unwrap();
    granted.store(false, Ordering::SeqCst);
    c.stop(MetricServiceType::Data).unwrap();

    assert_eq!(data.stops(), 1, "A started service must stop even after opt-out");
}

#[test]
fn test_consent_is_read_on_every_start() {
    let granted = Arc::new(AtomicBool::new(false));
    let flag = granted.clone();
    let data = CountingService::new("glean", MetricServiceType::Data);
    let c = controller(&[data.clone()], Consent::new(move || flag.load(Ordering::SeqCst), || false));

    c.start(MetricServiceType::Data).unwrap();
    assert_eq!(data.starts(), 0);

    granted.store(true, Ordering::SeqCst);
    c.start(MetricServiceType::Data).unwrap();
    assert_eq!(data.starts(), 1, "Opt-in should apply without rebuilding the controller");
}

#[test]
fn test_failing_service_does_not_block_others() {
    let broken = CountingService::failing("broken", MetricServiceType::Data);
    let healthy = CountingService::new("healthy", MetricServiceType::Data);
    let c = controller(&[broken.clone(), healthy.clone()], Consent::fixed(true, true));

    let err = c.start(MetricServiceType::Data).unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].service, "broken");
    assert!(err.to_string().contains("failed to start"));

    assert_eq!(healthy.starts(), 1, "Healthy service still started");
    assert!(c.is_running(MetricServiceType::Data));

    // Stop still reaches everything that was started
    assert!(c.stop(MetricServiceType::Data).is_err());
    assert_eq!(healthy.stops(), 1);
    assert!(!c.is_running(MetricServiceType::Data));
}

#[test]
fn test_translation_does_not_wait_for_start() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let translator = FactTranslator::new(recorder.clone(), Arc::new(InMemorySettings::new()));
    let c = ReleaseMetricController::new(Vec::new(), Consent::fixed(false, false), translator);

    c.on_fact(&Fact::new(Component::FeaturePrompts, Action::Display, Item::Display));

    assert!(!c.is_running(MetricServiceType::Data));
    assert_eq!(recorder.event_count(EventMetric::LoginDialogDisplayed), 1);
}

#[test]
fn test_serialized_guard_starts_once_under_contention() {
    let data = CountingService::new("glean", MetricServiceType::Data);
    let c = Arc::new(controller(&[data.clone()], Consent::fixed(true, true)).with_guard(LifecycleGuard::Serialized));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let c = c.clone();
            scope.spawn(move || c.start(MetricServiceType::Data).unwrap());
        }
    });

    assert_eq!(data.starts(), 1, "Concurrent starts must collapse into one");
    assert!(c.is_running(MetricServiceType::Data));
}

/// Flags any start while already live, or stop while already down.
#[derive(Default)]
struct OverlapService {
    live: AtomicBool,
    overlaps: AtomicUsize,
    calls: AtomicUsize,
}

impl MetricsService for OverlapService {
    fn name(&self) -> &str {
        "overlap"
    }

    fn service_type(&self) -> MetricServiceType {
        MetricServiceType::Data
    }

    fn start(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.live.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        std::thread::yield_now();
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.live.swap(false, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        std::thread::yield_now();
        Ok(())
    }
}

#[test]
fn test_serialized_guard_alternates_interleaved_start_and_stop() {
    let service = Arc::new(OverlapService::default());
    let translator = FactTranslator::new(Arc::new(InMemoryRecorder::new()), Arc::new(InMemorySettings::new()));
    let c = Arc::new(
        ReleaseMetricController::new(vec![service.clone() as Arc<dyn MetricsService>], Consent::fixed(true, true), translator)
            .with_guard(LifecycleGuard::Serialized),
    );

    std::thread::scope(|scope| {
        for i in 0..8 {
            let c = c.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        c.start(MetricServiceType::Data).unwrap();
                    } else {
                        c.stop(MetricServiceType::Data).unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(service.overlaps.load(Ordering::SeqCst), 0, "Service calls must strictly alternate");
    assert!(service.calls.load(Ordering::SeqCst) >= 1);
    assert_eq!(service.live.load(Ordering::SeqCst), c.is_running(MetricServiceType::Data));
}
