use std::sync::{Arc, Mutex};

use fact_metrics::controller::{create, Consent, ControllerDeps, MetricServiceType};
use fact_metrics::fact::{fact_channel, Action, Component, Fact, FactBus, FactProcessor, Item};
use fact_metrics::metrics::{EventMetric, InMemoryRecorder, LabeledCounterMetric};
use fact_metrics::settings::InMemorySettings;
use fact_metrics::{BusError, ControllerConfig};

/// Remembers the items it saw, tagged with its own name.
struct Tape {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl FactProcessor for Tape {
    fn on_fact(&self, fact: &Fact) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, fact.item()));
    }
}

fn deps(recorder: Arc<InMemoryRecorder>, settings: Arc<InMemorySettings>) -> ControllerDeps {
    ControllerDeps {
        services: Vec::new(),
        consent: Consent::fixed(true, true),
        recorder,
        settings,
    }
}

#[test]
fn test_bus_delivers_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let bus = FactBus::new();
    bus.register(Arc::new(Tape { name: "a", log: log.clone() }));
    bus.register(Arc::new(Tape { name: "b", log: log.clone() }));

    bus.emit(Fact::new(Component::FeaturePrompts, Action::Display, Item::Display));
    bus.emit(Fact::new(Component::FeaturePrompts, Action::Click, Item::Save));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["a:display", "b:display", "a:save", "b:save"]
    );
}

#[test]
fn test_emit_without_processors_is_harmless() {
    let bus = FactBus::new();
    bus.emit(Fact::new(Component::FeatureTabs, Action::Click, Item::from("anything")));
    assert_eq!(bus.processor_count(), 0);
}

#[test]
fn test_create_registers_release_controller_on_bus() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let settings = Arc::new(InMemorySettings::new());
    let bus = FactBus::new();

    let controller = create(&ControllerConfig::default(), deps(recorder.clone(), settings), &bus);
    assert_eq!(bus.processor_count(), 1, "Exactly one handler is registered");

    bus.emit(Fact::new(Component::FeaturePrompts, Action::Display, Item::Display));
    assert_eq!(recorder.event_count(EventMetric::LoginDialogDisplayed), 1);

    controller.start(MetricServiceType::Data).unwrap();
    assert!(controller.is_running(MetricServiceType::Data));
}

#[test]
fn test_create_without_telemetry_records_nothing() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let settings = Arc::new(InMemorySettings::new());
    let bus = FactBus::new();
    let config = ControllerConfig {
        telemetry: false,
        ..ControllerConfig::default()
    };

    let controller = create(&config, deps(recorder.clone(), settings.clone()), &bus);
    bus.emit(Fact::new(Component::FeaturePrompts, Action::Display, Item::Display));
    bus.emit(Fact::new(Component::FeatureTopSites, Action::Interaction, Item::Count).with_value("4"));
    controller.start(MetricServiceType::Data).unwrap();

    assert_eq!(recorder.total_recordings(), 0);
    assert!(settings.is_empty());
    assert!(!controller.is_running(MetricServiceType::Data));
}

#[tokio::test]
async fn test_pump_delivers_until_senders_drop() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let bus = Arc::new(FactBus::new());
    let _controller = create(
        &ControllerConfig::default(),
        deps(recorder.clone(), Arc::new(InMemorySettings::new())),
        &bus,
    );

    let (sender, pump) = fact_channel(4, bus.clone());
    let handle = tokio::spawn(pump.run());

    let other = sender.clone();
    let emitter = tokio::spawn(async move {
        for _ in 0..3 {
            let fact = Fact::new(Component::FeatureSearch, Action::Interaction, Item::InContentSearch)
                .with_value("google");
            other.send(fact).await.unwrap();
        }
    });
    sender
        .send(Fact::new(Component::FeaturePrompts, Action::Display, Item::Display))
        .await
        .unwrap();

    emitter.await.unwrap();
    drop(sender);

    let delivered = handle.await.unwrap();
    assert_eq!(delivered, 4);
    assert_eq!(recorder.labeled_counter(LabeledCounterMetric::SearchInContent, "google"), 3);
    assert_eq!(recorder.event_count(EventMetric::LoginDialogDisplayed), 1);
}

#[tokio::test]
async fn test_drain_and_backpressure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let bus = Arc::new(FactBus::new());
    bus.register(Arc::new(Tape { name: "t", log: log.clone() }));

    let (sender, mut pump) = fact_channel(1, bus);
    sender
        .try_send(Fact::new(Component::FeaturePwa, Action::Click, Item::InstallShortcut))
        .unwrap();
    let second = sender.try_send(Fact::new(Component::FeaturePwa, Action::Click, Item::HomescreenIconTap));
    assert_eq!(second, Err(BusError::Full));

    assert_eq!(pump.drain(), 1);
    assert_eq!(pump.delivered(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["t:install_shortcut"]);

    drop(pump);
    let closed = sender
        .send(Fact::new(Component::FeaturePwa, Action::Click, Item::InstallShortcut))
        .await;
    assert_eq!(closed, Err(BusError::Closed));
}
