use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::types::{CounterMetric, EventExtra, EventMetric, LabeledCounterMetric, TimingMetric};

/// The metrics SDK as seen from the translator.
///
/// Implementations own all buffering and upload concerns; every call here is
/// fire-and-forget.
pub trait MetricsRecorder: Send + Sync {
    fn record_event(&self, metric: EventMetric, extra: Option<EventExtra>);
    fn add_to_counter(&self, metric: CounterMetric, amount: u32);
    fn add_to_labeled_counter(&self, metric: LabeledCounterMetric, label: &str, amount: u32);
    fn accumulate_timing(&self, metric: TimingMetric, sample_ms: u64);
}

#[derive(Debug, Default)]
struct Tallies {
    events: HashMap<EventMetric, Vec<Option<EventExtra>>>,
    counters: HashMap<CounterMetric, u64>,
    labeled: HashMap<(LabeledCounterMetric, String), u64>,
    timings: HashMap<TimingMetric, Vec<u64>>,
}

/// Recorder that keeps everything in memory. Used by the test suite and the
/// demo binary.
#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    tallies: Mutex<Tallies>,
}

/// Point-in-time copy of an `InMemoryRecorder`, keyed by metric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecorderSnapshot {
    pub events: BTreeMap<String, usize>,
    pub counters: BTreeMap<String, u64>,
    pub labeled_counters: BTreeMap<String, u64>,
    pub timing_samples: BTreeMap<String, usize>,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tallies> {
        self.tallies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn event_count(&self, metric: EventMetric) -> usize {
        self.lock().events.get(&metric).map_or(0, Vec::len)
    }

    /// Extras of every recorded occurrence, oldest first.
    pub fn event_extras(&self, metric: EventMetric) -> Vec<Option<EventExtra>> {
        self.lock().events.get(&metric).cloned().unwrap_or_default()
    }

    pub fn counter(&self, metric: CounterMetric) -> u64 {
        self.lock().counters.get(&metric).copied().unwrap_or(0)
    }

    pub fn labeled_counter(&self, metric: LabeledCounterMetric, label: &str) -> u64 {
        self.lock()
            .labeled
            .get(&(metric, label.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn timing_samples(&self, metric: TimingMetric) -> Vec<u64> {
        self.lock().timings.get(&metric).cloned().unwrap_or_default()
    }

    /// Number of recording calls seen so far, across all metric kinds.
    pub fn total_recordings(&self) -> u64 {
        let tallies = self.lock();
        let events: usize = tallies.events.values().map(Vec::len).sum();
        let timings: usize = tallies.timings.values().map(Vec::len).sum();
        events as u64
            + tallies.counters.values().sum::<u64>()
            + tallies.labeled.values().sum::<u64>()
            + timings as u64
    }

    pub fn snapshot(&self) -> RecorderSnapshot {
        let tallies = self.lock();
        RecorderSnapshot {
            events: tallies
                .events
                .iter()
                .map(|(metric, list)| (metric.id().to_string(), list.len()))
                .collect(),
            counters: tallies
                .counters
                .iter()
                .map(|(metric, count)| (metric.id().to_string(), *count))
                .collect(),
            labeled_counters: tallies
                .labeled
                .iter()
                .map(|((metric, label), count)| (format!("{}[{}]", metric.id(), label), *count))
                .collect(),
            timing_samples: tallies
                .timings
                .iter()
                .map(|(metric, samples)| (metric.id().to_string(), samples.len()))
                .collect(),
        }
    }

    pub fn clear(&self) {
        *self.lock() = Tallies::default();
    }
}

impl MetricsRecorder for InMemoryRecorder {
    fn record_event(&self, metric: EventMetric, extra: Option<EventExtra>) {
        self.lock().events.entry(metric).or_default().push(extra);
    }

    fn add_to_counter(&self, metric: CounterMetric, amount: u32) {
        *self.lock().counters.entry(metric).or_insert(0) += u64::from(amount);
    }

    fn add_to_labeled_counter(&self, metric: LabeledCounterMetric, label: &str, amount: u32) {
        *self
            .lock()
            .labeled
            .entry((metric, label.to_string()))
            .or_insert(0) += u64::from(amount);
    }

    fn accumulate_timing(&self, metric: TimingMetric, sample_ms: u64) {
        self.lock().timings.entry(metric).or_default().push(sample_ms);
    }
}
