use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use super::types::Fact;

/// Anything that wants to see every fact published on a bus.
pub trait FactProcessor: Send + Sync {
    fn on_fact(&self, fact: &Fact);
}

/// Explicit publish/subscribe point for facts.
///
/// Hosts create one bus and pass it to whoever emits or consumes facts.
/// Delivery is synchronous: `emit` returns once every registered processor
/// has handled the fact, in registration order.
#[derive(Default)]
pub struct FactBus {
    processors: RwLock<Vec<Arc<dyn FactProcessor>>>,
}

impl FactBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, processor: Arc<dyn FactProcessor>) {
        self.processors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(processor);
    }

    pub fn processor_count(&self) -> usize {
        self.processors.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn emit(&self, fact: Fact) {
        // Snapshot so a processor may register another one without deadlocking
        let processors = self
            .processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        trace!(component = ?fact.component(), item = %fact.item(), "emit");
        for processor in &processors {
            processor.on_fact(&fact);
        }
    }
}

impl fmt::Debug for FactBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactBus")
            .field("processors", &self.processor_count())
            .finish()
    }
}
