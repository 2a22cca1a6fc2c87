use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::bus::FactBus;
use super::types::Fact;
use crate::error::BusError;

/// Cloneable handle async emitters use to queue facts for the pump.
#[derive(Debug, Clone)]
pub struct FactSender {
    tx: mpsc::Sender<Fact>,
}

impl FactSender {
    pub async fn send(&self, fact: Fact) -> Result<(), BusError> {
        self.tx.send(fact).await.map_err(|_| BusError::Closed)
    }

    pub fn try_send(&self, fact: Fact) -> Result<(), BusError> {
        self.tx.try_send(fact).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => BusError::Full,
            mpsc::error::TrySendError::Closed(_) => BusError::Closed,
        })
    }
}

/// Moves queued facts onto a `FactBus`.
///
/// The bus itself stays synchronous; the pump only exists so tasks on other
/// threads can emit without holding a reference to the processors.
#[derive(Debug)]
pub struct FactPump {
    receiver: mpsc::Receiver<Fact>,
    bus: Arc<FactBus>,
    delivered: u64,
}

/// Creates a bounded fact queue feeding `bus`. A zero capacity is bumped to one.
pub fn fact_channel(capacity: usize, bus: Arc<FactBus>) -> (FactSender, FactPump) {
    let (tx, receiver) = mpsc::channel(capacity.max(1));
    let pump = FactPump {
        receiver,
        bus,
        delivered: 0,
    };
    (FactSender { tx }, pump)
}

impl FactPump {
    /// Delivers facts until every sender has been dropped. Returns the total
    /// number delivered over the pump's lifetime.
    pub async fn run(mut self) -> u64 {
        info!("Fact pump started");

        while let Some(fact) = self.receiver.recv().await {
            self.bus.emit(fact);
            self.delivered += 1;
        }

        info!(delivered = self.delivered, "Fact pump stopped: all senders dropped");
        self.delivered
    }

    /// Delivers whatever is queued right now without waiting for more.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while let Ok(fact) = self.receiver.try_recv() {
            self.bus.emit(fact);
            count += 1;
        }
        self.delivered += count as u64;
        if count > 0 {
            debug!(count, "Drained queued facts");
        }
        count
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}
