use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::events::EngineEvent;

/// Destination for engine event notifications
pub trait EventSink: Send + Sync + fmt::Debug {
    fn handle_event(&self, event: &EngineEvent);
}

/// Logs every event through `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn handle_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::PoolCreated(e) => info!(
                pool = ?e.pool,
                token0 = ?e.token0,
                token1 = ?e.token1,
                parent = ?e.parent,
                generation = e.generation,
                owner = ?e.owner,
                block = e.block_number,
                "Pool created"
            ),
            EngineEvent::Swap(e) => info!(
                pool = ?e.pool,
                trader = ?e.trader,
                token_in = ?e.token_in,
                amount_in = %e.amount_in,
                amount_out = %e.amount_out,
                fee = %e.fee_amount,
                impact_bps = e.price_impact_bps,
                block = e.block_number,
                "Swap executed"
            ),
            EngineEvent::ContractEvolved(e) => info!(
                parent = ?e.parent,
                child = ?e.child,
                generation = e.generation,
                fitness_improvement = e.fitness_improvement,
                block = e.block_number,
                "Contract evolved"
            ),
        }
    }
}

/// Buffers events in memory for later inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events, leaving the buffer empty
    pub fn drain(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn handle_event(&self, event: &EngineEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Fans each event out to multiple sinks
#[derive(Debug)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for CompositeSink {
    fn handle_event(&self, event: &EngineEvent) {
        for sink in &self.sinks {
            sink.handle_event(event);
        }
    }
}
