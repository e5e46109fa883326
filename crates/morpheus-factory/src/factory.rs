use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{keccak256, Address};
use morpheus_core::clock::BlockSource;
use morpheus_core::error::{EngineError, Result};
use morpheus_core::events::{EngineEvent, PoolCreatedEvent};
use morpheus_core::policy::TraitPolicy;
use morpheus_core::sink::EventSink;
use morpheus_core::types::{PoolDescriptor, PoolTraits};
use morpheus_pool::{EvolvablePool, PoolSet};
use morpheus_registry::PoolLedger;
use tracing::info;

/// Instantiates pools and appends their descriptors to the ledger.
/// This is the single write path into the ledger.
#[derive(Debug)]
pub struct PoolFactory {
    address: Address,
    policy: TraitPolicy,
    ledger: Arc<dyn PoolLedger>,
    pools: Arc<PoolSet>,
    clock: Arc<dyn BlockSource>,
    events: Arc<dyn EventSink>,
    nonce: AtomicU64,
}

impl PoolFactory {
    pub fn new(
        address: Address,
        ledger: Arc<dyn PoolLedger>,
        pools: Arc<PoolSet>,
        clock: Arc<dyn BlockSource>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            address,
            policy: TraitPolicy::default(),
            ledger,
            pools,
            clock,
            events,
            nonce: AtomicU64::new(0),
        }
    }

    /// Replace the default trait policy ceilings
    pub fn with_policy(mut self, policy: TraitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Identity used to authorize ledger writes
    pub fn address(&self) -> Address {
        self.address
    }

    /// Validate traits, instantiate a zero-state pool owned by `caller`,
    /// register its descriptor and return the new address. All-or-nothing.
    pub fn create_pool(
        &self,
        caller: Address,
        token0: Address,
        token1: Address,
        parent: Option<Address>,
        traits: PoolTraits,
    ) -> Result<Address> {
        if token0 == token1 {
            return Err(EngineError::IdenticalTokens);
        }
        self.policy.validate(&traits)?;

        let generation = match parent {
            None => 0,
            Some(parent_addr) => {
                let parent_desc = self
                    .ledger
                    .get(parent_addr)
                    .map_err(|_| EngineError::UnknownParent(parent_addr))?;
                parent_desc.generation + 1
            }
        };

        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let address = derive_pool_address(token0, token1, parent, nonce);
        let created_at_block = self.clock.current_block();

        let descriptor = PoolDescriptor {
            address,
            token0,
            token1,
            parent,
            generation,
            traits,
            owner: caller,
            created_at_block,
        };
        self.ledger.register(self.address, descriptor)?;
        self.pools.insert(EvolvablePool::new(
            address,
            token0,
            token1,
            caller,
            traits,
            self.clock.clone(),
            self.events.clone(),
        ));

        info!(
            pool = ?address,
            token0 = ?token0,
            token1 = ?token1,
            parent = ?parent,
            generation,
            owner = ?caller,
            "Pool created"
        );
        self.events
            .handle_event(&EngineEvent::PoolCreated(PoolCreatedEvent {
                pool: address,
                token0,
                token1,
                parent,
                generation,
                owner: caller,
                block_number: created_at_block,
            }));

        Ok(address)
    }
}

/// keccak("morpheus/pool" || token0 || token1 || parent-or-zero || nonce),
/// truncated to the low 20 bytes
pub fn derive_pool_address(
    token0: Address,
    token1: Address,
    parent: Option<Address>,
    nonce: u64,
) -> Address {
    let mut buf = Vec::with_capacity(13 + 20 * 3 + 8);
    buf.extend_from_slice(b"morpheus/pool");
    buf.extend_from_slice(token0.as_slice());
    buf.extend_from_slice(token1.as_slice());
    buf.extend_from_slice(parent.unwrap_or(Address::ZERO).as_slice());
    buf.extend_from_slice(&nonce.to_be_bytes());
    Address::from_slice(&keccak256(&buf)[12..])
}
