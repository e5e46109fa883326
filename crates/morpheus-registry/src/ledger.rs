use std::fmt;

use alloy_primitives::Address;
use dashmap::DashMap;
use morpheus_core::error::{EngineError, Result};
use morpheus_core::types::PoolDescriptor;
use parking_lot::RwLock;
use tracing::debug;

/// Append-only directory of pool descriptors with a lineage index.
/// Descriptors are immutable after registration except `owner`.
pub trait PoolLedger: Send + Sync + fmt::Debug {
    /// Append a descriptor; only the configured factory may write
    fn register(&self, caller: Address, descriptor: PoolDescriptor) -> Result<()>;

    fn get(&self, address: Address) -> Result<PoolDescriptor>;

    fn contains(&self, address: Address) -> bool;

    /// All registered pool addresses, in insertion order
    fn all_pools(&self) -> Vec<Address>;

    /// Direct children of a pool
    fn children(&self, address: Address) -> Vec<Address>;

    /// Reassign a descriptor's owner; current owner only
    fn transfer_owner(&self, caller: Address, pool: Address, new_owner: Address) -> Result<()>;

    fn count(&self) -> usize;
}

/// In-memory ledger implementation
#[derive(Debug)]
pub struct InMemoryLedger {
    owner: Address,
    factory: RwLock<Option<Address>>,
    descriptors: DashMap<Address, PoolDescriptor>,
    insertion_order: RwLock<Vec<Address>>,
    children: DashMap<Address, Vec<Address>>,
}

impl InMemoryLedger {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            factory: RwLock::new(None),
            descriptors: DashMap::new(),
            insertion_order: RwLock::new(Vec::new()),
            children: DashMap::new(),
        }
    }

    /// Wire the authorized factory address; ledger owner only
    pub fn set_factory(&self, caller: Address, factory: Address) -> Result<()> {
        if caller != self.owner {
            return Err(EngineError::Unauthorized("ledger owner"));
        }
        *self.factory.write() = Some(factory);
        debug!(factory = ?factory, "Ledger factory configured");
        Ok(())
    }

    pub fn factory(&self) -> Option<Address> {
        *self.factory.read()
    }
}

impl PoolLedger for InMemoryLedger {
    fn register(&self, caller: Address, descriptor: PoolDescriptor) -> Result<()> {
        match *self.factory.read() {
            Some(factory) if factory == caller => {}
            _ => return Err(EngineError::Unauthorized("factory")),
        }
        if self.descriptors.contains_key(&descriptor.address) {
            return Err(EngineError::AlreadyRegistered(descriptor.address));
        }

        if let Some(parent) = descriptor.parent {
            self.children
                .entry(parent)
                .or_default()
                .push(descriptor.address);
        }
        self.insertion_order.write().push(descriptor.address);

        debug!(
            pool = ?descriptor.address,
            parent = ?descriptor.parent,
            generation = descriptor.generation,
            total_pools = self.descriptors.len() + 1,
            "Pool descriptor registered"
        );
        self.descriptors.insert(descriptor.address, descriptor);
        Ok(())
    }

    fn get(&self, address: Address) -> Result<PoolDescriptor> {
        self.descriptors
            .get(&address)
            .map(|d| d.clone())
            .ok_or(EngineError::PoolNotFound(address))
    }

    fn contains(&self, address: Address) -> bool {
        self.descriptors.contains_key(&address)
    }

    fn all_pools(&self) -> Vec<Address> {
        self.insertion_order.read().clone()
    }

    fn children(&self, address: Address) -> Vec<Address> {
        self.children
            .get(&address)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn transfer_owner(&self, caller: Address, pool: Address, new_owner: Address) -> Result<()> {
        let mut descriptor = self
            .descriptors
            .get_mut(&pool)
            .ok_or(EngineError::PoolNotFound(pool))?;
        if descriptor.owner != caller {
            return Err(EngineError::Unauthorized("descriptor owner"));
        }
        descriptor.owner = new_owner;
        debug!(pool = ?pool, new_owner = ?new_owner, "Descriptor ownership transferred");
        Ok(())
    }

    fn count(&self) -> usize {
        self.descriptors.len()
    }
}
