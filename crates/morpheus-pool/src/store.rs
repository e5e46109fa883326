use alloy_primitives::Address;
use dashmap::DashMap;
use morpheus_core::error::{EngineError, Result};

use crate::pool::{EvolvablePool, PoolMetrics};

/// Live pool instances keyed by address
#[derive(Debug, Default)]
pub struct PoolSet {
    pools: DashMap<Address, EvolvablePool>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pool: EvolvablePool) {
        self.pools.insert(pool.address(), pool);
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.pools.contains_key(address)
    }

    pub fn count(&self) -> usize {
        self.pools.len()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.pools.iter().map(|e| *e.key()).collect()
    }

    /// Run a read-only closure against a pool
    pub fn with_pool<R>(
        &self,
        address: &Address,
        f: impl FnOnce(&EvolvablePool) -> R,
    ) -> Result<R> {
        match self.pools.get(address) {
            Some(pool) => Ok(f(&pool)),
            None => Err(EngineError::PoolNotFound(*address)),
        }
    }

    /// Run a mutating closure against a pool
    pub fn with_pool_mut<R>(
        &self,
        address: &Address,
        f: impl FnOnce(&mut EvolvablePool) -> R,
    ) -> Result<R> {
        match self.pools.get_mut(address) {
            Some(mut pool) => Ok(f(&mut pool)),
            None => Err(EngineError::PoolNotFound(*address)),
        }
    }

    pub fn metrics(&self, address: &Address) -> Result<PoolMetrics> {
        self.with_pool(address, |pool| pool.metrics())
    }
}
