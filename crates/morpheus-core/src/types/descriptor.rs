use alloy_primitives::Address;

use super::PoolTraits;

/// Registry entry for a pool; immutable after creation except `owner`
#[derive(Debug, Clone)]
pub struct PoolDescriptor {
    /// Pool address
    pub address: Address,
    /// First token of the pair
    pub token0: Address,
    /// Second token of the pair
    pub token1: Address,
    /// Parent pool, absent for genesis pools
    pub parent: Option<Address>,
    /// Depth in the lineage tree; genesis pools are generation 0
    pub generation: u64,
    /// Heritable traits
    pub traits: PoolTraits,
    /// Current owner, the only reassignable field
    pub owner: Address,
    /// Block height at creation
    pub created_at_block: u64,
}
