use alloy_primitives::{Address, U256};

/// Emitted when a new pool is registered
#[derive(Debug, Clone)]
pub struct PoolCreatedEvent {
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    pub parent: Option<Address>,
    pub generation: u64,
    pub owner: Address,
    pub block_number: u64,
}

/// Emitted on every committed swap
#[derive(Debug, Clone)]
pub struct SwapEvent {
    pub pool: Address,
    pub trader: Address,
    pub token_in: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    pub price_impact_bps: u64,
    pub block_number: u64,
}

/// Emitted when a child pool is evolved from a parent.
/// `fitness_improvement` compares the child's baseline against the parent's
/// last reported score; it is informational until the child is itself scored.
#[derive(Debug, Clone)]
pub struct ContractEvolvedEvent {
    pub parent: Address,
    pub child: Address,
    pub generation: u64,
    pub fitness_improvement: i64,
    pub block_number: u64,
}

/// Engine notifications consumed by observability tooling
#[derive(Debug, Clone)]
pub enum EngineEvent {
    PoolCreated(PoolCreatedEvent),
    Swap(SwapEvent),
    ContractEvolved(ContractEvolvedEvent),
}
