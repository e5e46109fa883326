mod descriptor;
mod genetics;
mod traits;

pub use descriptor::PoolDescriptor;
pub use genetics::{FitnessComponents, GeneticRecord, GENE_COUNT, NEUTRAL_GENE};
pub use traits::PoolTraits;

use alloy_primitives::{keccak256, Address};

/// Basis-point denominator shared by fees, guards and fitness scores
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Derive a stable address from a human-readable label (simulation identities)
pub fn address_from_label(label: &str) -> Address {
    Address::from_slice(&keccak256(label.as_bytes())[12..])
}
