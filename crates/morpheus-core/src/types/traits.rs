use serde::{Deserialize, Serialize};

/// Heritable pool configuration, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolTraits {
    /// Swap fee in basis points
    pub fee_bps: u16,
    /// Maximum allowed price impact per swap, in basis points
    pub slippage_guard_bps: u16,
    /// Minimum block gap between swaps by the same trader
    pub cooldown_blocks: u16,
    /// Capability flag consumed by an external ordering layer
    pub mev_protection: bool,
}
