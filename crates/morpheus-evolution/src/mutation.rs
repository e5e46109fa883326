use alloy_primitives::U256;
use morpheus_core::types::{PoolTraits, BPS_DENOMINATOR, GENE_COUNT};

/// Fee adjustment per generation, in basis points
pub const FEE_STEP_BPS: i64 = 5;
/// Mutated fees stay inside [5, 300] bps
pub const FEE_FLOOR_BPS: u64 = 5;
pub const FEE_CEIL_BPS: u64 = 300;
/// Guard margin added above the observed average impact
pub const GUARD_MARGIN_BPS: u64 = 50;
/// Mutated guards stay inside [50, 800] bps
pub const GUARD_FLOOR_BPS: u64 = 50;
pub const GUARD_CEIL_BPS: u64 = 800;
/// Hint-blended cooldowns stay below this many blocks
pub const COOLDOWN_CEIL_BLOCKS: u64 = 1_000;
/// Swap count above which a pool is considered in high demand
pub const DEMAND_SWAP_THRESHOLD: u64 = 15;
/// Maximum per-generation gene movement toward a target hint
pub const MAX_GENE_STEP: u64 = 250;

/// Parent metrics that drive the mutation heuristic
#[derive(Debug, Clone, Copy)]
pub struct ParentMetrics {
    pub average_price_impact_bps: u64,
    pub num_swaps: u64,
}

/// Deterministic trait mutation. Impact pressure (average impact above 80% of
/// the guard) cheapens trading to attract balancing flow; sustained demand
/// raises the fee to capture value; the guard tracks the observed impact with
/// a fixed margin. Target hints, when given, are normalized [0, 10000] values
/// blended 3:1 with the heuristic output after scaling into each trait's
/// mutation range.
pub fn mutate_traits(
    parent: &PoolTraits,
    metrics: &ParentMetrics,
    target: Option<&[u64; GENE_COUNT]>,
) -> PoolTraits {
    let avg_impact = metrics.average_price_impact_bps;

    let mut fee = parent.fee_bps as i64;
    if avg_impact * 10 > parent.slippage_guard_bps as u64 * 8 {
        fee -= FEE_STEP_BPS;
    } else if metrics.num_swaps > DEMAND_SWAP_THRESHOLD {
        fee += FEE_STEP_BPS;
    }
    let mut fee = (fee.max(0) as u64).clamp(FEE_FLOOR_BPS, FEE_CEIL_BPS);
    let mut guard = (avg_impact + GUARD_MARGIN_BPS).clamp(GUARD_FLOOR_BPS, GUARD_CEIL_BPS);
    let mut cooldown = parent.cooldown_blocks as u64;

    if let Some(hint) = target {
        fee = blend(fee, hint[0], FEE_CEIL_BPS).clamp(FEE_FLOOR_BPS, FEE_CEIL_BPS);
        guard = blend(guard, hint[1], GUARD_CEIL_BPS).clamp(GUARD_FLOOR_BPS, GUARD_CEIL_BPS);
        cooldown = blend(cooldown, hint[2], COOLDOWN_CEIL_BLOCKS).min(COOLDOWN_CEIL_BLOCKS);
    }

    PoolTraits {
        fee_bps: fee as u16,
        slippage_guard_bps: guard as u16,
        cooldown_blocks: cooldown as u16,
        mev_protection: parent.mev_protection,
    }
}

/// 3:1 weighted average of the heuristic output with a hint scaled into the
/// trait's mutation ceiling
fn blend(heuristic: u64, hint: u64, ceiling: u64) -> u64 {
    let scaled = hint.min(BPS_DENOMINATOR) * ceiling / BPS_DENOMINATOR;
    (3 * heuristic + scaled) / 4
}

/// Bounded, component-wise step of the lineage genes toward the target hints.
/// Without hints the genes carry over unchanged.
pub fn mutate_genes(
    parent: &[U256; GENE_COUNT],
    target: Option<&[u64; GENE_COUNT]>,
) -> [U256; GENE_COUNT] {
    let Some(hint) = target else {
        return *parent;
    };

    let mut child = *parent;
    for (gene, hint_value) in child.iter_mut().zip(hint.iter()) {
        let current: u64 = (*gene).try_into().unwrap_or(u64::MAX);
        let goal = (*hint_value).min(BPS_DENOMINATOR);
        let step = current.abs_diff(goal).min(MAX_GENE_STEP);
        let next = if goal >= current {
            current + step
        } else {
            current - step
        };
        *gene = U256::from(next.min(BPS_DENOMINATOR));
    }
    child
}
