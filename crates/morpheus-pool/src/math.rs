use alloy_primitives::U256;
use morpheus_core::types::BPS_DENOMINATOR;

fn bps() -> U256 {
    U256::from(BPS_DENOMINATOR)
}

/// Split an input amount into the portion quoted against reserves and the
/// fee retained by the pool.
pub fn split_fee(amount_in: U256, fee_bps: u16) -> (U256, U256) {
    let fee = amount_in * U256::from(fee_bps) / bps();
    (amount_in - fee, fee)
}

/// Constant-product output: `reserve_out * in / (reserve_in + in)`.
/// Preserves `reserve_in * reserve_out` up to rounding and retained fees.
pub fn constant_product_out(
    amount_in_after_fee: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> U256 {
    reserve_out * amount_in_after_fee / (reserve_in + amount_in_after_fee)
}

/// Deviation of the execution price from the pre-trade spot price, in basis
/// points: `(in * reserve_out - out * reserve_in) * 10000 / (in * reserve_out)`.
/// Captures fee plus curve slippage; zero only for a perfectly spot-priced fill.
pub fn price_impact_bps(
    amount_in: U256,
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> u64 {
    let ideal = amount_in * reserve_out;
    if ideal.is_zero() {
        return 0;
    }
    let actual = amount_out * reserve_in;
    let impact = ideal.saturating_sub(actual) * bps() / ideal;
    impact.try_into().unwrap_or(u64::MAX)
}
