mod bank;

pub use bank::{BalanceKey, TokenBank, TokenTransfer};

use alloy_primitives::U256;

/// Scale a whole-token amount to 18-decimal base units
pub fn units(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
}
