use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use morpheus_core::clock::BlockSource;
use morpheus_core::error::{EngineError, Result};
use morpheus_core::events::{EngineEvent, SwapEvent};
use morpheus_core::sink::EventSink;
use morpheus_core::types::PoolTraits;
use morpheus_tokens::TokenTransfer;
use tracing::{debug, info};

use crate::math;

/// Mutable pool accounting, owned exclusively by its pool
#[derive(Debug, Default)]
pub struct PoolState {
    pub reserve0: U256,
    pub reserve1: U256,
    pub total_volume0: U256,
    pub total_volume1: U256,
    pub total_fees0: U256,
    pub total_fees1: U256,
    pub num_swaps: u64,
    pub cumulative_price_impact_bps: U256,
    /// trader -> block of their last committed swap
    pub last_swap_block: HashMap<Address, u64>,
    pub paused: bool,
}

/// Read-only metrics snapshot polled by the evolution engine
#[derive(Debug, Clone, Copy)]
pub struct PoolMetrics {
    pub reserve0: U256,
    pub reserve1: U256,
    pub total_volume0: U256,
    pub total_volume1: U256,
    pub total_fees0: U256,
    pub total_fees1: U256,
    pub num_swaps: u64,
    pub average_price_impact_bps: u64,
}

/// Result of a committed swap
#[derive(Debug, Clone, Copy)]
pub struct SwapOutcome {
    pub amount_out: U256,
    pub fee_amount: U256,
    pub price_impact_bps: u64,
}

/// Constant-product pool with heritable traits.
/// Every mutating operation commits fully or fails with no state change.
#[derive(Debug)]
pub struct EvolvablePool {
    address: Address,
    token0: Address,
    token1: Address,
    owner: Address,
    traits: PoolTraits,
    state: PoolState,
    clock: Arc<dyn BlockSource>,
    events: Arc<dyn EventSink>,
}

impl EvolvablePool {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: Address,
        token0: Address,
        token1: Address,
        owner: Address,
        traits: PoolTraits,
        clock: Arc<dyn BlockSource>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            address,
            token0,
            token1,
            owner,
            traits,
            state: PoolState::default(),
            clock,
            events,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn token0(&self) -> Address {
        self.token0
    }

    pub fn token1(&self) -> Address {
        self.token1
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn traits(&self) -> PoolTraits {
        self.traits
    }

    pub fn reserves(&self) -> (U256, U256) {
        (self.state.reserve0, self.state.reserve1)
    }

    pub fn num_swaps(&self) -> u64 {
        self.state.num_swaps
    }

    pub fn total_volume0(&self) -> U256 {
        self.state.total_volume0
    }

    pub fn total_volume1(&self) -> U256 {
        self.state.total_volume1
    }

    pub fn total_fees0(&self) -> U256 {
        self.state.total_fees0
    }

    pub fn total_fees1(&self) -> U256 {
        self.state.total_fees1
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Cumulative impact divided by the number of swaps (zero swaps reads as zero)
    pub fn average_price_impact_bps(&self) -> u64 {
        let swaps = self.state.num_swaps.max(1);
        (self.state.cumulative_price_impact_bps / U256::from(swaps))
            .try_into()
            .unwrap_or(u64::MAX)
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            reserve0: self.state.reserve0,
            reserve1: self.state.reserve1,
            total_volume0: self.state.total_volume0,
            total_volume1: self.state.total_volume1,
            total_fees0: self.state.total_fees0,
            total_fees1: self.state.total_fees1,
            num_swaps: self.state.num_swaps,
            average_price_impact_bps: self.average_price_impact_bps(),
        }
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state.paused {
            return Err(EngineError::PoolPaused(self.address));
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(EngineError::Unauthorized("pool owner"));
        }
        Ok(())
    }

    /// Reversible soft-disable; owner only. Read accessors stay available.
    pub fn set_paused(&mut self, caller: Address, paused: bool) -> Result<()> {
        self.ensure_owner(caller)?;
        self.state.paused = paused;
        info!(pool = ?self.address, paused, "Pool pause state changed");
        Ok(())
    }

    /// Hand the pool to a new owner; current owner only
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.owner = new_owner;
        info!(pool = ?self.address, new_owner = ?new_owner, "Pool ownership transferred");
        Ok(())
    }

    /// Move both amounts from the owner into the pool and grow the reserves.
    /// No ratio enforcement: provisioning trusts the single owner.
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        amount0: U256,
        amount1: U256,
        bank: &dyn TokenTransfer,
    ) -> Result<()> {
        self.ensure_active()?;
        self.ensure_owner(caller)?;
        if amount0.is_zero() && amount1.is_zero() {
            return Err(EngineError::ZeroAmount);
        }

        // both legs must be funded before anything moves
        if bank.balance_of(self.token0, caller) < amount0 {
            return Err(EngineError::InsufficientBalance {
                token: self.token0,
                holder: caller,
            });
        }
        if bank.balance_of(self.token1, caller) < amount1 {
            return Err(EngineError::InsufficientBalance {
                token: self.token1,
                holder: caller,
            });
        }

        if !amount0.is_zero() {
            bank.transfer_from(self.token0, caller, self.address, amount0)?;
        }
        if !amount1.is_zero() {
            bank.transfer_from(self.token1, caller, self.address, amount1)?;
        }
        self.state.reserve0 += amount0;
        self.state.reserve1 += amount1;

        debug!(
            pool = ?self.address,
            amount0 = %amount0,
            amount1 = %amount1,
            reserve0 = %self.state.reserve0,
            reserve1 = %self.state.reserve1,
            "Liquidity added"
        );
        Ok(())
    }

    /// Swap an exact input amount for the other token of the pair.
    /// All checks run before any state or balance mutation.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_input(
        &mut self,
        caller: Address,
        token_in: Address,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
        bank: &dyn TokenTransfer,
    ) -> Result<SwapOutcome> {
        self.ensure_active()?;
        if amount_in.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        let zero_for_one = if token_in == self.token0 {
            true
        } else if token_in == self.token1 {
            false
        } else {
            return Err(EngineError::UnknownToken {
                pool: self.address,
                token: token_in,
            });
        };

        let (reserve_in, reserve_out) = if zero_for_one {
            (self.state.reserve0, self.state.reserve1)
        } else {
            (self.state.reserve1, self.state.reserve0)
        };
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(EngineError::InsufficientLiquidity(self.address));
        }

        let block = self.clock.current_block();
        let cooldown = self.traits.cooldown_blocks as u64;
        if cooldown > 0 {
            if let Some(last) = self.state.last_swap_block.get(&caller) {
                let elapsed = block.saturating_sub(*last);
                if elapsed < cooldown {
                    return Err(EngineError::CooldownActive {
                        remaining_blocks: cooldown - elapsed,
                    });
                }
            }
        }

        let (amount_in_after_fee, fee_amount) = math::split_fee(amount_in, self.traits.fee_bps);
        let amount_out = math::constant_product_out(amount_in_after_fee, reserve_in, reserve_out);
        if amount_out.is_zero() {
            return Err(EngineError::ZeroAmount);
        }

        let price_impact_bps =
            math::price_impact_bps(amount_in, amount_out, reserve_in, reserve_out);
        let guard = self.traits.slippage_guard_bps as u64;
        if price_impact_bps > guard {
            return Err(EngineError::SlippageExceeded(format!(
                "price impact {price_impact_bps} bps exceeds guard {guard} bps"
            )));
        }
        if amount_out < min_amount_out {
            return Err(EngineError::SlippageExceeded(format!(
                "output {amount_out} below minimum {min_amount_out}"
            )));
        }

        if bank.balance_of(token_in, caller) < amount_in {
            return Err(EngineError::InsufficientBalance {
                token: token_in,
                holder: caller,
            });
        }

        // all checks passed; commit as one unit
        bank.transfer_from(token_in, caller, self.address, amount_in)?;
        let token_out = if zero_for_one {
            self.state.reserve0 += amount_in;
            self.state.reserve1 -= amount_out;
            self.state.total_volume0 += amount_in;
            self.state.total_fees0 += fee_amount;
            self.token1
        } else {
            self.state.reserve1 += amount_in;
            self.state.reserve0 -= amount_out;
            self.state.total_volume1 += amount_in;
            self.state.total_fees1 += fee_amount;
            self.token0
        };
        self.state.num_swaps += 1;
        self.state.cumulative_price_impact_bps += U256::from(price_impact_bps);
        self.state.last_swap_block.insert(caller, block);
        bank.transfer(self.address, token_out, recipient, amount_out)?;

        debug!(
            pool = ?self.address,
            trader = ?caller,
            token_in = ?token_in,
            amount_in = %amount_in,
            amount_out = %amount_out,
            fee = %fee_amount,
            impact_bps = price_impact_bps,
            num_swaps = self.state.num_swaps,
            "Swap committed"
        );
        self.events.handle_event(&EngineEvent::Swap(SwapEvent {
            pool: self.address,
            trader: caller,
            token_in,
            amount_in,
            amount_out,
            fee_amount,
            price_impact_bps,
            block_number: block,
        }));

        Ok(SwapOutcome {
            amount_out,
            fee_amount,
            price_impact_bps,
        })
    }
}
