use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{keccak256, Address, U256};
use dashmap::DashMap;
use morpheus_core::error::{EngineError, Result};
use tracing::debug;

/// Fungible-token movement capability consumed by pools.
/// Standard transfer/transferFrom/balanceOf semantics; the engine never
/// implements token accounting itself.
pub trait TokenTransfer: Send + Sync + fmt::Debug {
    /// Move `amount` of `token` from the caller to `to`
    fn transfer(&self, caller: Address, token: Address, to: Address, amount: U256) -> Result<()>;

    /// Move `amount` of `token` from `from` to `to` on behalf of a trusted spender
    fn transfer_from(&self, token: Address, from: Address, to: Address, amount: U256)
        -> Result<()>;

    fn balance_of(&self, token: Address, holder: Address) -> U256;
}

/// Key for balance lookup: (token, holder)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BalanceKey {
    pub token: Address,
    pub holder: Address,
}

/// In-memory token ledger backing local runs and tests
#[derive(Debug, Default)]
pub struct TokenBank {
    balances: DashMap<BalanceKey, U256>,
    symbols: DashMap<Address, String>,
    nonce: AtomicU64,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new token and return its address
    pub fn register_token(&self, symbol: &str) -> Address {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let mut buf = Vec::with_capacity(14 + symbol.len() + 8);
        buf.extend_from_slice(b"morpheus/token");
        buf.extend_from_slice(symbol.as_bytes());
        buf.extend_from_slice(&nonce.to_be_bytes());
        let token = Address::from_slice(&keccak256(&buf)[12..]);

        self.symbols.insert(token, symbol.to_string());
        debug!(token = ?token, symbol, "Token registered");
        token
    }

    pub fn symbol(&self, token: Address) -> Option<String> {
        self.symbols.get(&token).map(|s| s.clone())
    }

    pub fn mint(&self, token: Address, to: Address, amount: U256) {
        let key = BalanceKey { token, holder: to };
        let mut balance = self.balances.entry(key).or_insert(U256::ZERO);
        *balance = balance.saturating_add(amount);
        debug!(token = ?token, to = ?to, amount = %amount, "Tokens minted");
    }

    fn debit(&self, token: Address, holder: Address, amount: U256) -> Result<()> {
        let key = BalanceKey { token, holder };
        let mut balance = self
            .balances
            .get_mut(&key)
            .ok_or(EngineError::InsufficientBalance { token, holder })?;
        if *balance < amount {
            return Err(EngineError::InsufficientBalance { token, holder });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&self, token: Address, holder: Address, amount: U256) {
        let key = BalanceKey { token, holder };
        let mut balance = self.balances.entry(key).or_insert(U256::ZERO);
        *balance = balance.saturating_add(amount);
    }
}

impl TokenTransfer for TokenBank {
    fn transfer(&self, caller: Address, token: Address, to: Address, amount: U256) -> Result<()> {
        self.debit(token, caller, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }

    fn transfer_from(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }

    fn balance_of(&self, token: Address, holder: Address) -> U256 {
        let key = BalanceKey { token, holder };
        self.balances
            .get(&key)
            .map(|b| *b)
            .unwrap_or(U256::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpheus_core::types::address_from_label;

    #[test]
    fn test_register_token_yields_distinct_addresses() {
        let bank = TokenBank::new();
        let a = bank.register_token("TK0");
        let b = bank.register_token("TK0");

        assert_ne!(a, b);
        assert_eq!(bank.symbol(a).as_deref(), Some("TK0"));
    }

    #[test]
    fn test_mint_and_transfer() {
        let bank = TokenBank::new();
        let token = bank.register_token("TK0");
        let alice = address_from_label("alice");
        let bob = address_from_label("bob");

        bank.mint(token, alice, U256::from(1_000u64));
        assert_eq!(bank.balance_of(token, alice), U256::from(1_000u64));

        bank.transfer(alice, token, bob, U256::from(400u64)).unwrap();
        assert_eq!(bank.balance_of(token, alice), U256::from(600u64));
        assert_eq!(bank.balance_of(token, bob), U256::from(400u64));
    }

    #[test]
    fn test_transfer_rejects_insufficient_balance() {
        let bank = TokenBank::new();
        let token = bank.register_token("TK0");
        let alice = address_from_label("alice");
        let bob = address_from_label("bob");

        bank.mint(token, alice, U256::from(10u64));
        let err = bank
            .transfer_from(token, alice, bob, U256::from(11u64))
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientBalance { .. }));

        // failed transfer must not move anything
        assert_eq!(bank.balance_of(token, alice), U256::from(10u64));
        assert_eq!(bank.balance_of(token, bob), U256::ZERO);
    }
}
