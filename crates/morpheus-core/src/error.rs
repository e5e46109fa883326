use alloy_primitives::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid traits: {0}")]
    InvalidTraits(String),

    #[error("Pool tokens must differ")]
    IdenticalTokens,

    #[error("Unknown parent pool: {0}")]
    UnknownParent(Address),

    #[error("Pool not found: {0}")]
    PoolNotFound(Address),

    #[error("Pool already registered: {0}")]
    AlreadyRegistered(Address),

    #[error("No genetic record for pool: {0}")]
    NotSeeded(Address),

    #[error("Genetic record already seeded: {0}")]
    AlreadySeeded(Address),

    #[error("Unauthorized: {0} required")]
    Unauthorized(&'static str),

    #[error("Pool is paused: {0}")]
    PoolPaused(Address),

    #[error("Cooldown active: {remaining_blocks} blocks remaining")]
    CooldownActive { remaining_blocks: u64 },

    #[error("Slippage exceeded: {0}")]
    SlippageExceeded(String),

    #[error("Insufficient liquidity in pool: {0}")]
    InsufficientLiquidity(Address),

    #[error("Token {token} is not part of pool {pool}")]
    UnknownToken { pool: Address, token: Address },

    #[error("Amount must be non-zero")]
    ZeroAmount,

    #[error("Insufficient balance: token={token} holder={holder}")]
    InsufficientBalance { token: Address, holder: Address },

    #[error("DNA decode error: {0}")]
    DecodeError(String),

    #[error("Unsupported DNA version: {0}")]
    UnsupportedVersion(u8),

    #[error("Scenario file not found: {0}")]
    ScenarioFileNotFound(String),

    #[error("Failed to parse scenario file: {0}")]
    ScenarioParseError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
