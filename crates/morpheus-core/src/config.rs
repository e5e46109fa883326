use std::env;
use std::fs;

use serde::Deserialize;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::types::PoolTraits;

/// Parameters for a local end-to-end engine run
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Chain id of the home engine instance
    pub chain_id: u64,
    /// Chain id used when exporting DNA for migration
    pub target_chain_id: u64,
    /// Seed liquidity per side, in whole 18-decimal units
    pub seed_liquidity: u64,
    /// Input amount per swap, in whole 18-decimal units
    pub swap_amount: u64,
    /// Number of alternating swaps to simulate
    pub swap_rounds: u32,
    /// Traits of the genesis pool
    pub genesis_traits: PoolTraits,
    /// (gas efficiency, profitability, user satisfaction) reported by the oracle
    pub fitness_report: (u64, u64, u64),
    /// Optional gene-space bias for evolution, each in [0, 10000]
    pub target_genes: Option<[u64; 3]>,
}

/// Optional scenario overrides loaded from a JSON file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioFile {
    #[serde(default)]
    chain_id: Option<u64>,
    #[serde(default)]
    target_chain_id: Option<u64>,
    #[serde(default)]
    seed_liquidity: Option<u64>,
    #[serde(default)]
    swap_amount: Option<u64>,
    #[serde(default)]
    swap_rounds: Option<u32>,
    #[serde(default)]
    traits: Option<PoolTraits>,
}

impl ScenarioConfig {
    /// Load from environment variables, with the JSON file named by
    /// `SCENARIO_FILE` (if set) taking precedence for the fields it carries.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_env();

        if let Ok(path) = env::var("SCENARIO_FILE") {
            let content = fs::read_to_string(&path)
                .map_err(|_| EngineError::ScenarioFileNotFound(path.clone()))?;
            let file: ScenarioFile = serde_json::from_str(&content)
                .map_err(|e| EngineError::ScenarioParseError(e.to_string()))?;

            if let Some(chain_id) = file.chain_id {
                config.chain_id = chain_id;
            }
            if let Some(target_chain_id) = file.target_chain_id {
                config.target_chain_id = target_chain_id;
            }
            if let Some(seed_liquidity) = file.seed_liquidity {
                config.seed_liquidity = seed_liquidity;
            }
            if let Some(swap_amount) = file.swap_amount {
                config.swap_amount = swap_amount;
            }
            if let Some(swap_rounds) = file.swap_rounds {
                config.swap_rounds = swap_rounds;
            }
            if let Some(traits) = file.traits {
                config.genesis_traits = traits;
            }
            info!(file = %path, "Scenario overrides applied");
        }

        Ok(config)
    }

    pub fn from_env() -> Self {
        let chain_id = env::var("CHAIN_ID")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(31_337);

        let target_chain_id = env::var("TARGET_CHAIN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(84_532);

        let seed_liquidity = env::var("SEED_LIQUIDITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100_000);

        let swap_amount = env::var("SWAP_AMOUNT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let swap_rounds = env::var("SWAP_ROUNDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(25);

        let genesis_traits = PoolTraits {
            fee_bps: env::var("GENESIS_FEE_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            slippage_guard_bps: env::var("GENESIS_SLIPPAGE_GUARD_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(250),
            cooldown_blocks: env::var("GENESIS_COOLDOWN_BLOCKS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            mev_protection: env::var("GENESIS_MEV_PROTECTION")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(true),
        };

        let fitness_report = (
            env::var("FIT_GAS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8_000),
            env::var("FIT_PROFIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7_000),
            env::var("FIT_USER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7_500),
        );

        let target_genes = env::var("TARGET_TRAITS")
            .ok()
            .and_then(|s| parse_target_genes(&s));

        Self {
            chain_id,
            target_chain_id,
            seed_liquidity,
            swap_amount,
            swap_rounds,
            genesis_traits,
            fitness_report,
            target_genes,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse a comma-separated triple, e.g. "8200,7200,7600"
fn parse_target_genes(raw: &str) -> Option<[u64; 3]> {
    let parts: Vec<u64> = raw
        .split(',')
        .filter_map(|x| x.trim().parse().ok())
        .collect();
    if parts.len() == 3 {
        Some([parts[0], parts[1], parts[2]])
    } else {
        None
    }
}
