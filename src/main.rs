use std::sync::Arc;

use alloy_primitives::{hex, Address, U256};
use morpheus_core::sink::{EventSink, TracingSink};
use morpheus_core::types::address_from_label;
use morpheus_core::{ScenarioConfig, SimClock};
use morpheus_evolution::EvolutionEngine;
use morpheus_factory::PoolFactory;
use morpheus_pool::PoolSet;
use morpheus_registry::{InMemoryLedger, PoolLedger};
use morpheus_tokens::{units, TokenBank, TokenTransfer};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// One fully wired engine instance, standing in for a chain deployment
struct EngineInstance {
    ledger: Arc<InMemoryLedger>,
    pools: Arc<PoolSet>,
    clock: Arc<SimClock>,
    engine: EvolutionEngine,
}

fn deploy_instance(name: &str, chain_id: u64, operator: Address) -> EngineInstance {
    let clock = Arc::new(SimClock::new(1));
    let events: Arc<dyn EventSink> = Arc::new(TracingSink);
    let ledger = Arc::new(InMemoryLedger::new(operator));
    let pools = Arc::new(PoolSet::new());

    let factory_addr = address_from_label(&format!("{name}/factory"));
    ledger
        .set_factory(operator, factory_addr)
        .expect("operator wires its own ledger");
    let factory = Arc::new(PoolFactory::new(
        factory_addr,
        ledger.clone(),
        pools.clone(),
        clock.clone(),
        events.clone(),
    ));
    let engine = EvolutionEngine::new(
        chain_id,
        operator,
        factory,
        ledger.clone(),
        pools.clone(),
        clock.clone(),
        events,
    );

    info!(instance = name, chain_id, factory = ?factory_addr, "Engine instance deployed");
    EngineInstance {
        ledger,
        pools,
        clock,
        engine,
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Morpheus engine starting...");

    let config = match ScenarioConfig::load() {
        Ok(config) => {
            info!(
                chain_id = config.chain_id,
                target_chain_id = config.target_chain_id,
                swap_rounds = config.swap_rounds,
                genesis_traits = ?config.genesis_traits,
                "Scenario configuration loaded"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load scenario configuration");
            std::process::exit(1);
        }
    };

    let operator = address_from_label("operator");
    let trader = address_from_label("trader");

    // Token collaborator shared by both instances
    let bank = TokenBank::new();
    let token0 = bank.register_token("TK0");
    let token1 = bank.register_token("TK1");
    for holder in [operator, trader] {
        bank.mint(token0, holder, units(1_000_000));
        bank.mint(token1, holder, units(1_000_000));
    }
    info!(token0 = ?token0, token1 = ?token1, "Test tokens minted");

    // Home instance: genesis pool, liquidity, trading
    let home = deploy_instance("home", config.chain_id, operator);
    let genesis = home.engine.factory().create_pool(
        operator,
        token0,
        token1,
        None,
        config.genesis_traits,
    )?;

    let seed = units(config.seed_liquidity);
    home.pools.with_pool_mut(&genesis, |pool| {
        pool.add_liquidity(operator, seed, seed, &bank)
    })??;
    info!(pool = ?genesis, liquidity = %seed, "Genesis pool seeded");

    let swap_amount = units(config.swap_amount);
    for round in 0..config.swap_rounds {
        let token_in = if round % 2 == 0 { token0 } else { token1 };
        let outcome = home.pools.with_pool_mut(&genesis, |pool| {
            pool.swap_exact_input(trader, token_in, swap_amount, U256::ZERO, trader, &bank)
        })??;
        info!(
            round,
            amount_in = %swap_amount,
            amount_out = %outcome.amount_out,
            impact_bps = outcome.price_impact_bps,
            "Swap round complete"
        );
        home.clock.advance(1);
    }

    let metrics = home.pools.metrics(&genesis)?;
    info!(
        num_swaps = metrics.num_swaps,
        avg_impact_bps = metrics.average_price_impact_bps,
        reserve0 = %metrics.reserve0,
        reserve1 = %metrics.reserve1,
        fees0 = %metrics.total_fees0,
        fees1 = %metrics.total_fees1,
        "Simulation summary"
    );

    // Genetics: seed, score, evolve one generation
    home.engine.seed_dna(genesis)?;
    let (gas_efficiency, profitability, user_satisfaction) = config.fitness_report;
    home.engine.report_fitness(
        operator,
        genesis,
        gas_efficiency,
        profitability,
        user_satisfaction,
    )?;
    let child = home
        .engine
        .evolve_contract(operator, genesis, config.target_genes)?;
    let child_traits = home.ledger.get(child)?.traits;
    info!(child = ?child, traits = ?child_traits, "Child pool evolved");

    // Migration: export on the home instance, import on an independent one
    let blob = home.engine.export_dna(child, config.target_chain_id)?;
    info!(bytes = blob.len(), blob = %hex::encode(&blob), "DNA blob");

    let remote = deploy_instance("remote", config.target_chain_id, operator);
    let migrated = remote.engine.import_dna(operator, &blob)?;
    let descriptor = remote.ledger.get(migrated)?;
    info!(
        pool = ?migrated,
        traits = ?descriptor.traits,
        operator_balance0 = %bank.balance_of(token0, operator),
        "Pool recreated on target instance"
    );

    info!(
        home_pools = home.ledger.count(),
        remote_pools = remote.ledger.count(),
        "Morpheus engine run complete"
    );
    Ok(())
}
