use std::sync::Arc;

use alloy_primitives::Address;
use dashmap::DashMap;
use morpheus_core::clock::BlockSource;
use morpheus_core::error::{EngineError, Result};
use morpheus_core::events::{ContractEvolvedEvent, EngineEvent};
use morpheus_core::sink::EventSink;
use morpheus_core::types::{FitnessComponents, GeneticRecord, BPS_DENOMINATOR, GENE_COUNT};
use morpheus_factory::PoolFactory;
use morpheus_pool::PoolSet;
use morpheus_registry::PoolLedger;
use tracing::{debug, info};

use crate::dna;
use crate::mutation::{self, ParentMetrics};

/// Fitness tracking, trait mutation and cross-instance DNA migration.
/// Owns every genetic record; pool metrics are read back through the pool's
/// own accessors and never mutated here.
#[derive(Debug)]
pub struct EvolutionEngine {
    chain_id: u64,
    oracle: Address,
    factory: Arc<PoolFactory>,
    ledger: Arc<dyn PoolLedger>,
    pools: Arc<PoolSet>,
    clock: Arc<dyn BlockSource>,
    events: Arc<dyn EventSink>,
    genetics: DashMap<Address, GeneticRecord>,
}

impl EvolutionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: u64,
        oracle: Address,
        factory: Arc<PoolFactory>,
        ledger: Arc<dyn PoolLedger>,
        pools: Arc<PoolSet>,
        clock: Arc<dyn BlockSource>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            chain_id,
            oracle,
            factory,
            ledger,
            pools,
            clock,
            events,
            genetics: DashMap::new(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Factory this engine evolves children through
    pub fn factory(&self) -> &Arc<PoolFactory> {
        &self.factory
    }

    pub fn genetics(&self, pool: Address) -> Option<GeneticRecord> {
        self.genetics.get(&pool).map(|r| r.clone())
    }

    /// One-time initializer assigning the neutral-baseline genetic record
    pub fn seed_dna(&self, pool: Address) -> Result<()> {
        if !self.ledger.contains(pool) {
            return Err(EngineError::PoolNotFound(pool));
        }
        if self.genetics.contains_key(&pool) {
            return Err(EngineError::AlreadySeeded(pool));
        }

        let record = GeneticRecord::seeded(self.clock.current_block());
        debug!(pool = ?pool, birth_block = record.birth_block, "Genetic record seeded");
        self.genetics.insert(pool, record);
        Ok(())
    }

    /// Store oracle-reported fitness components and recompute the score as
    /// their equal-weight average, each clamped to [0, 10000]
    pub fn report_fitness(
        &self,
        caller: Address,
        pool: Address,
        gas_efficiency: u64,
        profitability: u64,
        user_satisfaction: u64,
    ) -> Result<()> {
        if caller != self.oracle {
            return Err(EngineError::Unauthorized("fitness oracle"));
        }
        let mut record = self
            .genetics
            .get_mut(&pool)
            .ok_or(EngineError::NotSeeded(pool))?;

        let gas_efficiency = gas_efficiency.min(BPS_DENOMINATOR);
        let profitability = profitability.min(BPS_DENOMINATOR);
        let user_satisfaction = user_satisfaction.min(BPS_DENOMINATOR);

        record.components = FitnessComponents {
            gas_efficiency,
            profitability,
            user_satisfaction,
        };
        record.fitness_score = (gas_efficiency + profitability + user_satisfaction) / 3;

        info!(
            pool = ?pool,
            gas_efficiency,
            profitability,
            user_satisfaction,
            fitness = record.fitness_score,
            "Fitness reported"
        );
        Ok(())
    }

    /// Read the parent's metrics, mutate its traits and genes, and create the
    /// child pool through the factory. The parent must have been seeded.
    pub fn evolve_contract(
        &self,
        caller: Address,
        parent: Address,
        target: Option<[u64; GENE_COUNT]>,
    ) -> Result<Address> {
        let parent_record = self
            .genetics
            .get(&parent)
            .map(|r| r.clone())
            .ok_or(EngineError::NotSeeded(parent))?;
        let descriptor = self.ledger.get(parent)?;
        let metrics = self.pools.with_pool(&parent, |pool| ParentMetrics {
            average_price_impact_bps: pool.average_price_impact_bps(),
            num_swaps: pool.num_swaps(),
        })?;

        let child_traits = mutation::mutate_traits(&descriptor.traits, &metrics, target.as_ref());
        debug!(
            parent = ?parent,
            avg_impact_bps = metrics.average_price_impact_bps,
            num_swaps = metrics.num_swaps,
            ?child_traits,
            "Traits mutated"
        );

        let child = self.factory.create_pool(
            caller,
            descriptor.token0,
            descriptor.token1,
            Some(parent),
            child_traits,
        )?;

        let child_record = GeneticRecord {
            fitness_score: 0,
            components: FitnessComponents::default(),
            dna_genes: mutation::mutate_genes(&parent_record.dna_genes, target.as_ref()),
            birth_block: self.clock.current_block(),
        };
        self.genetics.insert(child, child_record);

        // informational until the child receives its own fitness report
        let fitness_improvement = 0i64 - parent_record.fitness_score as i64;
        let generation = descriptor.generation + 1;
        info!(
            parent = ?parent,
            child = ?child,
            generation,
            fitness_improvement,
            "Contract evolved"
        );
        self.events
            .handle_event(&EngineEvent::ContractEvolved(ContractEvolvedEvent {
                parent,
                child,
                generation,
                fitness_improvement,
                block_number: self.clock.current_block(),
            }));

        Ok(child)
    }

    /// Assemble the pool's descriptor and genetic record into the canonical
    /// migration blob. Read-only.
    pub fn export_dna(&self, pool: Address, target_chain_id: u64) -> Result<Vec<u8>> {
        let descriptor = self.ledger.get(pool)?;
        let record = self
            .genetics
            .get(&pool)
            .map(|r| r.clone())
            .ok_or(EngineError::NotSeeded(pool))?;

        let blob = dna::encode(&descriptor, &record);
        info!(
            pool = ?pool,
            source_chain = self.chain_id,
            target_chain = target_chain_id,
            bytes = blob.len(),
            "DNA exported"
        );
        Ok(blob)
    }

    /// Recreate a migrated pool on this instance from a transported blob.
    /// No causal link to the source ledger is enforced; the embedded parent
    /// hash is carried for provenance only.
    pub fn import_dna(&self, caller: Address, blob: &[u8]) -> Result<Address> {
        let decoded = dna::decode(blob)?;

        let pool = self.factory.create_pool(
            caller,
            decoded.token0,
            decoded.token1,
            None,
            decoded.traits,
        )?;
        let record = GeneticRecord {
            fitness_score: decoded.fitness_score,
            components: FitnessComponents::default(),
            dna_genes: decoded.dna_genes,
            birth_block: self.clock.current_block(),
        };
        self.genetics.insert(pool, record);

        info!(
            pool = ?pool,
            origin_generation = decoded.generation,
            parent_hash = ?decoded.parent_hash,
            fitness = decoded.fitness_score,
            "DNA imported"
        );
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use morpheus_core::sink::MemorySink;
    use morpheus_core::types::{address_from_label, PoolTraits, NEUTRAL_GENE};
    use morpheus_core::SimClock;
    use morpheus_registry::InMemoryLedger;
    use morpheus_tokens::{units, TokenBank};

    struct Fixture {
        engine: EvolutionEngine,
        ledger: Arc<InMemoryLedger>,
        pools: Arc<PoolSet>,
        clock: Arc<SimClock>,
        events: Arc<MemorySink>,
        bank: TokenBank,
        operator: Address,
        genesis: Address,
        token0: Address,
        token1: Address,
    }

    fn fixture() -> Fixture {
        let operator = address_from_label("operator");
        let ledger = Arc::new(InMemoryLedger::new(operator));
        let pools = Arc::new(PoolSet::new());
        let clock = Arc::new(SimClock::new(10));
        let events = Arc::new(MemorySink::new());
        let bank = TokenBank::new();

        let factory_addr = address_from_label("factory");
        ledger.set_factory(operator, factory_addr).unwrap();
        let factory = Arc::new(PoolFactory::new(
            factory_addr,
            ledger.clone(),
            pools.clone(),
            clock.clone(),
            events.clone(),
        ));

        let token0 = bank.register_token("TK0");
        let token1 = bank.register_token("TK1");
        bank.mint(token0, operator, units(1_000_000));
        bank.mint(token1, operator, units(1_000_000));

        let genesis = factory
            .create_pool(
                operator,
                token0,
                token1,
                None,
                PoolTraits {
                    fee_bps: 30,
                    slippage_guard_bps: 250,
                    cooldown_blocks: 0,
                    mev_protection: true,
                },
            )
            .unwrap();

        let engine = EvolutionEngine::new(
            31_337,
            operator,
            factory,
            ledger.clone(),
            pools.clone(),
            clock.clone(),
            events.clone(),
        );
        Fixture {
            engine,
            ledger,
            pools,
            clock,
            events,
            bank,
            operator,
            genesis,
            token0,
            token1,
        }
    }

    #[test]
    fn test_seed_dna_once() {
        let f = fixture();
        f.engine.seed_dna(f.genesis).unwrap();

        let record = f.engine.genetics(f.genesis).unwrap();
        assert_eq!(record.fitness_score, 0);
        assert_eq!(record.birth_block, 10);
        assert_eq!(record.dna_genes, [U256::from(NEUTRAL_GENE); GENE_COUNT]);

        assert!(matches!(
            f.engine.seed_dna(f.genesis),
            Err(EngineError::AlreadySeeded(_))
        ));
    }

    #[test]
    fn test_seed_dna_requires_known_pool() {
        let f = fixture();
        assert!(matches!(
            f.engine.seed_dna(address_from_label("ghost")),
            Err(EngineError::PoolNotFound(_))
        ));
    }

    #[test]
    fn test_report_fitness_is_oracle_only() {
        let f = fixture();
        f.engine.seed_dna(f.genesis).unwrap();

        let err = f
            .engine
            .report_fitness(address_from_label("stranger"), f.genesis, 1, 1, 1)
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized(_)));
    }

    #[test]
    fn test_report_fitness_clamps_and_averages() {
        let f = fixture();
        f.engine.seed_dna(f.genesis).unwrap();
        f.engine
            .report_fitness(f.operator, f.genesis, 8_000, 7_000, 7_500)
            .unwrap();

        let record = f.engine.genetics(f.genesis).unwrap();
        assert_eq!(record.fitness_score, 7_500);
        assert_eq!(record.components.gas_efficiency, 8_000);

        // out-of-range inputs clamp to the scale
        f.engine
            .report_fitness(f.operator, f.genesis, 50_000, 10_000, 10_000)
            .unwrap();
        let record = f.engine.genetics(f.genesis).unwrap();
        assert_eq!(record.fitness_score, 10_000);
    }

    #[test]
    fn test_report_fitness_requires_seeding() {
        let f = fixture();
        assert!(matches!(
            f.engine.report_fitness(f.operator, f.genesis, 1, 1, 1),
            Err(EngineError::NotSeeded(_))
        ));
    }

    #[test]
    fn test_evolve_requires_seeded_parent() {
        let f = fixture();
        assert!(matches!(
            f.engine.evolve_contract(f.operator, f.genesis, None),
            Err(EngineError::NotSeeded(_))
        ));
    }

    #[test]
    fn test_evolve_creates_seeded_child_with_lineage() {
        let f = fixture();
        f.engine.seed_dna(f.genesis).unwrap();
        f.engine
            .report_fitness(f.operator, f.genesis, 8_000, 7_000, 7_500)
            .unwrap();

        f.clock.advance(5);
        let child = f
            .engine
            .evolve_contract(f.operator, f.genesis, Some([8_200, 7_200, 7_600]))
            .unwrap();

        let child_desc = f.ledger.get(child).unwrap();
        assert_eq!(child_desc.parent, Some(f.genesis));
        assert_eq!(child_desc.generation, 1);
        assert!(f.ledger.children(f.genesis).contains(&child));
        assert!(f.pools.contains(&child));

        // child record is freshly seeded with mutated genes
        let record = f.engine.genetics(child).unwrap();
        assert_eq!(record.fitness_score, 0);
        assert_eq!(record.birth_block, 15);
        assert_eq!(record.dna_genes[0], U256::from(5_250u64));

        // the notification reports the informational baseline delta
        let evolved = f
            .events
            .snapshot()
            .iter()
            .find_map(|e| match e {
                EngineEvent::ContractEvolved(ev) => Some(ev.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(evolved.parent, f.genesis);
        assert_eq!(evolved.child, child);
        assert_eq!(evolved.generation, 1);
        assert_eq!(evolved.fitness_improvement, -7_500);
    }

    #[test]
    fn test_evolve_uses_observed_metrics() {
        let f = fixture();
        f.engine.seed_dna(f.genesis).unwrap();

        // drive 16 swaps so the demand branch raises the fee
        f.pools
            .with_pool_mut(&f.genesis, |pool| {
                pool.add_liquidity(f.operator, units(100_000), units(100_000), &f.bank)
            })
            .unwrap()
            .unwrap();
        for i in 0..16 {
            let token_in = if i % 2 == 0 { f.token0 } else { f.token1 };
            f.pools
                .with_pool_mut(&f.genesis, |pool| {
                    pool.swap_exact_input(
                        f.operator,
                        token_in,
                        units(100),
                        U256::ZERO,
                        f.operator,
                        &f.bank,
                    )
                })
                .unwrap()
                .unwrap();
        }

        let child = f.engine.evolve_contract(f.operator, f.genesis, None).unwrap();
        let child_traits = f.ledger.get(child).unwrap().traits;

        // parent fee 30 + demand step
        assert_eq!(child_traits.fee_bps, 35);
        // guard hugs the observed impact: avg + 50, floored at 50
        let avg = f.pools.metrics(&f.genesis).unwrap().average_price_impact_bps;
        assert!(avg > 0);
        assert_eq!(child_traits.slippage_guard_bps as u64, (avg + 50).max(50));
        assert!(child_traits.mev_protection);
    }

    #[test]
    fn test_export_dna_round_trips_through_import() {
        let f = fixture();
        f.engine.seed_dna(f.genesis).unwrap();
        f.engine
            .report_fitness(f.operator, f.genesis, 8_000, 7_000, 7_500)
            .unwrap();

        let blob = f.engine.export_dna(f.genesis, 84_532).unwrap();
        let decoded = crate::dna::decode(&blob).unwrap();
        assert_eq!(decoded.token0, f.token0);
        assert_eq!(decoded.token1, f.token1);
        assert_eq!(decoded.generation, 0);
        assert_eq!(decoded.fitness_score, 7_500);

        // a second, independent instance rebuilds the pool from the blob
        let g = fixture();
        let migrated = g.engine.import_dna(g.operator, &blob).unwrap();
        let descriptor = g.ledger.get(migrated).unwrap();
        assert_eq!(descriptor.traits, f.ledger.get(f.genesis).unwrap().traits);
        assert_eq!(descriptor.generation, 0);
        assert_eq!(descriptor.parent, None);

        let record = g.engine.genetics(migrated).unwrap();
        assert_eq!(record.fitness_score, 7_500);
        assert_eq!(record.dna_genes, [U256::from(NEUTRAL_GENE); GENE_COUNT]);
    }

    #[test]
    fn test_export_dna_requires_known_seeded_pool() {
        let f = fixture();
        assert!(matches!(
            f.engine.export_dna(address_from_label("ghost"), 1),
            Err(EngineError::PoolNotFound(_))
        ));
        assert!(matches!(
            f.engine.export_dna(f.genesis, 1),
            Err(EngineError::NotSeeded(_))
        ));
    }

    #[test]
    fn test_import_rejects_malformed_blob() {
        let f = fixture();
        let err = f.engine.import_dna(f.operator, &[0u8; 31]).unwrap_err();
        assert!(matches!(err, EngineError::DecodeError(_)));
        // nothing was created
        assert_eq!(f.ledger.count(), 1);
    }
}
