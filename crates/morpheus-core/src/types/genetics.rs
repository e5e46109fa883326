use alloy_primitives::U256;

/// Number of mutation-biasable core genes carried through a lineage
pub const GENE_COUNT: usize = 3;

/// Baseline gene value assigned at seeding
pub const NEUTRAL_GENE: u64 = 5_000;

/// Reported fitness components, each in [0, 10000]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitnessComponents {
    pub gas_efficiency: u64,
    pub profitability: u64,
    pub user_satisfaction: u64,
}

/// Per-pool genetic state, keyed by pool address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneticRecord {
    /// Weighted-average fitness score in [0, 10000]
    pub fitness_score: u64,
    /// Last reported fitness components
    pub components: FitnessComponents,
    /// Abstract lineage fitness genes, distinct from traits
    pub dna_genes: [U256; GENE_COUNT],
    /// Block height at which the record was created
    pub birth_block: u64,
}

impl GeneticRecord {
    /// Neutral-baseline record assigned by one-time seeding
    pub fn seeded(birth_block: u64) -> Self {
        Self {
            fitness_score: 0,
            components: FitnessComponents::default(),
            dna_genes: [U256::from(NEUTRAL_GENE); GENE_COUNT],
            birth_block,
        }
    }
}
