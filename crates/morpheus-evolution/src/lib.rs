pub mod dna;
mod engine;
pub mod mutation;

pub use dna::{DecodedDna, DNA_BLOB_LEN, DNA_VERSION};
pub use engine::EvolutionEngine;
pub use mutation::ParentMetrics;
