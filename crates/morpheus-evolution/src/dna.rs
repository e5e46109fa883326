use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{sol, SolValue};
use morpheus_core::error::{EngineError, Result};
use morpheus_core::types::{GeneticRecord, PoolDescriptor, PoolTraits, GENE_COUNT};

/// Current DNA wire-format version
pub const DNA_VERSION: u8 = 1;

/// Encoded blob length: fourteen static 32-byte words
pub const DNA_BLOB_LEN: usize = 448;

sol! {
    struct DnaTraits {
        uint16 feeBps;
        uint16 slippageGuardBps;
        uint16 cooldownBlocks;
        bool mevProtection;
    }

    struct DnaBlob {
        uint8 version;
        uint256 generation;
        bytes32 parentHash;
        uint256[3] dnaGenes;
        uint256 fitnessScore;
        uint256 birthBlock;
        address token0;
        address token1;
        DnaTraits traits;
    }
}

/// Engine-native view of a decoded DNA blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDna {
    pub version: u8,
    pub generation: u64,
    pub parent_hash: B256,
    pub dna_genes: [U256; GENE_COUNT],
    pub fitness_score: u64,
    pub birth_block: u64,
    pub token0: Address,
    pub token1: Address,
    pub traits: PoolTraits,
}

/// Hash binding a blob to its source lineage; zero for genesis pools
pub fn parent_hash(parent: Option<Address>) -> B256 {
    parent
        .map(|p| keccak256(p.as_slice()))
        .unwrap_or(B256::ZERO)
}

/// Serialize a descriptor + genetic record into the canonical ABI tuple
pub fn encode(descriptor: &PoolDescriptor, record: &GeneticRecord) -> Vec<u8> {
    let blob = DnaBlob {
        version: DNA_VERSION,
        generation: U256::from(descriptor.generation),
        parentHash: parent_hash(descriptor.parent),
        dnaGenes: record.dna_genes,
        fitnessScore: U256::from(record.fitness_score),
        birthBlock: U256::from(record.birth_block),
        token0: descriptor.token0,
        token1: descriptor.token1,
        traits: DnaTraits {
            feeBps: descriptor.traits.fee_bps,
            slippageGuardBps: descriptor.traits.slippage_guard_bps,
            cooldownBlocks: descriptor.traits.cooldown_blocks,
            mevProtection: descriptor.traits.mev_protection,
        },
    };
    blob.abi_encode()
}

/// Decode a DNA blob. The version word is checked before the full decode so
/// an incompatible blob fails with `UnsupportedVersion`, not `DecodeError`.
pub fn decode(data: &[u8]) -> Result<DecodedDna> {
    if data.len() < 32 {
        return Err(EngineError::DecodeError(format!(
            "blob too short: {} bytes",
            data.len()
        )));
    }
    let version = data[31];
    if version != DNA_VERSION {
        return Err(EngineError::UnsupportedVersion(version));
    }
    if data.len() != DNA_BLOB_LEN {
        return Err(EngineError::DecodeError(format!(
            "expected {DNA_BLOB_LEN} bytes, got {}",
            data.len()
        )));
    }

    let blob = DnaBlob::abi_decode(data).map_err(|e| EngineError::DecodeError(e.to_string()))?;

    Ok(DecodedDna {
        version: blob.version,
        generation: blob.generation.try_into().unwrap_or(u64::MAX),
        parent_hash: blob.parentHash,
        dna_genes: blob.dnaGenes,
        fitness_score: blob.fitnessScore.try_into().unwrap_or(u64::MAX),
        birth_block: blob.birthBlock.try_into().unwrap_or(u64::MAX),
        token0: blob.token0,
        token1: blob.token1,
        traits: PoolTraits {
            fee_bps: blob.traits.feeBps,
            slippage_guard_bps: blob.traits.slippageGuardBps,
            cooldown_blocks: blob.traits.cooldownBlocks,
            mev_protection: blob.traits.mevProtection,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpheus_core::types::address_from_label;

    fn sample_descriptor() -> PoolDescriptor {
        PoolDescriptor {
            address: address_from_label("pool"),
            token0: address_from_label("token0"),
            token1: address_from_label("token1"),
            parent: Some(address_from_label("parent")),
            generation: 3,
            traits: PoolTraits {
                fee_bps: 30,
                slippage_guard_bps: 250,
                cooldown_blocks: 7,
                mev_protection: true,
            },
            owner: address_from_label("owner"),
            created_at_block: 42,
        }
    }

    fn sample_record() -> GeneticRecord {
        GeneticRecord {
            fitness_score: 7_500,
            components: Default::default(),
            dna_genes: [
                U256::from(5_250u64),
                U256::from(4_900u64),
                U256::from(5_000u64),
            ],
            birth_block: 99,
        }
    }

    #[test]
    fn test_blob_layout() {
        let blob = encode(&sample_descriptor(), &sample_record());
        assert_eq!(blob.len(), DNA_BLOB_LEN);
        // version lives in the low byte of the first word
        assert_eq!(blob[31], DNA_VERSION);
        assert!(blob[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_round_trip_reproduces_all_fields() {
        let descriptor = sample_descriptor();
        let record = sample_record();

        let decoded = decode(&encode(&descriptor, &record)).unwrap();
        assert_eq!(decoded.version, DNA_VERSION);
        assert_eq!(decoded.generation, descriptor.generation);
        assert_eq!(decoded.parent_hash, parent_hash(descriptor.parent));
        assert_eq!(decoded.dna_genes, record.dna_genes);
        assert_eq!(decoded.fitness_score, record.fitness_score);
        assert_eq!(decoded.birth_block, record.birth_block);
        assert_eq!(decoded.token0, descriptor.token0);
        assert_eq!(decoded.token1, descriptor.token1);
        assert_eq!(decoded.traits, descriptor.traits);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let descriptor = sample_descriptor();
        let record = sample_record();
        assert_eq!(encode(&descriptor, &record), encode(&descriptor, &record));
    }

    #[test]
    fn test_genesis_parent_hash_is_zero() {
        let mut descriptor = sample_descriptor();
        descriptor.parent = None;
        descriptor.generation = 0;

        let decoded = decode(&encode(&descriptor, &sample_record())).unwrap();
        assert_eq!(decoded.parent_hash, B256::ZERO);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut blob = encode(&sample_descriptor(), &sample_record());
        blob[31] = 2;
        assert!(matches!(
            decode(&blob),
            Err(EngineError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let blob = encode(&sample_descriptor(), &sample_record());
        assert!(matches!(
            decode(&blob[..blob.len() - 32]),
            Err(EngineError::DecodeError(_))
        ));
        assert!(matches!(
            decode(&blob[..16]),
            Err(EngineError::DecodeError(_))
        ));
    }
}
