use crate::error::{EngineError, Result};
use crate::types::PoolTraits;

/// Default fee ceiling: 10%
pub const MAX_FEE_BPS: u16 = 1_000;
/// Default slippage-guard ceiling: 20%
pub const MAX_SLIPPAGE_GUARD_BPS: u16 = 2_000;
/// Default cooldown ceiling; a policy knob, not a protocol constant
pub const MAX_COOLDOWN_BLOCKS: u16 = 1_000;

/// Creation-time bounds for heritable traits.
/// Violations are rejected, never clamped.
#[derive(Debug, Clone, Copy)]
pub struct TraitPolicy {
    pub max_fee_bps: u16,
    pub max_slippage_guard_bps: u16,
    pub max_cooldown_blocks: u16,
}

impl Default for TraitPolicy {
    fn default() -> Self {
        Self {
            max_fee_bps: MAX_FEE_BPS,
            max_slippage_guard_bps: MAX_SLIPPAGE_GUARD_BPS,
            max_cooldown_blocks: MAX_COOLDOWN_BLOCKS,
        }
    }
}

impl TraitPolicy {
    /// Validate traits against the configured ceilings. Pure check, no side effects.
    pub fn validate(&self, traits: &PoolTraits) -> Result<()> {
        if traits.fee_bps > self.max_fee_bps {
            return Err(EngineError::InvalidTraits(format!(
                "fee_bps {} exceeds maximum {}",
                traits.fee_bps, self.max_fee_bps
            )));
        }
        if traits.slippage_guard_bps > self.max_slippage_guard_bps {
            return Err(EngineError::InvalidTraits(format!(
                "slippage_guard_bps {} exceeds maximum {}",
                traits.slippage_guard_bps, self.max_slippage_guard_bps
            )));
        }
        if traits.cooldown_blocks > self.max_cooldown_blocks {
            return Err(EngineError::InvalidTraits(format!(
                "cooldown_blocks {} exceeds maximum {}",
                traits.cooldown_blocks, self.max_cooldown_blocks
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_traits() -> PoolTraits {
        PoolTraits {
            fee_bps: 30,
            slippage_guard_bps: 250,
            cooldown_blocks: 0,
            mev_protection: true,
        }
    }

    #[test]
    fn test_valid_traits_pass() {
        assert!(TraitPolicy::default().validate(&valid_traits()).is_ok());
    }

    #[test]
    fn test_boundary_values_pass() {
        let traits = PoolTraits {
            fee_bps: 1_000,
            slippage_guard_bps: 2_000,
            cooldown_blocks: 1_000,
            mev_protection: false,
        };
        assert!(TraitPolicy::default().validate(&traits).is_ok());
    }

    #[test]
    fn test_fee_above_cap_rejected() {
        let traits = PoolTraits {
            fee_bps: 1_001,
            ..valid_traits()
        };
        assert!(matches!(
            TraitPolicy::default().validate(&traits),
            Err(EngineError::InvalidTraits(_))
        ));
    }

    #[test]
    fn test_slippage_guard_above_cap_rejected() {
        let traits = PoolTraits {
            slippage_guard_bps: 2_001,
            ..valid_traits()
        };
        assert!(matches!(
            TraitPolicy::default().validate(&traits),
            Err(EngineError::InvalidTraits(_))
        ));
    }

    #[test]
    fn test_cooldown_above_cap_rejected() {
        let traits = PoolTraits {
            cooldown_blocks: 1_001,
            ..valid_traits()
        };
        assert!(matches!(
            TraitPolicy::default().validate(&traits),
            Err(EngineError::InvalidTraits(_))
        ));
    }

    #[test]
    fn test_custom_ceiling_is_honored() {
        let policy = TraitPolicy {
            max_cooldown_blocks: 100,
            ..TraitPolicy::default()
        };
        let traits = PoolTraits {
            cooldown_blocks: 500,
            ..valid_traits()
        };
        assert!(policy.validate(&traits).is_err());
    }
}
