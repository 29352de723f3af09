//! Parameters of an assembly run.

use crate::AssemblyError;

/// Parameters for the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// k-mer size. Graph nodes are keyed by (k-1)-mers, edges are k-mers.
    pub k: usize,
    /// Check the store invariants after every phase, also in release builds.
    pub check_invariants: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            k: 51,
            check_invariants: false,
        }
    }
}

impl AssemblerConfig {
    /// Fails with [AssemblyError::InvalidParameter] if k is out of bounds.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        validate_k(self.k)
    }

    /// Whether invariants should be checked between phases.
    pub fn should_check(&self) -> bool {
        self.check_invariants || cfg!(debug_assertions)
    }
}

pub(crate) fn validate_k(k: usize) -> Result<(), AssemblyError> {
    if k < 2 {
        return Err(AssemblyError::InvalidParameter {
            name: "k",
            value: k,
            reason: "k-mer size must be at least 2",
        });
    }
    Ok(())
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = AssemblerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.k, 51);
    }

    #[test]
    fn k_below_two_is_rejected() {
        for k in [0, 1] {
            let config = AssemblerConfig { k, ..Default::default() };
            assert!(matches!(
                config.validate(),
                Err(AssemblyError::InvalidParameter { name: "k", .. })
            ));
        }
        assert!(AssemblerConfig { k: 2, ..Default::default() }.validate().is_ok());
    }
}
