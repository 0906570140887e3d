//! Core types and data structures

use num_bigint::BigUint;
use std::fmt;

use crate::error::{CryptoError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest accepted bit length for a generated prime or modulus
pub const MIN_BIT_LENGTH: u64 = 16;

/// Public exponent tried first by the RSA generator
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65_537;

/// RSA ciphertext: a single residue modulo `n`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RsaCiphertext(pub(crate) BigUint);

impl RsaCiphertext {
    /// Wrap a raw residue
    pub fn new(value: BigUint) -> Self {
        RsaCiphertext(value)
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn into_inner(self) -> BigUint {
        self.0
    }
}

impl From<BigUint> for RsaCiphertext {
    fn from(value: BigUint) -> Self {
        RsaCiphertext(value)
    }
}

impl fmt::Display for RsaCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ElGamal ciphertext (a, b)
///
/// `a` is the ephemeral public value `g^k mod p`, `b` the masked message
/// `m * y^k mod p`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElGamalCiphertext {
    pub(crate) a: BigUint,
    pub(crate) b: BigUint,
}

impl ElGamalCiphertext {
    /// Create a new ciphertext
    pub fn new(a: BigUint, b: BigUint) -> Self {
        ElGamalCiphertext { a, b }
    }

    /// Get the ephemeral component
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Get the masked message component
    pub fn b(&self) -> &BigUint {
        &self.b
    }
}

impl fmt::Display for ElGamalCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Tuning for primality testing and the rejection-sampling loops
///
/// Every sampling loop in the generators and encryptors is capped by one of
/// these limits; running out surfaces as
/// [`CryptoError::GenerationFailed`](crate::CryptoError::GenerationFailed).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorConfig {
    /// Number of Miller-Rabin rounds for primality testing
    pub primality_rounds: usize,
    /// Candidates drawn while looking for a single probable prime
    pub max_prime_attempts: u32,
    /// Primes `q` drawn while looking for a safe prime `2q + 1`
    pub max_safe_prime_attempts: u32,
    /// Generator candidates scanned upward from 2
    pub max_generator_candidates: u32,
    /// Draws allowed when sampling into a bounded range
    pub max_range_attempts: u32,
}

impl GeneratorConfig {
    /// Reject settings that would let composites through as primes
    pub fn validate(&self) -> Result<()> {
        if self.primality_rounds == 0 {
            return Err(CryptoError::InvalidParameter(
                "primality_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            primality_rounds: 20,
            max_prime_attempts: 100_000,
            max_safe_prime_attempts: 100_000,
            max_generator_candidates: 10_000,
            max_range_attempts: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ciphertext_accessors() {
        let ct = ElGamalCiphertext::new(BigUint::from(5u32), BigUint::from(300u32));
        assert_eq!(ct.a(), &BigUint::from(5u32));
        assert_eq!(ct.b(), &BigUint::from(300u32));
        assert_eq!(ct.to_string(), "(5, 300)");
    }

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.primality_rounds, 20);
        assert!(config.max_range_attempts > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = GeneratorConfig {
            primality_rounds: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CryptoError::InvalidParameter(_))
        ));
    }
}
