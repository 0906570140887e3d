//! Error types for key generation and the encrypt/decrypt engines

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key size: {0} bits (must be at least {min})", min = crate::types::MIN_BIT_LENGTH)]
    InvalidKeySize(u64),

    #[error("Plaintext too large for modulus: {bits} bits against a {modulus_bits}-bit modulus")]
    PlaintextTooLarge { bits: u64, modulus_bits: u64 },

    #[error("Failed to generate {what} after {attempts} attempts")]
    GenerationFailed { what: &'static str, attempts: u32 },

    #[error("Failed to compute modular inverse")]
    ModularInverseError,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
