//! # Textbook RSA and ElGamal
//!
//! This library builds two classical public-key cryptosystems directly from
//! number-theoretic primitives:
//! - RSA: two random primes, public exponent 65537 (or the smallest odd
//!   coprime fallback), private exponent by modular inversion
//! - ElGamal: a safe prime p = 2q + 1, a generator outside the order-q
//!   subgroup, and a fresh ephemeral secret per encryption
//!
//! Both are unpadded. RSA is deterministic and ElGamal is malleable, so
//! neither is suitable for protecting real data.
//!
//! ## Example
//!
//! ```rust
//! use textbook_pke::{decode_message, encode_message, ElGamalKeyPair, RsaKeyPair};
//!
//! let rsa = RsaKeyPair::generate(128).unwrap();
//! let ct = rsa.public_key.encrypt(&encode_message(b"TEST")).unwrap();
//! assert_eq!(decode_message(&rsa.private_key.decrypt(&ct)), b"TEST");
//!
//! let elgamal = ElGamalKeyPair::generate(64).unwrap();
//! let ct = elgamal.public_key.encrypt_bytes(b"TEST").unwrap();
//! let pt = elgamal.private_key.decrypt_bytes(&ct, &elgamal.public_key).unwrap();
//! assert_eq!(pt, b"TEST");
//! ```

pub mod cipher;
pub mod elgamal;
pub mod encoding;
pub mod error;
pub mod rsa;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use cipher::{AsymmetricCipher, ElGamal, Rsa};
pub use elgamal::{
    elgamal_decrypt, elgamal_encrypt, generate_elgamal_keypair, ElGamalKeyPair,
    ElGamalPrivateKey, ElGamalPublicKey,
};
pub use encoding::{decode_message, encode_message, ensure_below_modulus};
pub use error::{CryptoError, Result};
pub use rsa::{
    generate_rsa_keypair, rsa_decrypt, rsa_encrypt, try_rsa_encrypt, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};
pub use types::{ElGamalCiphertext, GeneratorConfig, RsaCiphertext, MIN_BIT_LENGTH};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_basic_workflow() {
        let keypair = generate_rsa_keypair(64).unwrap();
        let m = BigUint::from(42u32);
        let c = rsa_encrypt(&m, keypair.public_key.exponent(), keypair.public_key.modulus());
        let back = rsa_decrypt(&c, keypair.private_key.exponent(), keypair.private_key.modulus());
        assert_eq!(m, back);

        let keypair = generate_elgamal_keypair(64).unwrap();
        let pk = &keypair.public_key;
        let ct = elgamal_encrypt(&m, pk.modulus(), pk.generator(), pk.public_component()).unwrap();
        let back =
            elgamal_decrypt(&ct, pk.modulus(), keypair.private_key.secret_exponent()).unwrap();
        assert_eq!(m, back);
    }
}
