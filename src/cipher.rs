//! Common generate / encrypt / decrypt shape shared by both cryptosystems

use num_bigint::BigUint;

use crate::elgamal::{ElGamalKeyPair, ElGamalPrivateKey, ElGamalPublicKey};
use crate::error::Result;
use crate::rsa::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::types::{ElGamalCiphertext, RsaCiphertext};

/// Trait for a textbook public-key cipher
///
/// The two implementations share no state; only the calling convention is
/// common. Encryption is size-checked against the public modulus.
pub trait AsymmetricCipher {
    type PublicKey;
    type PrivateKey;
    type KeyPair;
    type Ciphertext;

    /// Generate a fresh key pair for `bit_length`
    fn generate_keypair(bit_length: u64) -> Result<Self::KeyPair>;

    /// Split a key pair into its public and private halves
    fn keys(keypair: &Self::KeyPair) -> (&Self::PublicKey, &Self::PrivateKey);

    /// Modulus plaintexts must stay below
    fn modulus(public_key: &Self::PublicKey) -> &BigUint;

    /// Encrypt an integer plaintext
    fn encrypt(public_key: &Self::PublicKey, plaintext: &BigUint) -> Result<Self::Ciphertext>;

    /// Decrypt back to the integer plaintext
    fn decrypt(
        public_key: &Self::PublicKey,
        private_key: &Self::PrivateKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<BigUint>;
}

/// Textbook RSA
#[derive(Clone, Copy, Debug, Default)]
pub struct Rsa;

/// Textbook ElGamal
#[derive(Clone, Copy, Debug, Default)]
pub struct ElGamal;

impl AsymmetricCipher for Rsa {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
    type KeyPair = RsaKeyPair;
    type Ciphertext = RsaCiphertext;

    fn generate_keypair(bit_length: u64) -> Result<RsaKeyPair> {
        RsaKeyPair::generate(bit_length)
    }

    fn keys(keypair: &RsaKeyPair) -> (&RsaPublicKey, &RsaPrivateKey) {
        (&keypair.public_key, &keypair.private_key)
    }

    fn modulus(public_key: &RsaPublicKey) -> &BigUint {
        public_key.modulus()
    }

    fn encrypt(public_key: &RsaPublicKey, plaintext: &BigUint) -> Result<RsaCiphertext> {
        public_key.encrypt(plaintext)
    }

    fn decrypt(
        _public_key: &RsaPublicKey,
        private_key: &RsaPrivateKey,
        ciphertext: &RsaCiphertext,
    ) -> Result<BigUint> {
        Ok(private_key.decrypt(ciphertext))
    }
}

impl AsymmetricCipher for ElGamal {
    type PublicKey = ElGamalPublicKey;
    type PrivateKey = ElGamalPrivateKey;
    type KeyPair = ElGamalKeyPair;
    type Ciphertext = ElGamalCiphertext;

    fn generate_keypair(bit_length: u64) -> Result<ElGamalKeyPair> {
        ElGamalKeyPair::generate(bit_length)
    }

    fn keys(keypair: &ElGamalKeyPair) -> (&ElGamalPublicKey, &ElGamalPrivateKey) {
        (&keypair.public_key, &keypair.private_key)
    }

    fn modulus(public_key: &ElGamalPublicKey) -> &BigUint {
        public_key.modulus()
    }

    fn encrypt(public_key: &ElGamalPublicKey, plaintext: &BigUint) -> Result<ElGamalCiphertext> {
        public_key.encrypt(plaintext)
    }

    fn decrypt(
        public_key: &ElGamalPublicKey,
        private_key: &ElGamalPrivateKey,
        ciphertext: &ElGamalCiphertext,
    ) -> Result<BigUint> {
        private_key.decrypt(ciphertext, public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn round_trip<C: AsymmetricCipher>(bit_length: u64) {
        let keypair = C::generate_keypair(bit_length).unwrap();
        let (public_key, private_key) = C::keys(&keypair);
        let max = C::modulus(public_key) - BigUint::one();

        for m in [BigUint::from(0u32), BigUint::from(65u32), max] {
            let ct = C::encrypt(public_key, &m).unwrap();
            assert_eq!(C::decrypt(public_key, private_key, &ct).unwrap(), m);
        }
        assert!(C::encrypt(public_key, C::modulus(public_key)).is_err());
    }

    #[test]
    fn test_rsa_through_trait() {
        round_trip::<Rsa>(64);
    }

    #[test]
    fn test_elgamal_through_trait() {
        round_trip::<ElGamal>(64);
    }
}
