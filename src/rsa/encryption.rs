//! Textbook RSA encryption and decryption

use num_bigint::BigUint;

use crate::encoding::{decode_message, encode_message, ensure_below_modulus};
use crate::error::Result;
use crate::rsa::keys::{RsaPrivateKey, RsaPublicKey};
use crate::types::RsaCiphertext;
use crate::utils::mod_exp;

/// plaintext^e mod n
///
/// The caller guarantees `plaintext < n`; larger values wrap silently.
/// [`try_rsa_encrypt`] performs the check.
pub fn rsa_encrypt(plaintext: &BigUint, e: &BigUint, n: &BigUint) -> BigUint {
    mod_exp(plaintext, e, n)
}

/// ciphertext^d mod n
pub fn rsa_decrypt(ciphertext: &BigUint, d: &BigUint, n: &BigUint) -> BigUint {
    mod_exp(ciphertext, d, n)
}

/// Size-checked [`rsa_encrypt`]
pub fn try_rsa_encrypt(plaintext: &BigUint, e: &BigUint, n: &BigUint) -> Result<BigUint> {
    ensure_below_modulus(plaintext, n)?;
    Ok(rsa_encrypt(plaintext, e, n))
}

impl RsaPublicKey {
    /// Encrypt an integer plaintext, rejecting values not below the modulus
    pub fn encrypt(&self, plaintext: &BigUint) -> Result<RsaCiphertext> {
        try_rsa_encrypt(plaintext, &self.e, &self.n).map(RsaCiphertext)
    }

    /// Encode `message` as an integer and encrypt it
    pub fn encrypt_bytes(&self, message: &[u8]) -> Result<RsaCiphertext> {
        self.encrypt(&encode_message(message))
    }
}

impl RsaPrivateKey {
    /// Recover the integer plaintext
    pub fn decrypt(&self, ciphertext: &RsaCiphertext) -> BigUint {
        rsa_decrypt(&ciphertext.0, &self.d, &self.n)
    }

    /// Decrypt and decode back to the original bytes
    pub fn decrypt_bytes(&self, ciphertext: &RsaCiphertext) -> Vec<u8> {
        decode_message(&self.decrypt(ciphertext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;
    use crate::rsa::keys::RsaKeyPair;
    use num_traits::One;

    #[test]
    fn test_encryption_decryption() {
        let keypair = RsaKeyPair::generate(128).unwrap();

        let plaintext = BigUint::from(42u32);
        let ciphertext = keypair.public_key.encrypt(&plaintext).unwrap();
        let decrypted = keypair.private_key.decrypt(&ciphertext);

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_small_fixed_modulus() {
        // n = 253, phi = 220, e = 65537 = 197 mod 220, d = 153
        let keypair = RsaKeyPair::from_primes(23u32.into(), 11u32.into()).unwrap();
        let e = keypair.public_key.exponent();
        let n = keypair.public_key.modulus();
        assert_eq!(keypair.private_key.exponent(), &BigUint::from(153u32));

        for m in 0u32..253 {
            let m = BigUint::from(m);
            let c = rsa_encrypt(&m, e, n);
            assert_eq!(rsa_decrypt(&c, keypair.private_key.exponent(), n), m);
        }
    }

    #[test]
    fn test_deterministic() {
        let keypair = RsaKeyPair::generate(64).unwrap();
        let m = BigUint::from(1234u32);

        let ct1 = keypair.public_key.encrypt(&m).unwrap();
        let ct2 = keypair.public_key.encrypt(&m).unwrap();
        assert_eq!(ct1, ct2);
    }

    #[test]
    fn test_boundary_plaintexts() {
        let keypair = RsaKeyPair::generate(64).unwrap();
        let n = keypair.public_key.modulus().clone();

        let max = &n - BigUint::one();
        let ct = keypair.public_key.encrypt(&max).unwrap();
        assert_eq!(keypair.private_key.decrypt(&ct), max);

        assert!(matches!(
            keypair.public_key.encrypt(&n),
            Err(CryptoError::PlaintextTooLarge { .. })
        ));
    }

    #[test]
    fn test_unchecked_encrypt_wraps() {
        // m >= n reduces modulo n first, so the original is lost
        let keypair = RsaKeyPair::from_primes(23u32.into(), 11u32.into()).unwrap();
        let n = keypair.public_key.modulus();
        let m = n + BigUint::from(5u32);

        let c = rsa_encrypt(&m, keypair.public_key.exponent(), n);
        let back = rsa_decrypt(&c, keypair.private_key.exponent(), n);
        assert_eq!(back, BigUint::from(5u32));
    }

    #[test]
    fn test_bytes_round_trip() {
        let keypair = RsaKeyPair::generate(128).unwrap();

        let ct = keypair.public_key.encrypt_bytes(b"TEST").unwrap();
        assert_eq!(keypair.private_key.decrypt_bytes(&ct), b"TEST");
    }
}
