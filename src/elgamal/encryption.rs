//! Core ElGamal encryption and decryption operations

use num_bigint::BigUint;
use num_traits::One;
use rand::{thread_rng, CryptoRng, RngCore};

use crate::elgamal::keys::{ElGamalPrivateKey, ElGamalPublicKey};
use crate::encoding::{decode_message, encode_message, ensure_below_modulus};
use crate::error::{CryptoError, Result};
use crate::types::{ElGamalCiphertext, GeneratorConfig};
use crate::utils::{mod_exp, mod_inverse, random_in_range};

/// Encrypt `plaintext` under (p, g, y) with a fresh ephemeral secret
///
/// The caller guarantees `plaintext < p`. Fails only if sampling the
/// ephemeral secret exhausts its attempt cap.
pub fn elgamal_encrypt(
    plaintext: &BigUint,
    p: &BigUint,
    g: &BigUint,
    y: &BigUint,
) -> Result<ElGamalCiphertext> {
    elgamal_encrypt_with_rng(plaintext, p, g, y, &GeneratorConfig::default(), &mut thread_rng())
}

/// [`elgamal_encrypt`] drawing the ephemeral secret from `rng`
pub fn elgamal_encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
    plaintext: &BigUint,
    p: &BigUint,
    g: &BigUint,
    y: &BigUint,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<ElGamalCiphertext> {
    if p <= &BigUint::from(3u32) {
        return Err(CryptoError::InvalidParameter(
            "Modulus p must be > 3".to_string(),
        ));
    }

    // k lives only for this call
    let k = random_in_range(
        &BigUint::one(),
        &(p - 2u32),
        config.max_range_attempts,
        "ephemeral secret",
        rng,
    )?;

    let a = mod_exp(g, &k, p);
    let y_k = mod_exp(y, &k, p);
    let b = (plaintext * y_k) % p;

    Ok(ElGamalCiphertext::new(a, b))
}

/// Recover the plaintext from (a, b) with the private exponent x
///
/// Fails with [`CryptoError::ModularInverseError`] when `a^x` has no inverse
/// mod p, which only happens for malformed ciphertexts such as `a = 0`.
pub fn elgamal_decrypt(ciphertext: &ElGamalCiphertext, p: &BigUint, x: &BigUint) -> Result<BigUint> {
    // Shared secret s = a^x mod p
    let s = mod_exp(&ciphertext.a, x, p);
    let s_inv = mod_inverse(&s, p).ok_or(CryptoError::ModularInverseError)?;

    // m = b * s^-1 mod p
    Ok((&ciphertext.b * s_inv) % p)
}

impl ElGamalPublicKey {
    /// Encrypt a plaintext message, rejecting values not below the modulus
    pub fn encrypt(&self, plaintext: &BigUint) -> Result<ElGamalCiphertext> {
        self.encrypt_with_rng(plaintext, &GeneratorConfig::default(), &mut thread_rng())
    }

    /// Size-checked encryption drawing the ephemeral secret from `rng`
    pub fn encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        plaintext: &BigUint,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<ElGamalCiphertext> {
        ensure_below_modulus(plaintext, &self.p)?;
        elgamal_encrypt_with_rng(plaintext, &self.p, &self.g, &self.y, config, rng)
    }

    /// Encode `message` as an integer and encrypt it
    pub fn encrypt_bytes(&self, message: &[u8]) -> Result<ElGamalCiphertext> {
        self.encrypt(&encode_message(message))
    }

    /// Re-randomize a ciphertext (produces a different encryption of the same plaintext)
    ///
    /// Multiplies both components by a fresh encryption of 1.
    pub fn rerandomize(&self, ciphertext: &ElGamalCiphertext) -> Result<ElGamalCiphertext> {
        self.rerandomize_with_rng(ciphertext, &GeneratorConfig::default(), &mut thread_rng())
    }

    /// [`rerandomize`](Self::rerandomize) drawing the fresh ephemeral secret from `rng`
    pub fn rerandomize_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        ciphertext: &ElGamalCiphertext,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<ElGamalCiphertext> {
        let one = elgamal_encrypt_with_rng(&BigUint::one(), &self.p, &self.g, &self.y, config, rng)?;

        let a = (&ciphertext.a * one.a) % &self.p;
        let b = (&ciphertext.b * one.b) % &self.p;

        Ok(ElGamalCiphertext::new(a, b))
    }
}

impl ElGamalPrivateKey {
    /// Decrypt a ciphertext produced under the matching public key
    pub fn decrypt(
        &self,
        ciphertext: &ElGamalCiphertext,
        public_key: &ElGamalPublicKey,
    ) -> Result<BigUint> {
        elgamal_decrypt(ciphertext, &public_key.p, &self.x)
    }

    /// Decrypt and decode back to the original bytes
    pub fn decrypt_bytes(
        &self,
        ciphertext: &ElGamalCiphertext,
        public_key: &ElGamalPublicKey,
    ) -> Result<Vec<u8>> {
        self.decrypt(ciphertext, public_key)
            .map(|m| decode_message(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::keys::ElGamalKeyPair;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_encryption_decryption() {
        let keypair = ElGamalKeyPair::generate(64).unwrap();
        let pk = &keypair.public_key;

        let plaintext = BigUint::from(42u32);
        let ciphertext = pk.encrypt(&plaintext).unwrap();
        let decrypted = keypair.private_key.decrypt(&ciphertext, pk).unwrap();

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_small_group_exhaustive() {
        // p = 23, g = 5, x = 6, y = 8
        let keypair =
            ElGamalKeyPair::from_components(23u32.into(), 5u32.into(), 6u32.into()).unwrap();
        let p = BigUint::from(23u32);
        let g = BigUint::from(5u32);
        let y = BigUint::from(8u32);
        let x = BigUint::from(6u32);
        assert_eq!(keypair.public_key.public_component(), &y);

        for m in 0u32..23 {
            let m = BigUint::from(m);
            let ct = elgamal_encrypt(&m, &p, &g, &y).unwrap();
            assert!(ct.a() < &p && ct.b() < &p);
            assert_eq!(elgamal_decrypt(&ct, &p, &x).unwrap(), m);
        }
    }

    #[test]
    fn test_ephemeral_secret_in_range() {
        // a = g^k with k in [1, p-2] is never 1 when g has order > p-2
        let p = BigUint::from(23u32);
        let g = BigUint::from(5u32);
        let y = BigUint::from(8u32);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let ct = elgamal_encrypt_with_rng(
                &BigUint::from(3u32),
                &p,
                &g,
                &y,
                &GeneratorConfig::default(),
                &mut rng,
            )
            .unwrap();
            assert!(!ct.a().is_one());
        }
    }

    #[test]
    fn test_probabilistic_encryption() {
        let keypair = ElGamalKeyPair::generate(128).unwrap();
        let pk = &keypair.public_key;
        let m = BigUint::from(99u32);

        let ct1 = pk.encrypt(&m).unwrap();
        let ct2 = pk.encrypt(&m).unwrap();
        assert_ne!(ct1, ct2);

        assert_eq!(keypair.private_key.decrypt(&ct1, pk).unwrap(), m);
        assert_eq!(keypair.private_key.decrypt(&ct2, pk).unwrap(), m);
    }

    #[test]
    fn test_boundary_plaintexts() {
        let keypair = ElGamalKeyPair::generate(64).unwrap();
        let pk = &keypair.public_key;
        let p = pk.modulus().clone();

        let max = &p - BigUint::one();
        let ct = pk.encrypt(&max).unwrap();
        assert_eq!(keypair.private_key.decrypt(&ct, pk).unwrap(), max);

        assert!(matches!(
            pk.encrypt(&p),
            Err(CryptoError::PlaintextTooLarge { .. })
        ));
    }

    #[test]
    fn test_malformed_ciphertext() {
        let ct = ElGamalCiphertext::new(BigUint::zero(), BigUint::from(7u32));
        let result = elgamal_decrypt(&ct, &BigUint::from(23u32), &BigUint::from(6u32));
        assert_eq!(result, Err(CryptoError::ModularInverseError));
    }

    #[test]
    fn test_rerandomization() {
        let keypair = ElGamalKeyPair::generate(128).unwrap();
        let pk = &keypair.public_key;

        let plaintext = BigUint::from(42u32);
        let ct1 = pk.encrypt(&plaintext).unwrap();
        let ct2 = pk.rerandomize(&ct1).unwrap();

        // Ciphertexts should be different
        assert_ne!(ct1, ct2);

        // But decrypt to the same plaintext
        assert_eq!(keypair.private_key.decrypt(&ct2, pk).unwrap(), plaintext);
    }

    #[test]
    fn test_rerandomization_with_seeded_rng() {
        let keypair =
            ElGamalKeyPair::from_components(23u32.into(), 5u32.into(), 6u32.into()).unwrap();
        let pk = &keypair.public_key;
        let config = GeneratorConfig::default();
        let ct = ElGamalCiphertext::new(BigUint::from(5u32), BigUint::from(8u32 * 13 % 23));

        let first = pk
            .rerandomize_with_rng(&ct, &config, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let second = pk
            .rerandomize_with_rng(&ct, &config, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(first, second);

        // Same draws as encrypting 1 under the same seed, folded into ct
        let one = elgamal_encrypt_with_rng(
            &BigUint::one(),
            pk.modulus(),
            pk.generator(),
            pk.public_component(),
            &config,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        assert_eq!(first.a(), &(ct.a() * one.a() % 23u32));
        assert_eq!(first.b(), &(ct.b() * one.b() % 23u32));

        // (5, 8 * 13) is the k = 1 encryption of 13
        assert_eq!(keypair.private_key.decrypt(&ct, pk).unwrap(), BigUint::from(13u32));
        assert_eq!(keypair.private_key.decrypt(&first, pk).unwrap(), BigUint::from(13u32));
    }

    #[test]
    fn test_bytes_round_trip() {
        let keypair = ElGamalKeyPair::generate(64).unwrap();
        let pk = &keypair.public_key;

        let ct = pk.encrypt_bytes(b"TEST").unwrap();
        assert_eq!(keypair.private_key.decrypt_bytes(&ct, pk).unwrap(), b"TEST");
    }
}
