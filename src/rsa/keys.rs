//! RSA key generation and management

use num_bigint::BigUint;
use num_traits::One;
use rand::{thread_rng, CryptoRng, RngCore};
use std::fmt;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, Result};
use crate::types::{GeneratorConfig, DEFAULT_PUBLIC_EXPONENT, MIN_BIT_LENGTH};
use crate::utils::{gcd, generate_prime, is_probable_prime, mod_inverse};

/// Miller-Rabin rounds for the phi-factor assertion, independent of any config
const PHI_CHECK_ROUNDS: usize = 40;

/// RSA public key (e, n)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RsaPublicKey {
    pub(crate) e: BigUint, // Public exponent
    pub(crate) n: BigUint, // Modulus p*q
}

impl RsaPublicKey {
    /// Create a new public key
    pub fn new(e: BigUint, n: BigUint) -> Self {
        RsaPublicKey { e, n }
    }

    /// Get the public exponent
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// Get the modulus
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.n.bits()
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaPublicKey({} bits, e = {})", self.bit_size(), self.e)
    }
}

/// RSA private key (d, n)
///
/// Also holds the prime factors it was derived from when they are known.
/// Neither `Debug` nor `Display` prints secret material.
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RsaPrivateKey {
    pub(crate) d: BigUint,
    pub(crate) n: BigUint,
    pub(crate) primes: Option<(BigUint, BigUint)>,
}

impl RsaPrivateKey {
    /// Create a private key from its exponent and modulus
    pub fn new(d: BigUint, n: BigUint) -> Self {
        RsaPrivateKey { d, n, primes: None }
    }

    /// Get the private exponent
    pub fn exponent(&self) -> &BigUint {
        &self.d
    }

    /// Get the modulus
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Get the prime factors (p, q), if the key was generated here
    pub fn primes(&self) -> Option<(&BigUint, &BigUint)> {
        self.primes.as_ref().map(|(p, q)| (p, q))
    }

    /// Euler's totient (p-1)(q-1), if the prime factors are known
    pub fn phi(&self) -> Option<BigUint> {
        self.primes
            .as_ref()
            .map(|(p, q)| (p - BigUint::one()) * (q - BigUint::one()))
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("d", &"***")
            .field("n", &self.n)
            .finish()
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaPrivateKey(***)")
    }
}

/// RSA key pair
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl RsaKeyPair {
    /// Generate a new RSA key pair whose primes each have `bit_size` bits
    ///
    /// # Example
    ///
    /// ```rust
    /// use textbook_pke::RsaKeyPair;
    ///
    /// let keypair = RsaKeyPair::generate(128).expect("Failed to generate keys");
    /// assert!(keypair.public_key.bit_size() >= 255);
    /// ```
    pub fn generate(bit_size: u64) -> Result<Self> {
        Self::generate_with_config(bit_size, &GeneratorConfig::default())
    }

    /// Generate a key pair with custom primality and sampling limits
    pub fn generate_with_config(bit_size: u64, config: &GeneratorConfig) -> Result<Self> {
        Self::generate_with_rng(bit_size, config, &mut thread_rng())
    }

    /// Generate a key pair drawing prime candidates from `rng`
    ///
    /// Miller-Rabin witnesses come from the thread-local generator, so a
    /// seeded `rng` fixes the primes but not the primality test's internal draws.
    pub fn generate_with_rng<R: RngCore + CryptoRng + ?Sized>(
        bit_size: u64,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if bit_size < MIN_BIT_LENGTH {
            return Err(CryptoError::InvalidKeySize(bit_size));
        }
        config.validate()?;

        debug!(bit_size, "generating RSA primes");
        let p = generate_prime(bit_size, config, rng)?;
        let q = sample_distinct_prime(&p, config.max_prime_attempts, || {
            generate_prime(bit_size, config, rng)
        })?;

        Ok(Self::derive(p, q))
    }

    /// Derive a key pair from two caller-supplied primes
    ///
    /// Useful for small, fixed test moduli. Rejects equal or composite inputs.
    pub fn from_primes(p: BigUint, q: BigUint) -> Result<Self> {
        let rounds = GeneratorConfig::default().primality_rounds;

        if p == q {
            return Err(CryptoError::InvalidParameter(
                "RSA primes p and q must be distinct".to_string(),
            ));
        }
        if !is_probable_prime(&p, rounds) || !is_probable_prime(&q, rounds) {
            return Err(CryptoError::InvalidParameter(
                "RSA factors p and q must both be prime".to_string(),
            ));
        }

        Ok(Self::derive(p, q))
    }

    /// n, phi(n), e, d from two distinct probable primes
    fn derive(p: BigUint, q: BigUint) -> Self {
        let n = &p * &q;
        let phi = prime_minus_one(&p) * prime_minus_one(&q);

        let e = choose_public_exponent(&phi);
        // gcd(e, phi) == 1 was established above, so the inverse exists
        let d = match mod_inverse(&e, &phi) {
            Some(d) => d,
            None => unreachable!("public exponent is coprime with phi(n)"),
        };
        debug!(modulus_bits = n.bits(), e = %e, "derived RSA key pair");

        RsaKeyPair {
            public_key: RsaPublicKey {
                e,
                n: n.clone(),
            },
            private_key: RsaPrivateKey {
                d,
                n,
                primes: Some((p, q)),
            },
        }
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.public_key.bit_size()
    }
}

impl fmt::Display for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaKeyPair({} bits)", self.bit_size())
    }
}

/// Generate an RSA key pair with primes of `bit_length` bits each
pub fn generate_rsa_keypair(bit_length: u64) -> Result<RsaKeyPair> {
    RsaKeyPair::generate(bit_length)
}

/// Draw primes until one differs from `p`
///
/// The first draw counts as attempt zero; `max_resamples` bounds the redraws.
fn sample_distinct_prime<F>(p: &BigUint, max_resamples: u32, mut sample: F) -> Result<BigUint>
where
    F: FnMut() -> Result<BigUint>,
{
    let mut q = sample()?;
    let mut resamples = 0;

    while &q == p {
        if resamples == max_resamples {
            warn!(resamples, "no prime distinct from p found");
            return Err(CryptoError::GenerationFailed {
                what: "second RSA prime distinct from the first",
                attempts: max_resamples,
            });
        }
        resamples += 1;
        trace!(resamples, "q collided with p, resampling");
        q = sample()?;
    }

    Ok(q)
}

/// 65537 when coprime with phi, otherwise the smallest odd e >= 3 that is
fn choose_public_exponent(phi: &BigUint) -> BigUint {
    let standard = BigUint::from(DEFAULT_PUBLIC_EXPONENT);
    if gcd(&standard, phi).is_one() {
        return standard;
    }

    // phi is even, so some odd e below phi is always coprime (at worst phi - 1)
    let mut e = BigUint::from(3u32);
    while !gcd(&e, phi).is_one() {
        e += 2u32;
    }
    trace!(e = %e, "65537 shares a factor with phi(n), using fallback exponent");
    e
}

/// p - 1 for a prime p
///
/// # Panics
///
/// Panics if `prime` fails the primality test. Callers only pass values that
/// already passed it, so a failure here is a bug in key generation.
fn prime_minus_one(prime: &BigUint) -> BigUint {
    assert!(
        is_probable_prime(prime, PHI_CHECK_ROUNDS),
        "phi factor requested for a non-prime: {}",
        prime
    );
    prime - BigUint::one()
}
