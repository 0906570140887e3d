//! ElGamal key generation and management

use num_bigint::BigUint;
use num_traits::One;
use rand::{thread_rng, CryptoRng, RngCore};
use std::fmt;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, Result};
use crate::types::{GeneratorConfig, MIN_BIT_LENGTH};
use crate::utils::{generate_prime, is_probable_prime, mod_exp, random_in_range};

/// ElGamal public key
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElGamalPublicKey {
    pub(crate) p: BigUint, // Safe prime modulus
    pub(crate) g: BigUint, // Generator
    pub(crate) y: BigUint, // g^x mod p
}

impl ElGamalPublicKey {
    /// Create a new public key
    pub fn new(p: BigUint, g: BigUint, y: BigUint) -> Self {
        ElGamalPublicKey { p, g, y }
    }

    /// Get the prime modulus
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the generator
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the public component (g^x mod p)
    pub fn public_component(&self) -> &BigUint {
        &self.y
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }

    /// Validate the public key
    pub fn validate(&self) -> Result<()> {
        // Check that p > 3, so [1, p-2] holds at least two exponents
        if self.p <= BigUint::from(3u32) {
            return Err(CryptoError::InvalidParameter(
                "Modulus p must be > 3".to_string(),
            ));
        }

        // Check that 1 < g < p
        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(CryptoError::InvalidParameter(
                "Generator g must be in range (1, p)".to_string(),
            ));
        }

        // Check that 0 < y < p
        if self.y < BigUint::one() || self.y >= self.p {
            return Err(CryptoError::InvalidParameter(
                "Public component y must be in range [1, p)".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for ElGamalPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElGamalPublicKey({} bits, g = {})", self.bit_size(), self.g)
    }
}

/// ElGamal private key
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElGamalPrivateKey {
    pub(crate) x: BigUint, // Secret exponent
}

impl ElGamalPrivateKey {
    /// Create a new private key
    pub fn new(x: BigUint) -> Self {
        ElGamalPrivateKey { x }
    }

    /// Get the secret exponent
    pub fn secret_exponent(&self) -> &BigUint {
        &self.x
    }
}

impl fmt::Debug for ElGamalPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElGamalPrivateKey")
            .field("x", &"***")
            .finish()
    }
}

impl fmt::Display for ElGamalPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElGamalPrivateKey(***)")
    }
}

/// ElGamal key pair over a safe prime p = 2q + 1
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElGamalKeyPair {
    pub public_key: ElGamalPublicKey,
    pub private_key: ElGamalPrivateKey,
    pub(crate) q: BigUint, // Sophie Germain prime (p - 1) / 2
}

impl ElGamalKeyPair {
    /// Generate a new ElGamal key pair whose modulus has `bit_size` bits
    ///
    /// # Example
    ///
    /// ```rust
    /// use textbook_pke::ElGamalKeyPair;
    ///
    /// let keypair = ElGamalKeyPair::generate(64).expect("Failed to generate keys");
    /// assert_eq!(keypair.bit_size(), 64);
    /// ```
    pub fn generate(bit_size: u64) -> Result<Self> {
        Self::generate_with_config(bit_size, &GeneratorConfig::default())
    }

    /// Generate a key pair with custom primality and sampling limits
    pub fn generate_with_config(bit_size: u64, config: &GeneratorConfig) -> Result<Self> {
        Self::generate_with_rng(bit_size, config, &mut thread_rng())
    }

    /// Generate a key pair drawing prime candidates and the secret exponent from `rng`
    ///
    /// Miller-Rabin witnesses come from the thread-local generator, so a
    /// seeded `rng` fixes the key but not the primality test's internal draws.
    pub fn generate_with_rng<R: RngCore + CryptoRng + ?Sized>(
        bit_size: u64,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if bit_size < MIN_BIT_LENGTH {
            return Err(CryptoError::InvalidKeySize(bit_size));
        }
        config.validate()?;

        let (p, q) = generate_safe_prime(bit_size, config, rng)?;
        let g = find_generator(&p, &q, config)?;

        // Private key x from [1, p-2]
        let x = random_in_range(
            &BigUint::one(),
            &(&p - 2u32),
            config.max_range_attempts,
            "private exponent",
            rng,
        )?;

        // Public key y = g^x mod p
        let y = mod_exp(&g, &x, &p);

        let public_key = ElGamalPublicKey { p, g, y };
        public_key.validate()?;
        debug!(modulus_bits = public_key.bit_size(), "derived ElGamal key pair");

        Ok(ElGamalKeyPair {
            public_key,
            private_key: ElGamalPrivateKey { x },
            q,
        })
    }

    /// Create a key pair from existing components
    ///
    /// `p` must be a safe prime, `g` must satisfy `g^q mod p != 1` and `x`
    /// must lie in `[1, p-2]`.
    pub fn from_components(p: BigUint, g: BigUint, x: BigUint) -> Result<Self> {
        let rounds = GeneratorConfig::default().primality_rounds;

        if p <= BigUint::from(3u32) || !is_probable_prime(&p, rounds) {
            return Err(CryptoError::InvalidParameter(
                "Modulus p must be a prime > 3".to_string(),
            ));
        }

        let q = (&p - 1u32) >> 1u32;
        if !is_probable_prime(&q, rounds) {
            return Err(CryptoError::InvalidParameter(
                "Modulus p must be a safe prime 2q + 1".to_string(),
            ));
        }

        if x < BigUint::one() || x > &p - 2u32 {
            return Err(CryptoError::InvalidParameter(
                "Private exponent x must be in range [1, p-2]".to_string(),
            ));
        }

        let y = mod_exp(&g, &x, &p);
        let public_key = ElGamalPublicKey { p, g, y };
        public_key.validate()?;

        if mod_exp(&public_key.g, &q, &public_key.p).is_one() {
            return Err(CryptoError::InvalidParameter(
                "Generator g lies in the order-q subgroup".to_string(),
            ));
        }

        Ok(ElGamalKeyPair {
            public_key,
            private_key: ElGamalPrivateKey { x },
            q,
        })
    }

    /// Get the prime q with p = 2q + 1
    pub fn subgroup_order(&self) -> &BigUint {
        &self.q
    }

    /// Get the bit size of the keys
    pub fn bit_size(&self) -> u64 {
        self.public_key.bit_size()
    }
}

impl fmt::Display for ElGamalKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElGamalKeyPair({} bits)", self.bit_size())
    }
}

/// Generate an ElGamal key pair whose safe-prime modulus has `bit_length` bits
pub fn generate_elgamal_keypair(bit_length: u64) -> Result<ElGamalKeyPair> {
    ElGamalKeyPair::generate(bit_length)
}

/// Generate a safe prime (p = 2q + 1 where q is also prime)
///
/// Draws a `(bit_size - 1)`-bit prime q and keeps it only if 2q + 1 is prime,
/// so p always has exactly `bit_size` bits.
pub fn generate_safe_prime<R: RngCore + CryptoRng + ?Sized>(
    bit_size: u64,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(BigUint, BigUint)> {
    if bit_size < MIN_BIT_LENGTH {
        return Err(CryptoError::InvalidKeySize(bit_size));
    }
    config.validate()?;

    debug!(bit_size, "searching for safe prime");
    for attempt in 1..=config.max_safe_prime_attempts {
        let q = generate_prime(bit_size - 1, config, rng)?;
        let p = (&q << 1u32) + 1u32;

        if is_probable_prime(&p, config.primality_rounds) {
            debug!(bit_size, attempt, "found safe prime");
            return Ok((p, q));
        }
        trace!(attempt, "2q + 1 composite, resampling q");
    }

    warn!(bit_size, attempts = config.max_safe_prime_attempts, "safe prime search exhausted");
    Err(CryptoError::GenerationFailed {
        what: "safe prime",
        attempts: config.max_safe_prime_attempts,
    })
}

/// Smallest g >= 2 with g^q mod p != 1
///
/// This only keeps g out of the order-q subgroup; it does not check that g
/// generates the full group of order p - 1.
pub fn find_generator(p: &BigUint, q: &BigUint, config: &GeneratorConfig) -> Result<BigUint> {
    let mut g = BigUint::from(2u32);
    let mut tried = 0;

    while tried < config.max_generator_candidates && &g < p {
        tried += 1;
        if !mod_exp(&g, q, p).is_one() {
            debug!(g = %g, tried, "selected generator");
            return Ok(g);
        }
        g += 1u32;
    }

    warn!(tried, "generator search exhausted");
    Err(CryptoError::GenerationFailed {
        what: "generator outside the order-q subgroup",
        attempts: tried,
    })
}
