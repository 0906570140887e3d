//! Number-theoretic helpers shared by both cryptosystems

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{thread_rng, CryptoRng, RngCore};
use tracing::{trace, warn};

use crate::error::{CryptoError, Result};
use crate::types::GeneratorConfig;

/// Primes used to reject most composites before running Miller-Rabin
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Modular exponentiation: base^exp mod modulus
pub fn mod_exp(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Compute modular inverse using the extended Euclidean algorithm
///
/// Returns `None` when `gcd(a, m) != 1` or `m` is zero.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let m_int = BigInt::from(m.clone());
    let (gcd, x) = extended_gcd(BigInt::from(a.clone()), m_int.clone());

    if !gcd.is_one() {
        return None;
    }

    // mod_floor with a positive modulus is non-negative
    let (_, magnitude) = x.mod_floor(&m_int).into_parts();
    Some(magnitude)
}

/// Extended Euclidean algorithm, returning (gcd, x) with a*x = gcd (mod b)
fn extended_gcd(a: BigInt, b: BigInt) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);
    }

    (old_r, old_x)
}

/// Greatest common divisor
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Miller-Rabin primality test with `k` random witnesses
///
/// Witnesses come from the thread-local generator, never from a caller rng.
pub fn is_probable_prime(n: &BigUint, k: usize) -> bool {
    if n <= &BigUint::one() {
        return false;
    }

    for &small in SMALL_PRIMES.iter() {
        let small = BigUint::from(small);
        if n == &small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    let mut rng = thread_rng();
    let two = BigUint::from(2u32);
    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..k {
        // n > 97 here, so [2, n-1) is never empty
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = mod_exp(&x, &two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor out powers of 2 from n, returning (s, d) with n = 2^s * d
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let s = n.trailing_zeros().unwrap_or(0);
    (s, n >> s)
}

/// Generate a probable prime with exactly `bit_size` bits
pub fn generate_prime<R: RngCore + CryptoRng + ?Sized>(
    bit_size: u64,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<BigUint> {
    if bit_size < 2 {
        return Err(CryptoError::InvalidKeySize(bit_size));
    }
    config.validate()?;

    for attempt in 1..=config.max_prime_attempts {
        let mut candidate = rng.gen_biguint(bit_size);
        candidate |= BigUint::one() << (bit_size - 1); // Set high bit
        if bit_size > 2 {
            candidate |= BigUint::one(); // Make it odd
        }

        if is_probable_prime(&candidate, config.primality_rounds) {
            trace!(bit_size, attempt, "found probable prime");
            return Ok(candidate);
        }
    }

    warn!(bit_size, attempts = config.max_prime_attempts, "prime search exhausted");
    Err(CryptoError::GenerationFailed {
        what: "probable prime",
        attempts: config.max_prime_attempts,
    })
}

/// Sample uniformly from `[low, high]` by rejection sampling
///
/// Draws `high.bits()` random bits per attempt and discards values outside
/// the range, so each draw succeeds with probability above one half once
/// `low` is small relative to `high`.
pub fn random_in_range<R: RngCore + CryptoRng + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    max_attempts: u32,
    what: &'static str,
    rng: &mut R,
) -> Result<BigUint> {
    if low > high {
        return Err(CryptoError::InvalidParameter(format!(
            "empty sampling range for {}",
            what
        )));
    }

    let bits = high.bits();
    for _ in 0..max_attempts {
        let candidate = rng.gen_biguint(bits);
        if &candidate >= low && &candidate <= high {
            return Ok(candidate);
        }
    }

    warn!(what, attempts = max_attempts, "range sampling exhausted");
    Err(CryptoError::GenerationFailed {
        what,
        attempts: max_attempts,
    })
}
