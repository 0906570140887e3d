//! Message <-> integer conversion and the caller-side size check
//!
//! Messages map to integers through their big-endian magnitude. There is no
//! padding or length framing: leading zero bytes do not survive a round trip,
//! and the integer zero decodes to an empty message.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{CryptoError, Result};

/// Interpret `message` as a big-endian unsigned integer
pub fn encode_message(message: &[u8]) -> BigUint {
    BigUint::from_bytes_be(message)
}

/// Big-endian bytes of `value`, without leading zeros
pub fn decode_message(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Reject plaintexts that do not fit below `modulus`
pub fn ensure_below_modulus(plaintext: &BigUint, modulus: &BigUint) -> Result<()> {
    if plaintext >= modulus {
        return Err(CryptoError::PlaintextTooLarge {
            bits: plaintext.bits(),
            modulus_bits: modulus.bits(),
        });
    }
    Ok(())
}
