//! Textbook RSA: key generation from two random primes and modular
//! exponentiation with the public and private exponents
//!
//! Encryption is deterministic and unpadded.

pub mod encryption;
pub mod keys;

pub use encryption::{rsa_decrypt, rsa_encrypt, try_rsa_encrypt};
pub use keys::{generate_rsa_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
