//! Textbook ElGamal over the multiplicative group of a safe prime

pub mod encryption;
pub mod keys;

pub use encryption::{elgamal_decrypt, elgamal_encrypt, elgamal_encrypt_with_rng};
pub use keys::{
    find_generator, generate_elgamal_keypair, generate_safe_prime, ElGamalKeyPair,
    ElGamalPrivateKey, ElGamalPublicKey,
};
