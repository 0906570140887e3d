//! Demo: generate a key pair, encrypt a message and decrypt it again

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use textbook_pke::{encode_message, ensure_below_modulus, ElGamalKeyPair, RsaKeyPair};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum System {
    Rsa,
    Elgamal,
}

#[derive(Parser, Debug)]
#[command(name = "textbook-pke", about = "Textbook RSA and ElGamal demo")]
struct Args {
    /// Cryptosystem to run
    #[arg(long, value_enum, default_value = "rsa")]
    system: System,

    /// Bits per RSA prime, or bits of the ElGamal modulus (default 256 / 270)
    #[arg(long)]
    bits: Option<u64>,

    /// Message to encrypt
    #[arg(long, default_value = "This an lesson about Cryptography")]
    message: String,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let plaintext = encode_message(args.message.as_bytes());

    match args.system {
        System::Rsa => {
            let bits = args.bits.unwrap_or(256);
            info!(bits, "generating RSA key pair");
            let keypair = RsaKeyPair::generate(bits).context("RSA key generation failed")?;
            ensure_below_modulus(&plaintext, keypair.public_key.modulus())
                .context("Message is too large for the current modulus n")?;

            let ciphertext = keypair.public_key.encrypt(&plaintext)?;
            let decrypted = keypair.private_key.decrypt_bytes(&ciphertext);

            println!("Original: \t{}", args.message);
            println!("Cipher: \t{}", ciphertext);
            println!("Decrypted: \t{}", String::from_utf8_lossy(&decrypted));
            println!();
            println!("Public key: \t{}", keypair.public_key);
        }
        System::Elgamal => {
            // The default message needs more than 256 bits
            let bits = args.bits.unwrap_or(270);
            info!(bits, "generating ElGamal key pair");
            let keypair =
                ElGamalKeyPair::generate(bits).context("ElGamal key generation failed")?;
            ensure_below_modulus(&plaintext, keypair.public_key.modulus())
                .context("Message is too large for the modulus p")?;

            let ciphertext = keypair.public_key.encrypt(&plaintext)?;
            let decrypted = keypair
                .private_key
                .decrypt_bytes(&ciphertext, &keypair.public_key)?;

            println!("Original: \t{}", args.message);
            println!("Cipher: \t{}\n\t\t{}", ciphertext.a(), ciphertext.b());
            println!("Decrypted: \t{}", String::from_utf8_lossy(&decrypted));
            println!();
            println!("Public key: \t{}", keypair.public_key.public_component());
        }
    }

    Ok(())
}
