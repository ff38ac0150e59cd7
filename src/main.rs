use std::process;

use clap::Parser;
use log::LevelFilter;
use textbook_rsa::config::{DEFAULT_CERTAINTY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BITS, DEFAULT_MIN_BITS};
use textbook_rsa::{encrypt_message, Rsa, RsaConfig};

const DEFAULT_MESSAGE: &str = "The quick brown fox jump over the lazy dog.";

/// Alice sends Bob a message; Eve intercepts it but holds the wrong key
#[derive(Parser, Debug)]
#[command(name = "textbook-rsa", version, about)]
struct Args {
    /// Smallest bit length of each prime
    #[arg(long, default_value_t = DEFAULT_MIN_BITS)]
    min_bits: u64,

    /// Largest bit length of each prime
    #[arg(long, default_value_t = DEFAULT_MAX_BITS)]
    max_bits: u64,

    /// Primality certainty; a composite slips through with probability 2^-certainty
    #[arg(long, default_value_t = DEFAULT_CERTAINTY)]
    certainty: u32,

    /// Give up generating a keypair after this many candidates
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u64,

    /// Message Alice sends to Bob
    #[arg(default_value = DEFAULT_MESSAGE)]
    message: String,
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = RsaConfig::new(args.min_bits, args.max_bits, args.certainty)
        .with_max_attempts(args.max_attempts);
    config.validate()?;

    log::info!("generating keypairs for Alice, Bob and Eve");
    let _alice = Rsa::generate(&config)?;
    let bob = Rsa::generate(&config)?;
    let eve = Rsa::generate(&config)?;

    // Alice only needs Bob's public key
    let encrypted = encrypt_message(&args.message, bob.public_key())?;

    println!("Original message Alice sent to Bob: {}", args.message);
    println!("Encrypted message Alice sent to Bob: {}", encrypted);
    println!("Message Bob gets: {}", bob.decrypt_message(&encrypted)?);

    let intercepted = eve.decrypt_bytes(&encrypted)?;
    println!(
        "Message Eve gets: {}",
        String::from_utf8_lossy(&intercepted)
    );
    println!("Message Eve gets (hex): {}", hex::encode(&intercepted));

    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
