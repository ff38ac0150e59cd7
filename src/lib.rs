//! Textbook RSA: keypair generation guarded by a round-trip self-test,
//! unpadded encryption and decryption of text, base64 ciphertext.
//!
//! ```no_run
//! use textbook_rsa::{encrypt_message, Rsa};
//!
//! let bob = Rsa::new(400, 600, 99)?;
//! let ciphertext = encrypt_message("hi Bob", bob.public_key())?;
//! assert_eq!(bob.decrypt_message(&ciphertext)?, "hi Bob");
//! # Ok::<(), textbook_rsa::RsaError>(())
//! ```

pub mod config;
pub mod error;
pub mod rsa;

pub use config::RsaConfig;
pub use error::{RsaError, RsaResult};
pub use rsa::{encrypt_message, PrivateKey, PublicKey, Rsa, SELF_TEST_MESSAGE};
