// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod instance;
pub mod key;
pub mod keygen;

pub use encrypt::{encrypt_bytes, encrypt_message};
pub use instance::Rsa;
pub use key::{PrivateKey, PublicKey};
pub use keygen::SELF_TEST_MESSAGE;
