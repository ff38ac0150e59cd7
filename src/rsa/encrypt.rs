// RSA Encryption
// Textbook RSA: no padding, the whole message is one integer

use super::codec::{decode_int, encode_bytes, to_printable};
use super::key::PublicKey;
use crate::error::RsaResult;

/// Encrypt raw bytes, returning base64 ciphertext
pub fn encrypt_bytes(plaintext: &[u8], public_key: &PublicKey) -> RsaResult<String> {
    let m = encode_bytes(plaintext)?;
    let c = public_key.encrypt_int(&m)?;
    Ok(to_printable(&decode_int(&c)))
}

/// Encrypt a message for whoever owns the private half of `public_key`.
///
/// Messages whose integer form is not below n, or whose first byte has the
/// high bit set, do not come back unchanged from decryption.
pub fn encrypt_message(message: &str, public_key: &PublicKey) -> RsaResult<String> {
    encrypt_bytes(message.as_bytes(), public_key)
}
