// RSA Decryption
// Inverse of encrypt.rs; a wrong key yields garbage, never an error

use num_bigint::BigInt;

use super::codec::{bytes_to_text, decode_int, from_printable};
use super::key::PrivateKey;
use crate::error::RsaResult;

/// Decrypt base64 ciphertext to the raw message bytes
pub fn decrypt_bytes(ciphertext: &str, private_key: &PrivateKey) -> RsaResult<Vec<u8>> {
    let c = BigInt::from_signed_bytes_be(&from_printable(ciphertext)?);
    let m = private_key.decrypt_int(&c)?;
    Ok(decode_int(&m))
}

/// Decrypt base64 ciphertext to text
pub fn decrypt_to_string(ciphertext: &str, private_key: &PrivateKey) -> RsaResult<String> {
    let plaintext = decrypt_bytes(ciphertext, private_key)?;
    Ok(bytes_to_text(&plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RsaError;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::encrypt::encrypt_message;
    use crate::rsa::key::PublicKey;

    fn textbook_keys() -> (PublicKey, PrivateKey) {
        (
            PublicKey::new(from_u64(3233), from_u64(17)),
            PrivateKey::new(from_u64(3233), from_u64(2753)),
        )
    }

    #[test]
    fn test_decrypt_string() {
        let (_, private_key) = textbook_keys();
        assert_eq!(decrypt_to_string("CuY=", &private_key).unwrap(), "A");
    }

    #[test]
    fn test_roundtrip_single_bytes() {
        let (public_key, private_key) = textbook_keys();
        for message in ["A", "z", "0", "~", " "] {
            let ciphertext = encrypt_message(message, &public_key).unwrap();
            assert_eq!(decrypt_to_string(&ciphertext, &private_key).unwrap(), message);
        }
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let (public_key, _) = textbook_keys();
        // n = 61 * 59, e = 17, d = 17^-1 mod 3480
        let other = PrivateKey::new(from_u64(3599), from_u64(1433));

        let ciphertext = encrypt_message("A", &public_key).unwrap();
        let result = decrypt_to_string(&ciphertext, &other);
        // Garbage, not an error
        assert!(result.is_ok());
        assert_ne!(result.unwrap(), "A");
    }

    #[test]
    fn test_decrypt_malformed() {
        let (_, private_key) = textbook_keys();
        assert!(matches!(
            decrypt_to_string("not*base64", &private_key),
            Err(RsaError::DecodingFailure(_))
        ));
        assert!(matches!(
            decrypt_bytes("", &private_key),
            Err(RsaError::DecodingFailure(_))
        ));
    }
}
