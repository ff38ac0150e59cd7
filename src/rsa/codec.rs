// Message Codec
// Text <-> integer (signed, big-endian two's complement) and bytes <-> base64

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use num_bigint::BigInt;

use crate::error::{RsaError, RsaResult};

/// Standard alphabet, always padded on output, padding optional on input
const PRINTABLE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Interpret raw bytes as a signed big-endian two's-complement integer.
///
/// A leading byte with its high bit set gives a negative number, and leading
/// zero bytes carry no value, so they do not survive `decode_int`.
pub fn encode_bytes(bytes: &[u8]) -> RsaResult<BigInt> {
    if bytes.is_empty() {
        return Err(RsaError::EmptyMessage);
    }
    Ok(BigInt::from_signed_bytes_be(bytes))
}

/// Encode a message's UTF-8 bytes as an integer
pub fn encode_text(text: &str) -> RsaResult<BigInt> {
    encode_bytes(text.as_bytes())
}

/// Minimal two's-complement big-endian bytes of `value`
pub fn decode_int(value: &BigInt) -> Vec<u8> {
    value.to_signed_bytes_be()
}

/// Bytes to text, replacing invalid UTF-8 sequences with U+FFFD
pub fn bytes_to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub fn to_printable(bytes: &[u8]) -> String {
    PRINTABLE.encode(bytes)
}

pub fn from_printable(text: &str) -> RsaResult<Vec<u8>> {
    let bytes = PRINTABLE
        .decode(text)
        .map_err(|e| RsaError::DecodingFailure(e.to_string()))?;

    if bytes.is_empty() {
        return Err(RsaError::DecodingFailure("empty ciphertext".to_string()));
    }

    Ok(bytes)
}
