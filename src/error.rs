// RSA Errors
// Everything a caller of the library can observe going wrong

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    /// The prime bit-length range cannot produce any prime
    #[error("Invalid prime bit-length range {min}..={max}: need min <= max and max >= 2")]
    InvalidBitRange { min: u64, max: u64 },

    /// Caller supplied p, q, e that cannot form a keypair
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Key generation hit the configured attempt bound
    #[error("No valid keypair found after {attempts} attempts")]
    GenerationExhausted { attempts: u64 },

    #[error("Malformed ciphertext: {0}")]
    DecodingFailure(String),

    #[error("Cannot encrypt an empty message")]
    EmptyMessage,
}

pub type RsaResult<T> = Result<T, RsaError>;
