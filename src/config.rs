// Key Generation Configuration
// Bit-length range, primality certainty and the retry bound for generation

use crate::error::{RsaError, RsaResult};

/// Smallest bit length a prime can have
pub const MIN_PRIME_BITS: u64 = 2;

pub const DEFAULT_MIN_BITS: u64 = 100;
pub const DEFAULT_MAX_BITS: u64 = 1000;

/// False-positive probability of a primality check is at most 2^-certainty
pub const DEFAULT_CERTAINTY: u32 = 99;

/// High enough that generation effectively never gives up with sane ranges
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Configuration for generation-mode RSA instances
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaConfig {
    /// Inclusive lower bound of each prime's bit length
    pub min_bits: u64,
    /// Inclusive upper bound of each prime's bit length
    pub max_bits: u64,
    pub certainty: u32,
    pub max_attempts: u64,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            min_bits: DEFAULT_MIN_BITS,
            max_bits: DEFAULT_MAX_BITS,
            certainty: DEFAULT_CERTAINTY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RsaConfig {
    pub fn new(min_bits: u64, max_bits: u64, certainty: u32) -> Self {
        Self {
            min_bits,
            max_bits,
            certainty,
            ..Self::default()
        }
    }

    pub fn with_bit_range(mut self, min_bits: u64, max_bits: u64) -> Self {
        self.min_bits = min_bits;
        self.max_bits = max_bits;
        self
    }

    pub fn with_certainty(mut self, certainty: u32) -> Self {
        self.certainty = certainty;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Reject ranges that can never yield a prime
    pub fn validate(&self) -> RsaResult<()> {
        if self.min_bits > self.max_bits || self.max_bits < MIN_PRIME_BITS {
            return Err(RsaError::InvalidBitRange {
                min: self.min_bits,
                max: self.max_bits,
            });
        }
        Ok(())
    }

    /// Bit-length range actually drawn from; a lower bound below 2 is raised to 2
    pub(crate) fn prime_bits(&self) -> (u64, u64) {
        (self.min_bits.max(MIN_PRIME_BITS), self.max_bits)
    }
}
