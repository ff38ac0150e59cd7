// RSA Key Values
// Public (n, e) and private (n, d) keys, compared by their numbers

use std::fmt;

use num_bigint::BigInt;

use super::bigint::{mod_pow_signed, RsaBigInt};
use crate::error::{RsaError, RsaResult};

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    n: RsaBigInt, // Modulus
    e: RsaBigInt, // Public exponent
}

/// RSA Private Key
///
/// Deliberately not `Clone`, and the exponent has no accessor: the only way
/// to use it is through the owning instance's decryption.
#[derive(PartialEq, Eq, Hash)]
pub struct PrivateKey {
    n: RsaBigInt, // Modulus (same as public)
    d: RsaBigInt, // Private exponent
}

impl PublicKey {
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Self {
        Self { n, e }
    }

    pub fn modulus(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn exponent(&self) -> &RsaBigInt {
        &self.e
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// c = m^e mod n, with m taken as a signed integer
    pub fn encrypt_int(&self, m: &BigInt) -> RsaResult<BigInt> {
        mod_pow_signed(m, &self.e, &self.n).ok_or_else(zero_modulus)
    }
}

impl PrivateKey {
    pub fn new(n: RsaBigInt, d: RsaBigInt) -> Self {
        Self { n, d }
    }

    pub fn modulus(&self) -> &RsaBigInt {
        &self.n
    }

    /// m = c^d mod n
    pub(crate) fn decrypt_int(&self, c: &BigInt) -> RsaResult<BigInt> {
        mod_pow_signed(c, &self.d, &self.n).ok_or_else(zero_modulus)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", &self.n)
            .field("d", &"<redacted>")
            .finish()
    }
}

fn zero_modulus() -> RsaError {
    RsaError::InvalidKeyMaterial("modulus must be positive".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use std::collections::HashSet;

    #[test]
    fn test_key_equality() {
        let a = PublicKey::new(from_u64(3233), from_u64(17));
        let b = PublicKey::new(from_u64(3233), from_u64(17));
        let c = PublicKey::new(from_u64(3233), from_u64(7));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);

        assert_eq!(
            PrivateKey::new(from_u64(3233), from_u64(2753)),
            PrivateKey::new(from_u64(3233), from_u64(2753))
        );
        assert_ne!(
            PrivateKey::new(from_u64(3233), from_u64(2753)),
            PrivateKey::new(from_u64(3127), from_u64(2753))
        );
    }

    #[test]
    fn test_textbook_integers() {
        let public_key = PublicKey::new(from_u64(3233), from_u64(17));
        let private_key = PrivateKey::new(from_u64(3233), from_u64(2753));

        let c = public_key.encrypt_int(&BigInt::from(65)).unwrap();
        assert_eq!(c, BigInt::from(2790));
        assert_eq!(private_key.decrypt_int(&c).unwrap(), BigInt::from(65));
        assert_eq!(public_key.bit_length(), 12);
    }

    #[test]
    fn test_zero_modulus_is_rejected() {
        let public_key = PublicKey::new(from_u64(0), from_u64(17));
        assert!(matches!(
            public_key.encrypt_int(&BigInt::from(1)),
            Err(RsaError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_private_debug_redacts_exponent() {
        let private_key = PrivateKey::new(from_u64(3233), from_u64(2753));
        let shown = format!("{:?}", private_key);
        assert!(shown.contains("3233"));
        assert!(!shown.contains("2753"));
    }
}
