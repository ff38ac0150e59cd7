// RSA Key Generation
// Candidate selection, the round-trip self-test, and the bounded retry loop

use log::{debug, info, warn};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use super::bigint::{gcd, mod_inverse, random_bit_length, random_prime, RsaBigInt};
use super::decrypt::decrypt_bytes;
use super::encrypt::encrypt_message;
use super::key::{PrivateKey, PublicKey};
use crate::config::RsaConfig;
use crate::error::{RsaError, RsaResult};

/// Probe encrypted and decrypted by every generated keypair before it is
/// accepted. Covers lowercase, uppercase, digits, symbols and control
/// characters, and starts with a byte whose high bit is clear.
pub const SELF_TEST_MESSAGE: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    " ~`@#$%^&*()_-+=|\n\r\t\0{}[]\\'\";:?/>.<,\u{8}",
);

/// Why a candidate keypair was thrown away
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("cannot draw a {0}-bit prime")]
    PrimeTooSmall(u64),

    #[error("totient is too small to pick a public exponent")]
    ExponentTooSmall,

    #[error("p and q are equal")]
    EqualPrimes,

    #[error("e is not invertible modulo phi(n)")]
    NotInvertible,

    #[error("self-test message did not survive encryption and decryption")]
    RoundTripMismatch,

    #[error("self-test failed: {0}")]
    Probe(#[from] RsaError),
}

/// Full key material derived from (p, q, e)
pub(crate) struct KeyMaterial {
    pub(crate) p: RsaBigInt,
    pub(crate) q: RsaBigInt,
    pub(crate) n: RsaBigInt,
    pub(crate) phi: RsaBigInt,
    pub(crate) e: RsaBigInt,
    pub(crate) d: RsaBigInt,
}

/// Key material that passed `validate_candidate`
pub(crate) struct ValidKeyMaterial(KeyMaterial);

/// Unvalidated output of one selection round
struct Candidate {
    p: RsaBigInt,
    q: RsaBigInt,
    e: RsaBigInt,
}

impl KeyMaterial {
    /// n = p*q, phi = (p-1)(q-1), d = e^-1 mod phi.
    /// None when e has no inverse modulo phi.
    pub(crate) fn derive(p: RsaBigInt, q: RsaBigInt, e: RsaBigInt) -> Option<Self> {
        let two = RsaBigInt::from(2u8);
        if p < two || q < two {
            return None;
        }

        // Step 1: n = p * q
        let n = &p * &q;

        // Step 2: φ(n) = (p-1)(q-1)
        let phi = (&p - 1u8) * (&q - 1u8);

        // Step 3: d = e^(-1) mod φ(n)
        let d = mod_inverse(&e, &phi)?;

        Some(Self { p, q, n, phi, e, d })
    }

    pub(crate) fn public_key(&self) -> PublicKey {
        PublicKey::new(self.n.clone(), self.e.clone())
    }

    pub(crate) fn private_key(&self) -> PrivateKey {
        PrivateKey::new(self.n.clone(), self.d.clone())
    }
}

impl ValidKeyMaterial {
    pub(crate) fn into_inner(self) -> KeyMaterial {
        self.0
    }
}

/// Bit length of the public exponent for a given totient:
/// floor(decimal digits of phi / ln 2) - 1
pub(crate) fn exponent_bit_length(phi: &RsaBigInt) -> u64 {
    let digits = phi.to_str_radix(10).len() as f64;
    ((digits / std::f64::consts::LN_2) as u64).saturating_sub(1)
}

/// Draw p and q with independent random sizes, then a prime e sized from phi
fn select_candidate<R: RngCore + CryptoRng + ?Sized>(
    config: &RsaConfig,
    rng: &mut R,
) -> Result<Candidate, ValidationError> {
    let (min_bits, max_bits) = config.prime_bits();

    let p_bits = random_bit_length(min_bits, max_bits, rng);
    let q_bits = random_bit_length(min_bits, max_bits, rng);

    let p = random_prime(p_bits, config.certainty, rng)
        .ok_or(ValidationError::PrimeTooSmall(p_bits))?;
    let q = random_prime(q_bits, config.certainty, rng)
        .ok_or(ValidationError::PrimeTooSmall(q_bits))?;

    let phi = (&p - 1u8) * (&q - 1u8);

    // A prime e is coprime to phi unless it divides it
    let e = random_prime(exponent_bit_length(&phi), config.certainty, rng)
        .ok_or(ValidationError::ExponentTooSmall)?;

    Ok(Candidate { p, q, e })
}

/// Accept (p, q, e) only if the primes differ, e is invertible, and the
/// self-test message comes back unchanged.
pub(crate) fn validate_candidate(
    p: RsaBigInt,
    q: RsaBigInt,
    e: RsaBigInt,
) -> Result<ValidKeyMaterial, ValidationError> {
    if p == q {
        return Err(ValidationError::EqualPrimes);
    }

    let material = KeyMaterial::derive(p, q, e).ok_or(ValidationError::NotInvertible)?;

    let ciphertext = encrypt_message(SELF_TEST_MESSAGE, &material.public_key())?;
    let recovered = decrypt_bytes(&ciphertext, &material.private_key())?;
    if recovered != SELF_TEST_MESSAGE.as_bytes() {
        return Err(ValidationError::RoundTripMismatch);
    }

    Ok(ValidKeyMaterial(material))
}

/// Select and validate candidates until one passes or the attempt bound is hit
pub(crate) fn generate_key_material<R: RngCore + CryptoRng + ?Sized>(
    config: &RsaConfig,
    rng: &mut R,
) -> RsaResult<ValidKeyMaterial> {
    config.validate()?;

    for attempt in 1..=config.max_attempts {
        let outcome = select_candidate(config, rng)
            .and_then(|candidate| validate_candidate(candidate.p, candidate.q, candidate.e));

        match outcome {
            Ok(material) => {
                info!(
                    "accepted RSA keypair after {} attempt(s), modulus is {} bits",
                    attempt,
                    material.0.n.bits()
                );
                return Ok(material);
            }
            Err(reason) => debug!("discarding candidate keypair #{}: {}", attempt, reason),
        }
    }

    warn!(
        "gave up on RSA key generation after {} attempts (prime bits {}..={})",
        config.max_attempts, config.min_bits, config.max_bits
    );
    Err(RsaError::GenerationExhausted {
        attempts: config.max_attempts,
    })
}

/// gcd(e, phi) == 1, the condition for e to be usable with these primes
pub(crate) fn is_coprime(e: &RsaBigInt, phi: &RsaBigInt) -> bool {
    gcd(e, phi) == RsaBigInt::from(1u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::{from_u64, is_probable_prime};
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mersenne(exp: u32) -> RsaBigInt {
        (RsaBigInt::one() << exp) - 1u8
    }

    #[test]
    fn test_self_test_message() {
        assert_eq!(SELF_TEST_MESSAGE.len(), 26 + 26 + 10 + 37);
        assert!(SELF_TEST_MESSAGE.contains('\0'));
        assert!(SELF_TEST_MESSAGE.contains('\u{8}'));
        assert!(SELF_TEST_MESSAGE.is_ascii());
    }

    #[test]
    fn test_exponent_bit_length() {
        // 4 digits / ln 2 = 5.77
        assert_eq!(exponent_bit_length(&from_u64(3120)), 4);
        assert_eq!(exponent_bit_length(&from_u64(2)), 0);
        assert_eq!(exponent_bit_length(&from_u64(96)), 1);
        assert_eq!(exponent_bit_length(&from_u64(100)), 3);

        // Always well below phi itself
        let phi = (mersenne(521) - 1u8) * (mersenne(607) - 1u8);
        assert!(exponent_bit_length(&phi) < phi.bits());
    }

    #[test]
    fn test_derive_textbook() {
        let material = KeyMaterial::derive(from_u64(61), from_u64(53), from_u64(17)).unwrap();
        assert_eq!(material.n, from_u64(3233));
        assert_eq!(material.phi, from_u64(3120));
        assert_eq!(material.d, from_u64(2753));
        assert!(is_coprime(&material.e, &material.phi));
    }

    #[test]
    fn test_derive_not_invertible() {
        // 3120 = 13 * 240
        assert!(KeyMaterial::derive(from_u64(61), from_u64(53), from_u64(13)).is_none());
        assert!(!is_coprime(&from_u64(13), &from_u64(3120)));
    }

    #[test]
    fn test_validate_equal_primes() {
        let result = validate_candidate(mersenne(127), mersenne(127), from_u64(65537));
        assert_eq!(result.err(), Some(ValidationError::EqualPrimes));
    }

    #[test]
    fn test_validate_small_modulus_fails_round_trip() {
        // The probe is far larger than 3233
        let result = validate_candidate(from_u64(61), from_u64(53), from_u64(17));
        assert_eq!(result.err(), Some(ValidationError::RoundTripMismatch));
    }

    #[test]
    fn test_validate_not_invertible() {
        let result = validate_candidate(from_u64(61), from_u64(53), from_u64(13));
        assert_eq!(result.err(), Some(ValidationError::NotInvertible));
    }

    #[test]
    fn test_validate_large_primes() {
        let material = validate_candidate(mersenne(521), mersenne(607), from_u64(65537))
            .unwrap()
            .into_inner();
        assert_eq!(material.n, mersenne(521) * mersenne(607));
    }

    #[test]
    fn test_generate_key_material() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = RsaConfig::new(400, 420, 20);
        let material = generate_key_material(&config, &mut rng).unwrap().into_inner();

        assert_ne!(material.p, material.q);
        assert!((400..=420).contains(&material.p.bits()));
        assert!((400..=420).contains(&material.q.bits()));
        assert!(is_probable_prime(&material.p, 20, &mut rng));
        assert!(is_probable_prime(&material.q, 20, &mut rng));
        assert!(is_probable_prime(&material.e, 20, &mut rng));
        assert_eq!(material.e.bits(), exponent_bit_length(&material.phi));
        assert!(material.e < material.phi);
        assert!(is_coprime(&material.e, &material.phi));
        assert_eq!((&material.d * &material.e) % &material.phi, RsaBigInt::one());
    }

    #[test]
    fn test_generate_exhausted() {
        // Moduli this small can never carry the probe
        let mut rng = StdRng::seed_from_u64(11);
        let config = RsaConfig::new(8, 16, 20).with_max_attempts(5);
        let result = generate_key_material(&config, &mut rng);
        assert_eq!(
            result.err(),
            Some(RsaError::GenerationExhausted { attempts: 5 })
        );
    }

    #[test]
    fn test_generate_rejects_bad_range() {
        let mut rng = StdRng::seed_from_u64(13);
        let config = RsaConfig::new(50, 10, 20);
        assert_eq!(
            generate_key_material(&config, &mut rng).err(),
            Some(RsaError::InvalidBitRange { min: 50, max: 10 })
        );
    }
}
