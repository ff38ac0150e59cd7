// RSA Instance
// Owns one keypair; the private half is only reachable through decryption

use std::fmt;

use num_bigint::BigInt;
use rand::{thread_rng, CryptoRng, RngCore};

use super::bigint::{is_probable_prime, RsaBigInt};
use super::decrypt::{decrypt_bytes, decrypt_to_string};
use super::key::{PrivateKey, PublicKey};
use super::keygen::{generate_key_material, is_coprime, KeyMaterial};
use crate::config::{RsaConfig, DEFAULT_CERTAINTY};
use crate::error::{RsaError, RsaResult};

/// A complete RSA keypair.
///
/// Generated instances have already encrypted and decrypted a probe message
/// successfully. Instances built by [`Rsa::from_primes`] have not: callers
/// supplying their own primes must check the keys work for their messages.
pub struct Rsa {
    // Secret material, kept for the life of the instance and never handed out
    #[allow(dead_code)]
    p: RsaBigInt,
    #[allow(dead_code)]
    q: RsaBigInt,
    #[allow(dead_code)]
    phi: RsaBigInt,
    #[allow(dead_code)]
    d: RsaBigInt,
    n: RsaBigInt,
    e: RsaBigInt,
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl Rsa {
    /// Generate a keypair whose primes have between `min_bits` and `max_bits` bits
    pub fn new(min_bits: u64, max_bits: u64, certainty: u32) -> RsaResult<Self> {
        Self::generate(&RsaConfig::new(min_bits, max_bits, certainty))
    }

    pub fn generate(config: &RsaConfig) -> RsaResult<Self> {
        Self::generate_with_rng(config, &mut thread_rng())
    }

    pub fn generate_with_rng<R: RngCore + CryptoRng + ?Sized>(
        config: &RsaConfig,
        rng: &mut R,
    ) -> RsaResult<Self> {
        let material = generate_key_material(config, rng)?;
        Ok(Self::from_material(material.into_inner()))
    }

    /// Build from caller-chosen primes and public exponent.
    ///
    /// No self-test is run; only the primality of p and q (at the default
    /// certainty), p != q and gcd(e, phi) = 1 are checked.
    pub fn from_primes(p: RsaBigInt, q: RsaBigInt, e: RsaBigInt) -> RsaResult<Self> {
        Self::from_primes_with_certainty(p, q, e, DEFAULT_CERTAINTY)
    }

    pub fn from_primes_with_certainty(
        p: RsaBigInt,
        q: RsaBigInt,
        e: RsaBigInt,
        certainty: u32,
    ) -> RsaResult<Self> {
        if p == q {
            return Err(RsaError::InvalidKeyMaterial(
                "p must not equal q".to_string(),
            ));
        }

        let mut rng = thread_rng();
        if !is_probable_prime(&p, certainty, &mut rng) || !is_probable_prime(&q, certainty, &mut rng)
        {
            return Err(RsaError::InvalidKeyMaterial(format!(
                "p and q must both be prime with certainty {}",
                certainty
            )));
        }

        let phi = (&p - 1u8) * (&q - 1u8);
        if !is_coprime(&e, &phi) {
            return Err(RsaError::InvalidKeyMaterial(
                "e must be coprime with phi(n)".to_string(),
            ));
        }

        let material = KeyMaterial::derive(p, q, e).ok_or_else(|| {
            RsaError::InvalidKeyMaterial("e is not invertible modulo phi(n)".to_string())
        })?;

        Ok(Self::from_material(material))
    }

    fn from_material(material: KeyMaterial) -> Self {
        let public_key = material.public_key();
        let private_key = material.private_key();
        let KeyMaterial { p, q, n, phi, e, d } = material;

        Self {
            p,
            q,
            phi,
            d,
            n,
            e,
            public_key,
            private_key,
        }
    }

    /// n
    pub fn modulus(&self) -> &RsaBigInt {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &RsaBigInt {
        &self.e
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Decrypt with this instance's private key.
    /// Ciphertext meant for another key decrypts to unrelated text, not an error.
    pub fn decrypt_message(&self, ciphertext: &str) -> RsaResult<String> {
        decrypt_to_string(ciphertext, &self.private_key)
    }

    pub fn decrypt_bytes(&self, ciphertext: &str) -> RsaResult<Vec<u8>> {
        decrypt_bytes(ciphertext, &self.private_key)
    }

    /// m = c^d mod n on raw integers
    pub fn decrypt_int(&self, c: &BigInt) -> RsaResult<BigInt> {
        self.private_key.decrypt_int(c)
    }
}

impl fmt::Debug for Rsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rsa")
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}
