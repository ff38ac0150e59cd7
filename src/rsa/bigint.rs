// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::{ExtendedGcd, Integer};
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng, RngCore};

/// RSA Big Integer type alias, used for all key material
pub type RsaBigInt = BigUint;

/// Primes below 256, for trial division ahead of Miller-Rabin
const SMALL_PRIMES: &[u32] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Anything below 256^2 without a factor in SMALL_PRIMES is prime
const TRIAL_DIVISION_LIMIT: u32 = 256 * 256;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation of a signed base: base^exp mod modulus
///
/// The result is always in `[0, modulus)`, so a negative base behaves like
/// its floored residue. Returns None for a zero modulus.
pub fn mod_pow_signed(base: &BigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> Option<BigInt> {
    if modulus.is_zero() {
        return None;
    }
    let exp = BigInt::from(exp.clone());
    let modulus = BigInt::from(modulus.clone());
    Some(base.modpow(&exp, &modulus))
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let a = BigInt::from(a.clone());
    let m = BigInt::from(m.clone());
    let ExtendedGcd { gcd, x, .. } = a.extended_gcd(&m);

    if !gcd.is_one() {
        return None;
    }

    x.mod_floor(&m).to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Miller-Rabin rounds that bring the error probability under 2^-certainty
fn certainty_rounds(certainty: u32) -> u32 {
    certainty / 2 + certainty % 2
}

/// Rounds for a freshly drawn random candidate.
/// Random candidates are far less likely to fool a witness than chosen ones,
/// so bigger numbers get away with fewer rounds.
fn random_candidate_rounds(bits: u64, certainty: u32) -> u32 {
    let by_size = match bits {
        0..=99 => 50,
        100..=255 => 27,
        256..=511 => 15,
        512..=767 => 8,
        768..=1023 => 4,
        _ => 2,
    };
    by_size.min(certainty_rounds(certainty))
}

/// Some(verdict) when small-prime trial division settles the question
fn trial_division(n: &RsaBigInt) -> Option<bool> {
    if n < &RsaBigInt::from(2u8) {
        return Some(false);
    }

    for &p in SMALL_PRIMES {
        if *n == RsaBigInt::from(p) {
            return Some(true);
        }
        if (n % p).is_zero() {
            return Some(false);
        }
    }

    if n < &RsaBigInt::from(TRIAL_DIVISION_LIMIT) {
        return Some(true);
    }

    None
}

/// Miller-Rabin with `rounds` random witnesses.
/// `n` must be odd and larger than every entry of SMALL_PRIMES.
fn miller_rabin<R: RngCore + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    let one = RsaBigInt::one();
    let two = RsaBigInt::from(2u8);
    let n_minus_one = n - &one;

    // Write n-1 as d * 2^s with d odd
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Probabilistic primality test.
/// A composite passes with probability at most 2^-certainty; certainty 0
/// only runs trial division.
pub fn is_probable_prime<R: RngCore + CryptoRng + ?Sized>(
    n: &RsaBigInt,
    certainty: u32,
    rng: &mut R,
) -> bool {
    match trial_division(n) {
        Some(verdict) => verdict,
        None => miller_rabin(n, certainty_rounds(certainty), rng),
    }
}

/// Generate a random probable prime of exactly `bit_length` bits.
/// Returns None when `bit_length < 2`.
pub fn random_prime<R: RngCore + CryptoRng + ?Sized>(
    bit_length: u64,
    certainty: u32,
    rng: &mut R,
) -> Option<RsaBigInt> {
    if bit_length < 2 {
        return None;
    }

    let lower = RsaBigInt::one() << (bit_length - 1);
    let upper = RsaBigInt::one() << bit_length;
    let rounds = random_candidate_rounds(bit_length, certainty);

    loop {
        let mut candidate = rng.gen_biguint_range(&lower, &upper);

        // Make it odd; 2^b - 1 is already odd so this never leaves the range
        if candidate.is_even() {
            candidate += 1u8;
        }

        let prime = match trial_division(&candidate) {
            Some(verdict) => verdict,
            None => miller_rabin(&candidate, rounds, rng),
        };
        if prime {
            return Some(candidate);
        }
    }
}

/// Uniformly pick a bit length in the inclusive range
pub fn random_bit_length<R: RngCore + ?Sized>(min: u64, max: u64, rng: &mut R) -> u64 {
    rng.gen_range(min..=max)
}
