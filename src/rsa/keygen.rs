// RSA Key Generation
// Derives modulus, totient and private exponent from (p, q, e)

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::bigint::{
    are_coprime, euler_totient, extended_gcd, from_u64, is_prime, random_coprime,
    random_unique_primes_with_rng, RsaBigInt,
};
use crate::error::{Result, RsaError};

/// Read-only view of the public half of a key.
///
/// Encryption and verification only ever see a peer through this trait.
pub trait PublicKey {
    fn public_modulus(&self) -> &RsaBigInt;
    fn public_exponent(&self) -> &RsaBigInt;
}

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt,  // Modulus
    pub e: RsaBigInt,  // Public exponent
}

impl PublicKey for RsaPublicKey {
    fn public_modulus(&self) -> &RsaBigInt {
        &self.n
    }

    fn public_exponent(&self) -> &RsaBigInt {
        &self.e
    }
}

/// A fully derived RSA key: both primes, modulus, totient and exponents.
///
/// Only `KeyPair::new` and `KeyPair::generate` build one, so every value
/// satisfies `e * d ≡ 1 (mod phi)` with `1 < e < phi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    p: RsaBigInt,
    q: RsaBigInt,
    n: RsaBigInt,
    phi: RsaBigInt,
    e: RsaBigInt,
    d: RsaBigInt,
}

impl KeyPair {
    /// Validate `p`, `q` and `e`, then derive `n`, `phi` and `d`.
    ///
    /// Fails with `InvalidPrime` if either factor is not prime (p is checked
    /// first) and with `InvalidExponent` unless `e` is coprime to phi and
    /// strictly between 1 and phi.
    pub fn new(p: RsaBigInt, q: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        for factor in [&p, &q] {
            if !is_prime(factor) {
                return Err(RsaError::InvalidPrime(BigInt::from(factor.clone())));
            }
        }
        if p == q {
            log::warn!("p and q are both {}; (p-1)(q-1) is not the totient of p^2", p);
        }

        let n = &p * &q;
        let phi = euler_totient(&p, &q);

        if e <= RsaBigInt::one() || e >= phi || !are_coprime(&e, &phi) {
            return Err(RsaError::InvalidExponent {
                e: BigInt::from(e),
                phi,
            });
        }

        let d = private_exponent(&e, &phi);
        log::debug!("derived key n={} phi={} e={} d={}", n, phi, e, d);

        Ok(Self { p, q, n, phi, e, d })
    }

    /// Build a key from two distinct random primes in `[lo, hi]` and a random
    /// exponent coprime to their totient.
    pub fn generate<R: Rng + ?Sized>(lo: u64, hi: u64, rng: &mut R) -> Result<Self> {
        let primes: Vec<u64> = random_unique_primes_with_rng(lo, hi, 2, rng)?
            .into_iter()
            .collect();
        let (p, q) = (from_u64(primes[0]), from_u64(primes[1]));

        let phi = euler_totient(&p, &q);
        let e = random_coprime(&phi, rng).ok_or_else(|| RsaError::NoExponent(phi.clone()))?;

        Self::new(p, q, e)
    }

    pub fn p(&self) -> &RsaBigInt {
        &self.p
    }

    pub fn q(&self) -> &RsaBigInt {
        &self.q
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn phi(&self) -> &RsaBigInt {
        &self.phi
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    /// The `(n, e)` half that is handed to a peer
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl PublicKey for KeyPair {
    fn public_modulus(&self) -> &RsaBigInt {
        &self.n
    }

    fn public_exponent(&self) -> &RsaBigInt {
        &self.e
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RSA Key Information:")?;
        writeln!(f, "    p = {}", self.p)?;
        writeln!(f, "    q = {}", self.q)?;
        writeln!(f, "    n = {}", self.n)?;
        writeln!(f, "    e = {}", self.e)?;
        write!(f, "    d = {}", self.d)
    }
}

/// Bezout coefficient of `e`, reduced into [0, phi)
fn private_exponent(e: &RsaBigInt, phi: &RsaBigInt) -> RsaBigInt {
    let (_, s, _) = extended_gcd(e, phi);
    s.mod_floor(&BigInt::from(phi.clone())).magnitude().clone()
}
