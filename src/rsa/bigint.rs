// RSA Big Integer Operations
// Number theory over num-bigint: primes, gcd, Bezout coefficients, modular arithmetic

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::seq::{index, SliceRandom};
use rand::{thread_rng, Rng};

use crate::error::{Result, RsaError};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Largest bound the shared prime table grows to. Candidates whose square
/// root lies beyond it go through Miller-Rabin instead of trial division.
pub const SIEVE_CEILING: u64 = 1 << 20;

/// Largest `hi` accepted when sieving a prime range
pub const MAX_SIEVE_LIMIT: u64 = 1 << 26;

/// Witness rounds used by `is_prime` past the sieve ceiling
pub const MILLER_RABIN_ROUNDS: u32 = 40;

const SMALL_PRIME_LIMIT: u64 = 1000;

static SHARED_TABLE: OnceLock<RwLock<Arc<PrimeTable>>> = OnceLock::new();

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Ordered primes up to `limit`, produced once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeTable {
    limit: u64,
    primes: Vec<u64>,
}

impl PrimeTable {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            primes: sieve_primes(limit),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// Prefix of the table holding every prime `<= bound`
    pub fn up_to(&self, bound: u64) -> &[u64] {
        let end = self.primes.partition_point(|&p| p <= bound);
        &self.primes[..end]
    }

    /// Process-wide table covering at least `limit`, capped at `SIEVE_CEILING`.
    ///
    /// A larger request replaces the cached table with a freshly sieved one;
    /// readers holding the previous `Arc` keep a consistent snapshot.
    pub fn shared(limit: u64) -> Arc<PrimeTable> {
        let limit = limit.min(SIEVE_CEILING);
        let slot = SHARED_TABLE.get_or_init(|| RwLock::new(Arc::new(PrimeTable::new(0))));

        {
            let table = slot.read().unwrap_or_else(PoisonError::into_inner);
            if table.limit >= limit {
                return Arc::clone(&*table);
            }
        }

        let mut table = slot.write().unwrap_or_else(PoisonError::into_inner);
        if table.limit < limit {
            // grow geometrically
            let grown = limit.max(table.limit.saturating_mul(2)).min(SIEVE_CEILING);
            log::debug!("growing shared prime table from {} to {}", table.limit, grown);
            *table = Arc::new(PrimeTable::new(grown));
        }
        Arc::clone(&*table)
    }
}

/// Sieve of Eratosthenes: every prime `<= limit`, ascending
///
/// # Panics
///
/// Panics if `limit` exceeds `MAX_SIEVE_LIMIT`.
pub fn sieve_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }

    let limit = match usize::try_from(limit) {
        Ok(limit) if limit as u64 <= MAX_SIEVE_LIMIT => limit,
        _ => panic!("sieve limit {} exceeds {}", limit, MAX_SIEVE_LIMIT),
    };
    let size = limit + 1;

    let mut composite = vec![false; size];
    let mut primes = Vec::new();

    for candidate in 2..=limit {
        if composite[candidate] {
            continue;
        }
        primes.push(candidate as u64);
        if let Some(start) = candidate.checked_mul(candidate) {
            for multiple in (start..=limit).step_by(candidate) {
                composite[multiple] = true;
            }
        }
    }

    primes
}

/// Primes `p` with `lo <= p <= hi`. Same bound on `hi` as `sieve_primes`.
pub fn primes_in_range(lo: u64, hi: u64) -> Vec<u64> {
    sieve_primes(hi).into_iter().filter(|&p| p >= lo).collect()
}

/// Pick `count` distinct primes from `[lo, hi]` uniformly without replacement.
///
/// Fails with `RangeTooLarge` rather than sieving past `MAX_SIEVE_LIMIT`.
pub fn random_unique_primes(lo: u64, hi: u64, count: usize) -> Result<BTreeSet<u64>> {
    random_unique_primes_with_rng(lo, hi, count, &mut thread_rng())
}

pub fn random_unique_primes_with_rng<R: Rng + ?Sized>(
    lo: u64,
    hi: u64,
    count: usize,
    rng: &mut R,
) -> Result<BTreeSet<u64>> {
    if hi > MAX_SIEVE_LIMIT {
        return Err(RsaError::RangeTooLarge {
            hi,
            max: MAX_SIEVE_LIMIT,
        });
    }
    let primes = primes_in_range(lo, hi);

    if primes.is_empty() || primes.len() < count {
        return Err(RsaError::InsufficientRange {
            lo,
            hi,
            requested: count,
            available: primes.len(),
        });
    }

    Ok(index::sample(rng, primes.len(), count)
        .into_iter()
        .map(|i| primes[i])
        .collect())
}

/// Deterministic primality test.
///
/// Trial division by the primes up to `floor(sqrt(n)) + 1`, read from the
/// shared table. Past `SIEVE_CEILING` the test switches to Miller-Rabin.
pub fn is_prime(n: &RsaBigInt) -> bool {
    let small = n.to_u64();
    if matches!(small, Some(0) | Some(1)) {
        return false;
    }

    let bound = n.sqrt() + 1u8;
    match bound.to_u64() {
        Some(bound) if bound <= SIEVE_CEILING => {
            let table = PrimeTable::shared(bound);
            !table
                .up_to(bound)
                .iter()
                .any(|&p| small != Some(p) && (n % p).is_zero())
        }
        _ => is_probable_prime(n, MILLER_RABIN_ROUNDS),
    }
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, rounds: u32) -> bool {
    let two = from_u64(2);
    if n < &two {
        return false;
    }
    if n == &two || n == &from_u64(3) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    for &p in PrimeTable::shared(SMALL_PRIME_LIMIT).up_to(SMALL_PRIME_LIMIT) {
        if (n % p).is_zero() {
            return n == &from_u64(p);
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let mut rng = thread_rng();
    let n_minus_two = n - &two;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_two);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Modular exponentiation: base^exp mod modulus
/// Uses right-to-left square-and-multiply
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    assert!(!modulus.is_zero(), "modulus must be non-zero");
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Greatest common divisor (Euclid)
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

pub fn are_coprime(a: &RsaBigInt, b: &RsaBigInt) -> bool {
    gcd(a, b).is_one()
}

/// Extended Euclidean Algorithm
/// Returns (gcd, s, t) such that s*a + t*b = gcd
///
/// Coefficients are carried forward alongside the remainders, so no
/// back-substitution pass is needed.
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    let mut r = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let mut s = (BigInt::one(), BigInt::zero());
    let mut t = (BigInt::zero(), BigInt::one());

    while !r.1.is_zero() {
        let quotient = &r.0 / &r.1;
        advance(&mut r, &quotient);
        advance(&mut s, &quotient);
        advance(&mut t, &quotient);
    }

    (r.0.magnitude().clone(), s.0, t.0)
}

fn advance(pair: &mut (BigInt, BigInt), quotient: &BigInt) {
    let next = &pair.0 - quotient * &pair.1;
    pair.0 = std::mem::replace(&mut pair.1, next);
}

/// Compute modular inverse: a^(-1) mod m, normalised into [0, m)
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let (gcd, s, _) = extended_gcd(a, m);
    if !gcd.is_one() {
        return None;
    }

    let m = BigInt::from(m.clone());
    Some(s.mod_floor(&m).magnitude().clone())
}

/// Euler's totient of a product of two distinct primes: (p-1)(q-1)
pub fn euler_totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

/// Every k in [1, n) with gcd(k, n) == 1
///
/// Linear in n; only meant for demo-sized moduli.
pub fn coprimes_below(n: u64) -> Vec<u64> {
    (1..n).filter(|k| k.gcd(&n) == 1).collect()
}

/// A uniformly chosen k in (1, n) coprime to n, if one exists
pub fn random_coprime<R: Rng + ?Sized>(n: &RsaBigInt, rng: &mut R) -> Option<RsaBigInt> {
    let two = from_u64(2);
    if n <= &two {
        return None;
    }

    match n.to_u64() {
        Some(small) if small <= SIEVE_CEILING => {
            let candidates: Vec<u64> = coprimes_below(small)
                .into_iter()
                .filter(|&k| k > 1)
                .collect();
            candidates.choose(rng).map(|&k| from_u64(k))
        }
        // n - 1 always qualifies, so this terminates
        _ => loop {
            let k = rng.gen_biguint_range(&two, n);
            if are_coprime(&k, n) {
                return Some(k);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, false)]
    #[case(2, true)]
    #[case(3, true)]
    #[case(4, false)]
    #[case(5, true)]
    #[case(7, true)]
    #[case(9, false)]
    #[case(13, true)]
    #[case(25, false)]
    #[case(97, true)]
    #[case(561, false)]
    #[case(7919, true)]
    fn test_is_prime(#[case] n: u64, #[case] expected: bool) {
        assert_eq!(is_prime(&from_u64(n)), expected);
    }

    #[test]
    fn test_is_prime_past_sieve_ceiling() {
        // 2^61 - 1
        let mersenne = from_u64(2_305_843_009_213_693_951);
        assert!(is_prime(&mersenne));

        let square = from_u64(2_147_483_647) * from_u64(2_147_483_647);
        assert!(!is_prime(&square));
    }

    #[test]
    fn test_is_probable_prime() {
        assert!(is_probable_prime(&from_u64(2), 5));
        assert!(is_probable_prime(&from_u64(3), 5));
        assert!(is_probable_prime(&from_u64(1_000_003), 5));
        assert!(!is_probable_prime(&from_u64(4), 5));
        assert!(!is_probable_prime(&from_u64(1_000_001), 5));
    }

    #[test]
    fn test_sieve_primes() {
        assert_eq!(sieve_primes(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(sieve_primes(2), vec![2]);
        assert!(sieve_primes(1).is_empty());
        assert!(sieve_primes(0).is_empty());
    }

    #[test]
    fn test_primes_in_range() {
        assert_eq!(
            primes_in_range(10, 50),
            vec![11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
        assert_eq!(primes_in_range(13, 13), vec![13]);
        assert!(primes_in_range(24, 28).is_empty());
    }

    #[test]
    fn test_shared_table_covers_request() {
        let table = PrimeTable::shared(500);
        assert!(table.limit() >= 500);
        assert_eq!(table.up_to(10), &[2, 3, 5, 7]);

        let capped = PrimeTable::shared(u64::MAX);
        assert_eq!(capped.limit(), SIEVE_CEILING);
    }

    #[test]
    fn test_random_unique_primes_insufficient() {
        let err = random_unique_primes(10, 50, 100).unwrap_err();
        assert_eq!(
            err,
            RsaError::InsufficientRange {
                lo: 10,
                hi: 50,
                requested: 100,
                available: 11,
            }
        );

        assert!(random_unique_primes(24, 28, 0).is_err());
    }

    #[rstest]
    #[case(10, u64::MAX, 2)]
    #[case(2, 100_000_000_000_000, 2)]
    #[case(0, MAX_SIEVE_LIMIT + 1, 0)]
    fn test_random_unique_primes_range_too_large(#[case] lo: u64, #[case] hi: u64, #[case] count: usize) {
        assert_eq!(
            random_unique_primes(lo, hi, count).unwrap_err(),
            RsaError::RangeTooLarge {
                hi,
                max: MAX_SIEVE_LIMIT,
            }
        );
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_sieve_primes_rejects_huge_limit() {
        sieve_primes(u64::MAX);
    }

    #[test]
    fn test_random_unique_primes_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = random_unique_primes_with_rng(10, 50, 5, &mut rng).unwrap();
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|p| (10..=50).contains(p) && is_prime(&from_u64(*p))));

        // asking for all of them must still terminate
        let all = random_unique_primes_with_rng(10, 50, 11, &mut rng).unwrap();
        assert_eq!(all.into_iter().collect::<Vec<_>>(), primes_in_range(10, 50));
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(&from_u64(4), &from_u64(13), &from_u64(497)), from_u64(445));
        assert_eq!(mod_pow(&from_u64(65), &from_u64(17), &from_u64(3233)), from_u64(2790));
        assert_eq!(mod_pow(&from_u64(5), &from_u64(0), &from_u64(7)), from_u64(1));
        assert_eq!(mod_pow(&from_u64(5), &from_u64(3), &from_u64(1)), from_u64(0));
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&from_u64(48), &from_u64(18)), from_u64(6));
        assert_eq!(gcd(&from_u64(18), &from_u64(48)), from_u64(6));
        assert_eq!(gcd(&from_u64(0), &from_u64(9)), from_u64(9));
        assert!(are_coprime(&from_u64(17), &from_u64(3120)));
        assert!(!are_coprime(&from_u64(15), &from_u64(3120)));
    }

    #[test]
    fn test_extended_gcd() {
        let (g, s, t) = extended_gcd(&from_u64(35), &from_u64(15));
        assert_eq!(g, from_u64(5));
        assert_eq!(BigInt::from(35) * s + BigInt::from(15) * t, BigInt::from(5));
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(7)), Some(from_u64(5)));
        assert_eq!(mod_inverse(&from_u64(17), &from_u64(3120)), Some(from_u64(2753)));
        assert_eq!(mod_inverse(&from_u64(6), &from_u64(9)), None);
        assert_eq!(mod_inverse(&from_u64(6), &from_u64(0)), None);
    }

    #[test]
    fn test_euler_totient() {
        assert_eq!(euler_totient(&from_u64(61), &from_u64(53)), from_u64(3120));
    }

    #[test]
    fn test_coprimes_below() {
        assert_eq!(coprimes_below(10), vec![1, 3, 7, 9]);
        assert_eq!(coprimes_below(7), vec![1, 2, 3, 4, 5, 6]);
        assert!(coprimes_below(1).is_empty());
    }

    #[test]
    fn test_random_coprime() {
        let mut rng = StdRng::seed_from_u64(42);
        let phi = from_u64(3120);
        for _ in 0..20 {
            let k = random_coprime(&phi, &mut rng).unwrap();
            assert!(k > from_u64(1) && k < phi);
            assert!(are_coprime(&k, &phi));
        }

        assert_eq!(random_coprime(&from_u64(2), &mut rng), None);
        assert_eq!(random_coprime(&from_u64(3), &mut rng), Some(from_u64(2)));
    }

    quickcheck! {
        fn prop_extended_gcd_is_bezout(a: u64, b: u64) -> bool {
            let (g, s, t) = extended_gcd(&from_u64(a), &from_u64(b));
            g == gcd(&from_u64(a), &from_u64(b))
                && BigInt::from(a) * s + BigInt::from(b) * t == BigInt::from(g)
        }

        fn prop_mod_pow_matches_num_bigint(base: u64, exp: u32, modulus: u64) -> bool {
            if modulus == 0 { return true; }
            let (base, exp, modulus) = (from_u64(base), from_u64(exp as u64), from_u64(modulus));
            mod_pow(&base, &exp, &modulus) == base.modpow(&exp, &modulus)
        }

        fn prop_is_prime_matches_sieve(n: u16) -> bool {
            let n = n as u64;
            is_prime(&from_u64(n)) == sieve_primes(n).last().map_or(false, |&p| p == n)
        }
    }
}
