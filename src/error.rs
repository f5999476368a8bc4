// Error types shared by the RSA core and the input boundary

use num_bigint::{BigInt, BigUint};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    #[error("{0} is not a prime number")]
    InvalidPrime(BigInt),

    #[error("e = {e} must be coprime to {phi} and lie strictly between 1 and {phi}")]
    InvalidExponent { e: BigInt, phi: BigUint },

    #[error("requested {requested} primes but only {available} exist between {lo} and {hi}")]
    InsufficientRange {
        lo: u64,
        hi: u64,
        requested: usize,
        available: usize,
    },

    #[error("no exponent in (1, {0}) is coprime to {0}")]
    NoExponent(BigUint),

    #[error("cannot sieve primes up to {hi}: the limit is {max}")]
    RangeTooLarge { hi: u64, max: u64 },

    #[error("`{input}` is not a valid integer for {field}")]
    NonNumericInput { field: String, input: String },

    #[error("decrypted value {0} is not a valid character code point")]
    InvalidCodePoint(BigUint),

    #[error("malformed cipher text: {0}")]
    MalformedCipherText(String),
}

pub type Result<T> = std::result::Result<T, RsaError>;
