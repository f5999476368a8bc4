// Form Input
// Decimal text for two computers' (p, q, e), parsed and validated into key pairs

use anyhow::Context;
use num_bigint::{BigInt, BigUint, Sign};

use crate::error::{Result, RsaError};
use crate::rsa::bigint::is_prime;
use crate::rsa::KeyPair;

/// Parse one decimal field, rejecting anything that is not an integer
pub fn parse_integer(field: &str, text: &str) -> Result<BigInt> {
    text.trim()
        .parse::<BigInt>()
        .map_err(|_| RsaError::NonNumericInput {
            field: field.to_string(),
            input: text.to_string(),
        })
}

fn natural(value: &BigInt) -> Option<BigUint> {
    match value.sign() {
        Sign::Minus => None,
        _ => Some(value.magnitude().clone()),
    }
}

/// Raw text of one computer's p, q and e entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyForm {
    pub p: String,
    pub q: String,
    pub e: String,
}

/// Parsed, not yet validated, p, q and e
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValues {
    pub p: BigInt,
    pub q: BigInt,
    pub e: BigInt,
}

impl KeyForm {
    pub fn new(p: impl Into<String>, q: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            p: p.into(),
            q: q.into(),
            e: e.into(),
        }
    }

    /// Parse all three fields; `suffix` distinguishes the second computer ("p2")
    pub fn parse(&self, suffix: &str) -> Result<KeyValues> {
        Ok(KeyValues {
            p: parse_integer(&format!("p{}", suffix), &self.p)?,
            q: parse_integer(&format!("q{}", suffix), &self.q)?,
            e: parse_integer(&format!("e{}", suffix), &self.e)?,
        })
    }
}

impl KeyValues {
    /// Validate and derive the key. Negative values never qualify.
    pub fn build(&self) -> Result<KeyPair> {
        let p = natural(&self.p).ok_or_else(|| RsaError::InvalidPrime(self.p.clone()))?;
        let q = natural(&self.q).ok_or_else(|| RsaError::InvalidPrime(self.q.clone()))?;
        let e = natural(&self.e).unwrap_or_default();

        KeyPair::new(p, q, e).map_err(|err| match err {
            RsaError::InvalidExponent { phi, .. } => RsaError::InvalidExponent {
                e: self.e.clone(),
                phi,
            },
            other => other,
        })
    }
}

/// Both computers' entries, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeForm {
    pub one: KeyForm,
    pub two: KeyForm,
}

impl ExchangeForm {
    pub fn new(one: KeyForm, two: KeyForm) -> Self {
        Self { one, two }
    }

    /// Parse all six integers, then check p, p2, q, q2 for primality and
    /// finally build both keys. Nothing is built if any step fails.
    pub fn validate(&self) -> anyhow::Result<(KeyPair, KeyPair)> {
        let one = self.one.parse("")?;
        let two = self.two.parse("2")?;

        for (field, value) in [("p", &one.p), ("p2", &two.p), ("q", &one.q), ("q2", &two.q)] {
            let prime = natural(value).map_or(false, |v| is_prime(&v));
            if !prime {
                return Err(RsaError::InvalidPrime(value.clone()))
                    .with_context(|| format!("{} must be prime", field));
            }
        }

        let computer_one = one.build().context("e must be coprime to the first totient")?;
        let computer_two = two.build().context("e2 must be coprime to the second totient")?;
        Ok((computer_one, computer_two))
    }
}
