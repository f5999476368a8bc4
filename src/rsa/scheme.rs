// Message Schemes
// How a string is turned into RSA integers and back, kept apart from key derivation

use num_traits::ToPrimitive;

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use super::decrypt::decrypt_to_string;
use super::encrypt::{encrypt_string, Ciphertext};
use super::keygen::{KeyPair, PublicKey};
use crate::error::{Result, RsaError};

/// Maps messages onto RSA integers for a recipient and back again.
pub trait MessageScheme {
    fn encrypt(&self, plaintext: &str, recipient: &dyn PublicKey) -> Ciphertext;

    fn decrypt(&self, ciphertext: &[RsaBigInt], private_key: &KeyPair) -> Result<String>;
}

/// One RSA block per character code point, no padding and no chaining.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharwiseScheme;

impl MessageScheme for CharwiseScheme {
    fn encrypt(&self, plaintext: &str, recipient: &dyn PublicKey) -> Ciphertext {
        encrypt_string(plaintext, recipient)
    }

    fn decrypt(&self, ciphertext: &[RsaBigInt], private_key: &KeyPair) -> Result<String> {
        decrypt_to_string(ciphertext, private_key)
    }
}

/// Alphabet position of an ASCII letter, case-folded: A = 1 ... Z = 26
pub fn letter_number(letter: char) -> Option<u8> {
    letter
        .is_ascii_alphabetic()
        .then(|| letter.to_ascii_lowercase() as u8 - b'a' + 1)
}

/// Two digits per letter, zero-filled ("Abz" -> "010226"). `None` if the
/// message holds anything but ASCII letters.
pub fn letters_to_digits(message: &str) -> Option<String> {
    message
        .chars()
        .map(|c| letter_number(c).map(|k| format!("{:02}", k)))
        .collect()
}

/// One RSA block per letter, valued by alphabet position.
///
/// Lossy: case is folded and anything that is not an ASCII letter is
/// dropped. The modulus must exceed 26.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterScheme;

impl MessageScheme for LetterScheme {
    fn encrypt(&self, plaintext: &str, recipient: &dyn PublicKey) -> Ciphertext {
        plaintext
            .chars()
            .filter_map(|c| {
                let k = letter_number(c);
                if k.is_none() {
                    log::warn!("dropping {:?}: not an ASCII letter", c);
                }
                k
            })
            .map(|k| {
                mod_pow(
                    &from_u64(k.into()),
                    recipient.public_exponent(),
                    recipient.public_modulus(),
                )
            })
            .collect()
    }

    fn decrypt(&self, ciphertext: &[RsaBigInt], private_key: &KeyPair) -> Result<String> {
        ciphertext
            .iter()
            .map(|c| {
                let m = mod_pow(c, private_key.d(), private_key.n());
                m.to_u8()
                    .filter(|k| (1..=26).contains(k))
                    .map(|k| char::from(b'a' + k - 1))
                    .ok_or(RsaError::InvalidCodePoint(m))
            })
            .collect()
    }
}
