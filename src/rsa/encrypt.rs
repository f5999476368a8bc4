// RSA Encryption Implementation
// Textbook RSA applied to each character's code point, no padding

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use super::keygen::{PublicKey, RsaPublicKey};

/// One ciphertext integer per plaintext character, each in [0, n)
pub type Ciphertext = Vec<RsaBigInt>;

/// Encrypt a string for `recipient`, character by character.
///
/// Equal characters encrypt to equal integers. Code points at or above the
/// modulus wrap and will not decrypt back to the same character.
pub fn encrypt_string<K: PublicKey + ?Sized>(plaintext: &str, recipient: &K) -> Ciphertext {
    let n = recipient.public_modulus();
    let e = recipient.public_exponent();

    plaintext
        .chars()
        .map(|c| {
            let m = from_u64(u64::from(c));
            if &m >= n {
                log::warn!("code point {} of {:?} does not fit modulus {}", m, c, n);
            }
            mod_pow(&m, e, n)
        })
        .collect()
}

impl RsaPublicKey {
    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &str) -> Ciphertext {
        encrypt_string(plaintext, self)
    }
}
