// RSA Decryption Implementation
// Inverts the character-wise encryption with the private exponent

use num_traits::ToPrimitive;

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::KeyPair;
use crate::error::{Result, RsaError};

/// Decrypt a character-wise ciphertext back into a string
///
/// Fails with `InvalidCodePoint` when a recovered value is not a Unicode
/// scalar value, which is what a mismatched key usually produces.
pub fn decrypt_to_string(ciphertext: &[RsaBigInt], private_key: &KeyPair) -> Result<String> {
    ciphertext
        .iter()
        .map(|c| {
            let m = mod_pow(c, private_key.d(), private_key.n());
            m.to_u32()
                .and_then(char::from_u32)
                .ok_or(RsaError::InvalidCodePoint(m))
        })
        .collect()
}

impl KeyPair {
    /// Decrypt a ciphertext addressed to this key
    pub fn decrypt(&self, ciphertext: &[RsaBigInt]) -> Result<String> {
        decrypt_to_string(ciphertext, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::{from_u64, primes_in_range};
    use crate::rsa::encrypt::encrypt_string;
    use quickcheck::quickcheck;

    fn textbook_key() -> KeyPair {
        KeyPair::new(from_u64(61), from_u64(53), from_u64(17)).unwrap()
    }

    #[test]
    fn test_decrypt_textbook_vector() {
        let key = textbook_key();
        assert_eq!(key.decrypt(&[from_u64(2790)]).unwrap(), "A");
    }

    #[test]
    fn test_roundtrip_various_messages() {
        let key = textbook_key();
        for message in ["", "A", "Hello, World!", "aaaa", "tab\tand\nnewline"] {
            let ciphertext = encrypt_string(message, &key);
            assert_eq!(decrypt_to_string(&ciphertext, &key).unwrap(), message);
        }
    }

    #[test]
    fn test_roundtrip_needs_large_modulus_for_unicode() {
        // n = 1009 * 1013 exceeds every code point used here
        let key = KeyPair::new(from_u64(1009), from_u64(1013), from_u64(5)).unwrap();
        let message = "héllo ✓ Ω";
        assert_eq!(key.decrypt(&encrypt_string(message, &key)).unwrap(), message);
    }

    #[test]
    fn test_decrypt_out_of_range() {
        // 0xD800 is a surrogate, not a char
        let key = KeyPair::new(from_u64(1009), from_u64(1013), from_u64(5)).unwrap();
        let ciphertext = vec![mod_pow(&from_u64(0xD800), key.e(), key.n())];
        assert_eq!(
            key.decrypt(&ciphertext).unwrap_err(),
            RsaError::InvalidCodePoint(from_u64(0xD800))
        );
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let sender = KeyPair::new(from_u64(1009), from_u64(1013), from_u64(5)).unwrap();
        let other = textbook_key();

        let ciphertext = encrypt_string("Test", &sender);
        let result = other.decrypt(&ciphertext);
        assert_ne!(result, Ok("Test".to_string()));
    }

    quickcheck! {
        fn prop_single_key_roundtrip(i: u8, j: u8, message: String) -> bool {
            // primes above 1200 give n > 0x10FFFF, so every char fits
            let primes = primes_in_range(1200, 2000);
            let p = primes[i as usize % primes.len()];
            let q = primes[j as usize % primes.len()];
            if p == q { return true; }

            let key = match KeyPair::new(from_u64(p), from_u64(q), from_u64(65537)) {
                Ok(key) => key,
                Err(_) => return true,
            };
            key.decrypt(&encrypt_string(&message, &key)).as_deref() == Ok(message.as_str())
        }
    }
}
