// RSA Signatures
// Hash-then-sign with SHA-256, the digest reduced modulo the signer's n

use sha2::{Digest, Sha256};

use super::bigint::{from_bytes, mod_pow, RsaBigInt};
use super::keygen::{KeyPair, PublicKey, RsaPublicKey};

/// SHA-256 of the UTF-8 bytes of `message`, read big-endian and reduced mod `n`
pub fn message_digest(message: &str, n: &RsaBigInt) -> RsaBigInt {
    let hash = Sha256::digest(message.as_bytes());
    log::debug!("sha256({:?}) = {}", message, hex::encode(hash));
    from_bytes(&hash) % n
}

/// Sign `message` with the signer's private exponent
pub fn sign(message: &str, signer: &KeyPair) -> RsaBigInt {
    let h = message_digest(message, signer.n());
    mod_pow(&h, signer.d(), signer.n())
}

/// Check `signature` against `message` using the signer's public half.
///
/// A mismatch is reported as `false`, never as an error.
pub fn verify<K: PublicKey + ?Sized>(message: &str, signature: &RsaBigInt, signer: &K) -> bool {
    let n = signer.public_modulus();
    let expected = message_digest(message, n);
    mod_pow(signature, signer.public_exponent(), n) == expected
}

impl KeyPair {
    /// Sign a message using the private key
    pub fn sign(&self, message: &str) -> RsaBigInt {
        sign(message, self)
    }
}

impl RsaPublicKey {
    /// Verify a signature made by the owner of this public key
    pub fn verify(&self, message: &str, signature: &RsaBigInt) -> bool {
        verify(message, signature, self)
    }
}
