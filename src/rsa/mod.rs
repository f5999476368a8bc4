// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;
pub mod sign;
pub mod scheme;

pub use keygen::{KeyPair, PublicKey, RsaPublicKey};
pub use encrypt::{encrypt_string, Ciphertext};
pub use decrypt::decrypt_to_string;
pub use sign::{message_digest, sign, verify};
pub use scheme::{letters_to_digits, CharwiseScheme, LetterScheme, MessageScheme};
