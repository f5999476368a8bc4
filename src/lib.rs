// Textbook RSA
// Number theory, key derivation, character-wise encryption and hash-then-sign

pub mod error;
pub mod rsa;
pub mod ui;
pub mod util;

pub use error::{Result, RsaError};
