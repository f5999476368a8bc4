// Utility Module
// Display helpers around the RSA core

pub mod format;

pub use format::{cipher_width, format_cipher, split_cipher};
