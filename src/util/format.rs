// Ciphertext Formatting
// Fixed-width decimal rendering of a ciphertext for display

use std::str::FromStr;

use crate::error::{Result, RsaError};
use crate::rsa::bigint::RsaBigInt;

/// Decimal digit count of the widest value, 0 for an empty slice
pub fn cipher_width(values: &[RsaBigInt]) -> usize {
    values
        .iter()
        .map(|v| v.to_str_radix(10).len())
        .max()
        .unwrap_or(0)
}

/// Zero-pad every value to the widest one and concatenate.
///
/// Display only: the result can be split again only by someone who also
/// knows the width (see `split_cipher`).
pub fn format_cipher(values: &[RsaBigInt]) -> String {
    let width = cipher_width(values);
    values
        .iter()
        .map(|v| format!("{:0>width$}", v.to_str_radix(10), width = width))
        .collect()
}

/// Inverse of `format_cipher` for a known field width
pub fn split_cipher(text: &str, width: usize) -> Result<Vec<RsaBigInt>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if width == 0 {
        return Err(RsaError::MalformedCipherText("field width must be positive".to_string()));
    }
    if !text.is_ascii() || text.len() % width != 0 {
        return Err(RsaError::MalformedCipherText(format!(
            "length {} is not a multiple of width {}",
            text.len(),
            width
        )));
    }

    text.as_bytes()
        .chunks(width)
        .map(|chunk| {
            let field = std::str::from_utf8(chunk).unwrap_or_default();
            if !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RsaError::MalformedCipherText(format!("`{}` is not decimal", field)));
            }
            RsaBigInt::from_str(field)
                .map_err(|e| RsaError::MalformedCipherText(format!("`{}`: {}", field, e)))
        })
        .collect()
}
