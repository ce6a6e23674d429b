//! # Text Utilities
//!
//! Charset-aware text padding plus the tolerant parsers the decoder relies
//! on. All functions operate on plain slices and perform no I/O.
//!
//! ## Tolerance
//!
//! DBF numeric fields are ASCII text padded with spaces (sometimes NULs) and
//! occasionally carry `?` placeholders or plain garbage. `parse_ascii_decimal`
//! treats every unusable shape as "no value" rather than an error: a blank
//! Numeric field is an empty cell, not a corrupt file.

use bigdecimal::BigDecimal;
use encoding_rs::Encoding;
use std::str::FromStr;

/// Horizontal alignment for [`text_padding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Encodes `text` with `charset` and fits it into exactly `length` bytes,
/// padding with `fill`. Input that encodes wider than `length` is truncated
/// character-wise from the end until it fits.
pub fn text_padding(
    text: &str,
    charset: &'static Encoding,
    length: usize,
    alignment: Alignment,
    fill: u8,
) -> Vec<u8> {
    let mut chars: Vec<char> = text.chars().collect();
    let mut encoded = charset.encode(text).0.into_owned();
    while encoded.len() > length && !chars.is_empty() {
        chars.pop();
        let shorter: String = chars.iter().collect();
        encoded = charset.encode(&shorter).0.into_owned();
    }

    let mut padded = vec![fill; length];
    match alignment {
        Alignment::Left => padded[..encoded.len()].copy_from_slice(&encoded),
        Alignment::Right => padded[length - encoded.len()..].copy_from_slice(&encoded),
    }
    padded
}

/// Strips trailing 0x20 bytes.
pub fn trim_right_spaces(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}

/// Parses ASCII fixed-point text into a decimal.
///
/// Tolerant by contract: blank content, NUL padding, `?` placeholders, and
/// non-numeric garbage all yield `None`, never an error.
pub fn parse_ascii_decimal(bytes: &[u8]) -> Option<BigDecimal> {
    let trimmed: &[u8] = {
        let start = bytes.iter().position(|&b| b != b' ' && b != 0)?;
        let end = bytes.iter().rposition(|&b| b != b' ' && b != 0)? + 1;
        &bytes[start..end]
    };
    if trimmed.contains(&b'?') {
        return None;
    }
    let text = std::str::from_utf8(trimmed).ok()?;
    BigDecimal::from_str(text).ok()
}
