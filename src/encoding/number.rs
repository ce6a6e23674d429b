//! # Fixed-Point Number Formatting
//!
//! Renders decimal values as the ASCII fixed-point text stored in Numeric
//! and FloatingPoint fields: right-aligned, space-padded to the field width,
//! with exactly `decimal_count` fraction digits.
//!
//! ## Formatting Rules
//!
//! - Rounding to `decimal_count` digits is half-even.
//! - Values below 1 in magnitude drop the integer part's leading zero
//!   (`0.50` is written `.50`, `-0.25` is written `-.25`), matching the
//!   historical formatter whose integer digits were optional.
//! - Text wider than the field is truncated from the end by the shared
//!   padding routine.

use std::io::Read;

use bigdecimal::{BigDecimal, RoundingMode};
use encoding_rs::WINDOWS_1252;
use eyre::{Result, WrapErr};

use super::text::{text_padding, Alignment};

/// Reads a little-endian signed 32-bit integer from the cursor.
pub fn read_i32_le<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .wrap_err("unexpected end of data")?;
    Ok(i32::from_le_bytes(buf))
}

/// Formats `value` as fixed-point ASCII sized to `length` bytes with
/// `decimal_count` fraction digits.
pub fn format_fixed_point(value: &BigDecimal, length: usize, decimal_count: usize) -> Vec<u8> {
    let rounded = value.with_scale_round(decimal_count as i64, RoundingMode::HalfEven);
    let mut text = rounded.to_string();
    if decimal_count > 0 {
        if let Some(rest) = text.strip_prefix("0.") {
            text = format!(".{rest}");
        } else if let Some(rest) = text.strip_prefix("-0.") {
            text = format!("-.{rest}");
        }
    }
    text_padding(&text, WINDOWS_1252, length, Alignment::Right, b' ')
}
