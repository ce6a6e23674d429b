//! # Language Driver Charsets
//!
//! DBF files carry a one-byte "language driver" identifier in the table
//! prologue naming the code page field text was written in. This module maps
//! that byte to an [`encoding_rs`] encoding.
//!
//! Drivers naming DOS OEM code pages this crate does not ship tables for
//! map to `None`; callers fall back to [`DEFAULT_CHARSET`]. The default is
//! windows-1252, the WHATWG superset of ISO-8859-1, which is also what the
//! historical readers of this format defaulted to.
//!
//! Charset is always per-table state: the header resolves it once at parse
//! time and every decode/encode call receives it explicitly.

use encoding_rs::Encoding;

/// Fallback charset for unknown or absent language drivers.
pub static DEFAULT_CHARSET: &Encoding = encoding_rs::WINDOWS_1252;

/// Decodes `bytes` with `charset`, replacing malformed sequences.
pub fn decode(bytes: &[u8], charset: &'static Encoding) -> String {
    charset.decode(bytes).0.into_owned()
}

/// Resolves a language driver byte to its encoding, or `None` when the
/// driver is unknown or names a code page without a supported encoding.
pub fn from_language_driver(code: u8) -> Option<&'static Encoding> {
    match code {
        0x03 | 0x57 => Some(encoding_rs::WINDOWS_1252),
        0x65 => Some(encoding_rs::IBM866),
        0x78 => Some(encoding_rs::BIG5),
        0x79 => Some(encoding_rs::EUC_KR),
        0x7A => Some(encoding_rs::GBK),
        0x7B => Some(encoding_rs::SHIFT_JIS),
        0x7C => Some(encoding_rs::WINDOWS_874),
        0x7D => Some(encoding_rs::WINDOWS_1255),
        0x7E => Some(encoding_rs::WINDOWS_1256),
        0xC8 => Some(encoding_rs::WINDOWS_1250),
        0xC9 => Some(encoding_rs::WINDOWS_1251),
        0xCA => Some(encoding_rs::WINDOWS_1254),
        0xCB => Some(encoding_rs::WINDOWS_1253),
        0xCC => Some(encoding_rs::WINDOWS_1257),
        _ => None,
    }
}
