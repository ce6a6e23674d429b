//! # Encoding Module
//!
//! This module provides the byte-level utilities shared by the record
//! decoder and the random-access patcher:
//!
//! - **Text encoding**: charset-aware padding with alignment, trailing-space
//!   trimming, and tolerant ASCII decimal parsing
//! - **Number codecs**: fixed-point ASCII rendering sized to a field's
//!   declared width and decimal count, and little-endian integer reads

pub mod number;
pub mod text;

pub use number::{format_fixed_point, read_i32_le};
pub use text::{parse_ascii_decimal, text_padding, trim_right_spaces, Alignment};
