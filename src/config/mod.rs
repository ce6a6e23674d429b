//! # Configuration Module
//!
//! This module centralizes the on-disk format constants for xbase. Constants
//! are grouped by functional area and interdependencies are documented next
//! to the values they constrain.
//!
//! ## Why Centralization?
//!
//! The DBF format is a web of marker bytes and fixed sizes (end-of-data and
//! deleted-row markers, 32-byte layouts, epoch offsets). Keeping them in one
//! place makes the relationships visible: the record width invariant in the
//! header parser, the prologue/descriptor sizes checked against the zerocopy
//! structs, the Julian epoch shared by decode and tests.
//!
//! ## Module Organization
//!
//! - [`constants`]: All format constants with dependency documentation

pub mod constants;
pub use constants::*;
