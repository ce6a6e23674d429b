//! # Format Constants
//!
//! This module centralizes the DBF format constants, grouping interdependent
//! values together and documenting their relationships.
//!
//! ## Dependency Graph
//!
//! ```text
//! PROLOGUE_SIZE (32 bytes)
//!       │
//!       └─> header_width = PROLOGUE_SIZE + n * FIELD_DESCRIPTOR_SIZE
//!                          + 1 (HEADER_TERMINATOR) + optional trailing bytes
//!           The header parser skips from the end of the descriptor table to
//!           header_width before the first record.
//!
//! FIELD_DESCRIPTOR_SIZE (32 bytes)
//!       │
//!       └─> One block per column, terminated by HEADER_TERMINATOR (0x0D)
//!
//! record width
//!       │
//!       └─> 1 (delete-flag byte) + sum of all field lengths
//!           Enforced at header parse; the offset calculator and the
//!           deleted-row skip both rely on it.
//!
//! JULIAN_EPOCH_MILLIS / MILLIS_PER_DAY
//!       │
//!       └─> timestamp fields store (julian day, millisecond of day);
//!           day * MILLIS_PER_DAY + JULIAN_EPOCH_MILLIS is the Unix
//!           wall-clock millisecond value
//! ```
//!
//! ## Usage
//!
//! Import constants from this module rather than defining them locally:
//!
//! ```ignore
//! use crate::config::{END_OF_DATA, RECORD_DELETED};
//! ```

/// Marker byte that terminates the record stream.
pub const END_OF_DATA: u8 = 0x1A;

/// Lead byte of a record flagged as deleted.
pub const RECORD_DELETED: u8 = b'*';

/// Lead byte of a live record.
pub const RECORD_PRESENT: u8 = b' ';

/// Byte that terminates the field descriptor table inside the header.
pub const HEADER_TERMINATOR: u8 = 0x0D;

/// Size of the fixed table prologue at the start of every DBF file.
pub const PROLOGUE_SIZE: usize = 32;

/// Size of one on-disk field descriptor block.
pub const FIELD_DESCRIPTOR_SIZE: usize = 32;

/// Milliseconds in one day, the granularity of the timestamp day count.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Unix-epoch millisecond value of Julian day zero (4713-01-01 BC).
///
/// `JULIAN_EPOCH_MILLIS + day * MILLIS_PER_DAY` is midnight of that Julian
/// day as a wall-clock millisecond count.
pub const JULIAN_EPOCH_MILLIS: i64 = -210_866_803_200_000;

/// Field descriptor flag bit: system (hidden) column.
pub const FIELD_FLAG_SYSTEM: u8 = 0x01;

/// Field descriptor flag bit: column may store NULL via the null-flag bitmap.
pub const FIELD_FLAG_NULLABLE: u8 = 0x02;

/// Block size of dBase III/IV `.dbt` memo files.
pub const DBT_BLOCK_SIZE: usize = 512;

/// Size of the `.fpt` memo file header carrying the block size.
pub const FPT_HEADER_SIZE: usize = 512;

/// Memo files below this size are loaded fully into memory; larger files
/// are memory-mapped and read lazily.
pub const MEMO_IN_MEMORY_THRESHOLD: u64 = 8 * 1024 * 1024;
