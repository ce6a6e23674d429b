//! # xbase - dBase/FoxPro Table Codec
//!
//! xbase is an embedded codec library for DBF tables, the fixed-layout
//! tabular format of the dBase/FoxPro (xBase) family. It decodes records
//! into typed values and patches individual field values in place without
//! rewriting the file.
//!
//! ## Quick Start
//!
//! ```ignore
//! use xbase::{TableReader, TablePatcher, FieldValue};
//!
//! let mut reader = TableReader::open("contacts.dbf")?;
//! while let Some(row) = reader.next_row()? {
//!     println!("{:?}", row.get_string("NAME"));
//! }
//!
//! let patcher = TablePatcher::open("contacts.dbf")?;
//! patcher.patch_field(1, "NAME", &FieldValue::Character("Bob".into()))?;
//! ```
//!
//! ## File Layout
//!
//! ```text
//! +--------------------------+
//! | Prologue (32 bytes)      |  record count, widths, language driver
//! +--------------------------+
//! | Field descriptors (32 B) |  one per column
//! | ...                      |
//! | 0x0D terminator          |
//! +--------------------------+
//! | Record 0                 |  delete-flag byte + fields at fixed widths
//! | Record 1                 |
//! | ...                      |
//! | 0x1A end-of-data marker  |
//! +--------------------------+
//! ```
//!
//! Memo-class fields store a block number into a separate `.fpt`/`.dbt`
//! file; attach it with [`TableReader::attach_memo`].
//!
//! ## Architecture
//!
//! - [`header`]: prologue/descriptor parsing and the field offset calculator
//! - [`reader`]: forward-only record cursor and per-type value decoder
//! - [`patch`]: in-place single-field encoder and writer
//! - [`memo`]: block-addressed memo store (in-memory or memory-mapped)
//! - [`types`]: field type registry and runtime values
//! - [`encoding`]: padding, trimming, and fixed-point text utilities
//!
//! ## Concurrency
//!
//! Everything is synchronous, blocking I/O. A reader owns forward-only
//! state over one stream; a patcher opens its own handle per call and
//! performs no locking. Callers serialize concurrent access.

pub mod charset;
pub mod config;
pub mod encoding;
pub mod field;
pub mod header;
pub mod memo;
pub mod patch;
pub mod reader;
pub mod record;
pub mod types;

pub use field::FieldDescriptor;
pub use header::TableHeader;
pub use memo::{MemoFile, MemoPayload};
pub use patch::TablePatcher;
pub use reader::{TableOptions, TableReader};
pub use record::{NullBitmap, Record, Row};
pub use types::{FieldType, FieldValue};
