//! # Table Header
//!
//! This module parses the DBF file prologue and field descriptor table into
//! a `TableHeader`, the metadata every other component works from: the
//! record cursor sizes its reads with it, the offset calculator turns
//! (row, field) pairs into absolute byte positions with it, and the patcher
//! validates arguments against it.
//!
//! ## Prologue Layout
//!
//! ```text
//! Offset  Size  Description
//! 0       1     Version/signature byte
//! 1       3     Last modification date (YY MM DD, year since 1900)
//! 4       4     Record count (u32 LE)
//! 8       2     Header length in bytes (u16 LE)
//! 10      2     Record length in bytes (u16 LE)
//! 12      2     Reserved
//! 14      1     Incomplete transaction flag
//! 15      1     Encryption flag
//! 16      12    Multi-user environment bytes
//! 28      1     Production MDX flag
//! 29      1     Language driver (code page) byte
//! 30      2     Reserved
//! ```
//!
//! The prologue is followed by one 32-byte descriptor per column, a 0x0D
//! terminator, and (in Visual FoxPro files) backlink bytes the header
//! length accounts for. Record data starts at `header length`; each record
//! is a delete-flag byte followed by the fields at their declared widths.
//!
//! ## Record Width Invariant
//!
//! `1 + sum(field lengths) == record length` is enforced at parse time.
//! Both the deleted-row skip and the field offset calculator do pure width
//! arithmetic, so a table violating this invariant would silently shear
//! every subsequent record.

use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use encoding_rs::Encoding;
use eyre::{ensure, Result, WrapErr};
use hashbrown::HashMap;
use tracing::debug;
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::charset;
use crate::config::{FIELD_DESCRIPTOR_SIZE, HEADER_TERMINATOR, PROLOGUE_SIZE};
use crate::field::FieldDescriptor;
use crate::types::FieldType;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct TablePrologue {
    pub(crate) signature: u8,
    pub(crate) modified: [u8; 3],
    pub(crate) record_count: U32,
    pub(crate) header_length: U16,
    pub(crate) record_length: U16,
    pub(crate) reserved: [u8; 2],
    pub(crate) incomplete_transaction: u8,
    pub(crate) encryption_flag: u8,
    pub(crate) multi_user: [u8; 12],
    pub(crate) mdx_flag: u8,
    pub(crate) language_driver: u8,
    pub(crate) reserved_tail: [u8; 2],
}

const _: () = assert!(std::mem::size_of::<TablePrologue>() == PROLOGUE_SIZE);

/// Parsed table metadata: prologue values, field descriptors, and the
/// resolved charset.
#[derive(Debug, Clone)]
pub struct TableHeader {
    signature: u8,
    last_modified: Option<NaiveDate>,
    record_count: u32,
    header_length: u16,
    record_length: u16,
    language_driver: u8,
    charset: &'static Encoding,
    fields: Vec<FieldDescriptor>,
    visible_indices: Vec<usize>,
    name_map: Arc<HashMap<String, usize>>,
}

impl TableHeader {
    /// Reads the prologue and the field descriptor table up to its 0x0D
    /// terminator. Consumes exactly `32 + 32 * field count + 1` bytes; the
    /// caller is responsible for skipping any remaining header bytes.
    pub(crate) fn read<R: Read>(
        reader: &mut R,
        charset_override: Option<&'static Encoding>,
    ) -> Result<TableHeader> {
        let mut buf = [0u8; PROLOGUE_SIZE];
        reader
            .read_exact(&mut buf)
            .wrap_err("failed to read table prologue")?;
        let prologue = TablePrologue::read_from_bytes(&buf)
            .map_err(|e| eyre::eyre!("failed to parse table prologue: {:?}", e))?;

        let header_length = prologue.header_length.get();
        let record_length = prologue.record_length.get();
        ensure!(
            header_length as usize > PROLOGUE_SIZE,
            "header length {} leaves no room for field descriptors",
            header_length
        );
        ensure!(record_length > 0, "record length must be positive");

        let resolved = charset_override
            .or_else(|| charset::from_language_driver(prologue.language_driver))
            .unwrap_or(charset::DEFAULT_CHARSET);

        let mut fields = Vec::new();
        loop {
            let mut first = [0u8; 1];
            reader
                .read_exact(&mut first)
                .wrap_err("unexpected end of file inside field descriptor table")?;
            if first[0] == HEADER_TERMINATOR {
                break;
            }
            let mut block = [0u8; FIELD_DESCRIPTOR_SIZE];
            block[0] = first[0];
            reader
                .read_exact(&mut block[1..])
                .wrap_err("unexpected end of file inside field descriptor table")?;
            fields.push(FieldDescriptor::from_bytes(&block, resolved)?);
        }
        ensure!(!fields.is_empty(), "table declares no fields");

        let fields_width: usize = fields.iter().map(|f| f.length()).sum();
        ensure!(
            fields_width + 1 == record_length as usize,
            "field widths sum to {} but record length is {}",
            fields_width + 1,
            record_length
        );

        let visible_indices: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_system() && f.field_type() != FieldType::NullFlags)
            .map(|(idx, _)| idx)
            .collect();

        let mut name_map = HashMap::with_capacity(visible_indices.len());
        for (position, &idx) in visible_indices.iter().enumerate() {
            name_map.insert(fields[idx].name().to_ascii_lowercase(), position);
        }

        let [year, month, day] = prologue.modified;
        let last_modified =
            NaiveDate::from_ymd_opt(1900 + year as i32, month as u32, day as u32);

        debug!(
            fields = fields.len(),
            records = prologue.record_count.get(),
            record_length,
            charset = resolved.name(),
            "parsed table header"
        );

        Ok(TableHeader {
            signature: prologue.signature,
            last_modified,
            record_count: prologue.record_count.get(),
            header_length,
            record_length,
            language_driver: prologue.language_driver,
            charset: resolved,
            fields,
            visible_indices,
            name_map: Arc::new(name_map),
        })
    }

    /// File version/signature byte.
    pub fn signature(&self) -> u8 {
        self.signature
    }

    /// Last modification date recorded in the prologue, when it parses as
    /// a calendar date.
    pub fn last_modified(&self) -> Option<NaiveDate> {
        self.last_modified
    }

    /// Number of records in the table, deleted rows included.
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Fixed byte width of one record, delete-flag byte included.
    pub fn record_width(&self) -> usize {
        self.record_length as usize
    }

    /// Total header size in bytes; record data starts here.
    pub fn header_width(&self) -> usize {
        self.header_length as usize
    }

    /// Absolute file offset of the first record's delete-flag byte.
    pub fn record_data_start_offset(&self) -> u64 {
        self.header_length as u64
    }

    pub fn language_driver(&self) -> u8 {
        self.language_driver
    }

    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    /// All field descriptors in table order, system and null-flag columns
    /// included.
    pub fn field_descriptors(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptors of the fields that surface in decoded records.
    pub fn visible_field_descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.visible_indices.iter().map(|&idx| &self.fields[idx])
    }

    /// Number of visible fields.
    pub fn visible_field_count(&self) -> usize {
        self.visible_indices.len()
    }

    /// Visible field descriptor by position, as a record's values are
    /// ordered.
    pub fn visible_field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.visible_indices
            .get(index)
            .map(|&idx| &self.fields[idx])
    }

    /// Case-insensitive descriptor lookup over all fields.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub(crate) fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    pub(crate) fn name_map(&self) -> Arc<HashMap<String, usize>> {
        Arc::clone(&self.name_map)
    }

    /// Computes the absolute byte offset of `field_name` within row
    /// `row_index` from width arithmetic alone.
    ///
    /// The offset points at the first byte of the field's value: header
    /// width, plus whole records before the row, plus the row's delete-flag
    /// byte, plus the widths of every preceding field. A `row_index`
    /// outside `[0, record_count)` is an error; an unknown name is
    /// `Ok(None)` so probing callers can tell the two apart.
    pub fn field_offset(&self, row_index: u32, field_name: &str) -> Result<Option<u64>> {
        ensure!(
            row_index < self.record_count,
            "row index {} out of range (table has {} records)",
            row_index,
            self.record_count
        );

        let mut preceding = 0u64;
        for field in &self.fields {
            if field.name().eq_ignore_ascii_case(field_name) {
                let row_base =
                    self.header_length as u64 + row_index as u64 * self.record_length as u64;
                return Ok(Some(row_base + 1 + preceding));
            }
            preceding += field.length() as u64;
        }
        Ok(None)
    }
}
