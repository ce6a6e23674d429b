//! # Random-Access Field Patcher
//!
//! This module provides `TablePatcher`, the in-place single-field writer.
//! A patch resolves the target field's absolute byte offset from header
//! metadata alone (no index structure exists to consult), encodes the new
//! value in the field's on-disk representation, and overwrites exactly the
//! field's bytes. Surrounding bytes, record count, and layout never change.
//!
//! ## Patchable Types
//!
//! Only the ASCII-encoded types can be rewritten in place: Character,
//! Date, Numeric, FloatingPoint, and Logical. Every other type is an
//! unsupported-type error before any I/O happens.
//!
//! ## File Handling
//!
//! Each patch opens its own read+write handle, seeks, writes, and releases
//! the handle on every exit path. I/O failures propagate to the caller —
//! a patch either wrote the bytes or returned an error, never a silent
//! no-op. No locking is performed; concurrent patches, or a patch racing a
//! reader on the same file, must be serialized by the caller.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use chrono::Datelike;
use encoding_rs::Encoding;
use eyre::{bail, Result, WrapErr};
use tracing::debug;

use crate::encoding::{format_fixed_point, text_padding, Alignment};
use crate::field::FieldDescriptor;
use crate::header::TableHeader;
use crate::types::{FieldType, FieldValue};

/// In-place field writer for one table file.
pub struct TablePatcher {
    path: PathBuf,
    header: TableHeader,
}

impl TablePatcher {
    /// Opens a table file and parses its header for offset arithmetic.
    pub fn open(path: impl AsRef<Path>) -> Result<TablePatcher> {
        Self::open_with_charset(path, None)
    }

    /// Opens a table file with a charset override for Character encoding.
    pub fn open_with_charset(
        path: impl AsRef<Path>,
        charset: Option<&'static Encoding>,
    ) -> Result<TablePatcher> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("cannot open table file {}", path.display()))?;
        let header = TableHeader::read(&mut std::io::BufReader::new(file), charset)?;
        Ok(TablePatcher {
            path: path.to_path_buf(),
            header,
        })
    }

    pub(crate) fn from_header(path: PathBuf, header: TableHeader) -> TablePatcher {
        TablePatcher { path, header }
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Absolute byte offset of `field_name` in row `row_index`; see
    /// [`TableHeader::field_offset`].
    pub fn field_offset(&self, row_index: u32, field_name: &str) -> Result<Option<u64>> {
        self.header.field_offset(row_index, field_name)
    }

    /// Overwrites one field of one row in place.
    ///
    /// Arguments are validated before any I/O: the field must exist, the
    /// row must be in range, and the field's type must be patchable.
    pub fn patch_field(
        &self,
        row_index: u32,
        field_name: &str,
        value: &FieldValue,
    ) -> Result<()> {
        let Some(field) = self.header.field(field_name) else {
            bail!("table has no field named '{}'", field_name);
        };
        let Some(offset) = self.header.field_offset(row_index, field_name)? else {
            bail!("table has no field named '{}'", field_name);
        };
        let bytes = encode_field_value(field, value, self.header.charset())?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .wrap_err_with(|| format!("cannot open table file {}", self.path.display()))?;
        file.seek(SeekFrom::Start(offset))
            .wrap_err("failed to seek to field offset")?;
        file.write_all(&bytes)
            .wrap_err_with(|| {
                format!(
                    "failed to write field '{}' of row {}",
                    field_name, row_index
                )
            })?;

        debug!(
            row = row_index,
            field = field_name,
            offset,
            bytes = bytes.len(),
            "patched field"
        );
        Ok(())
    }
}

/// Encodes `value` into the exact on-disk byte sequence for `field`.
fn encode_field_value(
    field: &FieldDescriptor,
    value: &FieldValue,
    charset: &'static Encoding,
) -> Result<Vec<u8>> {
    match field.field_type() {
        FieldType::Character => {
            if matches!(value, FieldValue::Bytes(_) | FieldValue::Blob(_)) {
                bail!(
                    "binary value cannot be written to Character field '{}'",
                    field.name()
                );
            }
            Ok(text_padding(
                &value.to_string(),
                charset,
                field.length(),
                Alignment::Left,
                b' ',
            ))
        }
        FieldType::Date => {
            let date = match value {
                FieldValue::Null => return Ok(vec![b' '; 8]),
                FieldValue::Date(date) => *date,
                FieldValue::Timestamp(ts) => ts.date_naive(),
                other => bail!(
                    "expected a date value for field '{}', got {:?}",
                    field.name(),
                    other
                ),
            };
            let mut bytes = Vec::with_capacity(8);
            bytes.extend_from_slice(&ascii_padded(&date.year().to_string(), 4));
            bytes.extend_from_slice(&ascii_padded(&date.month().to_string(), 2));
            bytes.extend_from_slice(&ascii_padded(&date.day().to_string(), 2));
            Ok(bytes)
        }
        FieldType::Numeric | FieldType::FloatingPoint => {
            let decimal = match value {
                FieldValue::Null => return Ok(vec![b' '; field.length()]),
                FieldValue::Numeric(d) | FieldValue::Currency(d) => d.clone(),
                FieldValue::Long(v) => BigDecimal::from(*v),
                FieldValue::Double(v) => BigDecimal::try_from(*v).wrap_err_with(|| {
                    format!("value {} cannot be written to field '{}'", v, field.name())
                })?,
                other => bail!(
                    "expected a numeric value for field '{}', got {:?}",
                    field.name(),
                    other
                ),
            };
            Ok(format_fixed_point(
                &decimal,
                field.length(),
                field.decimal_count(),
            ))
        }
        FieldType::Logical => match value {
            FieldValue::Logical(true) => Ok(vec![b'T']),
            FieldValue::Logical(false) => Ok(vec![b'F']),
            _ => Ok(vec![b'?']),
        },
        other => bail!(
            "field '{}' has type {:?}, which cannot be patched in place",
            field.name(),
            other
        ),
    }
}

/// Right-aligns ASCII digits into `length` bytes, zero-filled.
fn ascii_padded(digits: &str, length: usize) -> Vec<u8> {
    text_padding(
        digits,
        encoding_rs::WINDOWS_1252,
        length,
        Alignment::Right,
        b'0',
    )
}
