//! # Records and Rows
//!
//! This module provides the materialized results of the record cursor:
//!
//! - `Record`: the visible field values of one row in descriptor order,
//!   optionally carrying the deleted flag when deleted rows are surfaced
//! - `Row`: a named view over a `Record`, with case-insensitive field
//!   lookup through a name map shared across all rows of one table
//! - `NullBitmap`: the bit sequence decoded from a null-flag system field,
//!   one bit per nullable or variable-length field in descriptor order
//!
//! ## Lifecycle
//!
//! Records are materialized fresh on every `next_record()` call and never
//! mutated afterwards; the in-place patch path writes to the file, not to
//! records already decoded.
//!
//! ## Bit Order
//!
//! The null-flag bitmap is LSB-first within each byte: bit `n` lives in
//! byte `n / 8` at position `n % 8`. Bits past the end of the raw flag
//! bytes read as clear.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::types::FieldValue;

/// One decoded record: visible field values in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    deleted: Option<bool>,
    values: Vec<FieldValue>,
}

impl Record {
    pub(crate) fn new(deleted: Option<bool>, values: Vec<FieldValue>) -> Record {
        Record { deleted, values }
    }

    /// Deleted flag of the row. `None` unless the reader was configured to
    /// surface deleted rows.
    pub fn deleted(&self) -> Option<bool> {
        self.deleted
    }

    /// Visible field values in descriptor order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        self.values
    }
}

/// A record with by-name field access.
///
/// The name map is built once per table and shared by every row, so a
/// `Row` costs one `Arc` clone over the record it wraps.
#[derive(Debug, Clone)]
pub struct Row {
    record: Record,
    names: Arc<HashMap<String, usize>>,
}

impl Row {
    pub(crate) fn new(record: Record, names: Arc<HashMap<String, usize>>) -> Row {
        Row { record, names }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn deleted(&self) -> Option<bool> {
        self.record.deleted()
    }

    /// Case-insensitive field lookup.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let index = *self.names.get(&name.to_ascii_lowercase())?;
        self.record.get(index)
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name)?.as_i32()
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    pub fn get_decimal(&self, name: &str) -> Option<&bigdecimal::BigDecimal> {
        self.get(name)?.as_decimal()
    }

    pub fn get_date(&self, name: &str) -> Option<chrono::NaiveDate> {
        self.get(name)?.as_date()
    }
}

/// Bit sequence decoded from a null-flag system field.
#[derive(Debug, Clone, PartialEq)]
pub struct NullBitmap {
    bytes: Vec<u8>,
}

impl NullBitmap {
    pub(crate) fn new(bytes: Vec<u8>) -> NullBitmap {
        NullBitmap { bytes }
    }

    /// Tests bit `index`, LSB-first per byte. Out-of-range bits are clear.
    pub fn is_set(&self, index: usize) -> bool {
        match self.bytes.get(index / 8) {
            Some(byte) => byte >> (index % 8) & 1 == 1,
            None => false,
        }
    }
}
