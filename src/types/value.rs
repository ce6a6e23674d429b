//! # Runtime Value Representation
//!
//! This module provides `FieldValue`, the owned runtime representation for
//! decoded DBF field contents. Each variant corresponds to one on-disk
//! representation; a single `Null` case covers empty dates, blank numerics,
//! unknown logicals, set null-flag bits, and unresolvable memo references.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Produced by |
//! |---------|-----------|-------------|
//! | Null | - | any field without a usable value |
//! | Character | String | Character fields, truncated Varchar |
//! | Bytes | Vec\<u8\> | Varbinary, untruncated Varchar |
//! | Date | NaiveDate | Date fields |
//! | Numeric | BigDecimal | Numeric / FloatingPoint fields |
//! | Logical | bool | Logical fields (`?` decodes to Null) |
//! | Long | i32 | Long / Autoincrement fields |
//! | Currency | BigDecimal | Currency fields, scale fixed at 4 |
//! | Timestamp | DateTime\<Local\> | Timestamp fields |
//! | Double | f64 | Double and 8-byte Binary fields |
//! | Memo | String | text resolved from the memo store |
//! | Blob | Vec\<u8\> | binary payloads resolved from the memo store |
//!
//! ## Comparison Semantics
//!
//! `PartialEq` is derived: `Null` equals only `Null`, and decimal variants
//! compare by numeric value. There is no cross-variant coercion.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveDate};

/// Owned runtime value for one decoded field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Character(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Numeric(BigDecimal),
    Logical(bool),
    Long(i32),
    Currency(BigDecimal),
    Timestamp(DateTime<Local>),
    Double(f64),
    Memo(String),
    Blob(Vec<u8>),
}

impl FieldValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the text content of Character and Memo values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Character(s) | FieldValue::Memo(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw byte content of Bytes and Blob values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) | FieldValue::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Logical(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FieldValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the decimal content of Numeric and Currency values.
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            FieldValue::Numeric(d) | FieldValue::Currency(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Local>> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    /// Renders the value as plain text. This is the text the Character
    /// patch path writes when handed a non-text value; `Null` renders
    /// empty, binary variants render as lossy UTF-8.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Character(s) | FieldValue::Memo(s) => f.write_str(s),
            FieldValue::Bytes(b) | FieldValue::Blob(b) => {
                f.write_str(&String::from_utf8_lossy(b))
            }
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Numeric(d) | FieldValue::Currency(d) => write!(f, "{d}"),
            FieldValue::Logical(b) => write!(f, "{b}"),
            FieldValue::Long(v) => write!(f, "{v}"),
            FieldValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.3f")),
            FieldValue::Double(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_is_null() {
        assert!(FieldValue::default().is_null());
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(FieldValue::Character("abc".into()).as_str(), Some("abc"));
        assert_eq!(FieldValue::Memo("memo".into()).as_str(), Some("memo"));
        assert_eq!(FieldValue::Logical(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Long(-7).as_i32(), Some(-7));
        assert_eq!(FieldValue::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::Null.as_str(), None);
        assert_eq!(FieldValue::Null.as_bool(), None);
    }

    #[test]
    fn currency_scale_survives_display() {
        let value = FieldValue::Currency(BigDecimal::from_str("12.3450").unwrap());
        assert_eq!(value.to_string(), "12.3450");
    }

    #[test]
    fn null_displays_empty() {
        assert_eq!(FieldValue::Null.to_string(), "");
    }
}
