//! # Field Type Registry
//!
//! This module provides the canonical `FieldType` enum covering the DBF
//! on-disk type codes. Each variant corresponds to one single-byte tag in
//! the field descriptor table; the tag space is open, so codes this crate
//! does not model are carried as `Unrecognized` and decode to null by
//! skipping their declared width.
//!
//! ## Type Codes
//!
//! | Code | Type | On-disk representation |
//! |------|------|------------------------|
//! | `C` | Character | charset text, space-padded to field width |
//! | `V` | Varchar | raw bytes, true length in the null-flag bitmap |
//! | `Q` | Varbinary | raw bytes, true length in the null-flag bitmap |
//! | `D` | Date | 8 ASCII digits, yyyymmdd |
//! | `N` | Numeric | ASCII fixed-point text |
//! | `F` | FloatingPoint | ASCII fixed-point text |
//! | `L` | Logical | one marker byte, tri-state |
//! | `I` | Long | i32 little-endian |
//! | `+` | Autoincrement | i32 little-endian |
//! | `Y` | Currency | i32 little-endian, 4 implied decimal digits |
//! | `T` | Timestamp | Julian day + millisecond-of-day, both u32 LE |
//! | `@` | TimestampLegacy | same layout as Timestamp (dBase 7) |
//! | `M` | Memo | block number into the memo store |
//! | `G` | GeneralOle | block number into the memo store |
//! | `P` | Picture | block number into the memo store |
//! | `W` | Blob | block number into the memo store |
//! | `B` | Binary | Double when 8 bytes wide, else memo block |
//! | `O` | Double | byte-order-reversed IEEE-754 f64 |
//! | `0` | NullFlags | bit-packed null/short flags, one system column |

/// On-disk field type tag.
///
/// `Unrecognized` keeps the raw code so a table with an exotic column stays
/// readable; such fields decode to null and their bytes are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Character,
    Varchar,
    Varbinary,
    Date,
    Numeric,
    FloatingPoint,
    Logical,
    Long,
    Autoincrement,
    Currency,
    Timestamp,
    TimestampLegacy,
    Memo,
    GeneralOle,
    Picture,
    Blob,
    Binary,
    Double,
    NullFlags,
    Unrecognized(u8),
}

impl FieldType {
    /// Maps an on-disk type code to its tag. Total: unknown codes map to
    /// `Unrecognized` rather than failing, so header parsing never rejects
    /// a table over one exotic column.
    pub fn from_code(code: u8) -> FieldType {
        match code {
            b'C' => FieldType::Character,
            b'V' => FieldType::Varchar,
            b'Q' => FieldType::Varbinary,
            b'D' => FieldType::Date,
            b'N' => FieldType::Numeric,
            b'F' => FieldType::FloatingPoint,
            b'L' => FieldType::Logical,
            b'I' => FieldType::Long,
            b'+' => FieldType::Autoincrement,
            b'Y' => FieldType::Currency,
            b'T' => FieldType::Timestamp,
            b'@' => FieldType::TimestampLegacy,
            b'M' => FieldType::Memo,
            b'G' => FieldType::GeneralOle,
            b'P' => FieldType::Picture,
            b'W' => FieldType::Blob,
            b'B' => FieldType::Binary,
            b'O' => FieldType::Double,
            b'0' => FieldType::NullFlags,
            other => FieldType::Unrecognized(other),
        }
    }

    /// Returns the on-disk type code for this tag.
    pub fn code(&self) -> u8 {
        match self {
            FieldType::Character => b'C',
            FieldType::Varchar => b'V',
            FieldType::Varbinary => b'Q',
            FieldType::Date => b'D',
            FieldType::Numeric => b'N',
            FieldType::FloatingPoint => b'F',
            FieldType::Logical => b'L',
            FieldType::Long => b'I',
            FieldType::Autoincrement => b'+',
            FieldType::Currency => b'Y',
            FieldType::Timestamp => b'T',
            FieldType::TimestampLegacy => b'@',
            FieldType::Memo => b'M',
            FieldType::GeneralOle => b'G',
            FieldType::Picture => b'P',
            FieldType::Blob => b'W',
            FieldType::Binary => b'B',
            FieldType::Double => b'O',
            FieldType::NullFlags => b'0',
            FieldType::Unrecognized(code) => *code,
        }
    }

    /// Returns true if this type stores a block number resolved through the
    /// memo store rather than inline data.
    pub fn is_memo_backed(&self) -> bool {
        matches!(
            self,
            FieldType::Memo | FieldType::GeneralOle | FieldType::Picture | FieldType::Blob
        )
    }

    /// Returns true if this type keeps raw bytes pending truncation by the
    /// null-flag bitmap.
    pub fn is_variable(&self) -> bool {
        matches!(self, FieldType::Varchar | FieldType::Varbinary)
    }

    /// Returns true if the random-access patcher can overwrite fields of
    /// this type in place.
    pub fn is_patchable(&self) -> bool {
        matches!(
            self,
            FieldType::Character
                | FieldType::Date
                | FieldType::Numeric
                | FieldType::FloatingPoint
                | FieldType::Logical
        )
    }
}
