//! # Field Descriptors
//!
//! This module provides type-safe, zerocopy-based parsing of the 32-byte
//! field descriptor blocks that follow the table prologue. Each block
//! describes one column: its name, type tag, byte width, decimal count,
//! and flag bits.
//!
//! ## Descriptor Layout
//!
//! ```text
//! Offset  Size  Description
//! 0       11    Field name, NUL-padded
//! 11      1     Type code (see FieldType)
//! 12      4     Displacement within the record (Visual FoxPro)
//! 16      1     Field length in bytes
//! 17      1     Decimal count
//! 18      1     Flags: 0x01 system column, 0x02 nullable
//! 19      4     Autoincrement next value
//! 23      1     Autoincrement step
//! 24      7     Reserved
//! 31      1     Index flag
//! ```
//!
//! ## Zerocopy Safety
//!
//! The raw block uses zerocopy traits (`FromBytes`, `IntoBytes`,
//! `Immutable`, `KnownLayout`, `Unaligned`) so a descriptor can be read
//! straight out of the header buffer without manual offset arithmetic.

use eyre::{ensure, Result};
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::charset;
use crate::config::{FIELD_DESCRIPTOR_SIZE, FIELD_FLAG_NULLABLE, FIELD_FLAG_SYSTEM};
use crate::types::FieldType;
use encoding_rs::Encoding;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct FieldDescriptorBlock {
    pub(crate) name: [u8; 11],
    pub(crate) field_type: u8,
    pub(crate) displacement: U32,
    pub(crate) length: u8,
    pub(crate) decimal_count: u8,
    pub(crate) flags: u8,
    pub(crate) autoincrement_next: U32,
    pub(crate) autoincrement_step: u8,
    pub(crate) reserved: [u8; 7],
    pub(crate) index_flag: u8,
}

const _: () = assert!(std::mem::size_of::<FieldDescriptorBlock>() == FIELD_DESCRIPTOR_SIZE);

/// Immutable metadata for one column.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    length: u8,
    decimal_count: u8,
    flags: u8,
}

impl FieldDescriptor {
    /// Parses one on-disk descriptor block. The name is decoded with the
    /// table charset and cut at the first NUL.
    pub(crate) fn from_bytes(bytes: &[u8], charset: &'static Encoding) -> Result<FieldDescriptor> {
        ensure!(
            bytes.len() >= FIELD_DESCRIPTOR_SIZE,
            "buffer too small for field descriptor: {} < {}",
            bytes.len(),
            FIELD_DESCRIPTOR_SIZE
        );

        let block = FieldDescriptorBlock::read_from_bytes(&bytes[..FIELD_DESCRIPTOR_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse field descriptor: {:?}", e))?;

        let name_end = block
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(block.name.len());
        let name = charset::decode(&block.name[..name_end], charset)
            .trim()
            .to_string();

        ensure!(!name.is_empty(), "field descriptor has an empty name");
        ensure!(
            block.length > 0,
            "field '{}' declares a zero byte width",
            name
        );

        Ok(FieldDescriptor {
            name,
            field_type: FieldType::from_code(block.field_type),
            length: block.length,
            decimal_count: block.decimal_count,
            flags: block.flags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Declared byte width of the field on disk.
    pub fn length(&self) -> usize {
        self.length as usize
    }

    pub fn decimal_count(&self) -> usize {
        self.decimal_count as usize
    }

    /// System columns (the null-flag bitmap among them) are decoded to
    /// advance the cursor but never surface in visible output.
    pub fn is_system(&self) -> bool {
        self.flags & FIELD_FLAG_SYSTEM != 0
    }

    /// Nullable columns own one bit in the null-flag bitmap.
    pub fn is_nullable(&self) -> bool {
        self.flags & FIELD_FLAG_NULLABLE != 0
    }
}

#[cfg(test)]
pub(crate) fn test_descriptor(
    name: &str,
    field_type: FieldType,
    length: u8,
    decimal_count: u8,
) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        field_type,
        length,
        decimal_count,
        flags: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &[u8], field_type: u8, length: u8, decimal_count: u8, flags: u8) -> Vec<u8> {
        let mut padded_name = [0u8; 11];
        padded_name[..name.len()].copy_from_slice(name);
        let block = FieldDescriptorBlock {
            name: padded_name,
            field_type,
            displacement: U32::new(0),
            length,
            decimal_count,
            flags,
            autoincrement_next: U32::new(0),
            autoincrement_step: 0,
            reserved: [0u8; 7],
            index_flag: 0,
        };
        block.as_bytes().to_vec()
    }

    #[test]
    fn descriptor_block_size_is_32() {
        assert_eq!(std::mem::size_of::<FieldDescriptorBlock>(), 32);
    }

    #[test]
    fn parses_name_type_and_widths() {
        let bytes = block(b"AMOUNT", b'N', 10, 2, 0);
        let field = FieldDescriptor::from_bytes(&bytes, charset::DEFAULT_CHARSET).unwrap();

        assert_eq!(field.name(), "AMOUNT");
        assert_eq!(field.field_type(), FieldType::Numeric);
        assert_eq!(field.length(), 10);
        assert_eq!(field.decimal_count(), 2);
        assert!(!field.is_system());
        assert!(!field.is_nullable());
    }

    #[test]
    fn name_stops_at_first_nul() {
        let mut bytes = block(b"NAME", b'C', 10, 0, 0);
        bytes[5] = b'X';
        let field = FieldDescriptor::from_bytes(&bytes, charset::DEFAULT_CHARSET).unwrap();
        assert_eq!(field.name(), "NAME");
    }

    #[test]
    fn flag_bits_are_decoded() {
        let bytes = block(b"_NullFlags", b'0', 1, 0, 0x03);
        let field = FieldDescriptor::from_bytes(&bytes, charset::DEFAULT_CHARSET).unwrap();
        assert_eq!(field.field_type(), FieldType::NullFlags);
        assert!(field.is_system());
        assert!(field.is_nullable());
    }

    #[test]
    fn rejects_zero_width_fields() {
        let bytes = block(b"BAD", b'C', 0, 0, 0);
        let result = FieldDescriptor::from_bytes(&bytes, charset::DEFAULT_CHARSET);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("zero byte width"));
    }

    #[test]
    fn rejects_empty_names() {
        let bytes = block(b"", b'C', 5, 0, 0);
        assert!(FieldDescriptor::from_bytes(&bytes, charset::DEFAULT_CHARSET).is_err());
    }

    #[test]
    fn unknown_type_code_is_kept() {
        let bytes = block(b"ODD", b'Z', 3, 0, 0);
        let field = FieldDescriptor::from_bytes(&bytes, charset::DEFAULT_CHARSET).unwrap();
        assert_eq!(field.field_type(), FieldType::Unrecognized(b'Z'));
    }
}
