//! Shared helpers for integration tests: write real DBF and FPT files
//! byte by byte, independent of the crate's own encoders.

use std::io::Write;
use std::path::Path;

pub const PROLOGUE_SIZE: usize = 32;
pub const DESCRIPTOR_SIZE: usize = 32;

pub struct FieldSpec {
    pub name: &'static str,
    pub code: u8,
    pub length: u8,
    pub decimals: u8,
    pub flags: u8,
}

impl FieldSpec {
    pub fn new(name: &'static str, code: u8, length: u8, decimals: u8) -> FieldSpec {
        FieldSpec {
            name,
            code,
            length,
            decimals,
            flags: 0,
        }
    }
}

/// Writes a complete DBF file: prologue, descriptors, terminator, records
/// (each `(deleted, body)`), and the 0x1A end-of-data marker.
pub fn write_table(path: &Path, fields: &[FieldSpec], rows: &[(bool, Vec<u8>)]) {
    let record_length = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
    let header_length = PROLOGUE_SIZE + fields.len() * DESCRIPTOR_SIZE + 1;

    let mut bytes = Vec::new();
    bytes.push(0x30);
    bytes.extend_from_slice(&[124, 6, 1]);
    bytes.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&(header_length as u16).to_le_bytes());
    bytes.extend_from_slice(&(record_length as u16).to_le_bytes());
    bytes.extend_from_slice(&[0u8; 17]);
    bytes.push(0x03);
    bytes.extend_from_slice(&[0u8; 2]);
    assert_eq!(bytes.len(), PROLOGUE_SIZE);

    for field in fields {
        let mut block = [0u8; DESCRIPTOR_SIZE];
        block[..field.name.len()].copy_from_slice(field.name.as_bytes());
        block[11] = field.code;
        block[16] = field.length;
        block[17] = field.decimals;
        block[18] = field.flags;
        bytes.extend_from_slice(&block);
    }
    bytes.push(0x0D);

    for (deleted, body) in rows {
        assert_eq!(body.len(), record_length - 1, "row body width mismatch");
        bytes.push(if *deleted { b'*' } else { b' ' });
        bytes.extend_from_slice(body);
    }
    bytes.push(0x1A);

    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&bytes).unwrap();
}

/// Writes an FPT memo file with the given block size; `blocks` are
/// `(record_type, payload)` pairs laid out back to back after the header.
/// Returns the block number of each payload in order.
pub fn write_fpt(path: &Path, block_size: u16, blocks: &[(u32, &[u8])]) -> Vec<u32> {
    let header_len = 512usize.max(block_size as usize);
    let mut bytes = vec![0u8; header_len];
    bytes[6..8].copy_from_slice(&block_size.to_be_bytes());

    let mut numbers = Vec::new();
    for &(record_type, payload) in blocks {
        numbers.push((bytes.len() / block_size as usize) as u32);
        let mut block = Vec::new();
        block.extend_from_slice(&record_type.to_be_bytes());
        block.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        block.extend_from_slice(payload);
        let padded = block.len().div_ceil(block_size as usize) * block_size as usize;
        block.resize(padded, 0);
        bytes.extend_from_slice(&block);
    }

    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&bytes).unwrap();
    numbers
}

/// Space-pads `text` to an exact field width, left aligned.
pub fn char_bytes(text: &str, length: usize) -> Vec<u8> {
    let mut bytes = vec![b' '; length];
    bytes[..text.len()].copy_from_slice(text.as_bytes());
    bytes
}

/// Space-pads `text` to an exact field width, right aligned.
pub fn num_bytes(text: &str, length: usize) -> Vec<u8> {
    let mut bytes = vec![b' '; length];
    bytes[length - text.len()..].copy_from_slice(text.as_bytes());
    bytes
}
