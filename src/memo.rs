//! # Memo Store
//!
//! Memo-class fields (Memo, GeneralOle, Picture, Blob, wide Binary) do not
//! store their payload inside the record; they store a block number into an
//! auxiliary memo file living next to the table. This module reads the two
//! memo container formats:
//!
//! - **FPT** (FoxPro): a 512-byte header carrying the block size at offset
//!   6 (big-endian), then fixed-size blocks. Each referenced block starts
//!   with an 8-byte prologue: record type (u32 BE) and payload length
//!   (u32 BE), followed by the payload itself.
//! - **DBT** (dBase III): fixed 512-byte blocks with no per-block length;
//!   text payloads end at the first 0x1A marker.
//!
//! ## Backing Modes
//!
//! The store is read-only. Files below [`MEMO_IN_MEMORY_THRESHOLD`] are
//! loaded fully into memory; larger files are memory-mapped and read
//! lazily, so a multi-gigabyte memo file costs address space rather than
//! resident memory. Both modes serve reads from a plain byte slice.
//!
//! ## Thread Safety
//!
//! `MemoFile` is immutable after open and can be shared freely; the record
//! cursor holds at most a shared reference to it.

use std::fs::File;
use std::path::Path;

use eyre::{bail, ensure, Result, WrapErr};
use memmap2::Mmap;
use tracing::debug;

use crate::charset;
use crate::config::{DBT_BLOCK_SIZE, END_OF_DATA, FPT_HEADER_SIZE, MEMO_IN_MEMORY_THRESHOLD};
use crate::types::FieldType;
use encoding_rs::Encoding;

/// Payload resolved from a memo block.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoPayload {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemoFormat {
    FoxPro,
    Dbase,
}

enum Backing {
    InMemory(Vec<u8>),
    Mapped(Mmap),
}

impl Backing {
    fn data(&self) -> &[u8] {
        match self {
            Backing::InMemory(bytes) => bytes,
            Backing::Mapped(map) => map,
        }
    }
}

/// Read-only block-addressed store for memo-class field payloads.
pub struct MemoFile {
    backing: Backing,
    format: MemoFormat,
    block_size: usize,
    charset: &'static Encoding,
}

impl MemoFile {
    /// Opens a memo file, choosing the backing mode by file size: below
    /// [`MEMO_IN_MEMORY_THRESHOLD`] the file is read into memory, above it
    /// the file is memory-mapped.
    pub fn open(path: impl AsRef<Path>, charset: &'static Encoding) -> Result<MemoFile> {
        let path = path.as_ref();
        let len = std::fs::metadata(path)
            .wrap_err_with(|| format!("cannot stat memo file {}", path.display()))?
            .len();
        Self::open_with_mode(path, charset, len < MEMO_IN_MEMORY_THRESHOLD)
    }

    /// Opens a memo file with an explicit backing mode.
    pub fn open_with_mode(
        path: impl AsRef<Path>,
        charset: &'static Encoding,
        in_memory: bool,
    ) -> Result<MemoFile> {
        let path = path.as_ref();
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("fpt") => MemoFormat::FoxPro,
            _ => MemoFormat::Dbase,
        };

        let backing = if in_memory {
            let bytes = std::fs::read(path)
                .wrap_err_with(|| format!("cannot read memo file {}", path.display()))?;
            Backing::InMemory(bytes)
        } else {
            let file = File::open(path)
                .wrap_err_with(|| format!("cannot open memo file {}", path.display()))?;
            let map = unsafe { Mmap::map(&file) }
                .wrap_err_with(|| format!("cannot map memo file {}", path.display()))?;
            Backing::Mapped(map)
        };

        let block_size = match format {
            MemoFormat::FoxPro => {
                let data = backing.data();
                ensure!(
                    data.len() >= FPT_HEADER_SIZE,
                    "memo file {} is shorter than its {} byte header",
                    path.display(),
                    FPT_HEADER_SIZE
                );
                let size = u16::from_be_bytes([data[6], data[7]]) as usize;
                ensure!(size > 0, "memo file {} declares a zero block size", path.display());
                size
            }
            MemoFormat::Dbase => DBT_BLOCK_SIZE,
        };

        debug!(
            path = %path.display(),
            ?format,
            block_size,
            in_memory,
            "opened memo file"
        );

        Ok(MemoFile {
            backing,
            format,
            block_size,
            charset,
        })
    }

    /// Resolves `block` to its payload: charset-decoded text for Memo
    /// fields, raw bytes for every other memo-backed type.
    pub fn read(&self, block: u32, field_type: FieldType) -> Result<MemoPayload> {
        let data = self.backing.data();
        let offset = block as usize * self.block_size;
        ensure!(
            offset < data.len(),
            "memo block {} starts past the end of the memo file",
            block
        );

        let payload = match self.format {
            MemoFormat::FoxPro => {
                ensure!(
                    offset + 8 <= data.len(),
                    "memo block {} is truncated before its prologue",
                    block
                );
                let length =
                    u32::from_be_bytes([data[offset + 4], data[offset + 5], data[offset + 6], data[offset + 7]])
                        as usize;
                let start = offset + 8;
                let Some(end) = start.checked_add(length).filter(|&end| end <= data.len()) else {
                    bail!(
                        "memo block {} declares {} payload bytes but only {} remain",
                        block,
                        length,
                        data.len() - start
                    );
                };
                &data[start..end]
            }
            MemoFormat::Dbase => {
                let rest = &data[offset..];
                let end = rest
                    .iter()
                    .position(|&b| b == END_OF_DATA)
                    .unwrap_or(rest.len());
                &rest[..end]
            }
        };

        if field_type == FieldType::Memo {
            Ok(MemoPayload::Text(charset::decode(payload, self.charset)))
        } else {
            Ok(MemoPayload::Bytes(payload.to_vec()))
        }
    }
}
