//! # Record Cursor
//!
//! This module provides `TableReader`, the sequential cursor over a DBF
//! record stream, and the per-type field value decoder it dispatches into.
//!
//! ## Cursor Protocol
//!
//! Every record starts with a delete-flag byte. `next_record()` reads it
//! first:
//!
//! - the end-of-data marker (0x1A) or a clean end of stream terminates the
//!   cursor with `Ok(None)` — a normal signal, never an error
//! - `*` marks a deleted row; unless deleted rows were requested, the rest
//!   of the record is skipped and the cursor moves on
//! - anything else starts a live record
//!
//! The cursor then decodes every field descriptor in order. System fields
//! and the null-flag field advance the cursor but stay out of the visible
//! output; the null-flag bitmap is kept aside and applied to the decoded
//! values afterwards (see below). Running out of bytes inside a field is a
//! fatal unexpected-end-of-data error: the cursor never yields a partially
//! populated record.
//!
//! ## Two-Pass Null Flags
//!
//! The null-flag field may appear anywhere in descriptor order, so its
//! semantics ("is this value present / full width") can only be resolved
//! once the whole record has been decoded. Values are therefore collected
//! into a mutable array indexed by descriptor position, the bitmap pass
//! rewrites entries in place, and only then is the visible record
//! materialized.
//!
//! ## State
//!
//! The cursor is strictly forward-only over one owned byte source; there
//! is no rewind beyond reopening the table. It is not shareable across
//! threads — callers wanting concurrency wrap it themselves.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Local, NaiveDate, Offset, TimeZone};
use encoding_rs::Encoding;
use eyre::{ensure, Result, WrapErr};
use smallvec::SmallVec;
use tracing::debug;

use crate::config::{
    END_OF_DATA, FIELD_DESCRIPTOR_SIZE, JULIAN_EPOCH_MILLIS, MILLIS_PER_DAY, PROLOGUE_SIZE,
    RECORD_DELETED,
};
use crate::encoding::{parse_ascii_decimal, read_i32_le, trim_right_spaces};
use crate::field::FieldDescriptor;
use crate::header::TableHeader;
use crate::memo::{MemoFile, MemoPayload};
use crate::patch::TablePatcher;
use crate::record::{NullBitmap, Record, Row};
use crate::types::{FieldType, FieldValue};

/// Per-table decode options, fixed at open time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    /// Charset override; `None` resolves the header's language driver byte.
    pub charset: Option<&'static Encoding>,
    /// Surface deleted rows (with their flag) instead of skipping them.
    pub show_deleted: bool,
}

/// Sequential reader over the records of one DBF table.
pub struct TableReader<R: Read> {
    reader: R,
    header: TableHeader,
    memo: Option<MemoFile>,
    trim_right_spaces: bool,
    show_deleted: bool,
    path: Option<PathBuf>,
}

impl TableReader<BufReader<File>> {
    /// Opens a table file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<TableReader<BufReader<File>>> {
        Self::open_with_options(path, TableOptions::default())
    }

    /// Opens a table file.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: TableOptions,
    ) -> Result<TableReader<BufReader<File>>> {
        let path = path.as_ref();
        let file = File::open(path)
            .wrap_err_with(|| format!("cannot open table file {}", path.display()))?;
        let mut reader = TableReader::with_options(BufReader::new(file), options)?;
        reader.path = Some(path.to_path_buf());
        Ok(reader)
    }

    /// Returns a patcher bound to the same file, sharing this reader's
    /// parsed header and charset.
    pub fn patcher(&self) -> Result<TablePatcher> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| eyre::eyre!("reader was not opened from a file path"))?;
        Ok(TablePatcher::from_header(
            path.clone(),
            self.header.clone(),
        ))
    }
}

impl<R: Read> TableReader<R> {
    /// Wraps an already-open byte source positioned at the start of the
    /// file, with default options.
    pub fn new(reader: R) -> Result<TableReader<R>> {
        Self::with_options(reader, TableOptions::default())
    }

    /// Wraps an already-open byte source positioned at the start of the
    /// file. Parses the header and leaves the cursor at the first record.
    pub fn with_options(mut reader: R, options: TableOptions) -> Result<TableReader<R>> {
        let header = TableHeader::read(&mut reader, options.charset)?;

        // Header bytes past the descriptor table (e.g. the VFP backlink).
        let consumed =
            PROLOGUE_SIZE + header.field_descriptors().len() * FIELD_DESCRIPTOR_SIZE + 1;
        let Some(padding) = header.header_width().checked_sub(consumed) else {
            eyre::bail!(
                "header length {} is shorter than its {} byte field table",
                header.header_width(),
                consumed
            );
        };
        skip_bytes(&mut reader, padding as u64)
            .wrap_err("unexpected end of file before record data")?;

        debug!(
            records = header.record_count(),
            fields = header.visible_field_count(),
            show_deleted = options.show_deleted,
            "table reader ready"
        );

        Ok(TableReader {
            reader,
            header,
            memo: None,
            trim_right_spaces: true,
            show_deleted: options.show_deleted,
            path: None,
        })
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Whether Character values are decoded with trailing spaces removed
    /// (default true).
    pub fn trim_right_spaces(&self) -> bool {
        self.trim_right_spaces
    }

    pub fn set_trim_right_spaces(&mut self, trim: bool) {
        self.trim_right_spaces = trim;
    }

    /// Attaches the memo file backing this table's memo-class fields,
    /// choosing the backing mode by file size.
    pub fn attach_memo(&mut self, path: impl AsRef<Path>) -> Result<()> {
        ensure!(self.memo.is_none(), "memo file is already attached");
        self.memo = Some(MemoFile::open(path, self.header.charset())?);
        Ok(())
    }

    /// Attaches the memo file with an explicit backing mode.
    pub fn attach_memo_with_mode(&mut self, path: impl AsRef<Path>, in_memory: bool) -> Result<()> {
        ensure!(self.memo.is_none(), "memo file is already attached");
        self.memo = Some(MemoFile::open_with_mode(
            path,
            self.header.charset(),
            in_memory,
        )?);
        Ok(())
    }

    /// Skips `count` records without decoding them, deleted rows counted
    /// like any other.
    pub fn skip_records(&mut self, count: usize) -> Result<()> {
        let bytes = count as u64 * self.header.record_width() as u64;
        skip_bytes(&mut self.reader, bytes).wrap_err("unexpected end of data while skipping records")
    }

    /// Decodes the next record, or `Ok(None)` at the end of the data.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let record_width = self.header.record_width();

        let deleted = loop {
            let Some(lead) = read_lead_byte(&mut self.reader)? else {
                return Ok(None);
            };
            if lead == END_OF_DATA {
                return Ok(None);
            }
            let deleted = lead == RECORD_DELETED;
            if deleted && !self.show_deleted {
                skip_bytes(&mut self.reader, record_width as u64 - 1)
                    .wrap_err("unexpected end of data inside deleted record")?;
                continue;
            }
            break deleted;
        };

        let reader = &mut self.reader;
        let fields = self.header.field_descriptors();
        let charset = self.header.charset();
        let memo = self.memo.as_ref();

        let mut values: SmallVec<[FieldValue; 8]> = SmallVec::with_capacity(fields.len());
        let mut bitmap: Option<NullBitmap> = None;
        for field in fields {
            match decode_field(reader, field, charset, self.trim_right_spaces, memo)? {
                Decoded::Value(value) => values.push(value),
                Decoded::NullFlags(flags) => {
                    bitmap = Some(flags);
                    values.push(FieldValue::Null);
                }
            }
        }

        if let Some(bitmap) = bitmap {
            apply_null_flags(fields, &mut values, &bitmap, charset);
        }

        let visible = self
            .header
            .visible_indices()
            .iter()
            .map(|&idx| std::mem::take(&mut values[idx]))
            .collect();
        Ok(Some(Record::new(
            self.show_deleted.then_some(deleted),
            visible,
        )))
    }

    /// Decodes the next record as a named-field view, or `Ok(None)` at the
    /// end of the data.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(record) = self.next_record()? else {
            return Ok(None);
        };
        Ok(Some(Row::new(record, self.header.name_map())))
    }
}

/// Outcome of decoding one field: a visible value, or the null-flag bitmap
/// kept aside for the post-processing pass.
enum Decoded {
    Value(FieldValue),
    NullFlags(NullBitmap),
}

fn decode_field<R: Read>(
    reader: &mut R,
    field: &FieldDescriptor,
    charset: &'static Encoding,
    trim: bool,
    memo: Option<&MemoFile>,
) -> Result<Decoded> {
    let value = match field.field_type() {
        FieldType::Character => {
            let raw = read_field_bytes(reader, field.length())?;
            let bytes = if trim { trim_right_spaces(&raw) } else { &raw[..] };
            FieldValue::Character(charset.decode(bytes).0.into_owned())
        }
        FieldType::Varchar | FieldType::Varbinary => {
            FieldValue::Bytes(read_field_bytes(reader, field.length())?)
        }
        FieldType::Date => {
            let raw = read_field_bytes(reader, 8)?;
            decode_date(&raw).map_or(FieldValue::Null, FieldValue::Date)
        }
        FieldType::Numeric | FieldType::FloatingPoint => {
            let raw = read_field_bytes(reader, field.length())?;
            parse_ascii_decimal(&raw).map_or(FieldValue::Null, FieldValue::Numeric)
        }
        FieldType::Logical => {
            let raw = read_field_bytes(reader, 1)?;
            match raw[0] {
                b'T' | b't' | b'Y' | b'y' => FieldValue::Logical(true),
                b'F' | b'f' | b'N' | b'n' => FieldValue::Logical(false),
                _ => FieldValue::Null,
            }
        }
        FieldType::Long | FieldType::Autoincrement => FieldValue::Long(read_i32_le(reader)?),
        FieldType::Currency => {
            ensure!(
                field.length() >= 4,
                "currency field '{}' is narrower than 4 bytes",
                field.name()
            );
            let raw = read_i32_le(reader)?;
            skip_bytes(reader, field.length() as u64 - 4)
                .wrap_err("unexpected end of data inside record")?;
            FieldValue::Currency(BigDecimal::new(BigInt::from(raw), 4))
        }
        FieldType::Timestamp | FieldType::TimestampLegacy => {
            let days = read_i32_le(reader)?;
            let millis = read_i32_le(reader)?;
            if days == 0 && millis == 0 {
                FieldValue::Null
            } else {
                decode_timestamp(days, millis).map_or(FieldValue::Null, FieldValue::Timestamp)
            }
        }
        FieldType::Memo | FieldType::GeneralOle | FieldType::Picture | FieldType::Blob => {
            decode_memo_field(reader, field, memo)?
        }
        FieldType::Binary => {
            if field.length() == 8 {
                decode_double(reader)?
            } else {
                decode_memo_field(reader, field, memo)?
            }
        }
        FieldType::Double => decode_double(reader)?,
        FieldType::NullFlags => {
            let raw = read_field_bytes(reader, field.length())?;
            return Ok(Decoded::NullFlags(NullBitmap::new(raw)));
        }
        FieldType::Unrecognized(_) => {
            skip_bytes(reader, field.length() as u64)
                .wrap_err("unexpected end of data inside record")?;
            FieldValue::Null
        }
    };
    Ok(Decoded::Value(value))
}

fn decode_date(raw: &[u8]) -> Option<NaiveDate> {
    let year: i32 = std::str::from_utf8(&raw[0..4]).ok()?.parse().ok()?;
    let month: u32 = std::str::from_utf8(&raw[4..6]).ok()?.parse().ok()?;
    let day: u32 = std::str::from_utf8(&raw[6..8]).ok()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Converts a (Julian day, millisecond-of-day) pair to an instant. The
/// stored pair is the local wall-clock time; the local offset in effect at
/// that moment shifts it back to an absolute instant.
fn decode_timestamp(days: i32, millis: i32) -> Option<DateTime<Local>> {
    let wall_millis = (days as i64)
        .checked_mul(MILLIS_PER_DAY)?
        .checked_add(JULIAN_EPOCH_MILLIS)?
        .checked_add(millis as i64)?;
    let wall = DateTime::from_timestamp_millis(wall_millis)?.naive_utc();
    let offset_secs = Local
        .offset_from_utc_datetime(&wall)
        .fix()
        .local_minus_utc() as i64;
    let instant = DateTime::from_timestamp_millis(wall_millis - offset_secs * 1000)?;
    Some(instant.with_timezone(&Local))
}

fn decode_double<R: Read>(reader: &mut R) -> Result<FieldValue> {
    let mut raw = [0u8; 8];
    reader
        .read_exact(&mut raw)
        .wrap_err("unexpected end of data inside record")?;
    Ok(FieldValue::Double(f64::from_le_bytes(raw)))
}

fn decode_memo_field<R: Read>(
    reader: &mut R,
    field: &FieldDescriptor,
    memo: Option<&MemoFile>,
) -> Result<FieldValue> {
    // Width 10 stores the block number as ASCII digits, otherwise as a
    // little-endian integer in the first 4 bytes.
    let block = if field.length() == 10 {
        let raw = read_field_bytes(reader, 10)?;
        parse_ascii_decimal(&raw).and_then(|d| d.to_u32())
    } else {
        ensure!(
            field.length() >= 4,
            "memo field '{}' is narrower than 4 bytes",
            field.name()
        );
        let raw = read_i32_le(reader)?;
        skip_bytes(reader, field.length() as u64 - 4)
            .wrap_err("unexpected end of data inside record")?;
        u32::try_from(raw).ok()
    };

    match (memo, block) {
        (Some(store), Some(block)) if block > 0 => match store.read(block, field.field_type())? {
            MemoPayload::Text(text) => Ok(FieldValue::Memo(text)),
            MemoPayload::Bytes(bytes) => Ok(FieldValue::Blob(bytes)),
        },
        _ => Ok(FieldValue::Null),
    }
}

/// Rewrites already-decoded values under the record's null-flag bitmap.
///
/// One bit per nullable field and one per variable-length field, in
/// descriptor order, with the nullable bit checked first when a field is
/// both. A set nullable bit nulls the value outright. For Varchar and
/// Varbinary a clear bit means "not full width": the true payload length
/// sits in the raw buffer's last byte. Only then does Varchar text get
/// charset-decoded.
fn apply_null_flags(
    fields: &[FieldDescriptor],
    values: &mut [FieldValue],
    bitmap: &NullBitmap,
    charset: &'static Encoding,
) {
    let mut bit: isize = -1;
    for (idx, field) in fields.iter().enumerate() {
        if field.is_nullable() {
            bit += 1;
            if bitmap.is_set(bit as usize) {
                values[idx] = FieldValue::Null;
            }
        }
        if field.field_type().is_variable() {
            bit += 1;
            if let FieldValue::Bytes(raw) = &values[idx] {
                let size = if bitmap.is_set(bit as usize) {
                    field.length()
                } else {
                    raw.last().copied().unwrap_or(0) as usize
                };
                let size = size.min(raw.len());
                let payload = raw[..size].to_vec();
                values[idx] = match field.field_type() {
                    FieldType::Varchar => {
                        FieldValue::Character(charset.decode(&payload).0.into_owned())
                    }
                    _ => FieldValue::Bytes(payload),
                };
            }
        }
    }
}

/// Reads the record lead byte, mapping a clean end of stream to `None`.
fn read_lead_byte<R: Read>(reader: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).wrap_err("failed to read record lead byte"),
        }
    }
}

fn read_field_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; length];
    reader
        .read_exact(&mut buf)
        .wrap_err("unexpected end of data inside record")?;
    Ok(buf)
}

fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let copied = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    ensure!(
        copied == count,
        "stream ended after {} of {} skipped bytes",
        copied,
        count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HEADER_TERMINATOR, RECORD_PRESENT};
    use crate::field::FieldDescriptorBlock;
    use crate::header::TablePrologue;
    use std::io::Cursor;
    use zerocopy::little_endian::{U16, U32};
    use zerocopy::IntoBytes;

    fn descriptor(name: &str, code: u8, length: u8, decimals: u8, flags: u8) -> Vec<u8> {
        let mut padded = [0u8; 11];
        padded[..name.len()].copy_from_slice(name.as_bytes());
        FieldDescriptorBlock {
            name: padded,
            field_type: code,
            displacement: U32::new(0),
            length,
            decimal_count: decimals,
            flags,
            autoincrement_next: U32::new(0),
            autoincrement_step: 0,
            reserved: [0u8; 7],
            index_flag: 0,
        }
        .as_bytes()
        .to_vec()
    }

    /// Assembles a complete in-memory table: prologue, descriptors,
    /// terminator, records (lead byte + body), end-of-data marker.
    fn table(descriptors: &[Vec<u8>], rows: &[(u8, Vec<u8>)]) -> Vec<u8> {
        let header_length = (PROLOGUE_SIZE + descriptors.len() * FIELD_DESCRIPTOR_SIZE + 1) as u16;
        let record_length =
            1 + descriptors.iter().map(|d| d[16] as usize).sum::<usize>() as u16;
        let prologue = TablePrologue {
            signature: 0x30,
            modified: [124, 1, 1],
            record_count: U32::new(rows.len() as u32),
            header_length: U16::new(header_length),
            record_length: U16::new(record_length),
            reserved: [0; 2],
            incomplete_transaction: 0,
            encryption_flag: 0,
            multi_user: [0; 12],
            mdx_flag: 0,
            language_driver: 0x03,
            reserved_tail: [0; 2],
        };
        let mut bytes = prologue.as_bytes().to_vec();
        for d in descriptors {
            bytes.extend_from_slice(d);
        }
        bytes.push(HEADER_TERMINATOR);
        for (lead, body) in rows {
            assert_eq!(body.len(), record_length as usize - 1);
            bytes.push(*lead);
            bytes.extend_from_slice(body);
        }
        bytes.push(END_OF_DATA);
        bytes
    }

    fn reader_over(bytes: Vec<u8>) -> TableReader<Cursor<Vec<u8>>> {
        TableReader::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn character_fields_trim_trailing_spaces_by_default() {
        let bytes = table(
            &[descriptor("NAME", b'C', 10, 0, 0)],
            &[
                (RECORD_PRESENT, b"Alice     ".to_vec()),
                (RECORD_PRESENT, b"Bob       ".to_vec()),
                (RECORD_PRESENT, b"Carol     ".to_vec()),
            ],
        );
        let mut reader = reader_over(bytes);

        let mut names = Vec::new();
        while let Some(record) = reader.next_record().unwrap() {
            names.push(record.get(0).unwrap().as_str().unwrap().to_string());
        }
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn trimming_can_be_disabled() {
        let bytes = table(
            &[descriptor("NAME", b'C', 10, 0, 0)],
            &[(RECORD_PRESENT, b"Alice     ".to_vec())],
        );
        let mut reader = reader_over(bytes);
        reader.set_trim_right_spaces(false);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_str(), Some("Alice     "));
    }

    #[test]
    fn end_of_stream_is_signalled_exactly_once() {
        let bytes = table(
            &[descriptor("NAME", b'C', 4, 0, 0)],
            &[(RECORD_PRESENT, b"Aa  ".to_vec())],
        );
        let mut reader = reader_over(bytes);

        assert!(reader.next_record().unwrap().is_some());
        assert!(reader.next_record().unwrap().is_none());
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn stream_without_end_marker_terminates_cleanly() {
        let mut bytes = table(
            &[descriptor("NAME", b'C', 4, 0, 0)],
            &[(RECORD_PRESENT, b"Aa  ".to_vec())],
        );
        bytes.pop();
        let mut reader = reader_over(bytes);

        assert!(reader.next_record().unwrap().is_some());
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn deleted_rows_are_skipped_by_default() {
        let bytes = table(
            &[descriptor("NAME", b'C', 4, 0, 0)],
            &[
                (RECORD_DELETED, b"gone".to_vec()),
                (RECORD_PRESENT, b"kept".to_vec()),
                (RECORD_DELETED, b"also".to_vec()),
            ],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_str(), Some("kept"));
        assert_eq!(record.deleted(), None);
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn deleted_rows_surface_with_their_flag_when_requested() {
        let bytes = table(
            &[descriptor("NAME", b'C', 4, 0, 0)],
            &[
                (RECORD_DELETED, b"gone".to_vec()),
                (RECORD_PRESENT, b"kept".to_vec()),
            ],
        );
        let mut reader = TableReader::with_options(
            Cursor::new(bytes),
            TableOptions {
                show_deleted: true,
                ..TableOptions::default()
            },
        )
        .unwrap();

        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.deleted(), Some(true));
        assert_eq!(first.get(0).unwrap().as_str(), Some("gone"));

        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.deleted(), Some(false));
        assert_eq!(second.get(0).unwrap().as_str(), Some("kept"));
    }

    #[test]
    fn truncated_record_is_a_fatal_error() {
        let mut bytes = table(
            &[descriptor("NAME", b'C', 8, 0, 0)],
            &[(RECORD_PRESENT, b"complete".to_vec())],
        );
        bytes.truncate(bytes.len() - 6);
        let mut reader = reader_over(bytes);

        let result = reader.next_record();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unexpected end of data"));
    }

    #[test]
    fn numeric_and_logical_and_long_decode() {
        let mut body = Vec::new();
        body.extend_from_slice(b"  12.50");
        body.push(b'T');
        body.extend_from_slice(&42i32.to_le_bytes());
        let bytes = table(
            &[
                descriptor("PRICE", b'N', 7, 2, 0),
                descriptor("OK", b'L', 1, 0, 0),
                descriptor("ID", b'I', 4, 0, 0),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(
            record.get(0).unwrap().as_decimal().unwrap().to_string(),
            "12.50"
        );
        assert_eq!(record.get(1).unwrap().as_bool(), Some(true));
        assert_eq!(record.get(2).unwrap().as_i32(), Some(42));
    }

    #[test]
    fn blank_numeric_and_unknown_logical_decode_to_null() {
        let mut body = Vec::new();
        body.extend_from_slice(b"       ");
        body.push(b'?');
        let bytes = table(
            &[
                descriptor("PRICE", b'N', 7, 2, 0),
                descriptor("OK", b'L', 1, 0, 0),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert!(record.get(0).unwrap().is_null());
        assert!(record.get(1).unwrap().is_null());
    }

    #[test]
    fn currency_has_four_implied_decimal_digits() {
        let mut body = Vec::new();
        body.extend_from_slice(&123450i32.to_le_bytes());
        body.extend_from_slice(&[0u8; 4]);
        let bytes = table(
            &[descriptor("COST", b'Y', 8, 4, 0)],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(
            record.get(0).unwrap().as_decimal().unwrap().to_string(),
            "12.3450"
        );
    }

    #[test]
    fn double_is_stored_little_endian() {
        let body = 1234.5625f64.to_le_bytes().to_vec();
        let bytes = table(
            &[descriptor("VAL", b'O', 8, 0, 0)],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_f64(), Some(1234.5625));
    }

    #[test]
    fn eight_byte_binary_decodes_as_double() {
        let body = (-2.5f64).to_le_bytes().to_vec();
        let bytes = table(
            &[descriptor("RAW", b'B', 8, 0, 0)],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_f64(), Some(-2.5));
    }

    #[test]
    fn dates_decode_and_blank_dates_are_null() {
        let bytes = table(
            &[descriptor("BORN", b'D', 8, 0, 0)],
            &[
                (RECORD_PRESENT, b"20240305".to_vec()),
                (RECORD_PRESENT, b"        ".to_vec()),
                (RECORD_PRESENT, b"2024ab05".to_vec()),
                (RECORD_PRESENT, b"20241399".to_vec()),
            ],
        );
        let mut reader = reader_over(bytes);

        assert_eq!(
            reader.next_record().unwrap().unwrap().get(0).unwrap().as_date(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert!(reader.next_record().unwrap().unwrap().get(0).unwrap().is_null());
        assert!(reader.next_record().unwrap().unwrap().get(0).unwrap().is_null());
        assert!(reader.next_record().unwrap().unwrap().get(0).unwrap().is_null());
    }

    #[test]
    fn timestamp_preserves_the_stored_wall_clock() {
        let epoch_day = -JULIAN_EPOCH_MILLIS / MILLIS_PER_DAY;
        let stored_date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let unix_epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let days = (epoch_day + stored_date.signed_duration_since(unix_epoch).num_days()) as i32;
        let millis = ((10 * 3600 + 30 * 60) * 1000) as i32;

        let mut body = Vec::new();
        body.extend_from_slice(&days.to_le_bytes());
        body.extend_from_slice(&millis.to_le_bytes());
        let bytes = table(
            &[descriptor("SEEN", b'T', 8, 0, 0)],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        let stamp = record.get(0).unwrap().as_timestamp().unwrap();
        assert_eq!(
            stamp.naive_local(),
            stored_date.and_hms_opt(10, 30, 0).unwrap()
        );
    }

    #[test]
    fn zero_timestamp_is_null() {
        let body = vec![0u8; 8];
        let bytes = table(
            &[descriptor("SEEN", b'T', 8, 0, 0)],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        assert!(reader.next_record().unwrap().unwrap().get(0).unwrap().is_null());
    }

    #[test]
    fn memo_fields_without_a_store_decode_to_null() {
        let mut body = Vec::new();
        body.extend_from_slice(b"         8");
        body.extend_from_slice(&8i32.to_le_bytes());
        let bytes = table(
            &[
                descriptor("NOTE", b'M', 10, 0, 0),
                descriptor("PIC", b'P', 4, 0, 0),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert!(record.get(0).unwrap().is_null());
        assert!(record.get(1).unwrap().is_null());
    }

    #[test]
    fn unrecognized_types_are_skipped_as_null() {
        let mut body = Vec::new();
        body.extend_from_slice(b"?????");
        body.extend_from_slice(b" 42");
        let bytes = table(
            &[
                descriptor("MYST", b'Z', 5, 0, 0),
                descriptor("AGE", b'N', 3, 0, 0),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert!(record.get(0).unwrap().is_null());
        assert_eq!(
            record.get(1).unwrap().as_decimal().unwrap().to_string(),
            "42"
        );
    }

    #[test]
    fn null_flag_bits_null_out_nullable_fields() {
        let mut body = Vec::new();
        body.extend_from_slice(b"XXXXXX");
        body.extend_from_slice(b"Hi\0\0\0\0\0\x02");
        body.push(0b0000_0001);
        let bytes = table(
            &[
                descriptor("NAME", b'C', 6, 0, 0x02),
                descriptor("NOTE", b'V', 8, 0, 0),
                descriptor("_NullFlags", b'0', 1, 0, 0x01),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.get(0).unwrap().is_null());
        assert_eq!(record.get(1).unwrap().as_str(), Some("Hi"));
    }

    #[test]
    fn full_width_varchar_keeps_every_declared_byte() {
        let mut body = Vec::new();
        body.extend_from_slice(b"Alice ");
        body.extend_from_slice(b"12345678");
        body.push(0b0000_0010);
        let bytes = table(
            &[
                descriptor("NAME", b'C', 6, 0, 0x02),
                descriptor("NOTE", b'V', 8, 0, 0),
                descriptor("_NullFlags", b'0', 1, 0, 0x01),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_str(), Some("Alice"));
        assert_eq!(record.get(1).unwrap().as_str(), Some("12345678"));
    }

    #[test]
    fn varbinary_truncates_but_stays_bytes() {
        let mut body = Vec::new();
        body.extend_from_slice(&[0xAB, 0xCD, 0, 0, 0, 3]);
        body.push(0b0000_0000);
        let bytes = table(
            &[
                descriptor("DATA", b'Q', 6, 0, 0),
                descriptor("_NullFlags", b'0', 1, 0, 0x01),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_bytes(), Some(&[0xAB, 0xCD, 0][..]));
    }

    #[test]
    fn varchar_without_null_flag_field_stays_raw() {
        let bytes = table(
            &[descriptor("NOTE", b'V', 4, 0, 0)],
            &[(RECORD_PRESENT, b"ab\0\x02".to_vec())],
        );
        let mut reader = reader_over(bytes);

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_bytes(), Some(&b"ab\0\x02"[..]));
    }

    #[test]
    fn skip_records_jumps_whole_rows() {
        let bytes = table(
            &[descriptor("NAME", b'C', 4, 0, 0)],
            &[
                (RECORD_PRESENT, b"one ".to_vec()),
                (RECORD_PRESENT, b"two ".to_vec()),
                (RECORD_PRESENT, b"tres".to_vec()),
            ],
        );
        let mut reader = reader_over(bytes);
        reader.skip_records(2).unwrap();

        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.get(0).unwrap().as_str(), Some("tres"));
    }

    #[test]
    fn rows_expose_fields_by_name() {
        let mut body = Vec::new();
        body.extend_from_slice(b"Alice ");
        body.extend_from_slice(b" 30");
        let bytes = table(
            &[
                descriptor("NAME", b'C', 6, 0, 0),
                descriptor("AGE", b'N', 3, 0, 0),
            ],
            &[(RECORD_PRESENT, body)],
        );
        let mut reader = reader_over(bytes);

        let row = reader.next_row().unwrap().unwrap();
        assert_eq!(row.get_string("name"), Some("Alice"));
        assert_eq!(
            row.get_decimal("AGE").map(|d| d.to_string()),
            Some("30".to_string())
        );
        assert!(row.get("salary").is_none());
        assert!(reader.next_row().unwrap().is_none());
    }
}
