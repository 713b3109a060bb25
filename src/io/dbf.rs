//! `.dbf` attribute table of a shapefile, read through the `dbase` crate.
//!
//! The header is bounds-checked against the file before any record is
//! touched: the record count comes from the file itself and a corrupt count
//! must surface as a parse error.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use chrono::NaiveDate;
use shapefile::dbase::encoding::EncodingRs;
use shapefile::dbase::encoding_rs::{self, Encoding};
use shapefile::dbase::{self, FieldValue as DbfValue};

use crate::domain::{FieldValue, RawRow};
use crate::error::AppError;

const HEADER_LEN: usize = 32;
const DELETED_FLAG: u8 = b'*';
/// Visual FoxPro headers carry a 263-byte backlink after the descriptors.
const FOXPRO_BACKLINK: usize = 263;

/// Text encoding named by a `.cpg` sidecar; UTF-8 when the label is unknown.
pub fn code_page(label: &str) -> &'static Encoding {
    let label = label.trim();
    let label = if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
        format!("windows-{label}")
    } else {
        label.to_string()
    };
    Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8)
}

/// Decoded table. Deleted records are kept as `None` so callers can keep
/// them aligned with the geometry file.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfTable {
    pub columns: Vec<String>,
    pub records: Vec<Option<RawRow>>,
}

/// Record layout declared by the 32-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    records: usize,
    header_len: usize,
    record_len: usize,
}

impl Layout {
    fn read(bytes: &[u8]) -> Result<Self, AppError> {
        let header = bytes.get(..HEADER_LEN).ok_or_else(|| truncated("header"))?;
        let mut cur = Cursor::new(header);
        let version = cur.read_u8().map_err(|_| truncated("header"))?;
        cur.set_position(4);
        let records = cur.read_u32::<LittleEndian>().map_err(|_| truncated("header"))? as usize;
        let header_len = cur.read_u16::<LittleEndian>().map_err(|_| truncated("header"))? as usize;
        let record_len = cur.read_u16::<LittleEndian>().map_err(|_| truncated("header"))? as usize;

        let min_header = match version {
            0x30..=0x32 => HEADER_LEN + 1 + FOXPRO_BACKLINK,
            _ => HEADER_LEN + 1,
        };
        if header_len < min_header || record_len == 0 {
            return Err(AppError::parse(format!(
                "dbf header is corrupt (header length {header_len}, record length {record_len})"
            )));
        }

        let needed = records
            .checked_mul(record_len)
            .and_then(|n| n.checked_add(header_len));
        match needed {
            Some(n) if n <= bytes.len() => Ok(Self {
                records,
                header_len,
                record_len,
            }),
            _ => Err(truncated(&format!("{records} records of {record_len} bytes"))),
        }
    }

    fn deleted(&self, bytes: &[u8]) -> Vec<bool> {
        (0..self.records)
            .map(|i| bytes.get(self.header_len + i * self.record_len) == Some(&DELETED_FLAG))
            .collect()
    }
}

fn truncated(what: &str) -> AppError {
    AppError::parse(format!("dbf file truncated while reading {what}"))
}

fn dbase_error(e: dbase::Error) -> AppError {
    AppError::parse(format!("dbf: {e}"))
}

pub fn read_dbf(bytes: &[u8], encoding: &'static Encoding) -> Result<DbfTable, AppError> {
    let layout = Layout::read(bytes)?;
    let deleted = layout.deleted(bytes);
    let live = deleted.iter().filter(|d| !**d).count();

    let mut reader = dbase::Reader::new(Cursor::new(bytes)).map_err(dbase_error)?;
    reader.set_encoding(EncodingRs::from(encoding));
    let columns: Vec<String> = reader
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();

    // The dbase iterator skips deleted records on its own.
    let mut live_records = reader.iter_records().take(live);
    let mut records = Vec::with_capacity(deleted.len());
    for (index, is_deleted) in deleted.into_iter().enumerate() {
        if is_deleted {
            records.push(None);
            continue;
        }
        let mut record = live_records
            .next()
            .ok_or_else(|| truncated(&format!("record {index}")))?
            .map_err(dbase_error)?;

        let row: RawRow = columns
            .iter()
            .map(|name| {
                let value = record.remove(name).map(convert).unwrap_or(FieldValue::Null);
                (name.clone(), value)
            })
            .collect();
        records.push(Some(row));
    }

    Ok(DbfTable { columns, records })
}

fn convert(value: DbfValue) -> FieldValue {
    match value {
        DbfValue::Character(Some(s)) | DbfValue::Memo(s) => FieldValue::Text(s),
        DbfValue::Numeric(Some(v)) => number(v),
        DbfValue::Float(Some(v)) => FieldValue::Float(f64::from(v)),
        DbfValue::Logical(Some(b)) => FieldValue::Bool(b),
        DbfValue::Date(Some(d)) => date(d).map_or(FieldValue::Null, FieldValue::Date),
        DbfValue::Integer(v) => FieldValue::Int(i64::from(v)),
        DbfValue::Double(v) | DbfValue::Currency(v) => FieldValue::Float(v),
        DbfValue::DateTime(dt) => {
            let time = dt.time();
            date(dt.date())
                .and_then(|d| d.and_hms_opt(time.hours(), time.minutes(), time.seconds()))
                .map_or(FieldValue::Null, FieldValue::DateTime)
        }
        DbfValue::Character(None)
        | DbfValue::Numeric(None)
        | DbfValue::Float(None)
        | DbfValue::Logical(None)
        | DbfValue::Date(None) => FieldValue::Null,
    }
}

/// Whole numbers (years, months, counts) come back as integers.
fn number(v: f64) -> FieldValue {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        FieldValue::Int(v as i64)
    } else {
        FieldValue::Float(v)
    }
}

fn date(d: dbase::Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(d.year()).ok()?, d.month(), d.day())
}
