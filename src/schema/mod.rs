//! Record schema: turns one loosely-typed attribute row into a `FireRecord`.
//!
//! Lookup accepts either the agency short code (`FIRENAME`) or the semantic
//! name (`fire_name`); the short code wins when both are present. Columns the
//! schema does not know are ignored.
//!
//! Coercion is deliberately forgiving for dates and the prescribed flag
//! (bad values become absent) and strict for coordinates and year/month
//! (bad or missing values reject the row).

use thiserror::Error;

use crate::domain::{FieldValue, FireRecord, RawRow};

pub mod aliases;
pub mod coerce;

pub use aliases::{FIELD_ALIASES, alias_map, semantic_name, short_code};

/// Reason shown when either coordinate is absent.
pub const MISSING_COORDINATES: &str = "missing coordinates";

/// A single row failed to coerce into a `FireRecord`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct RecordError {
    /// Semantic name of the offending field.
    pub field: &'static str,
    pub reason: String,
}

impl RecordError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

const NULL: &FieldValue = &FieldValue::Null;

/// Look up a field by short code, then by semantic name.
fn lookup<'a>(row: &'a RawRow, name: &str) -> &'a FieldValue {
    short_code(name)
        .and_then(|code| row.get(code))
        .or_else(|| row.get(name))
        .unwrap_or(NULL)
}

fn text(row: &RawRow, field: &'static str) -> Result<Option<String>, RecordError> {
    coerce::coerce_text(lookup(row, field)).map_err(|e| RecordError::new(field, e))
}

fn required_int(row: &RawRow, field: &'static str) -> Result<i64, RecordError> {
    coerce::coerce_int(lookup(row, field))
        .map_err(|e| RecordError::new(field, e))?
        .ok_or_else(|| RecordError::new(field, "field required"))
}

fn coordinate(row: &RawRow, field: &'static str) -> Result<f64, RecordError> {
    coerce::coerce_float(lookup(row, field))
        .map_err(|e| RecordError::new(field, e))?
        .ok_or_else(|| RecordError::new(field, MISSING_COORDINATES))
}

/// Build a validated record from one raw row.
pub fn build_record(row: &RawRow) -> Result<FireRecord, RecordError> {
    let latitude = coordinate(row, "latitude")?;
    let longitude = coordinate(row, "longitude")?;
    let location = coerce::coerce_location(lookup(row, "location"))
        .map_err(|e| RecordError::new("location", e))?
        .unwrap_or((latitude, longitude));

    Ok(FireRecord {
        nfdb_fire_id: text(row, "nfdb_fire_id")?,
        fire_id: text(row, "fire_id")?,
        fire_name: text(row, "fire_name")?,
        src_agency: text(row, "src_agency")?,
        agency_response: text(row, "agency_response")?,
        year: required_int(row, "year")?,
        month: required_int(row, "month")?,
        day: coerce::coerce_int(lookup(row, "day")).map_err(|e| RecordError::new("day", e))?,
        ignition_date: coerce::coerce_date(lookup(row, "ignition_date")),
        report_date: coerce::coerce_date(lookup(row, "report_date")),
        out_date: coerce::coerce_date(lookup(row, "out_date")),
        acq_date: coerce::coerce_date(lookup(row, "acq_date")),
        cause_primary: text(row, "cause_primary")?,
        cause_secondary: text(row, "cause_secondary")?,
        fire_type: text(row, "fire_type")?,
        size_ha: coerce::coerce_float(lookup(row, "size_ha"))
            .map_err(|e| RecordError::new("size_ha", e))?,
        prescribed: coerce::coerce_prescribed(lookup(row, "prescribed")),
        national_park: text(row, "national_park")?,
        protection_zone: text(row, "protection_zone")?,
        more_info: text(row, "more_info")?,
        note1: text(row, "note1")?,
        note2: text(row, "note2")?,
        latitude,
        longitude,
        location,
    })
}
