//! Field-level coercions from loosely-typed agency values.
//!
//! Each function takes one raw cell and either returns the typed value or a
//! short reason string. Missing input is `FieldValue::Null`.

use chrono::NaiveDate;

use crate::domain::{FieldValue, Prescribed};

/// Marker the agencies use for prescribed burns.
const PRESCRIBED_MARKER: &str = "PB";

/// Date strings that mean "no date".
const NULL_DATES: [&str; 3] = ["", "0000/00/00", "0000-00-00"];

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

/// Prescribed-burn flag. Never fails and never invents a `No`.
pub fn coerce_prescribed(value: &FieldValue) -> Prescribed {
    match value {
        FieldValue::Bool(b) => Prescribed::from(*b),
        FieldValue::Text(s) if s.trim() == PRESCRIBED_MARKER => Prescribed::Yes,
        _ => Prescribed::Unknown,
    }
}

/// Calendar date. Never fails: anything unparseable is absent.
pub fn coerce_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Date(d) => Some(*d),
        FieldValue::DateTime(dt) => Some(dt.date()),
        FieldValue::Text(s) => parse_date_text(s),
        _ => None,
    }
}

/// Sentinels are matched after trimming; the date itself must be exact, so
/// surrounding whitespace makes it unparseable.
fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if NULL_DATES.contains(&s) || s.len() != raw.len() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Integer. Integral floats and numeric strings are accepted.
pub fn coerce_int(value: &FieldValue) -> Result<Option<i64>, String> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Int(v) => Ok(Some(*v)),
        FieldValue::Float(v) => float_to_int(*v),
        FieldValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            if let Ok(v) = s.parse::<i64>() {
                return Ok(Some(v));
            }
            match s.parse::<f64>() {
                Ok(v) => float_to_int(v),
                Err(_) => Err(format!("expected an integer, got '{s}'")),
            }
        }
        other => Err(format!("expected an integer, got {}", describe(other))),
    }
}

fn float_to_int(v: f64) -> Result<Option<i64>, String> {
    if v.is_nan() {
        return Ok(None);
    }
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(format!("expected an integer, got {v}"));
    }
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return Err(format!("integer out of range: {v}"));
    }
    Ok(Some(v as i64))
}

/// Finite float. `NaN` (the usual null marker of numeric columns) is absent.
pub fn coerce_float(value: &FieldValue) -> Result<Option<f64>, String> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Int(v) => Ok(Some(*v as f64)),
        FieldValue::Float(v) if v.is_nan() => Ok(None),
        FieldValue::Float(v) if v.is_finite() => Ok(Some(*v)),
        FieldValue::Float(v) => Err(format!("expected a finite number, got {v}")),
        FieldValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(format!("expected a number, got '{s}'")),
            }
        }
        other => Err(format!("expected a number, got {}", describe(other))),
    }
}

/// Free text. Blank strings are absent; scalars are rendered as text.
pub fn coerce_text(value: &FieldValue) -> Result<Option<String>, String> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        FieldValue::Float(v) if v.is_nan() => Ok(None),
        FieldValue::Bool(_)
        | FieldValue::Int(_)
        | FieldValue::Float(_)
        | FieldValue::Date(_)
        | FieldValue::DateTime(_) => Ok(Some(value.to_cell())),
        FieldValue::Location(..) => Err("expected text, got a coordinate pair".to_string()),
    }
}

/// Explicit `(latitude, longitude)` pair, if one was supplied.
pub fn coerce_location(value: &FieldValue) -> Result<Option<(f64, f64)>, String> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Location(lat, lon) if lat.is_finite() && lon.is_finite() => Ok(Some((*lat, *lon))),
        other => Err(format!(
            "expected a (latitude, longitude) pair, got {}",
            describe(other)
        )),
    }
}

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Bool(b) => format!("boolean {b}"),
        FieldValue::Int(v) => format!("integer {v}"),
        FieldValue::Float(v) => format!("number {v}"),
        FieldValue::Text(s) => format!("'{s}'"),
        FieldValue::Date(d) => format!("date {d}"),
        FieldValue::DateTime(dt) => format!("datetime {dt}"),
        FieldValue::Location(lat, lon) => format!("pair ({lat}, {lon})"),
    }
}
