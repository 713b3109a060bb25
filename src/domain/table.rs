//! Tabular containers: raw attribute values, point geometry, geometry tables.
//!
//! A `GeoTable` is what the archive reader hands over (agency column names,
//! source CRS). A `Dataset` is what consumers read after a load: lowercase
//! column names and WGS84 coordinates.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::record::FireRecord;
use crate::schema::coerce::coerce_date;

/// A loosely-typed attribute value as read from the source table.
///
/// Serialized untagged, so JSON fixtures can be written as plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// A `(latitude, longitude)` pair.
    Location(f64, f64),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render for flat text outputs (CSV cells, terminal tables).
    ///
    /// `Null` renders as an empty string.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.to_string(),
            FieldValue::DateTime(dt) => dt.to_string(),
            FieldValue::Location(lat, lon) => format!("({lat}, {lon})"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// One row of attributes, keyed by column name, in column order.
pub type RawRow = IndexMap<String, FieldValue>;

/// A point geometry. `x` is easting/longitude, `y` is northing/latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Attributes plus the row's geometry (absent for null shapes).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRow {
    pub attributes: RawRow,
    pub geometry: Option<GeoPoint>,
}

/// Coordinate reference system of a geometry table.
#[derive(Debug, Clone, PartialEq)]
pub enum Crs {
    /// Longitude/latitude degrees on a WGS84-compatible datum.
    Geographic { name: String },
    /// Planar coordinates, described by a PROJ.4 definition string.
    Projected { name: String, proj: String },
}

impl Crs {
    pub const WGS84_NAME: &'static str = "EPSG:4326";

    pub fn wgs84() -> Self {
        Crs::Geographic {
            name: Self::WGS84_NAME.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Crs::Geographic { name } | Crs::Projected { name, .. } => name,
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic { .. })
    }
}

/// The raw geometry table produced by the archive reader.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTable {
    pub crs: Crs,
    pub columns: Vec<String>,
    pub rows: Vec<GeoRow>,
}

impl GeoTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The dataset exposed to consumers after a load.
///
/// Columns are lowercase and coordinates are WGS84. `records` is populated
/// only when the load ran validation; it is index-aligned with `rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<GeoRow>,
    pub records: Option<Vec<FireRecord>>,
}

impl Dataset {
    /// Build a dataset from a table, lowercasing every column name.
    pub fn from_table(table: GeoTable) -> Self {
        let columns = table.columns.iter().map(|c| c.to_lowercase()).collect();
        let rows = table
            .rows
            .into_iter()
            .map(|row| GeoRow {
                attributes: row
                    .attributes
                    .into_iter()
                    .map(|(k, v)| (k.to_lowercase(), v))
                    .collect(),
                geometry: row.geometry,
            })
            .collect();
        Self {
            columns,
            rows,
            records: None,
        }
    }

    /// Build a dataset from validated records and their original geometry.
    pub fn from_records(records: Vec<(FireRecord, Option<GeoPoint>)>) -> Self {
        let columns = FireRecord::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut rows = Vec::with_capacity(records.len());
        let mut typed = Vec::with_capacity(records.len());
        for (record, geometry) in records {
            rows.push(GeoRow {
                attributes: record.to_row(),
                geometry,
            });
            typed.push(record);
        }
        Self {
            columns,
            rows,
            records: Some(typed),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> Option<&[FireRecord]> {
        self.records.as_deref()
    }

    pub fn is_validated(&self) -> bool {
        self.records.is_some()
    }

    /// All values of one column, in row order. Missing cells read as `Null`.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        const NULL: &FieldValue = &FieldValue::Null;
        self.rows
            .iter()
            .map(move |row| row.attributes.get(name).unwrap_or(NULL))
    }

    /// The subset of rows reported on or after `since`.
    ///
    /// Rows without a report date are excluded. On an unvalidated dataset the
    /// `report_date` (or agency `rep_date`) cell is read with the same date
    /// rules as record validation.
    pub fn reported_since(&self, since: NaiveDate) -> Dataset {
        let keep: Vec<bool> = match &self.records {
            Some(records) => records
                .iter()
                .map(|r| r.report_date.is_some_and(|d| d >= since))
                .collect(),
            None => self
                .rows
                .iter()
                .map(|row| {
                    row.attributes
                        .get("report_date")
                        .or_else(|| row.attributes.get("rep_date"))
                        .and_then(coerce_date)
                        .is_some_and(|d| d >= since)
                })
                .collect(),
        };

        let rows = self
            .rows
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(r, _)| r.clone())
            .collect();
        let records = self.records.as_ref().map(|records| {
            records
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(r, _)| r.clone())
                .collect()
        });

        Dataset {
            columns: self.columns.clone(),
            rows,
            records,
        }
    }
}
