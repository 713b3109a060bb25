//! The validated fire observation.
//!
//! A `FireRecord` is only ever produced by `schema::build_record`, so every
//! instance already satisfies the record invariants: coordinates present and
//! finite, year/month present, dates either real calendar dates or absent.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::table::{FieldValue, RawRow};

/// Agency sentinel for "year unknown".
pub const UNKNOWN_YEAR: i64 = -999;

/// Prescribed-burn flag.
///
/// The source never encodes an explicit "no": blanks and unrecognised codes
/// mean `Unknown`, and only a native boolean can produce `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prescribed {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Prescribed {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Prescribed::Yes => Some(true),
            Prescribed::No => Some(false),
            Prescribed::Unknown => None,
        }
    }
}

impl From<bool> for Prescribed {
    fn from(value: bool) -> Self {
        if value { Prescribed::Yes } else { Prescribed::No }
    }
}

/// One validated wildfire observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRecord {
    pub nfdb_fire_id: Option<String>,
    pub fire_id: Option<String>,
    pub fire_name: Option<String>,

    pub src_agency: Option<String>,
    /// FUL (full), MOD (modified), MON (monitored), or agency-specific classes.
    pub agency_response: Option<String>,

    /// Calendar year; `UNKNOWN_YEAR` when the agency did not know it.
    pub year: i64,
    pub month: i64,
    pub day: Option<i64>,

    pub ignition_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    pub out_date: Option<NaiveDate>,
    pub acq_date: Option<NaiveDate>,

    /// N natural, H human, H-PB human prescribed burn, U unknown.
    pub cause_primary: Option<String>,
    pub cause_secondary: Option<String>,
    pub fire_type: Option<String>,

    /// Burned area. `None` is "size unknown", not zero.
    pub size_ha: Option<f64>,
    pub prescribed: Prescribed,
    pub national_park: Option<String>,
    pub protection_zone: Option<String>,

    pub more_info: Option<String>,
    pub note1: Option<String>,
    pub note2: Option<String>,

    pub latitude: f64,
    pub longitude: f64,
    pub(crate) location: (f64, f64),
}

impl FireRecord {
    /// Output column order (semantic names, lowercase).
    pub const COLUMNS: [&'static str; 25] = [
        "nfdb_fire_id",
        "fire_id",
        "fire_name",
        "src_agency",
        "agency_response",
        "year",
        "month",
        "day",
        "ignition_date",
        "report_date",
        "out_date",
        "acq_date",
        "cause_primary",
        "cause_secondary",
        "fire_type",
        "size_ha",
        "prescribed",
        "national_park",
        "protection_zone",
        "more_info",
        "note1",
        "note2",
        "latitude",
        "longitude",
        "location",
    ];

    /// `(latitude, longitude)`, fixed at construction.
    pub fn location(&self) -> (f64, f64) {
        self.location
    }

    /// The year, or `None` for the agency's unknown-year sentinel.
    pub fn known_year(&self) -> Option<i64> {
        (self.year != UNKNOWN_YEAR).then_some(self.year)
    }

    /// Flatten to a row in `COLUMNS` order.
    pub fn to_row(&self) -> RawRow {
        let (lat, lon) = self.location;
        let cells: [FieldValue; 25] = [
            self.nfdb_fire_id.clone().into(),
            self.fire_id.clone().into(),
            self.fire_name.clone().into(),
            self.src_agency.clone().into(),
            self.agency_response.clone().into(),
            self.year.into(),
            self.month.into(),
            self.day.into(),
            self.ignition_date.into(),
            self.report_date.into(),
            self.out_date.into(),
            self.acq_date.into(),
            self.cause_primary.clone().into(),
            self.cause_secondary.clone().into(),
            self.fire_type.clone().into(),
            self.size_ha.into(),
            self.prescribed.as_bool().into(),
            self.national_park.clone().into(),
            self.protection_zone.clone().into(),
            self.more_info.clone().into(),
            self.note1.clone().into(),
            self.note2.clone().into(),
            self.latitude.into(),
            self.longitude.into(),
            FieldValue::Location(lat, lon),
        ];

        Self::COLUMNS
            .iter()
            .map(|c| c.to_string())
            .zip(cells)
            .collect()
    }
}

impl fmt::Display for FireRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.fire_id.as_deref().unwrap_or("N/A");
        let when = match self.ignition_date {
            Some(d) => d.to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        };
        write!(
            f,
            "🔥 {id} on {when} — {:.1} ha",
            self.size_ha.unwrap_or(0.0)
        )
    }
}
