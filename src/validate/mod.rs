//! Row-by-row validation with a pass-rate health signal.
//!
//! Every row is run through `schema::build_record`. Rows that coerce are kept
//! with their geometry, in input order; rows that fail are logged and counted
//! but not retained. The health verdict is advisory: the accepted subset is
//! always returned.

use std::fmt;

use tracing::{error, info, warn};

use crate::config::{DEFAULT_TOLERANCE, check_tolerance};
use crate::domain::{FireRecord, GeoPoint, GeoTable};
use crate::error::AppError;
use crate::schema::build_record;

/// Default prefix on health log lines.
pub const DEFAULT_TAG: &str = "🔥";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Healthy,
    Degraded,
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Health::Healthy => f.write_str("healthy"),
            Health::Degraded => f.write_str("degraded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// `accepted / total`, in `[0, 1]`.
    pub pass_rate: f64,
    pub tolerance: f64,
    pub health: Health,
}

impl ValidationReport {
    pub fn is_healthy(&self) -> bool {
        self.health == Health::Healthy
    }

    /// Lowest pass rate still considered healthy.
    pub fn threshold(&self) -> f64 {
        1.0 - self.tolerance
    }
}

/// Accepted records (with their geometry) and the run's report.
#[derive(Debug, Clone)]
pub struct Validated {
    pub records: Vec<(FireRecord, Option<GeoPoint>)>,
    pub report: ValidationReport,
}

#[derive(Debug, Clone)]
pub struct Validator {
    tolerance: f64,
    tag: String,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl Validator {
    pub fn new(tolerance: f64) -> Result<Self, AppError> {
        Ok(Self {
            tolerance: check_tolerance(tolerance)?,
            ..Self::default()
        })
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn validate(&self, table: &GeoTable) -> Result<Validated, AppError> {
        let total = table.len();
        if total == 0 {
            return Err(AppError::empty_dataset("no rows to validate"));
        }

        let mut records = Vec::with_capacity(total);
        let mut rejected = 0usize;
        for (idx, row) in table.rows.iter().enumerate() {
            match build_record(&row.attributes) {
                Ok(record) => records.push((record, row.geometry)),
                Err(e) => {
                    rejected += 1;
                    warn!(row = idx, field = e.field, reason = %e.reason, "record rejected");
                }
            }
        }

        let accepted = records.len();
        let pass_rate = accepted as f64 / total as f64;
        let health = if pass_rate >= 1.0 - self.tolerance {
            Health::Healthy
        } else {
            Health::Degraded
        };

        let report = ValidationReport {
            total,
            accepted,
            rejected,
            pass_rate,
            tolerance: self.tolerance,
            health,
        };
        self.log_verdict(&report);

        Ok(Validated { records, report })
    }

    fn log_verdict(&self, report: &ValidationReport) {
        let pct = report.pass_rate * 100.0;
        match report.health {
            Health::Healthy => info!(
                accepted = report.accepted,
                rejected = report.rejected,
                "{} pass rate {pct:.2}% (threshold {:.2}%)",
                self.tag,
                report.threshold() * 100.0
            ),
            Health::Degraded => error!(
                accepted = report.accepted,
                rejected = report.rejected,
                "{} pass rate {pct:.2}% below threshold {:.2}%",
                self.tag,
                report.threshold() * 100.0
            ),
        }
    }
}
