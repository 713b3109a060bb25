//! The load pipeline shared by the loader and the CLI.
//!
//! fetch -> extract + parse -> reproject -> validate (optional) -> normalize
//!
//! The validated branch emits the semantic column names of `FireRecord`;
//! the unvalidated branch keeps the source columns. Both are lowercased.

use tracing::info;

use crate::data::archive::{ArchiveSource, read_archive};
use crate::domain::Dataset;
use crate::error::AppError;
use crate::geo;
use crate::validate::{ValidationReport, Validator};

/// Everything a single load produced.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub dataset: Dataset,
    /// Present only when validation ran.
    pub report: Option<ValidationReport>,
    pub source: String,
}

/// Run one load. `validator` of `None` skips validation entirely.
pub fn run_pipeline<S>(source: &S, validator: Option<&Validator>) -> Result<LoadOutput, AppError>
where
    S: ArchiveSource + ?Sized,
{
    // 1) Fetch and parse; the scratch directory is gone once this returns.
    let bytes = source.fetch()?;
    let table = read_archive(&bytes)?;
    info!(rows = table.len(), crs = table.crs.name(), "parsed fire archive");

    // 2) Everything downstream works in WGS84.
    let table = geo::to_wgs84(table)?;

    // 3) Validate, then lowercase the columns.
    let (dataset, report) = match validator {
        Some(v) => {
            let validated = v.validate(&table)?;
            (Dataset::from_records(validated.records), Some(validated.report))
        }
        None => (Dataset::from_table(table), None),
    };

    Ok(LoadOutput {
        dataset,
        report,
        source: source.describe(),
    })
}
