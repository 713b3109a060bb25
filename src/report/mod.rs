//! Reporting utilities: dataset summary statistics and cause rankings.

use std::collections::HashMap;

use crate::domain::{Dataset, FieldValue, UNKNOWN_YEAR};

pub mod format;

pub use format::*;

/// Fires and burned area attributed to one cause code.
#[derive(Debug, Clone, PartialEq)]
pub struct CauseCount {
    pub cause: String,
    pub fires: usize,
    pub hectares: f64,
}

/// Headline numbers for one loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub rows: usize,
    pub validated: bool,
    pub with_geometry: usize,
    /// Range over known years; the unknown-year sentinel is skipped.
    pub year_range: Option<(i64, i64)>,
    pub total_ha: f64,
    /// Rows whose size is unknown (not counted in `total_ha`).
    pub unknown_size: usize,
    pub top_causes: Vec<CauseCount>,
}

/// Placeholder label for rows without a cause code.
pub const NO_CAUSE: &str = "(none)";

fn as_f64(v: &FieldValue) -> Option<f64> {
    match v {
        FieldValue::Int(i) => Some(*i as f64),
        FieldValue::Float(f) if f.is_finite() => Some(*f),
        FieldValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_cause(v: &FieldValue) -> String {
    match v {
        FieldValue::Null => NO_CAUSE.to_string(),
        other => {
            let s = other.to_cell();
            let s = s.trim();
            if s.is_empty() { NO_CAUSE.to_string() } else { s.to_string() }
        }
    }
}

/// Cause column of a dataset: semantic name when validated, agency code otherwise.
fn cause_column(dataset: &Dataset) -> &'static str {
    if dataset.columns.iter().any(|c| c == "cause_primary") {
        "cause_primary"
    } else {
        "cause"
    }
}

/// Summarize a dataset, keeping the `top_n` most frequent causes.
pub fn summarize(dataset: &Dataset, top_n: usize) -> LoadSummary {
    let years = dataset
        .column("year")
        .filter_map(as_f64)
        .map(|y| y as i64)
        .filter(|y| *y != UNKNOWN_YEAR);
    let year_range = years.fold(None, |acc: Option<(i64, i64)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    });

    let sizes: Vec<Option<f64>> = dataset.column("size_ha").map(as_f64).collect();
    let total_ha = sizes.iter().flatten().sum();
    let unknown_size = sizes.iter().filter(|s| s.is_none()).count();

    LoadSummary {
        rows: dataset.len(),
        validated: dataset.is_validated(),
        with_geometry: dataset.rows.iter().filter(|r| r.geometry.is_some()).count(),
        year_range,
        total_ha,
        unknown_size,
        top_causes: rank_causes(dataset, top_n),
    }
}

/// Most frequent causes first; ties broken by area, then by code.
pub fn rank_causes(dataset: &Dataset, top_n: usize) -> Vec<CauseCount> {
    let mut by_cause: HashMap<String, CauseCount> = HashMap::new();
    for (cause, size) in dataset
        .column(cause_column(dataset))
        .zip(dataset.column("size_ha"))
    {
        let cause = as_cause(cause);
        let entry = by_cause.entry(cause.clone()).or_insert(CauseCount {
            cause,
            fires: 0,
            hectares: 0.0,
        });
        entry.fires += 1;
        entry.hectares += as_f64(size).unwrap_or(0.0);
    }

    let mut ranked: Vec<CauseCount> = by_cause.into_values().collect();
    ranked.sort_by(|a, b| {
        b.fires
            .cmp(&a.fires)
            .then(b.hectares.partial_cmp(&a.hectares).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.cause.cmp(&b.cause))
    });
    ranked.truncate(top_n);
    ranked
}
