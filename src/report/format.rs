//! Formatted terminal output for `nfdb`.
//!
//! We keep formatting code in one place so output changes are localized.

use crate::report::{CauseCount, LoadSummary};
use crate::schema::FIELD_ALIASES;
use crate::validate::ValidationReport;

/// Format the summary printed after a load.
pub fn format_load_summary(
    summary: &LoadSummary,
    report: Option<&ValidationReport>,
    source: &str,
) -> String {
    let mut out = String::new();

    out.push_str("=== nfdb - National Fire Database points ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: {} ({} with geometry)\n",
        summary.rows, summary.with_geometry
    ));

    match report {
        Some(r) => out.push_str(&format!(
            "Validation: {}/{} accepted, {} rejected | pass rate {:.2}% | threshold {:.2}% | {}\n",
            r.accepted,
            r.total,
            r.rejected,
            r.pass_rate * 100.0,
            r.threshold() * 100.0,
            r.health
        )),
        None => out.push_str("Validation: skipped\n"),
    }

    match summary.year_range {
        Some((lo, hi)) => out.push_str(&format!("Years: {lo}-{hi}\n")),
        None => out.push_str("Years: n/a\n"),
    }
    out.push_str(&format!(
        "Burned area: {:.1} ha ({} fires of unknown size)\n",
        summary.total_ha, summary.unknown_size
    ));

    if !summary.top_causes.is_empty() {
        out.push_str("\nTop causes:\n");
        out.push_str(&format_cause_table(&summary.top_causes));
    }

    out
}

fn format_cause_table(rows: &[CauseCount]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<10} {:>8} {:>14}", "cause", "fires", "hectares").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<8} {:-<14}", "", "", "").trim_end());
    out.push('\n');

    for c in rows {
        out.push_str(
            format!(
                "{:<10} {:>8} {:>14.1}",
                truncate(&c.cause, 10),
                c.fires,
                c.hectares
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format the agency short code table.
pub fn format_alias_table() -> String {
    let mut out = String::new();
    out.push_str(format!("{:<12} {}", "code", "field").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<16}", "", "").trim_end());
    out.push('\n');
    for (code, name) in FIELD_ALIASES {
        out.push_str(&format!("{code:<12} {name}\n"));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
