//! Command-line parsing for the NFDB fire-point loader.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nfdb", version, about = "National Fire Database point loader and validator")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, validate and summarize the fire archive; optionally export it.
    Load(LoadArgs),
    /// Print the agency short code to field name table.
    Aliases,
}

#[derive(Debug, Args, Clone)]
pub struct LoadArgs {
    /// Archive URL (defaults to NFDB_URL or the national archive).
    #[arg(long)]
    pub url: Option<String>,

    /// Read a local zip archive instead of downloading.
    #[arg(long, value_name = "ZIP", conflicts_with = "url")]
    pub archive: Option<PathBuf>,

    /// Skip validation and keep every row as read.
    #[arg(long)]
    pub no_validate: bool,

    /// Share of rejected rows tolerated before the load is reported degraded.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// HTTP timeout in seconds (no timeout by default).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Only keep fires reported on or after this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub since: Option<NaiveDate>,

    /// Number of causes listed in the summary.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Export attributes to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export attributes and points to GeoJSON.
    #[arg(long = "export-geojson", value_name = "JSON")]
    pub export_geojson: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_flags() {
        let cli = Cli::parse_from([
            "nfdb",
            "load",
            "--archive",
            "fires.zip",
            "--no-validate",
            "--since",
            "2023-06-01",
            "--export-csv",
            "out.csv",
        ]);
        let Command::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert_eq!(args.archive, Some(PathBuf::from("fires.zip")));
        assert!(args.no_validate);
        assert_eq!(args.since, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(args.top, 5);
    }

    #[test]
    fn url_and_archive_conflict() {
        let res = Cli::try_parse_from(["nfdb", "load", "--url", "http://x", "--archive", "a.zip"]);
        assert!(res.is_err());
    }

    #[test]
    fn bad_since_date() {
        assert!(Cli::try_parse_from(["nfdb", "load", "--since", "06/01/2023"]).is_err());
    }
}
