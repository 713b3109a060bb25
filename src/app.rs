//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - resolves configuration (.env / environment, then flags)
//! - runs one load through `FireDataLoader`
//! - prints the summary and writes optional exports

use std::time::Duration;

use clap::Parser;

use crate::cli::{Cli, Command, LoadArgs};
use crate::config::LoaderConfig;
use crate::data::archive::{ArchiveSource, FileArchiveSource, HttpArchiveSource};
use crate::error::AppError;
use crate::loader::FireDataLoader;

pub mod pipeline;

/// Entry point for the `nfdb` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose)?;

    match cli.command {
        Command::Load(args) => handle_load(args),
        Command::Aliases => {
            print!("{}", crate::report::format_alias_table());
            Ok(())
        }
    }
}

fn handle_load(args: LoadArgs) -> Result<(), AppError> {
    let config = config_from_args(LoaderConfig::from_env()?, &args);
    config.validate()?;

    let source: Box<dyn ArchiveSource> = match &args.archive {
        Some(path) => Box::new(FileArchiveSource::new(path)),
        None => Box::new(HttpArchiveSource::new(&config)?),
    };

    let mut loader = FireDataLoader::with_source(source, config.tolerance)?;
    let loaded = loader.load(false, !args.no_validate)?;

    let dataset = match args.since {
        Some(since) => loaded.reported_since(since),
        None => loaded.clone(),
    };

    let summary = crate::report::summarize(&dataset, args.top);
    println!(
        "{}",
        crate::report::format_load_summary(
            &summary,
            loader.last_report(),
            &loader.source().describe()
        )
    );

    // Optional exports.
    if let Some(path) = &args.export_csv {
        crate::io::export::write_csv_file(path, &dataset)?;
    }
    if let Some(path) = &args.export_geojson {
        crate::io::export::write_geojson_file(path, &dataset)?;
    }

    Ok(())
}

/// Apply command-line overrides on top of the environment configuration.
pub fn config_from_args(base: LoaderConfig, args: &LoadArgs) -> LoaderConfig {
    let mut config = base;
    if let Some(url) = &args.url {
        config = config.with_url(url.clone());
    }
    if let Some(tolerance) = args.tolerance {
        config = config.with_tolerance(tolerance);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    config
}
