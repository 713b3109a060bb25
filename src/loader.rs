//! Dataset loader with an in-process cache.
//!
//! A `FireDataLoader` owns one archive source and at most one loaded
//! dataset. `load` reuses that dataset until the caller forces a reload or
//! calls `reset`; a failed load leaves the previous dataset in place.

use tracing::debug;

use crate::app::pipeline::run_pipeline;
use crate::config::LoaderConfig;
use crate::data::archive::{ArchiveSource, HttpArchiveSource};
use crate::domain::Dataset;
use crate::error::AppError;
use crate::validate::{ValidationReport, Validator};

pub struct FireDataLoader<S: ArchiveSource> {
    source: S,
    validator: Validator,
    data: Option<Dataset>,
    last_report: Option<ValidationReport>,
}

impl FireDataLoader<HttpArchiveSource> {
    /// Loader for the configured URL.
    pub fn new(config: &LoaderConfig) -> Result<Self, AppError> {
        config.validate()?;
        let source = HttpArchiveSource::new(config)?;
        Self::with_source(source, config.tolerance)
    }
}

impl<S: ArchiveSource> FireDataLoader<S> {
    pub fn with_source(source: S, tolerance: f64) -> Result<Self, AppError> {
        Ok(Self {
            source,
            validator: Validator::new(tolerance)?,
            data: None,
            last_report: None,
        })
    }

    /// Replace the validator (e.g. to change the log tag).
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Return the cached dataset, or run the pipeline and cache its result.
    ///
    /// With `validate == false` rows are not checked and no report is kept.
    pub fn load(&mut self, force_reload: bool, validate: bool) -> Result<&Dataset, AppError> {
        if !force_reload && self.data.is_some() {
            debug!(source = %self.source.describe(), "returning cached dataset");
        } else {
            let validator = validate.then_some(&self.validator);
            let output = run_pipeline(&self.source, validator)?;
            self.last_report = output.report;
            self.data = Some(output.dataset);
        }

        self.data
            .as_ref()
            .ok_or_else(|| AppError::empty_dataset("no dataset loaded"))
    }

    /// The cached dataset, if any load has succeeded.
    pub fn data(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    /// Report of the most recent load; `None` if it skipped validation.
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop the cached dataset so the next `load` fetches again.
    pub fn reset(&mut self) {
        self.data = None;
        self.last_report = None;
    }
}
