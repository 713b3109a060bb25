//! Loader configuration.
//!
//! The library never reads the environment on its own: callers build a
//! `LoaderConfig` directly, and the `nfdb` binary uses `from_env` (with an
//! optional `.env` file) before applying command-line overrides.

use std::time::Duration;

use crate::error::AppError;

/// Current national fire-point archive.
pub const NFDB_URL: &str =
    "https://cwfis.cfs.nrcan.gc.ca/downloads/nfdb/fire_pnt/current_version/NFDB_point.zip";

/// Maximum tolerated share of rejected rows.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

pub const DEFAULT_USER_AGENT: &str = concat!("nfdb-fires/", env!("CARGO_PKG_VERSION"));

pub const ENV_URL: &str = "NFDB_URL";
pub const ENV_TOLERANCE: &str = "NFDB_TOLERANCE";
pub const ENV_TIMEOUT_SECS: &str = "NFDB_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub url: String,
    pub tolerance: f64,
    /// Whole-request HTTP timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            url: NFDB_URL.to_string(),
            tolerance: DEFAULT_TOLERANCE,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject values the loader cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        check_tolerance(self.tolerance)?;
        if self.url.trim().is_empty() {
            return Err(AppError::config("archive URL is empty"));
        }
        Ok(())
    }

    /// Defaults overridden by `NFDB_*` variables (a `.env` file is honored).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// Only malformed values fail here. Range checks are left to `validate`,
    /// which callers run once command-line overrides have been applied.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            config.url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TOLERANCE) {
            config.tolerance = raw.trim().parse::<f64>().map_err(|_| {
                AppError::config(format!("{ENV_TOLERANCE} must be a number, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Tolerance must be a share in `[0, 1]`.
pub fn check_tolerance(tolerance: f64) -> Result<f64, AppError> {
    if tolerance.is_finite() && (0.0..=1.0).contains(&tolerance) {
        Ok(tolerance)
    } else {
        Err(AppError::config(format!(
            "tolerance must be between 0 and 1, got {tolerance}"
        )))
    }
}
