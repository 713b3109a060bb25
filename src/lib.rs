//! `nfdb-fires` library crate.
//!
//! Loads the National Fire Database point archive, coerces each row into a
//! typed `FireRecord`, and reports how much of the archive passed.
//!
//! The binary (`nfdb`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - dashboards and notebooks can use `FireDataLoader` directly

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod geo;
pub mod io;
pub mod loader;
pub mod logging;
pub mod report;
pub mod schema;
pub mod validate;

pub use domain::{Dataset, FireRecord, Prescribed};
pub use error::{AppError, ErrorKind};
pub use loader::FireDataLoader;
pub use validate::{Health, ValidationReport, Validator};
