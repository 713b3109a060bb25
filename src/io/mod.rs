//! Input/output helpers.
//!
//! - point shapefile reader (`shapefile`) and its `.dbf`/`.prj` sidecars
//! - dataset exports (CSV/GeoJSON) (`export`)

pub mod dbf;
pub mod export;
pub mod prj;
pub mod shapefile;

pub use export::*;
