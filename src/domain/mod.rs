//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated observation (`FireRecord`, `Prescribed`)
//! - raw attribute values and rows (`FieldValue`, `RawRow`)
//! - geometry tables before and after a load (`GeoTable`, `Dataset`)

pub mod record;
pub mod table;

pub use record::*;
pub use table::*;
