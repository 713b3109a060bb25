//! Data sources for the fire archive.

pub mod archive;

pub use archive::{ArchiveSource, FileArchiveSource, HttpArchiveSource, read_archive};
