//! Archive fetcher: get the zipped shapefile, unpack it, read the points.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::domain::GeoTable;
use crate::error::AppError;
use crate::io::shapefile;

/// Where the zip archive comes from.
pub trait ArchiveSource {
    /// Human-readable origin, for logs and summaries.
    fn describe(&self) -> String;

    /// The complete archive bytes.
    fn fetch(&self) -> Result<Vec<u8>, AppError>;
}

impl<S: ArchiveSource + ?Sized> ArchiveSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> Result<Vec<u8>, AppError> {
        (**self).fetch()
    }
}

/// Blocking HTTP GET of a fixed URL.
pub struct HttpArchiveSource {
    client: Client,
    url: String,
}

impl HttpArchiveSource {
    pub fn new(config: &LoaderConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, AppError> {
        info!(url = %self.url, "downloading fire archive");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::network(format!("request to {} failed: {e}", self.url)))?;

        if !resp.status().is_success() {
            return Err(AppError::network(format!(
                "request to {} failed with status {}",
                self.url,
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AppError::network(format!("failed to read body from {}: {e}", self.url)))?;
        info!(bytes = bytes.len(), "archive downloaded");
        Ok(bytes.to_vec())
    }
}

/// A zip archive already on disk.
pub struct FileArchiveSource {
    path: PathBuf,
}

impl FileArchiveSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArchiveSource for FileArchiveSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, AppError> {
        fs::read(&self.path).map_err(|e| {
            AppError::io(format!("failed to read archive '{}': {e}", self.path.display()))
        })
    }
}

/// Unpack `bytes` into `dir`.
pub fn extract(bytes: &[u8], dir: &Path) -> Result<(), AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::archive(format!("not a readable zip archive: {e}")))?;
    debug!(entries = archive.len(), dir = %dir.display(), "extracting archive");
    archive
        .extract(dir)
        .map_err(|e| AppError::archive(format!("failed to extract archive: {e}")))
}

/// First `.shp` under `dir`, walking entries in name order.
///
/// Symbolic links are never followed, so a link cycle inside an extracted
/// archive cannot recurse forever.
pub fn find_first_shp(dir: &Path) -> Result<Option<PathBuf>, AppError> {
    let mut entries: Vec<(PathBuf, fs::FileType)> = fs::read_dir(dir)
        .map_err(|e| AppError::archive(format!("cannot list '{}': {e}", dir.display())))?
        .filter_map(Result::ok)
        .filter_map(|e| Some((e.path(), e.file_type().ok()?)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, kind) in &entries {
        if kind.is_file() && has_extension(path, "shp") {
            return Ok(Some(path.clone()));
        }
    }
    for (path, _) in entries.iter().filter(|(_, kind)| kind.is_dir()) {
        if let Some(found) = find_first_shp(path)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Extract a zipped shapefile into a scratch directory and read it.
///
/// The scratch directory is removed when this returns, on success or error.
pub fn read_archive(bytes: &[u8]) -> Result<GeoTable, AppError> {
    let scratch = tempfile::Builder::new()
        .prefix("nfdb-")
        .tempdir()
        .map_err(|e| AppError::io(format!("failed to create scratch directory: {e}")))?;

    extract(bytes, scratch.path())?;
    let shp = find_first_shp(scratch.path())?
        .ok_or_else(|| AppError::archive("archive contains no .shp file"))?;
    info!(file = %shp.display(), "reading shapefile");

    shapefile::read_geo_table(&shp)
}
