//! Export a loaded dataset to CSV or GeoJSON.
//!
//! These are the outbound feed for map renderers and spreadsheets. CSV
//! carries attributes only; GeoJSON adds the WGS84 point geometry.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{Dataset, GeoPoint, RawRow};
use crate::error::AppError;

/// Write attribute columns (no geometry) to a CSV writer.
pub fn write_csv<W: Write>(writer: W, dataset: &Dataset) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(&dataset.columns)
        .map_err(|e| AppError::io(format!("failed to write CSV header: {e}")))?;

    for row in &dataset.rows {
        let cells = dataset
            .columns
            .iter()
            .map(|c| row.attributes.get(c).map(|v| v.to_cell()).unwrap_or_default());
        w.write_record(cells)
            .map_err(|e| AppError::io(format!("failed to write CSV row: {e}")))?;
    }
    w.flush()
        .map_err(|e| AppError::io(format!("failed to flush CSV: {e}")))
}

pub fn write_csv_file(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("failed to create export CSV '{}': {e}", path.display())))?;
    write_csv(file, dataset)?;
    info!(path = %path.display(), rows = dataset.len(), "wrote CSV export");
    Ok(())
}

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Option<Point>,
    properties: &'a RawRow,
}

#[derive(Serialize)]
struct Point {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: [f64; 2],
}

impl From<GeoPoint> for Point {
    fn from(p: GeoPoint) -> Self {
        Self {
            kind: "Point",
            coordinates: [p.x, p.y],
        }
    }
}

/// Write the dataset as a GeoJSON `FeatureCollection`.
pub fn write_geojson<W: Write>(writer: W, dataset: &Dataset) -> Result<(), AppError> {
    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features: dataset
            .rows
            .iter()
            .map(|row| Feature {
                kind: "Feature",
                geometry: row.geometry.map(Point::from),
                properties: &row.attributes,
            })
            .collect(),
    };
    serde_json::to_writer(writer, &collection)
        .map_err(|e| AppError::io(format!("failed to write GeoJSON: {e}")))
}

pub fn write_geojson_file(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!("failed to create export GeoJSON '{}': {e}", path.display()))
    })?;
    write_geojson(std::io::BufWriter::new(file), dataset)?;
    info!(path = %path.display(), rows = dataset.len(), "wrote GeoJSON export");
    Ok(())
}
