//! Point shapefile reader.
//!
//! Geometry comes from the `shapefile` crate and attributes from `io::dbf`.
//! The two streams are joined record by record together with the `.prj`
//! coordinate system and the optional `.cpg` code page. Only point shape
//! types (plain, M and Z) are accepted; null shapes become rows without
//! geometry.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use shapefile::{Shape, ShapeReader, ShapeType};
use tracing::debug;

use crate::domain::{GeoPoint, GeoRow, GeoTable};
use crate::error::AppError;
use crate::io::{dbf, prj};

fn shp_error(e: shapefile::Error) -> AppError {
    AppError::parse(format!("shp: {e}"))
}

/// Decode the geometry stream of a point shapefile.
pub fn read_points(bytes: &[u8]) -> Result<Vec<Option<GeoPoint>>, AppError> {
    let reader = ShapeReader::new(Cursor::new(bytes)).map_err(shp_error)?;
    let shape_type = reader.header().shape_type;
    if !matches!(
        shape_type,
        ShapeType::NullShape | ShapeType::Point | ShapeType::PointM | ShapeType::PointZ
    ) {
        return Err(AppError::parse(format!(
            "unsupported shape type {shape_type}; only point shapefiles can be read"
        )));
    }

    reader
        .read()
        .map_err(shp_error)?
        .into_iter()
        .enumerate()
        .map(|(index, shape)| point(index, shape))
        .collect()
}

fn point(index: usize, shape: Shape) -> Result<Option<GeoPoint>, AppError> {
    let (x, y) = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => (p.x, p.y),
        Shape::PointM(p) => (p.x, p.y),
        Shape::PointZ(p) => (p.x, p.y),
        other => {
            return Err(AppError::parse(format!(
                "shp record {} has shape type {}; only points are supported",
                index + 1,
                other.shapetype()
            )));
        }
    };
    Ok((x.is_finite() && y.is_finite()).then(|| GeoPoint::new(x, y)))
}

/// Find a sidecar next to `shp` with the given extension (case-insensitive).
fn sidecar(shp: &Path, ext: &str) -> Option<PathBuf> {
    let stem = shp.file_stem()?;
    let dir = shp.parent()?;
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .find(|p| {
            p.file_stem() == Some(stem)
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        })
}

fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    fs::read(path).map_err(|e| AppError::parse(format!("failed to read '{}': {e}", path.display())))
}

/// Read a point shapefile and its sidecars into a geometry table.
pub fn read_geo_table(shp: &Path) -> Result<GeoTable, AppError> {
    let points = read_points(&read_file(shp)?)?;

    let dbf_path = sidecar(shp, "dbf")
        .ok_or_else(|| AppError::parse(format!("no .dbf next to '{}'", shp.display())))?;
    let prj_path = sidecar(shp, "prj")
        .ok_or_else(|| AppError::parse(format!("no .prj next to '{}'", shp.display())))?;

    let encoding = match sidecar(shp, "cpg") {
        Some(p) => dbf::code_page(&String::from_utf8_lossy(&read_file(&p)?)),
        None => dbf::code_page(""),
    };

    let prj_bytes = read_file(&prj_path)?;
    let crs = prj::parse_prj(&String::from_utf8_lossy(&prj_bytes))?;
    let table = dbf::read_dbf(&read_file(&dbf_path)?, encoding)?;

    if table.records.len() != points.len() {
        return Err(AppError::parse(format!(
            "shp has {} shapes but dbf has {} records",
            points.len(),
            table.records.len()
        )));
    }

    let rows: Vec<GeoRow> = table
        .records
        .into_iter()
        .zip(points)
        .filter_map(|(attrs, geometry)| {
            attrs.map(|attributes| GeoRow {
                attributes,
                geometry,
            })
        })
        .collect();

    debug!(
        path = %shp.display(),
        crs = crs.name(),
        rows = rows.len(),
        encoding = encoding.name(),
        "read shapefile"
    );

    Ok(GeoTable {
        crs,
        columns: table.columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

    use super::*;

    const FILE_CODE: i32 = 9994;

    fn shp(shape_type: i32, records: &[Option<(f64, f64)>]) -> Vec<u8> {
        let mut body = Vec::new();
        for (i, rec) in records.iter().enumerate() {
            let content_words = if rec.is_some() { 10 } else { 2 };
            body.write_i32::<BigEndian>(i as i32 + 1).unwrap();
            body.write_i32::<BigEndian>(content_words).unwrap();
            match rec {
                Some((x, y)) => {
                    body.write_i32::<LittleEndian>(shape_type).unwrap();
                    body.write_f64::<LittleEndian>(*x).unwrap();
                    body.write_f64::<LittleEndian>(*y).unwrap();
                }
                None => body.write_i32::<LittleEndian>(0).unwrap(),
            }
        }
        let mut out = Vec::new();
        out.write_i32::<BigEndian>(FILE_CODE).unwrap();
        out.extend_from_slice(&[0u8; 20]);
        out.write_i32::<BigEndian>(((100 + body.len()) / 2) as i32).unwrap();
        out.write_i32::<LittleEndian>(1000).unwrap();
        out.write_i32::<LittleEndian>(shape_type).unwrap();
        out.extend_from_slice(&[0u8; 64]);
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn reads_points_and_null_shapes() {
        let bytes = shp(1, &[Some((-70.1, 48.25)), None]);
        let points = read_points(&bytes).unwrap();
        assert_eq!(points, vec![Some(GeoPoint::new(-70.1, 48.25)), None]);
    }

    #[test]
    fn polygon_files_are_rejected() {
        let err = read_points(&shp(5, &[])).unwrap_err();
        assert!(err.message().contains("only point"), "{}", err.message());
    }

    #[test]
    fn bad_file_code() {
        let mut bytes = shp(1, &[]);
        bytes[3] = 0;
        assert!(read_points(&bytes).is_err());
        assert!(read_points(&shp(1, &[])[..50]).is_err());
    }

    #[test]
    fn truncated_record_is_parse_error() {
        let mut bytes = shp(1, &[Some((-70.1, 48.25))]);
        bytes.truncate(bytes.len() - 4);
        let err = read_points(&bytes).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
    }

    #[test]
    fn sidecar_lookup_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let shp_path = dir.path().join("NFDB_point.shp");
        fs::write(&shp_path, b"").unwrap();
        fs::write(dir.path().join("NFDB_point.DBF"), b"").unwrap();
        fs::write(dir.path().join("other.prj"), b"").unwrap();

        assert_eq!(
            sidecar(&shp_path, "dbf"),
            Some(dir.path().join("NFDB_point.DBF"))
        );
        assert_eq!(sidecar(&shp_path, "prj"), None);
    }
}
