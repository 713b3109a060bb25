//! Shared helpers for integration tests: build zipped point shapefiles in memory.

#![allow(dead_code)]

use std::cell::Cell;
use std::io::{Cursor, Write};

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use zip::write::SimpleFileOptions;

use nfdb_fires::data::ArchiveSource;
use nfdb_fires::AppError;

pub const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

pub const CANADA_LAMBERT_PRJ: &str = r#"PROJCS["NAD_1983_Canada_Lambert",GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic"],PARAMETER["False_Easting",0.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",-95.0],PARAMETER["Standard_Parallel_1",49.0],PARAMETER["Standard_Parallel_2",77.0],PARAMETER["Latitude_Of_Origin",49.0],UNIT["Meter",1.0]]"#;

/// dBase field descriptor: name, type code, width, decimals.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: u8,
    pub len: u8,
    pub dec: u8,
}

const fn field(name: &'static str, kind: u8, len: u8, dec: u8) -> Field {
    Field { name, kind, len, dec }
}

/// The attribute layout of the national archive (subset used by the loader).
pub const NFDB_FIELDS: [Field; 13] = [
    field("NFDBFIREID", b'C', 12, 0),
    field("FIRE_ID", b'C', 16, 0),
    field("FIRENAME", b'C', 24, 0),
    field("YEAR", b'N', 5, 0),
    field("MONTH", b'N', 3, 0),
    field("DAY", b'N', 3, 0),
    field("REP_DATE", b'C', 10, 0),
    field("ATTK_DATE", b'C', 10, 0),
    field("CAUSE", b'C', 16, 0),
    field("SIZE_HA", b'N', 12, 2),
    field("PRESCRIBED", b'C', 4, 0),
    field("LATITUDE", b'N', 12, 5),
    field("LONGITUDE", b'N', 12, 5),
];

#[derive(Debug, Clone)]
pub struct ShapeRow {
    /// Cell text in `NFDB_FIELDS` order (already formatted).
    pub cells: Vec<String>,
    pub point: Option<(f64, f64)>,
    pub deleted: bool,
}

/// One fire with geographic coordinates; `None` leaves the cell blank.
pub fn fire(id: &str, name: &str, rep_date: &str, lat: Option<f64>, lon: Option<f64>) -> ShapeRow {
    let coord = |v: Option<f64>| v.map(|v| format!("{v:.5}")).unwrap_or_default();
    ShapeRow {
        cells: vec![
            id.to_string(),
            format!("QC_{id}"),
            name.to_string(),
            "2023".to_string(),
            "6".to_string(),
            "12".to_string(),
            rep_date.to_string(),
            "2023/06/11".to_string(),
            "H".to_string(),
            "12.50".to_string(),
            String::new(),
            coord(lat),
            coord(lon),
        ],
        point: lon.zip(lat),
        deleted: false,
    }
}

pub fn build_dbf(fields: &[Field], rows: &[ShapeRow]) -> Vec<u8> {
    let header_len = 32 + 32 * fields.len() + 1;
    let record_len = 1 + fields.iter().map(|f| f.len as usize).sum::<usize>();

    let mut out = Vec::new();
    out.push(0x03);
    out.extend_from_slice(&[124, 1, 1]);
    out.write_u32::<LittleEndian>(rows.len() as u32).unwrap();
    out.write_u16::<LittleEndian>(header_len as u16).unwrap();
    out.write_u16::<LittleEndian>(record_len as u16).unwrap();
    out.extend_from_slice(&[0u8; 20]);

    for f in fields {
        let mut d = [0u8; 32];
        d[..f.name.len()].copy_from_slice(f.name.as_bytes());
        d[11] = f.kind;
        d[16] = f.len;
        d[17] = f.dec;
        out.extend_from_slice(&d);
    }
    out.push(0x0D);

    for row in rows {
        out.push(if row.deleted { b'*' } else { b' ' });
        for (cell, f) in row.cells.iter().zip(fields) {
            let width = f.len as usize;
            let text = if f.kind == b'N' {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            };
            out.extend_from_slice(&text.as_bytes()[..width]);
        }
    }
    out.push(0x1A);
    out
}

/// `.shp` and `.shx` for point rows (`None` becomes a null shape).
pub fn build_shp(rows: &[ShapeRow]) -> (Vec<u8>, Vec<u8>) {
    let mut body = Vec::new();
    let mut index = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let offset_words = (100 + body.len()) / 2;
        let content_words: i32 = if row.point.is_some() { 10 } else { 2 };
        body.write_i32::<BigEndian>(i as i32 + 1).unwrap();
        body.write_i32::<BigEndian>(content_words).unwrap();
        match row.point {
            Some((x, y)) => {
                body.write_i32::<LittleEndian>(1).unwrap();
                body.write_f64::<LittleEndian>(x).unwrap();
                body.write_f64::<LittleEndian>(y).unwrap();
            }
            None => body.write_i32::<LittleEndian>(0).unwrap(),
        }
        index.write_i32::<BigEndian>(offset_words as i32).unwrap();
        index.write_i32::<BigEndian>(content_words).unwrap();
    }

    let header = |total_len: usize| {
        let mut h = Vec::with_capacity(100);
        h.write_i32::<BigEndian>(9994).unwrap();
        h.extend_from_slice(&[0u8; 20]);
        h.write_i32::<BigEndian>((total_len / 2) as i32).unwrap();
        h.write_i32::<LittleEndian>(1000).unwrap();
        h.write_i32::<LittleEndian>(1).unwrap();
        h.extend_from_slice(&[0u8; 64]);
        h
    };

    let mut shp = header(100 + body.len());
    shp.extend_from_slice(&body);
    let mut shx = header(100 + index.len());
    shx.extend_from_slice(&index);
    (shp, shx)
}

pub fn zip_files(files: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    {
        let mut w = zip::ZipWriter::new(&mut out);
        for (name, data) in files {
            w.start_file(name.as_str(), SimpleFileOptions::default()).unwrap();
            w.write_all(data).unwrap();
        }
        w.finish().unwrap();
    }
    out.into_inner()
}

/// A zipped point shapefile under `dir/stem.*`, with an optional `.prj`.
pub fn shapefile_zip(dir: &str, stem: &str, prj: Option<&str>, rows: &[ShapeRow]) -> Vec<u8> {
    let (shp, shx) = build_shp(rows);
    let dbf = build_dbf(&NFDB_FIELDS, rows);
    let mut files = vec![
        (format!("{dir}{stem}.shp"), shp),
        (format!("{dir}{stem}.shx"), shx),
        (format!("{dir}{stem}.dbf"), dbf),
    ];
    if let Some(prj) = prj {
        files.push((format!("{dir}{stem}.prj"), prj.as_bytes().to_vec()));
    }
    zip_files(&files)
}

/// Serves fixed bytes and counts how often it was asked.
pub struct CountingSource {
    bytes: Vec<u8>,
    calls: Cell<usize>,
}

impl CountingSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ArchiveSource for CountingSource {
    fn describe(&self) -> String {
        "in-memory test archive".to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, AppError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.bytes.clone())
    }
}
