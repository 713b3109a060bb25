//! Reprojection of a geometry table to WGS84 longitude/latitude.

use proj4rs::Proj;
use proj4rs::adaptors::transform_xy;
use tracing::{debug, warn};

use crate::domain::{Crs, GeoPoint, GeoTable};
use crate::error::AppError;

const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Reproject every point of `table` to EPSG:4326.
///
/// Geographic tables are relabelled without touching coordinates. A point
/// the projection cannot invert loses its geometry and is logged; the row
/// itself is kept.
pub fn to_wgs84(table: GeoTable) -> Result<GeoTable, AppError> {
    let GeoTable { crs, columns, mut rows } = table;

    let proj = match crs {
        Crs::Geographic { .. } => {
            return Ok(GeoTable {
                crs: Crs::wgs84(),
                columns,
                rows,
            });
        }
        Crs::Projected { ref proj, .. } => proj.clone(),
    };

    let src = Proj::from_proj_string(&proj)
        .map_err(|e| AppError::parse(format!("cannot use projection '{proj}': {e}")))?;
    let dst = Proj::from_proj_string(WGS84_PROJ)
        .map_err(|e| AppError::parse(format!("cannot build WGS84 definition: {e}")))?;

    let mut failed = 0usize;
    for (idx, row) in rows.iter_mut().enumerate() {
        let Some(p) = row.geometry else { continue };
        match transform_xy(&src, &dst, p.x, p.y) {
            Ok((lon, lat)) => {
                row.geometry = Some(GeoPoint::new(lon.to_degrees(), lat.to_degrees()));
            }
            Err(e) => {
                failed += 1;
                warn!(row = idx, x = p.x, y = p.y, error = %e, "point could not be reprojected");
                row.geometry = None;
            }
        }
    }

    debug!(from = crs.name(), rows = rows.len(), failed, "reprojected to WGS84");
    Ok(GeoTable {
        crs: Crs::wgs84(),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoRow;

    fn table(crs: Crs, points: &[(f64, f64)]) -> GeoTable {
        GeoTable {
            crs,
            columns: vec![],
            rows: points
                .iter()
                .map(|&(x, y)| GeoRow {
                    attributes: Default::default(),
                    geometry: Some(GeoPoint::new(x, y)),
                })
                .collect(),
        }
    }

    #[test]
    fn geographic_tables_are_relabelled_only() {
        let t = table(
            Crs::Geographic {
                name: "GCS_North_American_1983".into(),
            },
            &[(-70.1, 48.25)],
        );
        let out = to_wgs84(t).unwrap();
        assert_eq!(out.crs, Crs::wgs84());
        assert_eq!(out.rows[0].geometry, Some(GeoPoint::new(-70.1, 48.25)));
    }

    #[test]
    fn lambert_origin_maps_to_its_parameters() {
        let proj = "+proj=lcc +lat_1=49 +lat_2=77 +lat_0=49 +lon_0=-95 +x_0=0 +y_0=0 \
                    +a=6378137 +rf=298.257222101 +towgs84=0,0,0 +to_meter=1 +no_defs";
        let t = table(
            Crs::Projected {
                name: "NAD_1983_Canada_Lambert".into(),
                proj: proj.into(),
            },
            &[(0.0, 0.0)],
        );
        let out = to_wgs84(t).unwrap();
        let p = out.rows[0].geometry.unwrap();
        assert!((p.x - -95.0).abs() < 1e-6, "lon {}", p.x);
        assert!((p.y - 49.0).abs() < 1e-6, "lat {}", p.y);
        assert!(out.crs.is_geographic());
    }

    #[test]
    fn bad_projection_string_is_parse_error() {
        let t = table(
            Crs::Projected {
                name: "x".into(),
                proj: "+proj=nonsense".into(),
            },
            &[],
        );
        assert_eq!(to_wgs84(t).unwrap_err().kind(), crate::error::ErrorKind::Parse);
    }
}
