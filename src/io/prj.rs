//! `.prj` sidecar to `Crs`.
//!
//! The WKT is handed to `proj4wkt`, which knows the OGC WKT1/WKT2 method
//! names. ESRI writers spell a few projections differently, so those are
//! renamed first (the same rewrite GDAL calls "morph from ESRI").

use proj4wkt::Formatter;
use proj4wkt::builder::{Builder, Node};

use crate::domain::Crs;
use crate::error::AppError;

/// Parse the contents of a `.prj` file.
pub fn parse_prj(text: &str) -> Result<Crs, AppError> {
    let wkt = morph_from_esri(text.trim());
    let node = Builder::new()
        .parse(&wkt)
        .map_err(|e| AppError::parse(format!("invalid .prj WKT: {e}")))?;

    let name = match &node {
        Node::GEOGCRS(cs) => {
            return Ok(Crs::Geographic {
                name: display_name(cs.name),
            });
        }
        Node::PROJCRS(cs) => display_name(cs.name),
        _ => {
            return Err(AppError::parse(
                "unsupported coordinate system in .prj (expected GEOGCS or PROJCS)",
            ));
        }
    };

    let mut buf = Vec::new();
    Formatter::new(&mut buf)
        .format(&node)
        .map_err(|e| AppError::parse(format!("unsupported projection in .prj: {e}")))?;
    let proj = String::from_utf8(buf)
        .map_err(|e| AppError::parse(format!("projection string is not UTF-8: {e}")))?;

    Ok(Crs::Projected { name, proj })
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "unnamed".to_string()
    } else {
        name.to_string()
    }
}

/// Rename ESRI projection and parameter spellings to their OGC WKT1 names.
fn morph_from_esri(wkt: &str) -> String {
    let Some(method) = projection_name(wkt) else {
        return wkt.to_string();
    };

    match method.to_ascii_lowercase().as_str() {
        "lambert_conformal_conic" => {
            let ogc = if contains_ignore_case(wkt, "standard_parallel_2") {
                "Lambert_Conformal_Conic_2SP"
            } else {
                "Lambert_Conformal_Conic_1SP"
            };
            replace_projection(wkt, &method, ogc)
        }
        "albers" => {
            let wkt = replace_projection(wkt, &method, "Albers_Conic_Equal_Area");
            let wkt = replace_ignore_case(&wkt, r#""central_meridian""#, r#""longitude_of_center""#);
            replace_ignore_case(&wkt, r#""latitude_of_origin""#, r#""latitude_of_center""#)
        }
        _ => wkt.to_string(),
    }
}

fn projection_name(wkt: &str) -> Option<String> {
    let start = wkt.to_ascii_uppercase().find("PROJECTION[")? + "PROJECTION[".len();
    let rest = wkt[start..].trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn replace_projection(wkt: &str, from: &str, to: &str) -> String {
    replace_ignore_case(wkt, &format!(r#""{from}""#), &format!(r#""{to}""#))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// ASCII case-insensitive replace of every occurrence.
fn replace_ignore_case(text: &str, from: &str, to: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let from = from.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (idx, _) in lower.match_indices(&from) {
        out.push_str(&text[last..idx]);
        out.push_str(to);
        last = idx + from.len();
    }
    out.push_str(&text[last..]);
    out
}
