//! Parsing and formatting of stored geography values.
//!
//! The backend keeps incident locations in a `PostGIS` geography column.
//! Depending on how a row is fetched the value comes back as hex-encoded
//! EWKB (the default for REST row queries), as WKT text
//! (`POINT(lng lat)`, optionally `SRID=4326;`-prefixed) from RPC functions,
//! or as a `GeoJSON` geometry object.
//!
//! Anything that cannot be decoded into a valid WGS84 point is reported as
//! `None`. Callers must treat that as "no location" and leave the incident
//! off the map.

use std::sync::LazyLock;

use regex::Regex;
use urban_shield_geography_models::GeoPoint;

/// SRID for WGS84 longitude/latitude.
pub const WGS84_SRID: u32 = 4326;

static WKT_POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:SRID=\d+\s*;\s*)?POINT\s*\(\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s+([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\)\s*$",
    )
    .expect("valid regex")
});

/// EWKB flag bits on the geometry type word.
const EWKB_Z_FLAG: u32 = 0x8000_0000;
const EWKB_M_FLAG: u32 = 0x4000_0000;
const EWKB_SRID_FLAG: u32 = 0x2000_0000;
const WKB_POINT: u32 = 1;

/// Builds a point from WKT-ordered (`lng lat`) components, rejecting
/// anything outside the WGS84 range.
fn valid_point(lng: f64, lat: f64) -> Option<GeoPoint> {
    let point = GeoPoint::new(lat, lng);
    (point.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
        .then_some(point)
}

fn parse_wkt(raw: &str) -> Option<GeoPoint> {
    let caps = WKT_POINT_RE.captures(raw)?;
    let lng = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lat = caps.get(2)?.as_str().parse::<f64>().ok()?;
    valid_point(lng, lat)
}

/// Little helper for walking an EWKB byte buffer in either byte order.
struct WkbReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    little_endian: bool,
}

impl WkbReader<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.offset.checked_add(N)?;
        let chunk: [u8; N] = self.bytes.get(self.offset..end)?.try_into().ok()?;
        self.offset = end;
        Some(chunk)
    }

    fn read_u32(&mut self) -> Option<u32> {
        let raw = self.take::<4>()?;
        Some(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn read_f64(&mut self) -> Option<f64> {
        let raw = self.take::<8>()?;
        Some(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }
}

fn parse_ewkb_hex(raw: &str) -> Option<GeoPoint> {
    let bytes = hex::decode(raw.trim()).ok()?;
    let (&order, _) = bytes.split_first()?;
    let little_endian = match order {
        0 => false,
        1 => true,
        _ => return None,
    };

    let mut reader = WkbReader {
        bytes: &bytes,
        offset: 1,
        little_endian,
    };

    let type_word = reader.read_u32()?;
    let flags = type_word & (EWKB_Z_FLAG | EWKB_M_FLAG | EWKB_SRID_FLAG);
    // ISO WKB encodes Z/M as +1000/+2000/+3000 on the base type instead.
    let base_type = (type_word & !flags) % 1000;
    if base_type != WKB_POINT {
        return None;
    }

    if flags & EWKB_SRID_FLAG != 0 {
        let srid = reader.read_u32()?;
        if srid != WGS84_SRID {
            log::debug!("Stored point uses SRID {srid}; reading as WGS84");
        }
    }

    let lng = reader.read_f64()?;
    let lat = reader.read_f64()?;
    valid_point(lng, lat)
}

/// Parses a stored point from its textual form (WKT or hex EWKB).
#[must_use]
pub fn parse_stored_point(raw: &str) -> Option<GeoPoint> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        parse_ewkb_hex(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a stored location as it appears in a JSON row: a string (WKT or
/// hex EWKB) or a `GeoJSON` `Point` geometry object.
#[must_use]
pub fn parse_stored_location(value: &serde_json::Value) -> Option<GeoPoint> {
    match value {
        serde_json::Value::String(raw) => parse_stored_point(raw),
        serde_json::Value::Object(geometry) => {
            if !geometry
                .get("type")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case("point"))
            {
                return None;
            }
            let coords = geometry
                .get("coordinates")
                .and_then(serde_json::Value::as_array)?;
            let lng = coords.first()?.as_f64()?;
            let lat = coords.get(1)?.as_f64()?;
            valid_point(lng, lat)
        }
        _ => None,
    }
}

/// Formats a point as EWKT for inserting into a geography column.
#[must_use]
pub fn to_ewkt(point: GeoPoint) -> String {
    format!(
        "SRID={WGS84_SRID};POINT({} {})",
        point.longitude, point.latitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ewkb_point(lng: f64, lat: f64, srid: Option<u32>, little_endian: bool) -> String {
        let mut bytes = vec![u8::from(little_endian)];
        let type_word = if srid.is_some() {
            WKB_POINT | EWKB_SRID_FLAG
        } else {
            WKB_POINT
        };
        let push_u32 = |bytes: &mut Vec<u8>, v: u32| {
            if little_endian {
                bytes.extend_from_slice(&v.to_le_bytes());
            } else {
                bytes.extend_from_slice(&v.to_be_bytes());
            }
        };
        push_u32(&mut bytes, type_word);
        if let Some(srid) = srid {
            push_u32(&mut bytes, srid);
        }
        for v in [lng, lat] {
            if little_endian {
                bytes.extend_from_slice(&v.to_le_bytes());
            } else {
                bytes.extend_from_slice(&v.to_be_bytes());
            }
        }
        hex::encode_upper(bytes)
    }

    #[test]
    fn parses_wkt_point() {
        let point = parse_stored_point("POINT(123.8854 10.3157)").unwrap();
        assert!((point.longitude - 123.8854).abs() < 1e-9);
        assert!((point.latitude - 10.3157).abs() < 1e-9);
    }

    #[test]
    fn parses_ewkt_with_srid_and_spacing() {
        let point = parse_stored_point("SRID=4326; point ( -87.6278  41.8827 )").unwrap();
        assert!((point.longitude - -87.6278).abs() < 1e-9);
        assert!((point.latitude - 41.8827).abs() < 1e-9);
    }

    #[test]
    fn parses_postgis_hex_ewkb() {
        let raw = ewkb_point(123.8854, 10.3157, Some(4326), true);
        assert!(raw.starts_with("0101000020E6100000"));
        let point = parse_stored_point(&raw).unwrap();
        assert!((point.longitude - 123.8854).abs() < 1e-12);
        assert!((point.latitude - 10.3157).abs() < 1e-12);
    }

    #[test]
    fn parses_big_endian_wkb_without_srid() {
        let raw = ewkb_point(-0.1276, 51.5072, None, false);
        let point = parse_stored_point(&raw).unwrap();
        assert!((point.latitude - 51.5072).abs() < 1e-12);
    }

    #[test]
    fn rejects_garbage_instead_of_inventing_coordinates() {
        assert!(parse_stored_point("").is_none());
        assert!(parse_stored_point("POINT()").is_none());
        assert!(parse_stored_point("POLYGON((0 0, 1 1, 1 0, 0 0))").is_none());
        assert!(parse_stored_point("0101000020E610").is_none());
        assert!(parse_stored_point("not a point").is_none());
        // Latitude out of range.
        assert!(parse_stored_point("POINT(10 95)").is_none());
    }

    #[test]
    fn parses_geojson_geometry() {
        let value = serde_json::json!({ "type": "Point", "coordinates": [123.89, 10.32] });
        let point = parse_stored_location(&value).unwrap();
        assert!((point.latitude - 10.32).abs() < 1e-9);

        let line = serde_json::json!({ "type": "LineString", "coordinates": [[0, 0], [1, 1]] });
        assert!(parse_stored_location(&line).is_none());
        assert!(parse_stored_location(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn ewkt_round_trips_through_parser() {
        let original = GeoPoint::new(10.3157, 123.8854);
        let text = to_ewkt(original);
        assert_eq!(text, "SRID=4326;POINT(123.8854 10.3157)");
        assert_eq!(parse_stored_point(&text), Some(original));
    }
}
