//! Encoded polyline codec.
//! Implements the delta-coded, 5-bit chunked text format used by OSRM's
//! `geometries=polyline` responses.
//!
//! See: https://developers.google.com/maps/documentation/utilities/polylinealgorithm

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Decimal digits kept by OSRM's `polyline` geometry format.
pub const DEFAULT_PRECISION: u32 = 5;

/// Most decimal digits a coordinate may carry. Beyond this, scaled longitudes
/// stop fitting the deltas the format can express.
pub const MAX_PRECISION: u32 = 9;

/// Offset added to every 5-bit chunk so it lands in printable ASCII.
const CHUNK_OFFSET: u8 = 63;

/// Continuation flag set on every chunk except the last of a value.
const CONTINUATION_BIT: i64 = 0x20;

const CHUNK_MASK: i64 = 0x1f;

/// Longest shift a single value may reach before it overflows an `i64`.
const MAX_SHIFT: u32 = 60;

/// Decode a precision-5 polyline into `(lat, lon)` points.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decode a polyline written with `precision` decimal digits (6 for `polyline6`).
pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Vec<GeoPoint>> {
    let factor = scale_factor(precision)?;
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut pos = 0;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while pos < bytes.len() {
        lat = accumulate(lat, read_value(bytes, &mut pos)?, pos)?;
        if pos == bytes.len() {
            return Err(Error::InvalidPolyline {
                position: pos,
                reason: "latitude without a matching longitude".to_string(),
            });
        }
        lon = accumulate(lon, read_value(bytes, &mut pos)?, pos)?;
        points.push(GeoPoint::new(lat as f64 / factor, lon as f64 / factor)?);
    }

    Ok(points)
}

/// Encode points as a precision-5 polyline.
pub fn encode(points: &[GeoPoint]) -> String {
    encode_scaled(points, 10f64.powi(DEFAULT_PRECISION as i32))
}

/// Encode points with `precision` decimal digits (1 to [`MAX_PRECISION`]).
pub fn encode_with_precision(points: &[GeoPoint], precision: u32) -> Result<String> {
    Ok(encode_scaled(points, scale_factor(precision)?))
}

fn scale_factor(precision: u32) -> Result<f64> {
    if !(1..=MAX_PRECISION).contains(&precision) {
        return Err(Error::UnsupportedPrecision {
            precision,
            max: MAX_PRECISION,
        });
    }
    Ok(10f64.powi(precision as i32))
}

fn encode_scaled(points: &[GeoPoint], factor: f64) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for point in points {
        let lat = (point.latitude() * factor).round() as i64;
        let lon = (point.longitude() * factor).round() as i64;
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn accumulate(total: i64, delta: i64, position: usize) -> Result<i64> {
    total.checked_add(delta).ok_or_else(|| Error::InvalidPolyline {
        position,
        reason: "coordinate overflows 64 bits".to_string(),
    })
}

fn read_value(bytes: &[u8], pos: &mut usize) -> Result<i64> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let byte = *bytes.get(*pos).ok_or_else(|| Error::InvalidPolyline {
            position: *pos,
            reason: "input ends in the middle of a value".to_string(),
        })?;
        if !(CHUNK_OFFSET..=b'~').contains(&byte) {
            return Err(Error::InvalidPolyline {
                position: *pos,
                reason: format!("unexpected character {:?}", byte as char),
            });
        }
        if shift > MAX_SHIFT {
            return Err(Error::InvalidPolyline {
                position: *pos,
                reason: "value does not fit in 64 bits".to_string(),
            });
        }

        let chunk = i64::from(byte - CHUNK_OFFSET);
        *pos += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    // Zig-zag: the low bit carries the sign.
    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn write_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION_BIT {
        let chunk = (CONTINUATION_BIT | (value & CHUNK_MASK)) as u8 + CHUNK_OFFSET;
        out.push(chunk as char);
        value >>= 5;
    }
    out.push((value as u8 + CHUNK_OFFSET) as char);
}
