//! Encoded polyline geometry, as OTP returns it in `legGeometry.points`.
//!
//! Uses the Google polyline algorithm at precision 5. Points are
//! `(latitude, longitude)` pairs.

/// Error returned when an encoded polyline is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// A byte outside the polyline alphabet (`?`..=`~`).
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    /// The input ended in the middle of a value.
    #[error("polyline ends mid-value")]
    Truncated,

    /// The input ended after a latitude with no matching longitude.
    #[error("polyline has an unpaired latitude")]
    Unpaired,

    /// A value, or the running position, is too large to be a coordinate.
    #[error("polyline value out of range at offset {offset}")]
    Overflow { offset: usize },
}

const FACTOR: f64 = 1e5;

/// Chunks in the longest value accepted. Seven chunks hold 35 bits, well
/// above the ±360° deltas real coordinates need at precision 5.
const MAX_CHUNKS: u32 = 7;

/// Decode an encoded polyline into `(lat, lon)` points.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while offset < bytes.len() {
        let start = offset;
        let (dlat, next) = decode_value(bytes, offset)?;
        if next >= bytes.len() {
            return Err(PolylineError::Unpaired);
        }
        let (dlon, next) = decode_value(bytes, next)?;
        offset = next;

        let overflow = || PolylineError::Overflow { offset: start };
        lat = lat.checked_add(dlat).ok_or_else(overflow)?;
        lon = lon.checked_add(dlon).ok_or_else(overflow)?;
        points.push((lat as f64 / FACTOR, lon as f64 / FACTOR));
    }

    Ok(points)
}

fn decode_value(bytes: &[u8], mut offset: usize) -> Result<(i64, usize), PolylineError> {
    let start = offset;
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        if shift >= 5 * MAX_CHUNKS {
            return Err(PolylineError::Overflow { offset: start });
        }
        let byte = *bytes.get(offset).ok_or(PolylineError::Truncated)?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte { byte, offset });
        }
        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        offset += 1;
        if chunk < 0x20 {
            break;
        }
    }

    let value = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, offset))
}

/// Encode `(lat, lon)` points as a polyline.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut out = String::new();
    let mut prev = (0i64, 0i64);

    for &(lat, lon) in points {
        let lat = (lat * FACTOR).round() as i64;
        let lon = (lon * FACTOR).round() as i64;
        encode_value(lat - prev.0, &mut out);
        encode_value(lon - prev.1, &mut out);
        prev = (lat, lon);
    }

    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((v & 0x1f) | 0x20) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}
