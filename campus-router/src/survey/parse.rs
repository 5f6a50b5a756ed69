//! Location fields of a survey answer.
//!
//! Each location field holds a JSON array of dropped pins:
//!
//! ```json
//! [{"coordinate": "31.2518,34.7913", "comment": "home"}]
//! ```

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{BoundingBox, Coordinate};

use super::error::SurveyError;

#[derive(Debug, Deserialize)]
struct RawLocation {
    coordinate: String,
    #[serde(default)]
    comment: Option<String>,
}

/// Parse a location field, keeping the pins that fall inside `bounds`.
///
/// A blank field is an empty list. Any entry that is not a `lat,lon` pair
/// fails the whole field; pins outside `bounds` are dropped one by one.
pub fn parse_locations(raw: &str, bounds: &BoundingBox) -> Result<Vec<Coordinate>, SurveyError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let entries: Vec<RawLocation> = serde_json::from_str(raw)?;
    let mut coordinates = Vec::with_capacity(entries.len());

    for entry in entries {
        let (lat, lon) = split_lat_lon(&entry.coordinate)?;
        let comment = entry.comment.unwrap_or_default();

        match Coordinate::new_within(lat, lon, comment, bounds) {
            Ok(coordinate) => coordinates.push(coordinate),
            Err(e) => debug!(error = %e, "dropping survey pin"),
        }
    }

    Ok(coordinates)
}

/// Parse a location field against the default study region.
///
/// Malformed fields are logged and read as empty, so a single bad answer
/// does not stop a batch.
pub fn parse_coordinate_string(raw: &str) -> Vec<Coordinate> {
    parse_locations(raw, &BoundingBox::ISRAEL).unwrap_or_else(|e| {
        warn!(error = %e, field = raw, "failed to parse survey coordinates");
        Vec::new()
    })
}

fn split_lat_lon(s: &str) -> Result<(f64, f64), SurveyError> {
    let bad = || SurveyError::BadCoordinate(s.to_string());

    let (lat, lon) = s.split_once(',').ok_or_else(bad)?;
    if lon.contains(',') {
        return Err(bad());
    }

    let lat = lat.trim().parse().map_err(|_| bad())?;
    let lon = lon.trim().parse().map_err(|_| bad())?;
    Ok((lat, lon))
}
