//! Validated survey coordinates and great-circle distance.

use std::fmt;

use geo::{Distance, Haversine, Point};
use serde::Serialize;

/// Error returned when a coordinate falls outside the accepted region.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    pub lat: f64,
    pub lon: f64,
    reason: &'static str,
}

/// Inclusive latitude/longitude box that survey coordinates must fall in.
///
/// Survey answers are dropped pins on a map, and a garbled answer usually
/// lands far outside the study region, so anything outside the box is
/// rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// The default study region.
    pub const ISRAEL: BoundingBox = BoundingBox {
        min_lat: 29.5,
        max_lat: 33.3,
        min_lon: 34.2,
        max_lon: 35.9,
    };

    /// Returns true if the point lies inside the box (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::ISRAEL
    }
}

/// A latitude/longitude pair with a free-text annotation.
///
/// Every `Coordinate` lies inside the bounding box it was validated
/// against, so code receiving one does not need to re-check it.
#[derive(Clone, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
    comment: String,
}

impl Coordinate {
    /// Create a coordinate validated against [`BoundingBox::ISRAEL`].
    pub fn new(lat: f64, lon: f64, comment: impl Into<String>) -> Result<Self, InvalidCoordinate> {
        Self::new_within(lat, lon, comment, &BoundingBox::ISRAEL)
    }

    /// Create a coordinate validated against a custom bounding box.
    pub fn new_within(
        lat: f64,
        lon: f64,
        comment: impl Into<String>,
        bounds: &BoundingBox,
    ) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "must be finite",
            });
        }

        if !bounds.contains(lat, lon) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "outside the study region",
            });
        }

        Ok(Self {
            lat,
            lon,
            comment: comment.into(),
        })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// The annotation carried with this point.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The same position with a different annotation.
    pub fn with_comment(&self, comment: impl Into<String>) -> Self {
        Self {
            lat: self.lat,
            lon: self.lon,
            comment: comment.into(),
        }
    }

    /// Great-circle distance to another coordinate in kilometers.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_km(self, other)
    }

    /// The `"lat,lon"` form used by OTP's `fromPlace`/`toPlace` parameters.
    pub fn to_place(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({:.6}, {:.6}", self.lat, self.lon)?;
        if !self.comment.is_empty() {
            write!(f, ", {:?}", self.comment)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    Haversine.distance(a.point(), b.point()) / 1000.0
}

/// Haversine distance between two raw `(lat, lon)` pairs, in meters.
///
/// Route geometry coming back from OTP is not bound to the study region,
/// so it is measured without going through [`Coordinate`].
pub fn distance_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    Haversine.distance(Point::new(a.1, a.0), Point::new(b.1, b.0))
}
