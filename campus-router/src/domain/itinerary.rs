//! Routed itineraries returned by the routing service.

use super::coordinate::Coordinate;

/// A single routed path: geometry plus totals.
///
/// Points are `(latitude, longitude)` pairs in travel order. An itinerary
/// that went through an intermediate stop carries that stop in `via`.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub points: Vec<(f64, f64)>,
    /// Total travel time in seconds.
    pub duration_secs: f64,
    /// Total travel distance in meters.
    pub distance_m: f64,
    pub via: Option<Coordinate>,
}

impl Itinerary {
    /// Create a direct (single-leg) itinerary.
    pub fn new(points: Vec<(f64, f64)>, duration_secs: f64, distance_m: f64) -> Self {
        Self {
            points,
            duration_secs,
            distance_m,
            via: None,
        }
    }

    /// Whether this itinerary passes through an intermediate stop.
    pub fn has_stop(&self) -> bool {
        self.via.is_some()
    }

    /// Geometry as `[longitude, latitude]` pairs, the GeoJSON axis order.
    pub fn lon_lat_path(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|&(lat, lon)| [lon, lat]).collect()
    }

    pub fn first_point(&self) -> Option<(f64, f64)> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }
}

/// The route handed to consumers: a `[lon, lat]` path and its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    pub path: Vec<[f64; 2]>,
    pub duration_secs: f64,
    pub distance_m: f64,
    pub via: Option<Coordinate>,
}

impl From<Itinerary> for RoutePath {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            path: itinerary.lon_lat_path(),
            duration_secs: itinerary.duration_secs,
            distance_m: itinerary.distance_m,
            via: itinerary.via,
        }
    }
}
