//! Animated trip records.

use serde::Serialize;

use crate::domain::{Coordinate, RoutePath, english_mode_label};
use crate::survey::SurveyResponse;

/// Length of one trip's animation in milliseconds.
pub const ANIMATION_MS: f64 = 10_000.0;

/// One respondent's route, ready for a trips-layer animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    /// Index of the survey record this trip came from.
    pub vendor: usize,
    /// `[lon, lat, altitude, timestamp]` per point.
    pub path: Vec<[f64; 4]>,
    pub timestamps: Vec<f64>,
    pub metadata: TripMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripMetadata {
    pub submission_id: String,
    pub origin: Coordinate,
    pub destination: GateInfo,
    /// The survey answer as given.
    pub transportation_mode: String,
    pub mode_category: &'static str,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub has_poi_stop: bool,
    pub poi_stop: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateInfo {
    pub gate_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Timestamps spreading `n` points evenly over the animation.
pub fn animation_timestamps(n: usize) -> Vec<f64> {
    let step = ANIMATION_MS / n.saturating_sub(1).max(1) as f64;
    (0..n).map(|i| i as f64 * step).collect()
}

impl Trip {
    /// Build the trip for a survey record routed to a campus gate.
    pub fn new(
        vendor: usize,
        response: &SurveyResponse,
        gate_name: &str,
        gate: &Coordinate,
        route: &RoutePath,
    ) -> Self {
        let timestamps = animation_timestamps(route.path.len());
        let path = route
            .path
            .iter()
            .zip(&timestamps)
            .map(|(&[lon, lat], &ts)| [lon, lat, 0.0, ts])
            .collect();

        Self {
            vendor,
            path,
            timestamps,
            metadata: TripMetadata {
                submission_id: response.submission_id.clone(),
                origin: response.residence.clone(),
                destination: GateInfo {
                    gate_name: gate_name.to_string(),
                    lat: gate.lat(),
                    lon: gate.lon(),
                },
                transportation_mode: response.transportation_mode.clone(),
                mode_category: english_mode_label(&response.transportation_mode),
                distance_km: route.distance_m / 1000.0,
                duration_minutes: route.duration_secs / 60.0,
                has_poi_stop: route.via.is_some(),
                poi_stop: route.via.clone(),
            },
        }
    }
}
