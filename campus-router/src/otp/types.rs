//! OTP `/plan` response DTOs.
//!
//! Only the fields the route generator reads are modelled. Everything is
//! optional because OTP omits fields rather than sending nulls, and a
//! missing field must surface as a malformed plan, not a parse failure.

use serde::Deserialize;

/// Top-level `/plan` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    /// The trip plan; absent when OTP reports an error instead.
    pub plan: Option<Plan>,

    /// OTP's planner error, e.g. "no trip found" or "location not accessible".
    pub error: Option<PlannerError>,
}

impl PlanResponse {
    /// Itineraries in the response, empty if there is no plan.
    pub fn itineraries(&self) -> &[ItineraryDto] {
        self.plan
            .as_ref()
            .and_then(|p| p.itineraries.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub itineraries: Option<Vec<ItineraryDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerError {
    pub id: Option<i64>,
    pub msg: Option<String>,
    pub message: Option<String>,
}

impl PlannerError {
    /// The most descriptive message available.
    pub fn describe(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("planner error {}", self.id.unwrap_or_default()))
    }
}

/// One itinerary in the plan.
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryDto {
    pub legs: Option<Vec<LegDto>>,

    /// Itinerary duration in seconds (includes waiting for transit).
    pub duration: Option<f64>,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    pub mode: Option<String>,

    /// Leg duration in seconds.
    pub duration: Option<f64>,

    /// Leg distance in meters.
    pub distance: Option<f64>,

    pub leg_geometry: Option<LegGeometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegGeometry {
    pub points: Option<GeometryPoints>,

    /// Number of points encoded.
    pub length: Option<u32>,
}

/// Leg geometry is normally an encoded polyline, but pre-decoded
/// `[lat, lon]` lists are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GeometryPoints {
    Encoded(String),
    Decoded(Vec<[f64; 2]>),
}
