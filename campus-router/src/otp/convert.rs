//! Conversion from OTP DTOs to domain itineraries.

use crate::domain::{Itinerary, polyline};

use super::types::{GeometryPoints, PlanResponse};

/// Error converting a plan that has itineraries but not the expected shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// A required field is absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The encoded geometry could not be decoded
    #[error("invalid leg geometry: {0}")]
    Geometry(#[from] polyline::PolylineError),
}

/// Decode leg geometry into `(lat, lon)` points.
pub fn decode_points(points: &GeometryPoints) -> Result<Vec<(f64, f64)>, ConversionError> {
    match points {
        GeometryPoints::Encoded(encoded) => Ok(polyline::decode(encoded)?),
        GeometryPoints::Decoded(list) => Ok(list.iter().map(|p| (p[0], p[1])).collect()),
    }
}

/// Convert the first leg of the first itinerary.
///
/// Returns `Ok(None)` when the plan has no itineraries.
pub fn convert_plan(response: &PlanResponse) -> Result<Option<Itinerary>, ConversionError> {
    let Some(itinerary) = response.itineraries().first() else {
        return Ok(None);
    };

    let leg = itinerary
        .legs
        .as_deref()
        .and_then(|legs| legs.first())
        .ok_or(ConversionError::MissingField("legs"))?;

    let points = leg
        .leg_geometry
        .as_ref()
        .and_then(|g| g.points.as_ref())
        .ok_or(ConversionError::MissingField("legGeometry.points"))?;

    let duration = leg.duration.ok_or(ConversionError::MissingField("duration"))?;
    let distance = leg.distance.ok_or(ConversionError::MissingField("distance"))?;

    Ok(Some(Itinerary::new(decode_points(points)?, duration, distance)))
}
