//! The exported trips document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use super::error::ExportError;
use super::trip::Trip;

const DESCRIPTION: &str = "BGU Mobility Survey - Simulated Routes to University Gates";

/// Bounding box over every point of every trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub total_trips: usize,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    pub description: String,
}

/// All generated trips plus summary metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripsDocument {
    pub trips: Vec<Trip>,
    pub metadata: DocumentMetadata,
}

impl TripsDocument {
    pub fn new(trips: Vec<Trip>, generated_at: DateTime<Local>) -> Self {
        let metadata = DocumentMetadata {
            total_trips: trips.len(),
            generated_at: generated_at.to_rfc3339(),
            bounds: calculate_bounds(&trips),
            description: DESCRIPTION.to_string(),
        };
        Self { trips, metadata }
    }

    /// Write the document as pretty-printed JSON.
    ///
    /// Refuses to write an empty document.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        if self.trips.is_empty() {
            return Err(ExportError::NoTrips);
        }

        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        info!(
            trips = self.trips.len(),
            path = %path.as_ref().display(),
            "saved trips"
        );
        Ok(())
    }
}

/// Bounds of all trip points, or `None` if there are none.
pub fn calculate_bounds(trips: &[Trip]) -> Option<Bounds> {
    let mut points = trips.iter().flat_map(|t| t.path.iter());
    let &[lon, lat, ..] = points.next()?;

    let init = Bounds {
        min_lat: lat,
        max_lat: lat,
        min_lon: lon,
        max_lon: lon,
    };

    Some(points.fold(init, |b, &[lon, lat, ..]| Bounds {
        min_lat: b.min_lat.min(lat),
        max_lat: b.max_lat.max(lat),
        min_lon: b.min_lon.min(lon),
        max_lon: b.max_lon.max(lon),
    }))
}
