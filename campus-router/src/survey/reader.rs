//! Survey export CSV reader.

use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{Coordinate, TravelMode};

use super::error::SurveyError;
use super::parse::parse_coordinate_string;

const RESIDENCE_COLUMN: &str = "Residence-Info";
const POI_COLUMN: &str = "POI";

/// One survey row as exported, before any validation.
#[derive(Debug, Deserialize)]
struct SurveyRow {
    #[serde(rename = "Submission ID", default)]
    submission_id: String,
    #[serde(rename = "Residence-Info", default)]
    residence: Option<String>,
    #[serde(rename = "POI", default)]
    pois: Option<String>,
    #[serde(rename = "Transportation-Mode", default)]
    transportation_mode: Option<String>,
    #[serde(rename = "Submission Completed", default)]
    completed: Option<String>,
}

/// A survey answer usable for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponse {
    pub submission_id: String,
    /// First residence the respondent marked.
    pub residence: Coordinate,
    /// Points of interest, in the order given. May be empty.
    pub pois: Vec<Coordinate>,
    /// Transportation answer as given, usually in Hebrew.
    pub transportation_mode: String,
    pub completed: bool,
}

impl SurveyResponse {
    /// The routing mode for this respondent's answer.
    pub fn travel_mode(&self) -> TravelMode {
        TravelMode::from_survey_label(&self.transportation_mode)
    }
}

/// Read survey responses from a CSV file.
pub fn read_survey(path: impl AsRef<Path>) -> Result<Vec<SurveyResponse>, SurveyError> {
    let reader = csv::ReaderBuilder::new().from_path(path.as_ref())?;
    let responses = collect_responses(reader)?;

    info!(
        path = %path.as_ref().display(),
        count = responses.len(),
        "loaded survey responses"
    );
    Ok(responses)
}

/// Read survey responses from any CSV source.
///
/// Rows without a usable residence are skipped; only the first residence
/// of each row is kept.
pub fn parse_survey<R: io::Read>(source: R) -> Result<Vec<SurveyResponse>, SurveyError> {
    collect_responses(csv::ReaderBuilder::new().from_reader(source))
}

fn collect_responses<R: io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<SurveyResponse>, SurveyError> {
    let headers = reader.headers()?.clone();
    for column in [RESIDENCE_COLUMN, POI_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(SurveyError::MissingColumn(column));
        }
    }

    let mut responses = Vec::new();
    for row in reader.deserialize() {
        let row: SurveyRow = row?;
        if let Some(response) = into_response(row) {
            responses.push(response);
        }
    }

    Ok(responses)
}

fn into_response(row: SurveyRow) -> Option<SurveyResponse> {
    let residence = row
        .residence
        .as_deref()
        .map(parse_coordinate_string)
        .and_then(|residences| residences.into_iter().next());

    let Some(residence) = residence else {
        debug!(submission_id = %row.submission_id, "skipping row without residence");
        return None;
    };

    Some(SurveyResponse {
        submission_id: row.submission_id,
        residence,
        pois: row
            .pois
            .as_deref()
            .map(parse_coordinate_string)
            .unwrap_or_default(),
        transportation_mode: row.transportation_mode.unwrap_or_default(),
        completed: row.completed.as_deref().is_some_and(is_truthy),
    })
}

fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
