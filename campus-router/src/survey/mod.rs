//! Mobility survey input.
//!
//! Respondents marked their residences and the places they stop at on a
//! map, and named how they travel to campus. This module turns the survey
//! export into validated coordinates ready for routing.

mod error;
mod parse;
mod reader;

pub use error::SurveyError;
pub use parse::{parse_coordinate_string, parse_locations};
pub use reader::{SurveyResponse, parse_survey, read_survey};
