//! Travel modes as answered in the survey and as understood by OTP.

use std::fmt;

/// Routing-service travel mode.
///
/// Survey answers are free text in Hebrew; every answer maps to one of
/// these, with unknown or missing answers falling back to walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TravelMode {
    #[default]
    Walk,
    Bicycle,
    Car,
    Transit,
}

impl TravelMode {
    /// Map a survey transportation answer to a routing mode.
    pub fn from_survey_label(label: &str) -> Self {
        match label.trim() {
            "ברגל" => TravelMode::Walk,
            "אופניים" | "אופניים/קורקינט חשמלי" => TravelMode::Bicycle,
            "רכב" => TravelMode::Car,
            "אוטובוס" | "רכבת" => TravelMode::Transit,
            _ => TravelMode::Walk,
        }
    }

    /// The value of OTP's `mode` query parameter.
    pub fn as_otp_str(&self) -> &'static str {
        match self {
            TravelMode::Walk => "WALK",
            TravelMode::Bicycle => "BICYCLE",
            TravelMode::Car => "CAR",
            TravelMode::Transit => "TRANSIT,WALK",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_otp_str())
    }
}

/// English category for a survey transportation answer, used in exports.
///
/// Finer-grained than [`TravelMode`]: e-bikes and buses keep their own
/// label even though they route as bicycle and transit.
pub fn english_mode_label(label: &str) -> &'static str {
    match label.trim() {
        "ברגל" => "walking",
        "אופניים" => "bicycle",
        "אופניים/קורקינט חשמלי" | "אופניים חשמליים/קורקינט" => "ebike",
        "רכב" => "car",
        "אוטובוס" => "bus",
        "רכבת" => "train",
        "רכיבה על סוסים" => "horseback",
        "אחר" => "other",
        _ => "unknown",
    }
}
