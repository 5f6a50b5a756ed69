//! Named destination points (campus gates) and nearest-gate lookup.

use super::coordinate::{Coordinate, distance_km};

/// Error returned when looking up the closest facility in an empty set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("facility set is empty")]
pub struct NoFacility;

/// An ordered, read-only set of named facilities.
///
/// Iteration order is insertion order, which also decides ties in
/// [`FacilitySet::find_closest`].
#[derive(Debug, Clone, Default)]
pub struct FacilitySet {
    facilities: Vec<(String, Coordinate)>,
}

impl FacilitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facility. Later additions lose ties to earlier ones.
    pub fn with(mut self, id: impl Into<String>, coordinate: Coordinate) -> Self {
        self.facilities.push((id.into(), coordinate));
        self
    }

    /// Look up a facility by id.
    pub fn get(&self, id: &str) -> Option<&Coordinate> {
        self.facilities
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, c)| c)
    }

    /// Iterate over `(id, coordinate)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.facilities.iter().map(|(id, c)| (id.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Find the facility closest to `point` by great-circle distance.
    ///
    /// The first minimum in iteration order wins.
    pub fn find_closest(&self, point: &Coordinate) -> Result<(&str, &Coordinate), NoFacility> {
        let mut best: Option<(&str, &Coordinate, f64)> = None;

        for (id, facility) in self.iter() {
            let distance = distance_km(point, facility);
            match best {
                Some((_, _, best_distance)) if distance >= best_distance => {}
                _ => best = Some((id, facility, distance)),
            }
        }

        best.map(|(id, c, _)| (id, c)).ok_or(NoFacility)
    }
}

/// The three university entrances used as trip destinations.
pub fn campus_gates() -> FacilitySet {
    const GATES: [(&str, f64, f64, &str); 3] = [
        ("uni_south_3", 31.261222, 34.801138, "University South Gate 3"),
        ("uni_north_3", 31.263911, 34.799290, "University North Gate 3"),
        ("uni_west", 31.262500, 34.805528, "University West Gate"),
    ];

    GATES
        .iter()
        .filter_map(|(id, lat, lon, name)| {
            Coordinate::new(*lat, *lon, *name)
                .ok()
                .map(|c| (id.to_string(), c))
        })
        .fold(FacilitySet::new(), |set, (id, c)| set.with(id, c))
}
