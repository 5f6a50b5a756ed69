//! Domain types for the campus route generator.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod coordinate;
mod facility;
mod itinerary;
mod mode;
pub mod polyline;

pub use coordinate::{BoundingBox, Coordinate, InvalidCoordinate, distance_km, distance_m};
pub use facility::{FacilitySet, NoFacility, campus_gates};
pub use itinerary::{Itinerary, RoutePath};
pub use mode::{TravelMode, english_mode_label};
