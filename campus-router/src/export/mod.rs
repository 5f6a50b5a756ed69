//! Trip export for trips-layer map animation.
//!
//! Each generated route becomes a [`Trip`] whose path carries per-point
//! animation timestamps. All trips go into one JSON document together with
//! their combined bounds.

mod document;
mod error;
mod trip;

pub use document::{Bounds, DocumentMetadata, TripsDocument, calculate_bounds};
pub use error::ExportError;
pub use trip::{ANIMATION_MS, GateInfo, Trip, TripMetadata, animation_timestamps};
