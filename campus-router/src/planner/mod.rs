//! Route generation on top of a single-leg routing service.
//!
//! This module answers: "how does this respondent get from home to the
//! campus gate, and which of their usual stops fits on the way?"
//!
//! The routing service is unreliable near buildings, so every request is
//! retried from slightly perturbed coordinates before giving up. Routes
//! through a stop are built from two independently routed legs.

mod compose;
mod config;
mod route;
mod stop;
mod variations;


pub use compose::{ComposeError, combine};
pub use config::{PlannerConfig, StopStrategy};
pub use route::{RoutePlanner, RouteProvider};
pub use stop::pick_best_stop;
pub use variations::{VariationTier, generate_variations};
