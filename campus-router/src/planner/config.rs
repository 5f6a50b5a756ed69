//! Route planner configuration.

use crate::domain::BoundingBox;

use super::variations::VariationTier;

/// How to choose the intermediate stop among a respondent's POIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopStrategy {
    /// The POI adding the least travel time within the distance budget.
    #[default]
    Optimal,
    /// Always the first POI listed.
    FirstPoi,
}

/// Configuration parameters for route generation.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Origin perturbation when retrying a single route request.
    pub leg_variations: VariationTier,

    /// Origin perturbation for whole-route generation (outer loop).
    pub origin_variations: VariationTier,

    /// Destination perturbation for whole-route generation (inner loop).
    pub destination_variations: VariationTier,

    /// Maximum extra distance (meters) a stop may add to the direct route.
    /// Stops adding more than this are rejected outright.
    pub max_added_distance_m: f64,

    /// Maximum gap (meters) between two legs' shared point for it to be
    /// treated as the same point.
    pub junction_tolerance_m: f64,

    pub stop_strategy: StopStrategy,

    /// Candidate stops evaluated at once. Requests still queue on the
    /// client's own concurrency limit.
    pub stop_concurrency: usize,

    /// Region every generated variant must stay in.
    pub bounds: BoundingBox,
}

impl PlannerConfig {
    /// Set the stop strategy.
    pub fn with_stop_strategy(mut self, strategy: StopStrategy) -> Self {
        self.stop_strategy = strategy;
        self
    }

    /// Set the added-distance budget.
    pub fn with_max_added_distance(mut self, meters: f64) -> Self {
        self.max_added_distance_m = meters;
        self
    }

    /// Set how many candidate stops are evaluated at once.
    pub fn with_stop_concurrency(mut self, n: usize) -> Self {
        self.stop_concurrency = n;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            leg_variations: VariationTier::NEAR,
            origin_variations: VariationTier::WIDE,
            destination_variations: VariationTier::WIDE.with_count(3),
            max_added_distance_m: 2000.0,
            junction_tolerance_m: 25.0,
            stop_strategy: StopStrategy::Optimal,
            stop_concurrency: 1,
            bounds: BoundingBox::ISRAEL,
        }
    }
}
