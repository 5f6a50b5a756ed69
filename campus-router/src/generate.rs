//! Batch trip generation over survey responses.

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::{FacilitySet, NoFacility};
use crate::export::Trip;
use crate::planner::{RoutePlanner, RouteProvider};
use crate::survey::SurveyResponse;

/// Records between progress log lines.
const PROGRESS_EVERY: usize = 10;

/// Generates one trip per survey response: residence to the nearest gate,
/// through the respondent's best-fitting stop if any.
pub struct TripGenerator<'a, P: RouteProvider> {
    planner: RoutePlanner<'a, P>,
    gates: &'a FacilitySet,
    pause: Duration,
}

impl<'a, P: RouteProvider> TripGenerator<'a, P> {
    pub fn new(planner: RoutePlanner<'a, P>, gates: &'a FacilitySet) -> Self {
        Self {
            planner,
            gates,
            pause: Duration::ZERO,
        }
    }

    /// Wait between records to go easy on the routing server.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Route a single response.
    ///
    /// `Ok(None)` means no route could be generated for it.
    pub async fn generate_trip(
        &self,
        vendor: usize,
        response: &SurveyResponse,
    ) -> Result<Option<Trip>, NoFacility> {
        let (gate_name, gate) = self.gates.find_closest(&response.residence)?;
        let mode = response.travel_mode();

        let stop = self
            .planner
            .choose_stop(&response.residence, gate, &response.pois, mode)
            .await;

        let Some(route) = self
            .planner
            .generate_route_path(&response.residence, gate, stop.as_ref(), mode)
            .await
        else {
            return Ok(None);
        };

        Ok(Some(Trip::new(vendor, response, gate_name, gate, &route)))
    }

    /// Route every response in order, skipping those without a route.
    pub async fn generate_trips(
        &self,
        responses: &[SurveyResponse],
    ) -> Result<Vec<Trip>, NoFacility> {
        info!(count = responses.len(), "generating trips");
        let mut trips = Vec::new();

        for (i, response) in responses.iter().enumerate() {
            match self.generate_trip(i, response).await? {
                Some(trip) => trips.push(trip),
                None => warn!(submission_id = %response.submission_id, "skipping response, no route"),
            }

            if !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            if (i + 1) % PROGRESS_EVERY == 0 {
                info!(done = i + 1, total = responses.len(), "progress");
            }
        }

        info!(trips = trips.len(), "generated trips");
        Ok(trips)
    }
}
