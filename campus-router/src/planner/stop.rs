//! Choosing the intermediate stop that costs the least extra time.

use tracing::debug;

use crate::domain::{Coordinate, Itinerary};

/// Pick the candidate stop that adds the least time over the direct route.
///
/// Each candidate comes with its via-stop itinerary, or `None` if no route
/// through it was found. Candidates whose route is not tagged with a stop,
/// or which add more than `max_added_distance_m` over the direct route, are
/// skipped. Ties go to the earliest candidate.
pub fn pick_best_stop<'a, 'b>(
    direct: &Itinerary,
    candidates: impl IntoIterator<Item = (&'a Coordinate, Option<&'b Itinerary>)>,
    max_added_distance_m: f64,
) -> Option<&'a Coordinate> {
    let mut best: Option<(&Coordinate, f64)> = None;

    for (stop, route) in candidates {
        let Some(route) = route else {
            debug!(%stop, "no route through stop");
            continue;
        };
        if !route.has_stop() {
            continue;
        }

        let added_distance = route.distance_m - direct.distance_m;
        if added_distance > max_added_distance_m {
            debug!(
                %stop,
                added_km = added_distance / 1000.0,
                "stop rejected: over distance budget"
            );
            continue;
        }

        let added_time = route.duration_secs - direct.duration_secs;
        if best.is_none_or(|(_, best_time)| added_time < best_time) {
            debug!(
                %stop,
                added_km = added_distance / 1000.0,
                added_min = added_time / 60.0,
                "stop accepted"
            );
            best = Some((stop, added_time));
        }
    }

    best.map(|(stop, _)| stop)
}
