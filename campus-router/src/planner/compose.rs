//! Two-leg itinerary composition through an intermediate stop.

use tracing::debug;

use crate::domain::{Coordinate, Itinerary, distance_m};

/// Error composing two legs into one itinerary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    /// A leg came back without geometry
    #[error("leg {0} has no geometry")]
    EmptyLeg(u8),
}

/// Join `origin → stop` and `stop → destination` into one itinerary.
///
/// Durations and distances are summed. Both legs normally meet at the
/// stop, so the second leg's first point repeats the first leg's last
/// point and is dropped. OTP snaps endpoints to the street graph, so the
/// two are compared within `junction_tolerance_m` rather than exactly; a
/// junction farther apart than that keeps both points.
pub fn combine(
    leg1: &Itinerary,
    leg2: &Itinerary,
    stop: &Coordinate,
    junction_tolerance_m: f64,
) -> Result<Itinerary, ComposeError> {
    let end1 = leg1.last_point().ok_or(ComposeError::EmptyLeg(1))?;
    let start2 = leg2.first_point().ok_or(ComposeError::EmptyLeg(2))?;

    let gap = distance_m(end1, start2);
    let skip = if gap <= junction_tolerance_m {
        1
    } else {
        debug!(gap_m = gap, %stop, "legs do not share a junction point, keeping both");
        0
    };

    let mut points = Vec::with_capacity(leg1.points.len() + leg2.points.len() - skip);
    points.extend_from_slice(&leg1.points);
    points.extend_from_slice(&leg2.points[skip..]);

    Ok(Itinerary {
        points,
        duration_secs: leg1.duration_secs + leg2.duration_secs,
        distance_m: leg1.distance_m + leg2.distance_m,
        via: Some(stop.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> Coordinate {
        Coordinate::new(31.262, 34.8, "coffee").unwrap()
    }

    #[test]
    fn shared_junction_is_deduplicated() {
        let leg1 = Itinerary::new(vec![(0.0, 0.0), (1.0, 1.0)], 120.0, 300.0);
        let leg2 = Itinerary::new(vec![(1.0, 1.0), (2.0, 2.0)], 60.0, 150.5);

        let combined = combine(&leg1, &leg2, &stop(), 25.0).unwrap();

        assert_eq!(combined.points, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(combined.duration_secs, 180.0);
        assert_eq!(combined.distance_m, 450.5);
        assert_eq!(combined.via, Some(stop()));
    }

    #[test]
    fn snapped_junction_within_tolerance_is_deduplicated() {
        // ~1 m apart
        let leg1 = Itinerary::new(vec![(31.25, 34.79), (31.262, 34.8)], 1.0, 1.0);
        let leg2 = Itinerary::new(vec![(31.26201, 34.8), (31.27, 34.81)], 1.0, 1.0);

        let combined = combine(&leg1, &leg2, &stop(), 25.0).unwrap();
        assert_eq!(combined.points.len(), 3);
        assert_eq!(combined.points[1], (31.262, 34.8));
    }

    #[test]
    fn distant_junction_keeps_both_points() {
        // ~1.1 km apart
        let leg1 = Itinerary::new(vec![(31.25, 34.79), (31.26, 34.8)], 1.0, 1.0);
        let leg2 = Itinerary::new(vec![(31.27, 34.8), (31.28, 34.81)], 1.0, 1.0);

        let combined = combine(&leg1, &leg2, &stop(), 25.0).unwrap();
        assert_eq!(combined.points.len(), 4);
    }

    #[test]
    fn single_point_second_leg() {
        let leg1 = Itinerary::new(vec![(0.0, 0.0), (1.0, 1.0)], 1.0, 1.0);
        let leg2 = Itinerary::new(vec![(1.0, 1.0)], 0.0, 0.0);

        let combined = combine(&leg1, &leg2, &stop(), 25.0).unwrap();
        assert_eq!(combined.points, vec![(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn empty_leg_fails() {
        let full = Itinerary::new(vec![(0.0, 0.0)], 1.0, 1.0);
        let empty = Itinerary::new(vec![], 1.0, 1.0);

        assert_eq!(
            combine(&empty, &full, &stop(), 25.0),
            Err(ComposeError::EmptyLeg(1))
        );
        assert_eq!(
            combine(&full, &empty, &stop(), 25.0),
            Err(ComposeError::EmptyLeg(2))
        );
        assert_eq!(ComposeError::EmptyLeg(2).to_string(), "leg 2 has no geometry");
    }
}
