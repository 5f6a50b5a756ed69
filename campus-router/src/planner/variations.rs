//! Coordinate perturbation for recovering from snapping failures.
//!
//! OTP sometimes finds no route from a point inside a building or a
//! fenced area even though a route exists from a few meters away. The
//! search retries from randomly perturbed copies of the input.

use rand::Rng;

use crate::domain::{BoundingBox, Coordinate};

/// How many variants to try and how far they may stray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationTier {
    /// Total coordinates to try, including the original.
    pub count: usize,
    /// Maximum offset applied to latitude and longitude, in degrees.
    pub max_offset_deg: f64,
}

impl VariationTier {
    /// About ±20 m, for retrying a single leg.
    pub const NEAR: VariationTier = VariationTier {
        count: 3,
        max_offset_deg: 0.0002,
    };

    /// About ±50 m, for retrying a whole route.
    pub const WIDE: VariationTier = VariationTier {
        count: 5,
        max_offset_deg: 0.0005,
    };

    pub fn new(count: usize, max_offset_deg: f64) -> Self {
        Self {
            count,
            max_offset_deg,
        }
    }

    pub fn with_count(self, count: usize) -> Self {
        Self { count, ..self }
    }
}

/// Generate `coord` followed by up to `tier.count - 1` random variants.
///
/// Latitude and longitude are offset independently and uniformly in
/// `[-max_offset_deg, max_offset_deg]`. Variants that land outside
/// `bounds` are dropped rather than redrawn, so the result may be
/// shorter than `tier.count`. The original is always first. A zero or
/// non-finite offset yields the original alone.
pub fn generate_variations<R: Rng + ?Sized>(
    coord: &Coordinate,
    tier: VariationTier,
    bounds: &BoundingBox,
    rng: &mut R,
) -> Vec<Coordinate> {
    let max = tier.max_offset_deg.abs();
    if !max.is_finite() || max == 0.0 {
        return vec![coord.clone()];
    }

    let mut variations = Vec::with_capacity(tier.count.max(1));
    variations.push(coord.clone());

    for _ in 1..tier.count {
        let lat = coord.lat() + rng.gen_range(-max..=max);
        let lon = coord.lon() + rng.gen_range(-max..=max);

        if let Ok(variant) = Coordinate::new_within(lat, lon, coord.comment(), bounds) {
            variations.push(variant);
        }
    }

    variations
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn original_is_first() {
        let home = Coordinate::new(31.25, 34.79, "home").unwrap();
        let variations = generate_variations(&home, VariationTier::NEAR, &BoundingBox::ISRAEL, &mut rng());

        assert_eq!(variations.len(), 3);
        assert_eq!(variations[0], home);
        assert!(variations[1..].iter().all(|v| v.comment() == "home"));
    }

    #[test]
    fn variants_stay_within_offset() {
        let home = Coordinate::new(31.25, 34.79, "").unwrap();
        let tier = VariationTier::WIDE.with_count(50);
        let variations = generate_variations(&home, tier, &BoundingBox::ISRAEL, &mut rng());

        for v in &variations {
            assert!((v.lat() - home.lat()).abs() <= 0.0005);
            assert!((v.lon() - home.lon()).abs() <= 0.0005);
        }
    }

    #[test]
    fn out_of_bounds_variants_dropped() {
        // On the south-west corner, three quarters of variants fall outside
        let corner = Coordinate::new(29.5, 34.2, "").unwrap();
        let tier = VariationTier::WIDE.with_count(40);
        let variations = generate_variations(&corner, tier, &BoundingBox::ISRAEL, &mut rng());

        assert!(variations.len() < 40);
        assert_eq!(variations[0], corner);
        assert!(
            variations
                .iter()
                .all(|v| BoundingBox::ISRAEL.contains(v.lat(), v.lon()))
        );
    }

    #[test]
    fn zero_or_one_count_gives_original_only() {
        let home = Coordinate::new(31.25, 34.79, "").unwrap();
        for count in [0, 1] {
            let tier = VariationTier::NEAR.with_count(count);
            let variations = generate_variations(&home, tier, &BoundingBox::ISRAEL, &mut rng());
            assert_eq!(variations, vec![home.clone()]);
        }
    }

    #[test]
    fn degenerate_offsets_give_original_only() {
        let home = Coordinate::new(31.25, 34.79, "").unwrap();
        for max in [0.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let tier = VariationTier::new(5, max);
            let variations = generate_variations(&home, tier, &BoundingBox::ISRAEL, &mut rng());
            assert_eq!(variations, vec![home.clone()]);
        }
    }

    #[test]
    fn negative_offset_treated_as_magnitude() {
        let home = Coordinate::new(31.25, 34.79, "").unwrap();
        let tier = VariationTier::new(20, -0.0002);
        let variations = generate_variations(&home, tier, &BoundingBox::ISRAEL, &mut rng());

        assert_eq!(variations.len(), 20);
        for v in &variations {
            assert!((v.lat() - home.lat()).abs() <= 0.0002);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let home = Coordinate::new(31.25, 34.79, "").unwrap();
        let a = generate_variations(&home, VariationTier::WIDE, &BoundingBox::ISRAEL, &mut rng());
        let b = generate_variations(&home, VariationTier::WIDE, &BoundingBox::ISRAEL, &mut rng());
        assert_eq!(a, b);
    }
}
