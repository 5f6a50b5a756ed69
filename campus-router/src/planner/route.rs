//! Route generation with perturbation retries.
//!
//! Every search here is a short-circuiting linear search: candidates are
//! tried in a fixed order and the first route found is returned. Which
//! route comes back therefore depends on iteration order, not on any
//! ranking among routes that would also have succeeded.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::stream::{self, StreamExt};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::domain::{Coordinate, Itinerary, RoutePath, TravelMode};

use super::compose::combine;
use super::config::{PlannerConfig, StopStrategy};
use super::stop::pick_best_stop;
use super::variations::{VariationTier, generate_variations};

/// Trait for planning a single origin → destination route.
///
/// This abstraction allows the planner to be tested with mock data.
/// `None` means no route, for whatever reason; implementations are
/// expected to have handled retries already.
pub trait RouteProvider {
    fn plan_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> impl Future<Output = Option<Itinerary>>;
}

/// Route planner over a [`RouteProvider`].
///
/// Holds the random source used for coordinate perturbation; seed it for
/// reproducible searches.
pub struct RoutePlanner<'a, P: RouteProvider, R = ChaCha8Rng> {
    provider: &'a P,
    config: &'a PlannerConfig,
    rng: Mutex<R>,
}

impl<'a, P: RouteProvider> RoutePlanner<'a, P, ChaCha8Rng> {
    /// Create a planner with an entropy-seeded random source.
    pub fn new(provider: &'a P, config: &'a PlannerConfig) -> Self {
        Self::with_rng(provider, config, ChaCha8Rng::from_entropy())
    }

    /// Create a planner whose perturbations are reproducible.
    pub fn seeded(provider: &'a P, config: &'a PlannerConfig, seed: u64) -> Self {
        Self::with_rng(provider, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'a, P: RouteProvider, R: Rng> RoutePlanner<'a, P, R> {
    /// Create a planner with a custom random source.
    pub fn with_rng(provider: &'a P, config: &'a PlannerConfig, rng: R) -> Self {
        Self {
            provider,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.config
    }

    fn variations(&self, coord: &Coordinate, tier: VariationTier) -> Vec<Coordinate> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        generate_variations(coord, tier, &self.config.bounds, &mut *rng)
    }

    /// One attempt at `origin → destination`, through `stop` if given.
    async fn route_once(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        stop: Option<&Coordinate>,
        mode: TravelMode,
    ) -> Option<Itinerary> {
        let Some(stop) = stop else {
            return self.provider.plan_route(origin, destination, mode).await;
        };

        let leg1 = self.provider.plan_route(origin, stop, mode).await?;
        let leg2 = self.provider.plan_route(stop, destination, mode).await?;

        match combine(&leg1, &leg2, stop, self.config.junction_tolerance_m) {
            Ok(itinerary) => Some(itinerary),
            Err(e) => {
                warn!(error = %e, %stop, "failed to combine legs");
                None
            }
        }
    }

    /// Route from `origin` to `destination`, optionally through `stop`.
    ///
    /// Tries the exact origin first, then small perturbations of it
    /// (`leg_variations`), returning the first route found.
    pub async fn get_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        stop: Option<&Coordinate>,
        mode: TravelMode,
    ) -> Option<Itinerary> {
        let origins = self.variations(origin, self.config.leg_variations);

        for (attempt, origin_variant) in origins.iter().enumerate() {
            if let Some(itinerary) = self.route_once(origin_variant, destination, stop, mode).await {
                if attempt > 0 {
                    debug!(attempt, from = %origin, "route found from perturbed origin");
                }
                return Some(itinerary);
            }
        }

        None
    }

    /// Choose the intermediate stop that adds the least travel time.
    ///
    /// Needs the direct route as a baseline; returns `None` if it cannot be
    /// found, or if no candidate stays within `max_added_distance_m`. The
    /// caller then routes directly.
    pub async fn select_best_stop(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        candidates: &[Coordinate],
        mode: TravelMode,
    ) -> Option<Coordinate> {
        if candidates.is_empty() {
            return None;
        }

        let Some(direct) = self.get_route(origin, destination, None, mode).await else {
            debug!(from = %origin, to = %destination, "no direct route, cannot rank stops");
            return None;
        };

        // `buffered` yields results in candidate order, which keeps the
        // first-minimum tie-break independent of completion order.
        let routes: Vec<Option<Itinerary>> = stream::iter(candidates)
            .map(move |stop| self.get_route(origin, destination, Some(stop), mode))
            .buffered(self.config.stop_concurrency.max(1))
            .collect()
            .await;

        pick_best_stop(
            &direct,
            candidates.iter().zip(routes.iter().map(Option::as_ref)),
            self.config.max_added_distance_m,
        )
        .cloned()
    }

    /// Choose a stop among `pois` according to the configured strategy.
    pub async fn choose_stop(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        pois: &[Coordinate],
        mode: TravelMode,
    ) -> Option<Coordinate> {
        match self.config.stop_strategy {
            StopStrategy::FirstPoi => pois.first().cloned(),
            StopStrategy::Optimal => self.select_best_stop(origin, destination, pois, mode).await,
        }
    }

    /// Generate a full route path, perturbing both ends if needed.
    ///
    /// Nested search: outer loop over origin variants, inner loop over
    /// destination variants, each attempt going through
    /// [`get_route`](Self::get_route). The first route found wins.
    pub async fn generate_route_path(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        stop: Option<&Coordinate>,
        mode: TravelMode,
    ) -> Option<RoutePath> {
        let origins = self.variations(origin, self.config.origin_variations);
        let destinations = self.variations(destination, self.config.destination_variations);

        for origin_variant in &origins {
            for destination_variant in &destinations {
                if let Some(itinerary) = self
                    .get_route(origin_variant, destination_variant, stop, mode)
                    .await
                {
                    return Some(itinerary.into());
                }
            }
        }

        warn!(from = %origin, to = %destination, "could not generate route");
        None
    }
}
