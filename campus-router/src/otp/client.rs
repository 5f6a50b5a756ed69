//! OpenTripPlanner HTTP client.
//!
//! The single point of contact with the routing server. Handles request
//! construction, bounded concurrency, rate limiting and retry, and hands
//! back domain itineraries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveTime};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{Coordinate, Itinerary, TravelMode};
use crate::planner::RouteProvider;

use super::convert::convert_plan;
use super::error::OtpError;
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use super::types::PlanResponse;

/// Default router endpoint of a local OTP instance.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/otp/routers/default";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 1;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Trip-request parameters sent with every `/plan` query.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    /// Travel date; `None` means today in local time.
    pub date: Option<NaiveDate>,
    /// Departure time.
    pub time: NaiveTime,
    /// Walking speed in m/s.
    pub walk_speed: f64,
    /// Maximum walking distance in meters.
    pub max_walk_distance: u32,
    pub locale: String,
    /// Cycling speed in m/s.
    pub bike_speed: f64,
    /// Driving speed in km/h.
    pub car_speed: f64,
    /// Maximum driving distance in meters.
    pub max_car_distance: u32,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            date: None,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            walk_speed: 1.4,
            max_walk_distance: 10_000,
            locale: "en".to_string(),
            bike_speed: 4.0,
            car_speed: 40.0,
            max_car_distance: 50_000,
        }
    }
}

/// Configuration for the OTP client.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Router base URL; `/plan` is appended.
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    pub retry: RetryPolicy,
    pub params: RequestParams,
}

impl OtpConfig {
    /// Create a config pointing at the given router URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the trip-request parameters.
    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            retry: RetryPolicy::default(),
            params: RequestParams::default(),
        }
    }
}

/// OTP `/plan` client.
///
/// Uses a semaphore to limit concurrent requests; with the default limit
/// of one, requests are strictly sequential.
#[derive(Debug, Clone)]
pub struct OtpClient<S = TokioSleeper> {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
    retry: RetryPolicy,
    params: RequestParams,
    sleeper: S,
}

impl OtpClient<TokioSleeper> {
    /// Create a new client that backs off on the tokio timer.
    pub fn new(config: OtpConfig) -> Result<Self, OtpError> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> OtpClient<S> {
    /// Create a new client with a custom sleeper.
    pub fn with_sleeper(config: OtpConfig, sleeper: S) -> Result<Self, OtpError> {
        if config.max_concurrent == 0 {
            return Err(OtpError::Config(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            retry: config.retry,
            params: config.params,
            sleeper,
        })
    }

    /// The retry policy this client applies.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Plan a single-leg route.
    ///
    /// Returns the first leg of the first itinerary. `None` covers every
    /// failure: no route exists, a malformed plan, or retries exhausted.
    /// A plan with zero itineraries is final and is not retried.
    pub async fn plan_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Option<Itinerary> {
        let params = self.query_params(origin, destination, mode);

        for attempt in 0..self.retry.max_retries {
            match self.fetch_plan(&params).await {
                Ok(Some(itinerary)) => return Some(itinerary),
                Ok(None) => {
                    debug!(from = %origin, to = %destination, %mode, "OTP returned no itineraries");
                    return None;
                }
                Err(OtpError::RateLimited) => {
                    let wait = self.retry.delay_for(attempt);
                    warn!(?wait, attempt, "rate limited by OTP, backing off");
                    self.sleeper.sleep(wait).await;
                    continue;
                }
                Err(e) if e.is_transient() => {
                    warn!(error = %e, attempt, "OTP request failed");
                }
                Err(e) => {
                    warn!(error = %e, from = %origin, to = %destination, "unusable OTP response");
                    return None;
                }
            }

            if !self.retry.is_final(attempt) {
                self.sleeper.sleep(self.retry.delay_for(attempt)).await;
            }
        }

        debug!(from = %origin, to = %destination, "OTP retries exhausted");
        None
    }

    /// Build the `/plan` query string for a request.
    pub fn query_params(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Vec<(&'static str, String)> {
        let p = &self.params;
        let date = p.date.unwrap_or_else(|| Local::now().date_naive());

        let mut params = vec![
            ("fromPlace", origin.to_place()),
            ("toPlace", destination.to_place()),
            ("mode", mode.as_otp_str().to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
            ("time", p.time.format("%H:%M:%S").to_string()),
            ("arriveBy", "false".to_string()),
            ("walkSpeed", p.walk_speed.to_string()),
            ("maxWalkDistance", p.max_walk_distance.to_string()),
            ("locale", p.locale.clone()),
        ];

        match mode {
            TravelMode::Bicycle => params.extend([
                ("bikeSpeed", p.bike_speed.to_string()),
                ("bikeSwitchTime", "0".to_string()),
                ("bikeSwitchCost", "0".to_string()),
            ]),
            TravelMode::Car => params.extend([
                ("carSpeed", p.car_speed.to_string()),
                ("maxCarDistance", p.max_car_distance.to_string()),
            ]),
            TravelMode::Walk | TravelMode::Transit => {}
        }

        params
    }

    /// Make one `/plan` request.
    ///
    /// `Ok(None)` means the server answered but found no itinerary.
    async fn fetch_plan(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<Option<Itinerary>, OtpError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OtpError::Status {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/plan", self.base_url);

        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OtpError::RateLimited);
        }

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OtpError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;

        let plan: PlanResponse = serde_json::from_str(&body).map_err(|e| OtpError::Json {
            message: e.to_string(),
        })?;

        if plan.itineraries().is_empty() {
            if let Some(error) = &plan.error {
                debug!(reason = %error.describe(), "OTP planner error");
            }
            return Ok(None);
        }

        Ok(convert_plan(&plan)?)
    }
}

impl<S: Sleeper> RouteProvider for OtpClient<S> {
    async fn plan_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Option<Itinerary> {
        OtpClient::plan_route(self, origin, destination, mode).await
    }
}
