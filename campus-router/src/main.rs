use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use campus_router::cache::{CacheConfig, CachedRouter};
use campus_router::domain::campus_gates;
use campus_router::export::TripsDocument;
use campus_router::generate::TripGenerator;
use campus_router::otp::{DEFAULT_BASE_URL, OtpClient, OtpConfig, RetryPolicy};
use campus_router::planner::{PlannerConfig, RoutePlanner};
use campus_router::survey::read_survey;

/// Pause between survey records.
const RECORD_PAUSE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let base_url = std::env::var("OTP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let survey_path =
        std::env::var("SURVEY_CSV").unwrap_or_else(|_| "data/mobility-data.csv".to_string());
    let output_path = std::env::var("TRIPS_OUTPUT")
        .unwrap_or_else(|_| "bgu_trips_visualization.json".to_string());

    let mut retry = RetryPolicy::default();
    if let Ok(raw) = std::env::var("OTP_MAX_RETRIES") {
        match raw.parse() {
            Ok(n) => retry.max_retries = n,
            Err(_) => warn!(value = %raw, "ignoring invalid OTP_MAX_RETRIES"),
        }
    }

    // Create OTP client
    let otp_config = OtpConfig::new(&base_url).with_retry(retry);
    let client = match OtpClient::new(otp_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create OTP client");
            return ExitCode::FAILURE;
        }
    };
    let router = CachedRouter::new(client, &CacheConfig::default());

    let responses = match read_survey(&survey_path) {
        Ok(responses) => responses,
        Err(e) => {
            error!(error = %e, path = %survey_path, "failed to read survey");
            return ExitCode::FAILURE;
        }
    };

    info!(url = %base_url, "routing against OTP");

    let planner_config = PlannerConfig::default();
    let gates = campus_gates();
    let planner = RoutePlanner::new(&router, &planner_config);
    let generator = TripGenerator::new(planner, &gates).with_pause(RECORD_PAUSE);

    let trips = match generator.generate_trips(&responses).await {
        Ok(trips) => trips,
        Err(e) => {
            error!(error = %e, "trip generation failed");
            return ExitCode::FAILURE;
        }
    };

    let document = TripsDocument::new(trips, Local::now());
    if let Err(e) = document.save(&output_path) {
        error!(error = %e, path = %output_path, "failed to save trips");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
