//! Retry behaviour of the OTP client against a local mock server.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;

use super::*;
use crate::domain::{Coordinate, TravelMode, polyline};

/// Records requested backoff instead of sleeping.
#[derive(Clone, Default)]
struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.slept.lock().unwrap().push(duration);
        std::future::ready(())
    }
}

/// Scripted `/plan` endpoint: pops one canned response per request and
/// repeats the fallback once the script runs out.
struct MockOtp {
    script: Mutex<VecDeque<(StatusCode, String)>>,
    fallback: (StatusCode, String),
    hits: AtomicUsize,
    last_query: Mutex<HashMap<String, String>>,
}

async fn plan(
    State(mock): State<Arc<MockOtp>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    *mock.last_query.lock().unwrap() = query;
    mock.script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| mock.fallback.clone())
}

async fn serve(script: Vec<(StatusCode, String)>, fallback: (StatusCode, String)) -> (String, Arc<MockOtp>) {
    let mock = Arc::new(MockOtp {
        script: Mutex::new(script.into()),
        fallback,
        hits: AtomicUsize::new(0),
        last_query: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/plan", get(plan))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), mock)
}

fn client(base_url: &str, sleeper: RecordingSleeper) -> OtpClient<RecordingSleeper> {
    let config = OtpConfig::new(base_url)
        .with_timeout(5)
        .with_retry(RetryPolicy::new(5, Duration::from_millis(100)));
    OtpClient::with_sleeper(config, sleeper).unwrap()
}

fn plan_body(points: &[(f64, f64)], duration: f64, distance: f64) -> String {
    serde_json::json!({
        "plan": {
            "itineraries": [{
                "legs": [{
                    "mode": "WALK",
                    "duration": duration,
                    "distance": distance,
                    "legGeometry": {"points": polyline::encode(points), "length": points.len()}
                }]
            }]
        }
    })
    .to_string()
}

fn ok(body: String) -> (StatusCode, String) {
    (StatusCode::OK, body)
}

fn home() -> Coordinate {
    Coordinate::new(31.25, 34.79, "home").unwrap()
}

fn gate() -> Coordinate {
    Coordinate::new(31.261222, 34.801138, "gate").unwrap()
}

#[tokio::test]
async fn success_on_first_attempt() {
    let body = plan_body(&[(31.25, 34.79), (31.26, 34.80)], 600.0, 1500.0);
    let (url, mock) = serve(vec![], ok(body)).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    let itinerary = client.plan_route(&home(), &gate(), TravelMode::Walk).await.unwrap();

    assert_eq!(itinerary.duration_secs, 600.0);
    assert_eq!(itinerary.distance_m, 1500.0);
    assert_eq!(itinerary.points.len(), 2);
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
    assert!(sleeper.sleeps().is_empty());

    let query = mock.last_query.lock().unwrap().clone();
    assert_eq!(query.get("fromPlace").map(String::as_str), Some("31.25,34.79"));
    assert_eq!(query.get("mode").map(String::as_str), Some("WALK"));
}

#[tokio::test]
async fn rate_limited_twice_then_success() {
    let body = plan_body(&[(31.25, 34.79), (31.26, 34.80)], 600.0, 1500.0);
    let script = vec![
        (StatusCode::TOO_MANY_REQUESTS, String::new()),
        (StatusCode::TOO_MANY_REQUESTS, String::new()),
    ];
    let (url, mock) = serve(script, ok(body)).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    let itinerary = client.plan_route(&home(), &gate(), TravelMode::Walk).await;

    assert!(itinerary.is_some());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[tokio::test]
async fn always_rate_limited_exhausts_retries() {
    let (url, mock) = serve(vec![], (StatusCode::TOO_MANY_REQUESTS, String::new())).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    let itinerary = client.plan_route(&home(), &gate(), TravelMode::Walk).await;

    assert!(itinerary.is_none());
    // Each 429 uses up an attempt, and backs off even after the last one
    assert_eq!(mock.hits.load(Ordering::SeqCst), 5);
    assert_eq!(
        sleeper.sleeps(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300),
            Duration::from_millis(400),
            Duration::from_millis(500),
        ]
    );
}

#[tokio::test]
async fn server_error_exhausts_retries() {
    let (url, mock) = serve(vec![], (StatusCode::INTERNAL_SERVER_ERROR, "boom".into())).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    let itinerary = client.plan_route(&home(), &gate(), TravelMode::Walk).await;

    assert!(itinerary.is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 5);
    // No sleep after the final attempt
    assert_eq!(
        sleeper.sleeps(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300),
            Duration::from_millis(400),
        ]
    );
}

#[tokio::test]
async fn empty_plan_is_not_retried() {
    let (url, mock) = serve(vec![], ok(r#"{"plan": {"itineraries": []}}"#.into())).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    let itinerary = client.plan_route(&home(), &gate(), TravelMode::Walk).await;

    assert!(itinerary.is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn planner_error_is_not_retried() {
    let body = r#"{"error": {"id": 404, "msg": "No trip found."}}"#.to_string();
    let (url, mock) = serve(vec![], ok(body)).await;
    let client = client(&url, RecordingSleeper::default());

    assert!(client.plan_route(&home(), &gate(), TravelMode::Car).await.is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_plan_is_not_retried() {
    let body = r#"{"plan": {"itineraries": [{"legs": [{"duration": 1}]}]}}"#.to_string();
    let (url, mock) = serve(vec![], ok(body)).await;
    let client = client(&url, RecordingSleeper::default());

    assert!(client.plan_route(&home(), &gate(), TravelMode::Walk).await.is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversized_geometry_is_not_retried() {
    let points = format!("}}{}F?", "~".repeat(11)).repeat(3);
    let body = serde_json::json!({"plan": {"itineraries": [{"legs": [
        {"duration": 1.0, "distance": 1.0, "legGeometry": {"points": points}}
    ]}]}})
    .to_string();
    let (url, mock) = serve(vec![], ok(body)).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    assert!(client.plan_route(&home(), &gate(), TravelMode::Walk).await.is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn garbage_body_is_retried() {
    let body = plan_body(&[(31.25, 34.79)], 1.0, 1.0);
    let script = vec![ok("<html>proxy error</html>".into())];
    let (url, mock) = serve(script, ok(body)).await;
    let sleeper = RecordingSleeper::default();
    let client = client(&url, sleeper.clone());

    assert!(client.plan_route(&home(), &gate(), TravelMode::Walk).await.is_some());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 2);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(100)]);
}

#[tokio::test]
async fn unreachable_server_gives_none() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sleeper = RecordingSleeper::default();
    let config = OtpConfig::new(format!("http://{addr}"))
        .with_retry(RetryPolicy::new(3, Duration::from_millis(10)));
    let client = OtpClient::with_sleeper(config, sleeper.clone()).unwrap();

    assert!(client.plan_route(&home(), &gate(), TravelMode::Walk).await.is_none());
    assert_eq!(sleeper.sleeps().len(), 2);
}

#[tokio::test]
async fn bicycle_request_carries_bike_params() {
    let body = plan_body(&[(31.25, 34.79)], 1.0, 1.0);
    let (url, mock) = serve(vec![], ok(body)).await;
    let client = client(&url, RecordingSleeper::default());

    let mode = TravelMode::from_survey_label("אופניים");
    client.plan_route(&home(), &gate(), mode).await.unwrap();

    let query = mock.last_query.lock().unwrap().clone();
    assert_eq!(query.get("mode").map(String::as_str), Some("BICYCLE"));
    assert!(query.contains_key("bikeSpeed"));
    assert!(query.contains_key("bikeSwitchTime"));
    assert!(query.contains_key("bikeSwitchCost"));
}
