//! OpenTripPlanner (OTP) routing client.
//!
//! This module provides an HTTP client for OTP's REST `/plan` endpoint,
//! which returns walking, cycling, driving and transit itineraries.
//!
//! Key characteristics of OTP as used here:
//! - A plan with zero itineraries is a definitive "no route", not a
//!   transient failure, and is never retried
//! - Points near building interiors often fail to snap to the street
//!   graph; the planner compensates by perturbing coordinates
//! - Leg geometry is an encoded polyline (precision 5)

mod client;
mod convert;
mod error;
mod retry;
mod types;

#[cfg(test)]
mod client_tests;

pub use client::{DEFAULT_BASE_URL, OtpClient, OtpConfig, RequestParams};
pub use convert::{ConversionError, convert_plan, decode_points};
pub use error::OtpError;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use types::{GeometryPoints, ItineraryDto, LegDto, LegGeometry, Plan, PlanResponse, PlannerError};
