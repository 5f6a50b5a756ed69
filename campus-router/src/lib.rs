//! Campus route generator.
//!
//! Turns mobility survey answers into plausible routes: from each
//! respondent's residence to the nearest campus gate, by their usual mode
//! of travel, through the stop on the way that costs them the least.

pub mod cache;
pub mod domain;
pub mod export;
pub mod generate;
pub mod otp;
pub mod planner;
pub mod survey;
