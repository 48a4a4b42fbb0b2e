#![forbid(unsafe_code)]

//! Core domain model and business logic for the FitFlex tracker.
//!
//! This crate provides:
//! - Domain types (workouts, progress record, plan, preferences)
//! - The built-in workout catalog
//! - The progress ledger (counters, history, rolling week, badges, BMI)
//! - The session timer state machine
//! - Persistence (atomic JSON record, day marker, export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod state;
pub mod ledger;
pub mod badges;
pub mod bmi;
pub mod plan;
pub mod timer;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use badges::{BadgeDefinition, BadgeMetric, BadgeStatus, BADGES};
pub use bmi::{compute_bmi, BmiBand, BmiReading};
pub use timer::{format_clock, CompletionSink, SessionTimer, TimerEvent, TimerState};
pub use export::{export, ExportFormat, DEFAULT_EXPORT_FILE};
pub use tracker::{today_utc, Tracker};
