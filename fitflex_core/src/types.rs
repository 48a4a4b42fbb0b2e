//! Core domain types for the FitFlex tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout definitions and the catalog
//! - The persisted progress record (counters, history, week window, plan)
//! - User preferences (goal, theme)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Points awarded for every completed session
pub const POINTS_PER_WORKOUT: u64 = 10;

/// Maximum number of history entries kept, newest first
pub const HISTORY_LIMIT: usize = 30;

/// Number of daily buckets in the rolling week
pub const WEEK_DAYS: usize = 7;

/// Number of workouts in a day's plan
pub const PLAN_SIZE: usize = 3;

/// Daily goal used when none (or zero) is set
pub const DEFAULT_GOAL_MINUTES: u32 = 30;

// ============================================================================
// Workout Types
// ============================================================================

/// Training focus of a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
    Strength,
    Cardio,
    Core,
}

impl fmt::Display for WorkoutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkoutCategory::Strength => "strength",
            WorkoutCategory::Cardio => "cardio",
            WorkoutCategory::Core => "core",
        };
        f.write_str(s)
    }
}

/// Intended experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkoutLevel {
    Beginner,
    Intermediate,
    All,
}

impl fmt::Display for WorkoutLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkoutLevel::Beginner => "Beginner",
            WorkoutLevel::Intermediate => "Intermediate",
            WorkoutLevel::All => "All",
        };
        f.write_str(s)
    }
}

/// A workout in the built-in library (e.g., "Push-ups")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDefinition {
    pub id: String,
    pub name: String,
    pub category: WorkoutCategory,
    pub level: WorkoutLevel,
    pub duration_seconds: u32,
    pub calories: u32,
    pub media_ref: Option<String>,
    pub description: String,
}

/// The complete, read-only workout library
#[derive(Clone, Debug)]
pub struct Catalog {
    pub workouts: Vec<WorkoutDefinition>,
}

// ============================================================================
// Progress Record Types
// ============================================================================

/// One completed session, as shown in the history list
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    /// Display name of the workout at the time it was recorded
    pub workout: String,
    #[serde(default)]
    pub workout_id: Option<String>,
    pub calories: u32,
    pub seconds: u32,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Aggregates for one calendar day of the rolling week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub calories: u32,
    pub workouts: u32,
}

impl DayBucket {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            calories: 0,
            workouts: 0,
        }
    }
}

/// One slot in today's plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanItem {
    /// Workout id; may not resolve if the catalog changed
    pub id: String,
    pub done: bool,
}

/// What the user is training for
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    #[default]
    StayFit,
    FatLoss,
    MuscleGain,
}

impl GoalType {
    /// Parse the kebab-case name used on disk and on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stay-fit" | "stayfit" => Some(GoalType::StayFit),
            "fat-loss" | "fatloss" => Some(GoalType::FatLoss),
            "muscle-gain" | "musclegain" => Some(GoalType::MuscleGain),
            _ => None,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalType::StayFit => "stay-fit",
            GoalType::FatLoss => "fat-loss",
            GoalType::MuscleGain => "muscle-gain",
        };
        f.write_str(s)
    }
}

/// Display theme preference
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

/// The single persisted progress record.
///
/// Every field defaults so that records written by older versions still load.
/// `week` cannot default to a dated window here; [`ProgressState::normalize`]
/// rebuilds it after loading.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressState {
    pub theme: Theme,
    pub points: u64,
    pub calories_today: u32,
    pub workouts_today: u32,
    pub goal_minutes: u32,
    pub goal_type: GoalType,
    pub history: Vec<HistoryEntry>,
    pub bmi: Option<f64>,
    pub today_plan: Vec<PlanItem>,
    pub week: Vec<DayBucket>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            points: 0,
            calories_today: 0,
            workouts_today: 0,
            goal_minutes: DEFAULT_GOAL_MINUTES,
            goal_type: GoalType::default(),
            history: Vec::new(),
            bmi: None,
            today_plan: Vec::new(),
            week: Vec::new(),
        }
    }
}
