//! Progress ledger: counters, history and the rolling week window.
//!
//! All operations take `today` as a parameter so the day boundary is
//! decided by the caller, never by the wall clock.

use crate::{
    DayBucket, GoalType, HistoryEntry, ProgressState, WorkoutDefinition, DEFAULT_GOAL_MINUTES,
    HISTORY_LIMIT, POINTS_PER_WORKOUT, WEEK_DAYS,
};
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

/// Seven zeroed buckets, oldest first, ending at `today`
pub fn empty_week(today: NaiveDate) -> Vec<DayBucket> {
    (0..WEEK_DAYS)
        .rev()
        .map(|days_back| DayBucket::empty(today - Duration::days(days_back as i64)))
        .collect()
}

impl ProgressState {
    /// A fresh record with a zeroed week ending at `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            week: empty_week(today),
            ..Self::default()
        }
    }

    /// Repair fields that cannot be defaulted during deserialization.
    ///
    /// Returns true if anything changed.
    pub fn normalize(&mut self, today: NaiveDate) -> bool {
        let mut changed = false;

        if self.week.len() != WEEK_DAYS {
            tracing::warn!(
                "Week window has {} buckets, expected {}. Rebuilding.",
                self.week.len(),
                WEEK_DAYS
            );
            self.week = empty_week(today);
            changed = true;
        }

        if self.history.len() > HISTORY_LIMIT {
            self.history.truncate(HISTORY_LIMIT);
            changed = true;
        }

        changed
    }

    /// Apply a completed session to every counter in one step.
    ///
    /// Awards the fixed reward, bumps today's counters, ticks off the matching
    /// plan entries, prepends a history entry and adds to today's week bucket.
    pub fn record_completion(
        &mut self,
        workout: &WorkoutDefinition,
        today: NaiveDate,
        session_id: Option<Uuid>,
    ) {
        self.points += POINTS_PER_WORKOUT;
        self.workouts_today += 1;
        self.calories_today += workout.calories;

        for item in self.today_plan.iter_mut().filter(|p| p.id == workout.id) {
            item.done = true;
        }

        self.history.insert(
            0,
            HistoryEntry {
                date: today,
                workout: workout.name.clone(),
                workout_id: Some(workout.id.clone()),
                calories: workout.calories,
                seconds: workout.duration_seconds,
                session_id,
            },
        );
        self.history.truncate(HISTORY_LIMIT);

        self.advance_window(today);
        if let Some(bucket) = self.week.last_mut() {
            bucket.calories += workout.calories;
            bucket.workouts += 1;
        }

        tracing::info!(
            "Recorded {} (+{} kcal, {} points total)",
            workout.id,
            workout.calories,
            self.points
        );
    }

    /// Slide the week window forward by one day if it does not end today.
    ///
    /// Only a single day is ever advanced: after a gap of several days the
    /// window is not caught up and its dates stop being contiguous.
    pub fn advance_window(&mut self, today: NaiveDate) -> bool {
        if self.week.last().map(|b| b.date) == Some(today) {
            return false;
        }

        if !self.week.is_empty() {
            self.week.remove(0);
        }
        self.week.push(DayBucket::empty(today));

        tracing::debug!("Advanced week window to {}", today);
        true
    }

    /// Reset today's counters when the last active date is not `today`.
    ///
    /// `last_active` is the separately persisted day marker; it is updated in
    /// place. Returns true if a rollover happened.
    pub fn rollover_day(&mut self, last_active: &mut Option<NaiveDate>, today: NaiveDate) -> bool {
        if *last_active == Some(today) {
            return false;
        }

        self.calories_today = 0;
        self.workouts_today = 0;
        *last_active = Some(today);

        tracing::info!("New day {}: reset daily counters", today);
        true
    }

    /// Share of the daily goal reached, 0..=100.
    ///
    /// Each workout counts as ten minutes; goals under ten minutes are
    /// treated as ten.
    pub fn daily_progress_percent(&self) -> u32 {
        let goal_minutes = match self.goal_minutes {
            0 => DEFAULT_GOAL_MINUTES,
            m => m,
        }
        .max(10);

        let percent = (self.workouts_today as f64 * 10.0) / goal_minutes as f64 * 100.0;
        (percent.round() as u32).min(100)
    }

    /// Store a new goal. Zero minutes falls back to the default.
    pub fn set_goal(&mut self, goal_type: GoalType, minutes: u32) {
        self.goal_type = goal_type;
        self.goal_minutes = if minutes == 0 {
            DEFAULT_GOAL_MINUTES
        } else {
            minutes
        };
    }

    /// Weekly advice for the current goal
    pub fn plan_suggestion(&self) -> String {
        let m = self.goal_minutes;
        match self.goal_type {
            GoalType::FatLoss => format!(
                "Plan: {} mins/day. 3x cardio, 2x strength, 2x active rest.",
                m
            ),
            GoalType::MuscleGain => format!(
                "Plan: {} mins/day. 3-4x strength, 1-2x cardio, 2x mobility.",
                m
            ),
            GoalType::StayFit => format!(
                "Plan: {} mins/day. Mixed circuits + mobility + light cardio.",
                m
            ),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Total calories and workouts across the week window
    pub fn week_totals(&self) -> (u32, u32) {
        self.week
            .iter()
            .fold((0, 0), |(c, w), b| (c + b.calories, w + b.workouts))
    }
}
