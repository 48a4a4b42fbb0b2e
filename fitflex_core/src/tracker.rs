//! The owning context for the progress record.
//!
//! A `Tracker` loads the record once, applies the day boundary, and saves
//! the whole record after every mutation. It is also the completion sink the
//! session timer reports to.

use crate::state::{load_day_marker, save_day_marker};
use crate::timer::CompletionSink;
use crate::{
    BmiReading, Catalog, Error, GoalType, ProgressState, Result, WorkoutDefinition,
};
use chrono::{NaiveDate, Utc};
use rand::Rng;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PROGRESS_FILE: &str = "progress.json";
const DAY_MARKER_FILE: &str = "last_active_date";

/// Today's date as used for the day boundary (UTC calendar day)
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Where the record and the day marker live
#[derive(Clone, Debug)]
pub struct StorePaths {
    pub progress: PathBuf,
    pub day_marker: PathBuf,
}

impl StorePaths {
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            progress: data_dir.join(PROGRESS_FILE),
            day_marker: data_dir.join(DAY_MARKER_FILE),
        }
    }
}

pub struct Tracker {
    paths: StorePaths,
    state: ProgressState,
    today: NaiveDate,
}

impl Tracker {
    /// Load the record from `data_dir` and apply the day boundary for `today`.
    ///
    /// A missing or unreadable record is replaced with a fresh one using the
    /// `seed` goal settings. The week window is advanced to `today`. The
    /// record is saved if loading changed anything, and the day marker is
    /// written only after the record it describes.
    pub fn open(data_dir: &Path, today: NaiveDate, seed: (GoalType, u32)) -> Result<Self> {
        let paths = StorePaths::in_dir(data_dir);

        let (mut state, mut dirty) = match ProgressState::load_stored(&paths.progress) {
            Some(state) => (state, false),
            None => {
                let mut state = ProgressState::new(today);
                state.set_goal(seed.0, seed.1);
                (state, true)
            }
        };
        dirty |= state.normalize(today);

        let mut marker = load_day_marker(&paths.day_marker);
        let rolled_over = state.rollover_day(&mut marker, today);
        dirty |= rolled_over;
        dirty |= state.advance_window(today);

        let tracker = Self {
            paths,
            state,
            today,
        };
        if dirty {
            tracker.save()?;
        }
        if rolled_over {
            save_day_marker(&tracker.paths.day_marker, today)?;
        }
        Ok(tracker)
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn save(&self) -> Result<()> {
        self.state.save(&self.paths.progress)
    }

    /// Apply `f` to the record and persist it
    pub fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ProgressState) -> T,
    {
        let out = f(&mut self.state);
        self.save()?;
        Ok(out)
    }

    /// Record a finished workout by catalog id
    pub fn complete_workout(&mut self, catalog: &Catalog, id: &str) -> Result<()> {
        let workout = catalog
            .find(id)
            .ok_or_else(|| Error::UnknownWorkout(id.to_string()))?;
        self.record_completion(workout, Uuid::new_v4())
    }

    /// Slide the week forward to today, saving only if it moved
    pub fn advance_window(&mut self) -> Result<bool> {
        let today = self.today;
        if !self.state.advance_window(today) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn ensure_plan<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) -> Result<bool> {
        if !self.state.today_plan.is_empty() {
            return Ok(false);
        }
        self.update(|s| s.ensure_plan(catalog, rng))
    }

    pub fn shuffle_plan<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) -> Result<()> {
        self.update(|s| s.shuffle_plan(catalog, rng))
    }

    pub fn complete_plan(&mut self) -> Result<()> {
        self.update(|s| s.complete_plan())
    }

    /// Compute and store BMI; nothing is written when an input is missing
    pub fn record_bmi(&mut self, height_cm: f64, weight_kg: f64) -> Result<BmiReading> {
        let reading = self.state.record_bmi(height_cm, weight_kg)?;
        self.save()?;
        Ok(reading)
    }

    pub fn set_goal(&mut self, goal_type: GoalType, minutes: u32) -> Result<()> {
        self.update(|s| s.set_goal(goal_type, minutes))
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.update(|s| s.toggle_theme())
    }

    /// Delete the persisted record and start over from defaults
    pub fn reset(&mut self, seed: (GoalType, u32)) -> Result<()> {
        ProgressState::remove(&self.paths.progress)?;
        let mut state = ProgressState::new(self.today);
        state.set_goal(seed.0, seed.1);
        self.state = state;
        self.save()?;
        tracing::info!("Progress reset");
        Ok(())
    }
}

impl CompletionSink for Tracker {
    fn record_completion(&mut self, workout: &WorkoutDefinition, session_id: Uuid) -> Result<()> {
        let today = self.today;
        self.update(|s| s.record_completion(workout, today, Some(session_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::timer::SessionTimer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    const SEED: (GoalType, u32) = (GoalType::StayFit, 30);

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_open_creates_record_and_marker() {
        let temp_dir = tempfile::tempdir().unwrap();
        let today = date("2024-03-02");

        let tracker = Tracker::open(temp_dir.path(), today, (GoalType::FatLoss, 20)).unwrap();

        assert!(tracker.paths().progress.exists());
        assert_eq!(load_day_marker(&tracker.paths().day_marker), Some(today));
        assert_eq!(tracker.state().goal_type, GoalType::FatLoss);
        assert_eq!(tracker.state().goal_minutes, 20);
        assert_eq!(tracker.state().week.last().unwrap().date, today);
    }

    #[test]
    fn test_completion_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let today = date("2024-03-02");
        let catalog = get_default_catalog();

        let mut tracker = Tracker::open(temp_dir.path(), today, SEED).unwrap();
        tracker.complete_workout(catalog, "squats").unwrap();

        let reopened = Tracker::open(temp_dir.path(), today, SEED).unwrap();
        assert_eq!(reopened.state().points, 10);
        assert_eq!(reopened.state().workouts_today, 1);
        assert_eq!(reopened.state().history[0].workout, "Bodyweight Squats");
        assert!(reopened.state().history[0].session_id.is_some());
    }

    #[test]
    fn test_unknown_workout_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(temp_dir.path(), date("2024-03-02"), SEED).unwrap();

        let err = tracker
            .complete_workout(get_default_catalog(), "burpees")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownWorkout(_)));
        assert_eq!(tracker.state().points, 0);
    }

    #[test]
    fn test_next_day_rolls_over_counters() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = get_default_catalog();

        let mut tracker = Tracker::open(temp_dir.path(), date("2024-03-02"), SEED).unwrap();
        tracker.complete_workout(catalog, "plank").unwrap();
        tracker.complete_workout(catalog, "plank").unwrap();

        let mut next = Tracker::open(temp_dir.path(), date("2024-03-03"), SEED).unwrap();
        assert_eq!(next.state().workouts_today, 0);
        assert_eq!(next.state().calories_today, 0);
        assert_eq!(next.state().points, 20);
        assert_eq!(next.state().week.last().unwrap().date, date("2024-03-03"));
        assert_eq!(next.state().week[5].calories, 12);
        assert!(!next.advance_window().unwrap());

        let on_disk = ProgressState::load(&next.paths().progress).unwrap();
        assert_eq!(on_disk.week.last().unwrap().date, date("2024-03-03"));
        assert_eq!(on_disk.workouts_today, 0);
    }

    #[test]
    fn test_open_after_gap_ends_window_today() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = get_default_catalog();

        let mut tracker = Tracker::open(temp_dir.path(), date("2024-03-01"), SEED).unwrap();
        tracker.complete_workout(catalog, "plank").unwrap();

        let later = Tracker::open(temp_dir.path(), date("2024-03-04"), SEED).unwrap();
        let week = &later.state().week;
        assert_eq!(week.len(), 7);
        assert_eq!(week.last().unwrap().date, date("2024-03-04"));
        assert_eq!(week[5].date, date("2024-03-01"));
        assert_eq!(week[5].calories, 6);
    }

    #[test]
    fn test_corrupt_record_is_seeded_from_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("progress.json"), "{ not json").unwrap();

        let tracker =
            Tracker::open(temp_dir.path(), date("2024-03-02"), (GoalType::MuscleGain, 50)).unwrap();
        assert_eq!(tracker.state().goal_type, GoalType::MuscleGain);
        assert_eq!(tracker.state().goal_minutes, 50);

        let on_disk = ProgressState::load_stored(&tracker.paths().progress).unwrap();
        assert_eq!(on_disk.goal_minutes, 50);
    }

    #[test]
    fn test_failed_record_save_leaves_marker_alone() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = get_default_catalog();

        let mut tracker = Tracker::open(temp_dir.path(), date("2024-03-02"), SEED).unwrap();
        tracker.complete_workout(catalog, "plank").unwrap();

        // A directory in place of the record makes the rename fail
        let progress = tracker.paths().progress.clone();
        let saved = std::fs::read_to_string(&progress).unwrap();
        std::fs::remove_file(&progress).unwrap();
        std::fs::create_dir(&progress).unwrap();

        assert!(Tracker::open(temp_dir.path(), date("2024-03-03"), SEED).is_err());
        assert_eq!(
            load_day_marker(&tracker.paths().day_marker),
            Some(date("2024-03-02"))
        );

        std::fs::remove_dir(&progress).unwrap();
        std::fs::write(&progress, saved).unwrap();
        let next = Tracker::open(temp_dir.path(), date("2024-03-03"), SEED).unwrap();
        assert_eq!(next.state().workouts_today, 0);
    }

    #[test]
    fn test_timer_completion_reaches_ledger() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = get_default_catalog();
        let mut tracker = Tracker::open(temp_dir.path(), date("2024-03-02"), SEED).unwrap();
        let mut timer = SessionTimer::new(Duration::ZERO);

        let workout = catalog.find("jumpingjacks").unwrap();
        timer.start(workout);
        for _ in 0..=workout.duration_seconds {
            timer.tick(&mut tracker).unwrap();
        }

        assert_eq!(tracker.state().points, 10);
        let on_disk = ProgressState::load(&tracker.paths().progress).unwrap();
        assert_eq!(on_disk.calories_today, 12);
        assert_eq!(on_disk.week.last().unwrap().workouts, 1);
    }

    #[test]
    fn test_bmi_missing_input_does_not_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(temp_dir.path(), date("2024-03-02"), SEED).unwrap();

        assert!(matches!(
            tracker.record_bmi(0.0, 70.0),
            Err(Error::MissingMeasurement)
        ));
        assert_eq!(tracker.state().bmi, None);

        tracker.record_bmi(180.0, 72.0).unwrap();
        let on_disk = ProgressState::load(&tracker.paths().progress).unwrap();
        assert_eq!(on_disk.bmi, Some(22.2));
    }

    #[test]
    fn test_plan_and_reset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = get_default_catalog();
        let mut rng = StdRng::seed_from_u64(11);
        let today = date("2024-03-02");
        let mut tracker = Tracker::open(temp_dir.path(), today, SEED).unwrap();

        assert!(tracker.ensure_plan(catalog, &mut rng).unwrap());
        assert!(!tracker.ensure_plan(catalog, &mut rng).unwrap());
        let planned = tracker.state().today_plan[0].id.clone();
        tracker.complete_workout(catalog, &planned).unwrap();
        assert!(tracker.state().today_plan[0].done);

        tracker.toggle_theme().unwrap();
        tracker.reset(SEED).unwrap();

        let reopened = Tracker::open(temp_dir.path(), today, SEED).unwrap();
        assert_eq!(reopened.state(), &ProgressState::new(today));
    }

    #[test]
    fn test_corrupted_record_recovers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let today = date("2024-03-02");
        std::fs::write(temp_dir.path().join(PROGRESS_FILE), "not json").unwrap();

        let tracker = Tracker::open(temp_dir.path(), today, SEED).unwrap();
        assert_eq!(tracker.state().points, 0);
        assert_eq!(tracker.state().week.len(), 7);

        // The repaired record replaced the corrupt one
        let on_disk = std::fs::read_to_string(&tracker.paths().progress).unwrap();
        assert!(on_disk.contains("\"week\""));
    }
}
