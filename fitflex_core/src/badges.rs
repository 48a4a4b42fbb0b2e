//! Gamification badges derived from ledger counters.
//!
//! Badges are never stored: they are recomputed from the current
//! `ProgressState` every time they are read.

use crate::ProgressState;

/// Counter a badge threshold is compared against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeMetric {
    /// Workouts completed today
    Workouts,
    /// Calories burned today
    Calories,
    /// Lifetime points
    Points,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub metric: BadgeMetric,
    pub threshold: u64,
}

pub static BADGES: [BadgeDefinition; 4] = [
    BadgeDefinition {
        id: "first",
        name: "First Steps",
        icon: "🥇",
        metric: BadgeMetric::Workouts,
        threshold: 1,
    },
    BadgeDefinition {
        id: "streak5",
        name: "5 Workouts",
        icon: "🎖️",
        metric: BadgeMetric::Workouts,
        threshold: 5,
    },
    BadgeDefinition {
        id: "burn100",
        name: "100 Calories",
        icon: "🔥",
        metric: BadgeMetric::Calories,
        threshold: 100,
    },
    BadgeDefinition {
        id: "points200",
        name: "200 Points",
        icon: "🏆",
        metric: BadgeMetric::Points,
        threshold: 200,
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeStatus {
    pub badge: &'static BadgeDefinition,
    pub unlocked: bool,
}

impl ProgressState {
    fn metric_value(&self, metric: BadgeMetric) -> u64 {
        match metric {
            BadgeMetric::Workouts => self.workouts_today as u64,
            BadgeMetric::Calories => self.calories_today as u64,
            BadgeMetric::Points => self.points,
        }
    }

    /// Unlocked/locked status for every badge, in definition order
    pub fn evaluate_badges(&self) -> Vec<BadgeStatus> {
        BADGES
            .iter()
            .map(|badge| BadgeStatus {
                badge,
                unlocked: self.metric_value(badge.metric) >= badge.threshold,
            })
            .collect()
    }

    pub fn is_badge_unlocked(&self, id: &str) -> bool {
        self.evaluate_badges()
            .iter()
            .any(|s| s.badge.id == id && s.unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use chrono::NaiveDate;

    #[test]
    fn test_fresh_state_has_no_badges() {
        let state = ProgressState::default();
        let statuses = state.evaluate_badges();
        assert_eq!(statuses.len(), 4);
        assert!(statuses.iter().all(|s| !s.unlocked));
    }

    #[test]
    fn test_points_badge_threshold() {
        let mut state = ProgressState::default();
        state.points = 199;
        assert!(!state.is_badge_unlocked("points200"));
        state.points = 200;
        assert!(state.is_badge_unlocked("points200"));
        state.points = 1_000;
        assert!(state.is_badge_unlocked("points200"));
    }

    #[test]
    fn test_points_badge_survives_rollover() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let mut state = ProgressState::new(today);
        state.points = 250;
        state.workouts_today = 5;

        let mut marker = None;
        state.rollover_day(&mut marker, today);
        state.advance_window(today.succ_opt().unwrap());

        assert!(state.is_badge_unlocked("points200"));
        assert!(!state.is_badge_unlocked("streak5"));
    }

    #[test]
    fn test_workout_and_calorie_badges() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let mut state = ProgressState::new(today);
        let highknees = get_default_catalog().find("highknees").unwrap();

        state.record_completion(highknees, today, None);
        assert!(state.is_badge_unlocked("first"));
        assert!(!state.is_badge_unlocked("burn100"));

        for _ in 0..7 {
            state.record_completion(highknees, today, None);
        }
        // 8 x 14 kcal
        assert_eq!(state.calories_today, 112);
        assert!(state.is_badge_unlocked("streak5"));
        assert!(state.is_badge_unlocked("burn100"));
        assert!(!state.is_badge_unlocked("points200"));
    }

    #[test]
    fn test_evaluation_does_not_mutate() {
        let mut state = ProgressState::default();
        state.points = 300;
        let before = state.clone();
        let _ = state.evaluate_badges();
        assert_eq!(state, before);
    }
}
