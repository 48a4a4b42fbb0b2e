//! Default workout library.
//!
//! The library is compiled in and read-only; plan and history entries refer
//! to workouts by id.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

#[allow(clippy::too_many_arguments)]
fn workout(
    id: &str,
    name: &str,
    category: WorkoutCategory,
    level: WorkoutLevel,
    duration_seconds: u32,
    calories: u32,
    media_ref: &str,
    description: &str,
) -> WorkoutDefinition {
    WorkoutDefinition {
        id: id.into(),
        name: name.into(),
        category,
        level,
        duration_seconds,
        calories,
        media_ref: Some(media_ref.into()),
        description: description.into(),
    }
}

/// Builds the default catalog of eight bodyweight workouts
///
/// **Note**: prefer `get_default_catalog()` which returns a cached reference.
pub fn build_default_catalog() -> Catalog {
    use WorkoutCategory::*;
    use WorkoutLevel::*;

    let workouts = vec![
        workout(
            "pushups",
            "Push-ups",
            Strength,
            Beginner,
            30,
            8,
            "https://i.imgur.com/8Vq2m0T.gif",
            "Keep your body straight from head to heels and lower your chest to the floor.",
        ),
        workout(
            "squats",
            "Bodyweight Squats",
            Strength,
            Beginner,
            30,
            10,
            "https://i.imgur.com/2C0z8u8.gif",
            "Feet shoulder-width apart, sit back and down, drive up through the heels.",
        ),
        workout(
            "mountain",
            "Mountain Climbers",
            Cardio,
            Intermediate,
            30,
            12,
            "https://i.imgur.com/ZzA7sQH.gif",
            "From plank drive knees towards the chest, alternating quickly.",
        ),
        workout(
            "plank",
            "Plank Hold",
            Core,
            All,
            30,
            6,
            "https://i.imgur.com/v2ZQk7C.gif",
            "Body in a straight line, brace the core, breathe steadily.",
        ),
        workout(
            "jumpingjacks",
            "Jumping Jacks",
            Cardio,
            All,
            30,
            12,
            "https://i.imgur.com/sqM8t8t.gif",
            "Jump feet out while raising the arms overhead. Land softly.",
        ),
        workout(
            "lunges",
            "Alternating Lunges",
            Strength,
            Intermediate,
            30,
            9,
            "https://i.imgur.com/t1bM9tO.gif",
            "Step forward and lower the back knee towards the floor, then switch legs.",
        ),
        workout(
            "highknees",
            "High Knees",
            Cardio,
            All,
            30,
            14,
            "https://i.imgur.com/2mDqz6R.gif",
            "Run in place bringing the knees to hip height.",
        ),
        workout(
            "bicycle",
            "Bicycle Crunch",
            Core,
            Intermediate,
            30,
            8,
            "https://i.imgur.com/9n0Wl2U.gif",
            "Elbow to opposite knee while extending the other leg.",
        ),
    ];

    Catalog { workouts }
}

impl Catalog {
    /// Look up a workout by id
    pub fn find(&self, id: &str) -> Option<&WorkoutDefinition> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Case-insensitive search over name, category and level
    ///
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&WorkoutDefinition> {
        let q = query.trim().to_lowercase();
        self.workouts
            .iter()
            .filter(|w| {
                format!("{}{}{}", w.name, w.category, w.level)
                    .to_lowercase()
                    .contains(&q)
            })
            .collect()
    }

    /// Display name for a workout id, falling back to "unknown"
    pub fn name_or_unknown(&self, id: &str) -> &str {
        self.find(id).map(|w| w.name.as_str()).unwrap_or("unknown")
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for w in &self.workouts {
            if w.id.is_empty() {
                errors.push("Workout has empty ID".to_string());
            }
            if !seen.insert(w.id.as_str()) {
                errors.push(format!("Duplicate workout id '{}'", w.id));
            }
            if w.name.is_empty() {
                errors.push(format!("Workout '{}' has empty name", w.id));
            }
            if w.duration_seconds == 0 {
                errors.push(format!("Workout '{}' has zero duration", w.id));
            }
        }

        if self.workouts.len() < PLAN_SIZE {
            errors.push(format!(
                "Catalog has {} workouts, a day's plan needs {}",
                self.workouts.len(),
                PLAN_SIZE
            ));
        }

        errors
    }
}
