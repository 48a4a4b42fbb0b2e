//! Today's plan: a short random selection of workouts to tick off.

use crate::{Catalog, PlanItem, ProgressState, WorkoutDefinition, PLAN_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;

impl ProgressState {
    /// Replace today's plan with `PLAN_SIZE` distinct random workouts
    pub fn shuffle_plan<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) {
        self.today_plan = catalog
            .workouts
            .choose_multiple(rng, PLAN_SIZE)
            .map(|w| PlanItem {
                id: w.id.clone(),
                done: false,
            })
            .collect();

        tracing::debug!(
            "New plan: {:?}",
            self.today_plan.iter().map(|p| &p.id).collect::<Vec<_>>()
        );
    }

    /// Generate a plan only if there is none. Returns true if one was generated.
    pub fn ensure_plan<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) -> bool {
        if !self.today_plan.is_empty() {
            return false;
        }
        self.shuffle_plan(catalog, rng);
        true
    }

    /// Mark every entry as done. Awards nothing.
    pub fn complete_plan(&mut self) {
        for item in &mut self.today_plan {
            item.done = true;
        }
    }

    /// Plan entries paired with their catalog workout, `None` for unknown ids
    pub fn plan_entries<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> Vec<(&'a PlanItem, Option<&'a WorkoutDefinition>)> {
        self.today_plan
            .iter()
            .map(|item| (item, catalog.find(&item.id)))
            .collect()
    }
}
