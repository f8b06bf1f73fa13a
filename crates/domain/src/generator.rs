//! Plan generator
//!
//! Turns a split blueprint into a concrete weekly plan by filling every slot with exercises
//! from the catalog. Generation is a single deterministic pass: for an unchanged catalog and
//! identical inputs the result is identical. Nothing is persisted here.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::{debug, info};

use crate::{
    AllowedEquipment, Day, Equipment, Exercise, ExerciseCatalog, ExerciseID, GeneratedPlan, Goal,
    PlanID, Prescription, ReadError, Registry, Slot, Tag, UserID, Workout, WorkoutExercise,
    WorkoutID,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub user_id: UserID,
    pub goal: Goal,
    pub sessions_per_week: u8,
    /// Name of the equipment context, unknown names are treated as `gym`.
    pub equipment: String,
    pub excluded_exercises: BTreeSet<ExerciseID>,
    pub start_date: NaiveDate,
}

#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("no blueprint for {goal} with {sessions_per_week} sessions per week")]
    NoBlueprintForGoalSessions { goal: Goal, sessions_per_week: u8 },
    #[error("insufficient candidates for slot {0}")]
    InsufficientCandidatesForSlot(Tag),
    #[error("exercise catalog unavailable: {0}")]
    CatalogUnavailable(#[from] ReadError),
}

pub struct Planner<'a, C> {
    pub(crate) registry: &'a Registry,
    pub(crate) catalog: &'a C,
}

impl<'a, C: ExerciseCatalog> Planner<'a, C> {
    pub fn new(registry: &'a Registry, catalog: &'a C) -> Self {
        Self { registry, catalog }
    }

    /// Generates a plan with nil IDs. IDs are assigned when the plan is stored.
    pub async fn generate(&self, request: &PlanRequest) -> Result<GeneratedPlan, GenerationError> {
        let days = self
            .registry
            .blueprints
            .lookup(request.goal, request.sessions_per_week)
            .ok_or(GenerationError::NoBlueprintForGoalSessions {
                goal: request.goal,
                sessions_per_week: request.sessions_per_week,
            })?;
        let (context, allowed) = self.registry.equipment.resolve(&request.equipment);

        info!(
            "generating {} plan with {} sessions per week for {context} (registry version {})",
            request.goal, request.sessions_per_week, self.registry.version
        );

        let prescription = Prescription::for_goal(request.goal);
        let mut candidates = Candidates::new(self.catalog, allowed);
        let mut used = BTreeSet::new();
        let mut workouts = Vec::with_capacity(days.len());

        for (index, day) in days.iter().enumerate() {
            workouts.push(
                self.fill_day(
                    u32::try_from(index + 1).unwrap_or(u32::MAX),
                    day,
                    prescription,
                    &request.excluded_exercises,
                    &mut used,
                    &mut candidates,
                )
                .await?,
            );
        }

        Ok(GeneratedPlan {
            id: PlanID::nil(),
            user_id: request.user_id,
            goal: request.goal,
            sessions_per_week: request.sessions_per_week,
            equipment: context,
            start_date: request.start_date,
            registry_version: self.registry.version,
            excluded_exercises: request.excluded_exercises.clone(),
            workouts,
        })
    }

    async fn fill_day(
        &self,
        day_index: u32,
        day: &Day,
        prescription: Prescription,
        excluded: &BTreeSet<ExerciseID>,
        used: &mut BTreeSet<ExerciseID>,
        candidates: &mut Candidates<'_, C>,
    ) -> Result<Workout, GenerationError> {
        let mut exercises = vec![];

        for slot in &day.slots {
            let pool = slot_pool(slot, candidates, |id| {
                !used.contains(&id) && !excluded.contains(&id)
            })
            .await?;
            let selected = select(slot, pool)
                .ok_or(GenerationError::InsufficientCandidatesForSlot(slot.tag))?;

            debug!(
                "filled slot {} of \"{}\" with {:?}",
                slot.tag,
                day.name,
                selected.iter().map(|e| *e.id).collect::<Vec<_>>()
            );

            for exercise in selected {
                used.insert(exercise.id);
                exercises.push(WorkoutExercise {
                    exercise_id: exercise.id,
                    order: u32::try_from(exercises.len() + 1).unwrap_or(u32::MAX),
                    sets: prescription.sets,
                    rep_min: prescription.rep_min,
                    rep_max: prescription.rep_max,
                    rest_sec: prescription.rest_sec,
                    slot_tag: slot.tag,
                    fallback_tags: slot.fallback.clone(),
                });
            }
        }

        Ok(Workout {
            id: WorkoutID::nil(),
            day_index,
            name: day.name.clone(),
            notes: day.notes.clone(),
            exercises,
        })
    }
}

/// Catalog lookups by tag, each tag fetched at most once.
pub(crate) struct Candidates<'a, C> {
    catalog: &'a C,
    allowed: &'a AllowedEquipment,
    cache: BTreeMap<Tag, Vec<Exercise>>,
}

impl<'a, C: ExerciseCatalog> Candidates<'a, C> {
    pub(crate) fn new(catalog: &'a C, allowed: &'a AllowedEquipment) -> Self {
        Self {
            catalog,
            allowed,
            cache: BTreeMap::new(),
        }
    }

    /// Exercises carrying `tag` with permitted equipment, ordered by ascending ID.
    pub(crate) async fn get(&mut self, tag: Tag) -> Result<&[Exercise], ReadError> {
        if !self.cache.contains_key(&tag) {
            let mut exercises = self
                .catalog
                .read_exercises_by_tag(tag, self.allowed)
                .await?;
            exercises.retain(|e| e.has_tag(tag) && self.allowed.permits(&e.equipment));
            exercises.sort_by_key(|e| e.id);
            exercises.dedup_by_key(|e| e.id);
            debug!("found {} candidates for {tag}", exercises.len());
            self.cache.insert(tag, exercises);
        }
        Ok(self.cache.get(&tag).map(Vec::as_slice).unwrap_or_default())
    }
}

/// Candidates for a slot: the slot tag first, then fallback tags while the pool cannot
/// satisfy the slot's count or compound minimum.
async fn slot_pool<C: ExerciseCatalog>(
    slot: &Slot,
    candidates: &mut Candidates<'_, C>,
    available: impl Fn(ExerciseID) -> bool,
) -> Result<Vec<Exercise>, ReadError> {
    let count = slot.count as usize;
    let min_compound = slot.min_compound as usize;
    let mut pool: Vec<Exercise> = vec![];

    for tag in slot.tags() {
        if tag != slot.tag {
            if pool.len() >= count && pool.iter().filter(|e| e.is_compound).count() >= min_compound
            {
                break;
            }
            debug!("using fallback {tag} for slot {}", slot.tag);
        }
        for exercise in candidates.get(tag).await? {
            if available(exercise.id) && !pool.iter().any(|e| e.id == exercise.id) {
                pool.push(exercise.clone());
            }
        }
    }

    Ok(pool)
}

/// Selects the compound minimum first and fills the remaining count preferring muscle and
/// equipment combinations not yet selected. Returns `None` if the pool is insufficient.
fn select(slot: &Slot, pool: Vec<Exercise>) -> Option<Vec<Exercise>> {
    let count = slot.count as usize;
    let min_compound = slot.min_compound as usize;

    if pool.len() < count || pool.iter().filter(|e| e.is_compound).count() < min_compound {
        return None;
    }

    let mut selected = Vec::with_capacity(count);
    let mut remaining = vec![];
    for exercise in pool {
        if exercise.is_compound && selected.len() < min_compound {
            selected.push(exercise);
        } else {
            remaining.push(exercise);
        }
    }

    let mut variations = selected
        .iter()
        .map(variation)
        .collect::<BTreeSet<(String, Equipment)>>();
    while selected.len() < count {
        let index = remaining
            .iter()
            .position(|e| !variations.contains(&variation(e)))
            .unwrap_or(0);
        let exercise = remaining.remove(index);
        variations.insert(variation(&exercise));
        selected.push(exercise);
    }

    Some(selected)
}

fn variation(exercise: &Exercise) -> (String, Equipment) {
    let (muscle, equipment) = exercise.variation_key();
    (muscle, equipment.clone())
}
