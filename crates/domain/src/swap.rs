use std::collections::BTreeSet;

use futures_util::future::try_join_all;
use log::debug;

use crate::{
    Exercise, ExerciseCatalog, ExerciseID, GeneratedPlan, Planner, ReadError, Tag, WorkoutID,
};

#[derive(thiserror::Error, Debug)]
pub enum SwapError {
    #[error("workout exercise not found")]
    WorkoutExerciseNotFound,
    #[error("unknown exercise {0}")]
    UnknownExercise(ExerciseID),
    #[error("exercise {exercise_id} is not eligible for slot {slot_tag}")]
    ExerciseNotEligibleForSlot { exercise_id: ExerciseID, slot_tag: Tag },
    #[error("exercise {0} is already part of the plan")]
    ExerciseAlreadyInPlan(ExerciseID),
    #[error("exercise catalog unavailable: {0}")]
    CatalogUnavailable(#[from] ReadError),
}

impl<C: ExerciseCatalog> Planner<'_, C> {
    /// Exercises that could replace the exercise at the given position.
    ///
    /// Candidates of the slot tag come first, followed by those of each fallback tag, each
    /// ordered by ascending ID. Exercises used anywhere in the plan, excluded exercises and
    /// exercises not permitted by the plan's equipment context are omitted.
    pub async fn alternatives(
        &self,
        plan: &GeneratedPlan,
        workout_id: WorkoutID,
        order: u32,
    ) -> Result<Vec<Exercise>, SwapError> {
        let workout_exercise = plan
            .workout_exercise(workout_id, order)
            .ok_or(SwapError::WorkoutExerciseNotFound)?;
        let (_, allowed) = self.registry.equipment.resolve(plan.equipment.as_ref());
        let tags = workout_exercise.slot_tags().collect::<Vec<_>>();
        let results = try_join_all(
            tags.iter()
                .map(|tag| self.catalog.read_exercises_by_tag(*tag, allowed)),
        )
        .await?;

        let used = plan.exercise_ids().collect::<BTreeSet<_>>();
        let mut seen = BTreeSet::new();
        let mut alternatives = vec![];

        for (tag, mut exercises) in tags.into_iter().zip(results) {
            exercises.retain(|e| {
                e.has_tag(tag)
                    && allowed.permits(&e.equipment)
                    && !used.contains(&e.id)
                    && !plan.excluded_exercises.contains(&e.id)
            });
            exercises.sort_by_key(|e| e.id);
            alternatives.extend(exercises.into_iter().filter(|e| seen.insert(e.id)));
        }

        debug!(
            "found {} alternatives for exercise {order} of workout {workout_id}",
            alternatives.len()
        );

        Ok(alternatives)
    }

    /// Checks that `exercise_id` may replace the exercise at the given position.
    ///
    /// Replacing an exercise by itself is accepted.
    pub async fn validate_swap(
        &self,
        plan: &GeneratedPlan,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<Exercise, SwapError> {
        let workout_exercise = plan
            .workout_exercise(workout_id, order)
            .ok_or(SwapError::WorkoutExerciseNotFound)?;
        let exercise = match self.catalog.read_exercise(exercise_id).await {
            Ok(exercise) => exercise,
            Err(ReadError::NotFound) => return Err(SwapError::UnknownExercise(exercise_id)),
            Err(err) => return Err(SwapError::CatalogUnavailable(err)),
        };

        if workout_exercise.exercise_id == exercise_id {
            return Ok(exercise);
        }

        let (_, allowed) = self.registry.equipment.resolve(plan.equipment.as_ref());
        if !workout_exercise.slot_tags().any(|tag| exercise.has_tag(tag))
            || !allowed.permits(&exercise.equipment)
            || plan.excluded_exercises.contains(&exercise_id)
        {
            return Err(SwapError::ExerciseNotEligibleForSlot {
                exercise_id,
                slot_tag: workout_exercise.slot_tag,
            });
        }

        if plan
            .used_exercises_except(workout_id, order)
            .contains(&exercise_id)
        {
            return Err(SwapError::ExerciseAlreadyInPlan(exercise_id));
        }

        Ok(exercise)
    }
}
