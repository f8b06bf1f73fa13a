use std::collections::BTreeSet;

use chrono::NaiveDate;
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, EquipmentContext, ExerciseID, Goal, Name, ReadError, Tag,
    UpdateError, UserID,
};

#[allow(async_fn_in_trait)]
pub trait PlanRepository {
    /// Stores the whole plan atomically and assigns plan and workout IDs.
    async fn create_plan(&self, plan: GeneratedPlan) -> Result<GeneratedPlan, CreateError>;
    async fn read_plan(&self, id: PlanID) -> Result<GeneratedPlan, ReadError>;
    async fn read_latest_plan(&self, user_id: UserID) -> Result<GeneratedPlan, ReadError>;
    async fn read_plan_by_workout(&self, workout_id: WorkoutID)
    -> Result<GeneratedPlan, ReadError>;
    /// Fails with `UpdateError::Conflict` if the exercise is already used at another position
    /// of the same plan. The check and the write happen in one step.
    async fn replace_workout_exercise(
        &self,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutExercise, UpdateError>;
    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    pub id: PlanID,
    pub user_id: UserID,
    pub goal: Goal,
    pub sessions_per_week: u8,
    pub equipment: EquipmentContext,
    pub start_date: NaiveDate,
    pub registry_version: u32,
    pub excluded_exercises: BTreeSet<ExerciseID>,
    pub workouts: Vec<Workout>,
}

impl GeneratedPlan {
    pub fn exercise_ids(&self) -> impl Iterator<Item = ExerciseID> + '_ {
        self.workouts
            .iter()
            .flat_map(|w| w.exercises.iter().map(|e| e.exercise_id))
    }

    #[must_use]
    pub fn num_exercises(&self) -> usize {
        self.workouts.iter().map(|w| w.exercises.len()).sum()
    }

    #[must_use]
    pub fn workout(&self, workout_id: WorkoutID) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == workout_id)
    }

    #[must_use]
    pub fn workout_exercise(&self, workout_id: WorkoutID, order: u32) -> Option<&WorkoutExercise> {
        self.workout(workout_id)
            .and_then(|w| w.exercises.iter().find(|e| e.order == order))
    }

    /// Exercises used anywhere in the plan except at the given position.
    #[must_use]
    pub fn used_exercises_except(&self, workout_id: WorkoutID, order: u32) -> BTreeSet<ExerciseID> {
        self.workouts
            .iter()
            .flat_map(|w| {
                w.exercises
                    .iter()
                    .filter(move |e| !(w.id == workout_id && e.order == order))
                    .map(|e| e.exercise_id)
            })
            .collect()
    }

    /// Replaces the exercise at the given position, returning the updated entry.
    ///
    /// An exercise used at any other position of the plan is rejected, so the plan stays free
    /// of duplicates.
    pub fn replace_exercise(
        &mut self,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<&WorkoutExercise, UpdateError> {
        if self
            .used_exercises_except(workout_id, order)
            .contains(&exercise_id)
        {
            return Err(UpdateError::Conflict);
        }
        let workout_exercise = self
            .workouts
            .iter_mut()
            .find(|w| w.id == workout_id)
            .and_then(|w| w.exercises.iter_mut().find(|e| e.order == order))
            .ok_or(UpdateError::NotFound)?;
        workout_exercise.exercise_id = exercise_id;
        Ok(workout_exercise)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub id: WorkoutID,
    pub day_index: u32,
    pub name: Name,
    pub notes: String,
    pub exercises: Vec<WorkoutExercise>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub exercise_id: ExerciseID,
    pub order: u32,
    pub sets: u32,
    pub rep_min: u32,
    pub rep_max: u32,
    pub rest_sec: u32,
    pub slot_tag: Tag,
    pub fallback_tags: Vec<Tag>,
}

impl WorkoutExercise {
    /// Tags an exercise may carry to fill this position.
    pub fn slot_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        std::iter::once(self.slot_tag).chain(self.fallback_tags.iter().copied())
    }
}

/// Sets, repetitions and rest applied to every exercise of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescription {
    pub sets: u32,
    pub rep_min: u32,
    pub rep_max: u32,
    pub rest_sec: u32,
}

impl Prescription {
    #[must_use]
    pub fn for_goal(goal: Goal) -> Self {
        match goal {
            Goal::MuscleGain => Self {
                sets: 3,
                rep_min: 8,
                rep_max: 12,
                rest_sec: 90,
            },
            Goal::GeneralFitness => Self {
                sets: 3,
                rep_min: 10,
                rep_max: 12,
                rest_sec: 60,
            },
            Goal::FatLoss => Self {
                sets: 3,
                rep_min: 12,
                rep_max: 15,
                rest_sec: 45,
            },
            Goal::Performance => Self {
                sets: 5,
                rep_min: 3,
                rep_max: 5,
                rest_sec: 180,
            },
        }
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanID(Uuid);

impl PlanID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PlanID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PlanID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn workout_exercise(exercise_id: u32, order: u32) -> WorkoutExercise {
        WorkoutExercise {
            exercise_id: exercise_id.into(),
            order,
            sets: 3,
            rep_min: 8,
            rep_max: 12,
            rest_sec: 90,
            slot_tag: Tag::HorizontalPush,
            fallback_tags: vec![Tag::VerticalPush],
        }
    }

    static PLAN: std::sync::LazyLock<GeneratedPlan> = std::sync::LazyLock::new(|| GeneratedPlan {
        id: 1.into(),
        user_id: 7.into(),
        goal: Goal::MuscleGain,
        sessions_per_week: 2,
        equipment: EquipmentContext::Gym,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        registry_version: 1,
        excluded_exercises: BTreeSet::new(),
        workouts: vec![
            Workout {
                id: 1.into(),
                day_index: 1,
                name: Name::new("A").unwrap(),
                notes: String::new(),
                exercises: vec![workout_exercise(10, 1), workout_exercise(11, 2)],
            },
            Workout {
                id: 2.into(),
                day_index: 2,
                name: Name::new("B").unwrap(),
                notes: String::new(),
                exercises: vec![workout_exercise(12, 1)],
            },
        ],
    });

    #[test]
    fn test_plan_exercise_ids() {
        assert_eq!(
            PLAN.exercise_ids().collect::<Vec<_>>(),
            vec![10.into(), 11.into(), 12.into()]
        );
        assert_eq!(PLAN.num_exercises(), 3);
    }

    #[test]
    fn test_plan_workout_exercise() {
        assert_eq!(
            PLAN.workout_exercise(1.into(), 2),
            Some(&workout_exercise(11, 2))
        );
        assert_eq!(PLAN.workout_exercise(2.into(), 2), None);
        assert_eq!(PLAN.workout_exercise(3.into(), 1), None);
    }

    #[test]
    fn test_plan_used_exercises_except() {
        assert_eq!(
            PLAN.used_exercises_except(1.into(), 1),
            BTreeSet::from([11.into(), 12.into()])
        );
        assert_eq!(
            PLAN.used_exercises_except(2.into(), 1),
            BTreeSet::from([10.into(), 11.into()])
        );
    }

    #[test]
    fn test_plan_replace_exercise() {
        let mut plan = PLAN.clone();
        assert_eq!(
            plan.replace_exercise(2.into(), 1, 20.into()).ok(),
            Some(&workout_exercise(20, 1))
        );
        assert_eq!(
            plan.exercise_ids().collect::<Vec<_>>(),
            vec![10.into(), 11.into(), 20.into()]
        );
        assert!(matches!(
            plan.replace_exercise(2.into(), 2, 21.into()),
            Err(UpdateError::NotFound)
        ));
    }

    #[test]
    fn test_plan_replace_exercise_used_elsewhere() {
        let mut plan = PLAN.clone();

        assert!(matches!(
            plan.replace_exercise(2.into(), 1, 10.into()),
            Err(UpdateError::Conflict)
        ));
        assert!(matches!(
            plan.replace_exercise(1.into(), 1, 11.into()),
            Err(UpdateError::Conflict)
        ));
        assert_eq!(
            plan.replace_exercise(1.into(), 1, 10.into()).ok(),
            Some(&workout_exercise(10, 1))
        );
        assert_eq!(plan, *PLAN);
    }

    #[test]
    fn test_workout_exercise_slot_tags() {
        assert_eq!(
            workout_exercise(1, 1).slot_tags().collect::<Vec<_>>(),
            vec![Tag::HorizontalPush, Tag::VerticalPush]
        );
    }

    #[rstest]
    #[case(Goal::MuscleGain, 3, 8, 12, 90)]
    #[case(Goal::GeneralFitness, 3, 10, 12, 60)]
    #[case(Goal::FatLoss, 3, 12, 15, 45)]
    #[case(Goal::Performance, 5, 3, 5, 180)]
    fn test_prescription_for_goal(
        #[case] goal: Goal,
        #[case] sets: u32,
        #[case] rep_min: u32,
        #[case] rep_max: u32,
        #[case] rest_sec: u32,
    ) {
        assert_eq!(
            Prescription::for_goal(goal),
            Prescription {
                sets,
                rep_min,
                rep_max,
                rest_sec
            }
        );
    }

    #[test]
    fn test_ids_nil() {
        assert!(PlanID::nil().is_nil());
        assert_eq!(PlanID::nil(), PlanID::default());
        assert!(WorkoutID::nil().is_nil());
        assert!(!WorkoutID::from(1_u128).is_nil());
    }
}
