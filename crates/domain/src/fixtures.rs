use std::{collections::BTreeSet, sync::Mutex};

use crate::{
    AllowedEquipment, CreateError, DeleteError, Equipment, Exercise, ExerciseCatalog, ExerciseID,
    GeneratedPlan, IdentityRepository, PlanID, PlanRepository, ReadError, Role, StorageError, Tag,
    Token, UpdateError, User, UserID, WorkoutExercise, WorkoutID,
};

pub const EQUIPMENT: [&str; 5] = ["barbell", "dumbbell", "body weight", "band", "cable"];

pub fn exercise(id: u32, tag: Tag, primary_muscle: &str, equipment: &str, compound: bool) -> Exercise {
    Exercise {
        id: id.into(),
        name: format!("{} {equipment} {id}", tag.label()),
        primary_muscle: primary_muscle.to_string(),
        equipment: Equipment::new(equipment),
        tags: vec![tag],
        body_parts: vec![],
        target_muscles: vec![],
        secondary_muscles: vec![],
        image: None,
        is_compound: compound,
    }
}

/// Two exercises per tag and equipment, a compound one for compound patterns and an
/// isolation one. IDs are `tag * 100 + equipment * 10 + variant + 1`.
pub fn rich_catalog() -> Vec<Exercise> {
    let mut exercises = vec![];
    for (t, tag) in Tag::iter().enumerate() {
        for (e, equipment) in EQUIPMENT.iter().enumerate() {
            for variant in 0..2 {
                let id = u32::try_from(t * 100 + e * 10 + variant + 1).unwrap();
                exercises.push(exercise(
                    id,
                    *tag,
                    &format!("{tag} muscle {variant}"),
                    equipment,
                    variant == 0 && tag.is_compound_pattern(),
                ));
            }
        }
    }
    // Catalog order must not matter.
    exercises.reverse();
    exercises
}

#[derive(Default)]
pub struct FakeCatalog {
    pub exercises: Vec<Exercise>,
    pub unavailable: bool,
    /// Yield to the scheduler before answering, so that concurrent requests interleave.
    pub slow: bool,
    pub tag_requests: Mutex<Vec<Tag>>,
}

impl FakeCatalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn exercise(&self, id: ExerciseID) -> &Exercise {
        self.exercises.iter().find(|e| e.id == id).unwrap()
    }

    async fn check_available(&self) -> Result<(), ReadError> {
        if self.slow {
            tokio::task::yield_now().await;
        }
        if self.unavailable {
            return Err(StorageError::NoConnection.into());
        }
        Ok(())
    }
}

impl ExerciseCatalog for FakeCatalog {
    async fn read_exercises_by_tag(
        &self,
        tag: Tag,
        equipment: &AllowedEquipment,
    ) -> Result<Vec<Exercise>, ReadError> {
        self.check_available().await?;
        self.tag_requests.lock().unwrap().push(tag);
        Ok(self
            .exercises
            .iter()
            .filter(|e| e.has_tag(tag) && equipment.permits(&e.equipment))
            .cloned()
            .collect())
    }

    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        self.check_available().await?;
        self.exercises
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn read_exercises_by_ids(
        &self,
        ids: &BTreeSet<ExerciseID>,
    ) -> Result<Vec<Exercise>, ReadError> {
        self.check_available().await?;
        Ok(self
            .exercises
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }
}

/// Catalog, plan store and identity provider in one, like the storage gateway.
pub struct FakeRepository {
    pub catalog: FakeCatalog,
    plans: Mutex<(u128, Vec<GeneratedPlan>)>,
}

impl FakeRepository {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self {
            catalog,
            plans: Mutex::new((0, vec![])),
        }
    }

    pub fn num_plans(&self) -> usize {
        self.plans.lock().unwrap().1.len()
    }
}

impl ExerciseCatalog for FakeRepository {
    async fn read_exercises_by_tag(
        &self,
        tag: Tag,
        equipment: &AllowedEquipment,
    ) -> Result<Vec<Exercise>, ReadError> {
        self.catalog.read_exercises_by_tag(tag, equipment).await
    }

    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        self.catalog.read_exercise(id).await
    }

    async fn read_exercises_by_ids(
        &self,
        ids: &BTreeSet<ExerciseID>,
    ) -> Result<Vec<Exercise>, ReadError> {
        self.catalog.read_exercises_by_ids(ids).await
    }
}

impl PlanRepository for FakeRepository {
    async fn create_plan(&self, mut plan: GeneratedPlan) -> Result<GeneratedPlan, CreateError> {
        let mut plans = self.plans.lock().unwrap();
        plans.0 += 1;
        plan.id = PlanID::from(plans.0);
        for (i, workout) in plan.workouts.iter_mut().enumerate() {
            workout.id = WorkoutID::from(plans.0 * 100 + i as u128 + 1);
        }
        plans.1.push(plan.clone());
        Ok(plan)
    }

    async fn read_plan(&self, id: PlanID) -> Result<GeneratedPlan, ReadError> {
        let plans = self.plans.lock().unwrap();
        plans
            .1
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn read_latest_plan(&self, user_id: UserID) -> Result<GeneratedPlan, ReadError> {
        let plans = self.plans.lock().unwrap();
        plans
            .1
            .iter()
            .rev()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn read_plan_by_workout(
        &self,
        workout_id: WorkoutID,
    ) -> Result<GeneratedPlan, ReadError> {
        let plans = self.plans.lock().unwrap();
        plans
            .1
            .iter()
            .find(|p| p.workout(workout_id).is_some())
            .cloned()
            .ok_or(ReadError::NotFound)
    }

    async fn replace_workout_exercise(
        &self,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutExercise, UpdateError> {
        let mut plans = self.plans.lock().unwrap();
        plans
            .1
            .iter_mut()
            .find(|p| p.workout(workout_id).is_some())
            .ok_or(UpdateError::NotFound)?
            .replace_exercise(workout_id, order, exercise_id)
            .cloned()
    }

    async fn delete_plan(&self, id: PlanID) -> Result<PlanID, DeleteError> {
        let mut plans = self.plans.lock().unwrap();
        let len = plans.1.len();
        plans.1.retain(|p| p.id != id);
        if plans.1.len() == len {
            return Err(DeleteError::NotFound);
        }
        Ok(id)
    }
}

impl IdentityRepository for FakeRepository {
    async fn read_current_user(&self, token: &Token) -> Result<User, ReadError> {
        let (id, role) = match token.as_str() {
            "member-1" => (1, Role::Member),
            "member-2" => (2, Role::Member),
            "coach" => (3, Role::Coach),
            "admin" => (4, Role::Admin),
            _ => return Err(StorageError::Unauthorized.into()),
        };
        Ok(User {
            id: id.into(),
            roles: BTreeSet::from([role]),
        })
    }
}
