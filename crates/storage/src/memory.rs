//! In-memory storage
//!
//! Catalog, plan store and identity provider kept in process memory. Plans are written under a
//! single lock, so a plan is either stored completely or not at all.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};

use log::debug;
use planner_domain as domain;
use uuid::Uuid;

use crate::dto::{Exercise, List};

#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    exercises: BTreeMap<domain::ExerciseID, domain::Exercise>,
}

impl MemoryCatalog {
    pub fn new(exercises: impl IntoIterator<Item = domain::Exercise>) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    /// Parses a catalog in the format of the catalog service.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let exercises: List<Exercise> = serde_json::from_str(json)?;
        Ok(Self::new(
            Vec::from(exercises)
                .into_iter()
                .map(domain::Exercise::from),
        ))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn exercises(&self) -> impl Iterator<Item = &domain::Exercise> {
        self.exercises.values()
    }
}

impl domain::ExerciseCatalog for MemoryCatalog {
    async fn read_exercises_by_tag(
        &self,
        tag: domain::Tag,
        equipment: &domain::AllowedEquipment,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .exercises
            .values()
            .filter(|e| e.has_tag(tag) && equipment.permits(&e.equipment))
            .cloned()
            .collect())
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.exercises
            .get(&id)
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }

    async fn read_exercises_by_ids(
        &self,
        ids: &BTreeSet<domain::ExerciseID>,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .cloned()
            .collect())
    }
}

/// Plans in creation order.
#[derive(Debug, Default)]
pub struct MemoryPlans {
    plans: Mutex<Vec<domain::GeneratedPlan>>,
}

impl MemoryPlans {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<domain::GeneratedPlan>>, domain::StorageError> {
        self.plans
            .lock()
            .map_err(|err| domain::StorageError::Other(err.to_string().into()))
    }
}

impl domain::PlanRepository for MemoryPlans {
    async fn create_plan(
        &self,
        mut plan: domain::GeneratedPlan,
    ) -> Result<domain::GeneratedPlan, domain::CreateError> {
        let mut plans = self.lock()?;
        if !plan.id.is_nil() && plans.iter().any(|p| p.id == plan.id) {
            return Err(domain::CreateError::Conflict);
        }
        if plan.id.is_nil() {
            plan.id = Uuid::new_v4().into();
        }
        for workout in &mut plan.workouts {
            workout.id = Uuid::new_v4().into();
        }
        debug!(
            "storing plan {} with {} workouts",
            plan.id,
            plan.workouts.len()
        );
        plans.push(plan.clone());
        Ok(plan)
    }

    async fn read_plan(
        &self,
        id: domain::PlanID,
    ) -> Result<domain::GeneratedPlan, domain::ReadError> {
        self.lock()?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }

    async fn read_latest_plan(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::GeneratedPlan, domain::ReadError> {
        self.lock()?
            .iter()
            .rev()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }

    async fn read_plan_by_workout(
        &self,
        workout_id: domain::WorkoutID,
    ) -> Result<domain::GeneratedPlan, domain::ReadError> {
        self.lock()?
            .iter()
            .find(|p| p.workout(workout_id).is_some())
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }

    async fn replace_workout_exercise(
        &self,
        workout_id: domain::WorkoutID,
        order: u32,
        exercise_id: domain::ExerciseID,
    ) -> Result<domain::WorkoutExercise, domain::UpdateError> {
        self.lock()?
            .iter_mut()
            .find(|p| p.workout(workout_id).is_some())
            .ok_or(domain::UpdateError::NotFound)?
            .replace_exercise(workout_id, order, exercise_id)
            .cloned()
    }

    async fn delete_plan(&self, id: domain::PlanID) -> Result<domain::PlanID, domain::DeleteError> {
        let mut plans = self.lock()?;
        let index = plans
            .iter()
            .position(|p| p.id == id)
            .ok_or(domain::DeleteError::NotFound)?;
        plans.remove(index);
        Ok(id)
    }
}

/// Users keyed by their bearer token.
#[derive(Debug, Default, Clone)]
pub struct MemoryIdentity {
    users: BTreeMap<String, domain::User>,
}

impl MemoryIdentity {
    pub fn new<'a>(users: impl IntoIterator<Item = (&'a str, domain::User)>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|(token, user)| (domain::Token::new(token).as_str().to_string(), user))
                .collect(),
        }
    }
}

impl domain::IdentityRepository for MemoryIdentity {
    async fn read_current_user(
        &self,
        token: &domain::Token,
    ) -> Result<domain::User, domain::ReadError> {
        self.users
            .get(token.as_str())
            .cloned()
            .ok_or(domain::StorageError::Unauthorized.into())
    }
}
