use std::collections::BTreeSet;

use planner_domain as domain;

/// Combines an exercise catalog, a plan store and an identity provider into one repository.
///
/// The catalog and identity provider are usually remote, while plans are kept locally.
pub struct Gateway<C, P, I> {
    pub catalog: C,
    pub plans: P,
    pub identity: I,
}

impl<C, P, I> Gateway<C, P, I> {
    pub fn new(catalog: C, plans: P, identity: I) -> Self {
        Self {
            catalog,
            plans,
            identity,
        }
    }
}

impl<C: domain::ExerciseCatalog, P, I> domain::ExerciseCatalog for Gateway<C, P, I> {
    async fn read_exercises_by_tag(
        &self,
        tag: domain::Tag,
        equipment: &domain::AllowedEquipment,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        self.catalog.read_exercises_by_tag(tag, equipment).await
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.catalog.read_exercise(id).await
    }

    async fn read_exercises_by_ids(
        &self,
        ids: &BTreeSet<domain::ExerciseID>,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        self.catalog.read_exercises_by_ids(ids).await
    }
}

impl<C, P: domain::PlanRepository, I> domain::PlanRepository for Gateway<C, P, I> {
    async fn create_plan(
        &self,
        plan: domain::GeneratedPlan,
    ) -> Result<domain::GeneratedPlan, domain::CreateError> {
        self.plans.create_plan(plan).await
    }

    async fn read_plan(
        &self,
        id: domain::PlanID,
    ) -> Result<domain::GeneratedPlan, domain::ReadError> {
        self.plans.read_plan(id).await
    }

    async fn read_latest_plan(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::GeneratedPlan, domain::ReadError> {
        self.plans.read_latest_plan(user_id).await
    }

    async fn read_plan_by_workout(
        &self,
        workout_id: domain::WorkoutID,
    ) -> Result<domain::GeneratedPlan, domain::ReadError> {
        self.plans.read_plan_by_workout(workout_id).await
    }

    async fn replace_workout_exercise(
        &self,
        workout_id: domain::WorkoutID,
        order: u32,
        exercise_id: domain::ExerciseID,
    ) -> Result<domain::WorkoutExercise, domain::UpdateError> {
        self.plans
            .replace_workout_exercise(workout_id, order, exercise_id)
            .await
    }

    async fn delete_plan(&self, id: domain::PlanID) -> Result<domain::PlanID, domain::DeleteError> {
        self.plans.delete_plan(id).await
    }
}

impl<C, P, I: domain::IdentityRepository> domain::IdentityRepository for Gateway<C, P, I> {
    async fn read_current_user(
        &self,
        token: &domain::Token,
    ) -> Result<domain::User, domain::ReadError> {
        self.identity.read_current_user(token).await
    }
}
