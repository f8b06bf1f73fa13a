use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use chrono::Local;
use log::{debug, error, warn};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseCatalog, ExerciseID, GeneratedPlan,
    GenerationError, Goal, IdentityRepository, PlanID, PlanRepository, PlanRequest, Planner,
    ReadError, Registry, StorageError, SwapError, Token, UpdateError, User, WorkoutExercise,
    WorkoutID,
};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    async fn create_plan(
        &self,
        token: &Token,
        request: CreatePlan,
    ) -> Result<GeneratedPlan, PlanError>;
    async fn get_latest_plan(&self, token: &Token) -> Result<GeneratedPlan, PlanError>;
    async fn get_plan(&self, token: &Token, id: PlanID) -> Result<GeneratedPlan, PlanError>;
    /// Catalog records of the exercises of a plan, in plan order.
    async fn get_plan_exercises(&self, token: &Token, id: PlanID)
    -> Result<Vec<Exercise>, PlanError>;
    async fn delete_plan(&self, token: &Token, id: PlanID) -> Result<PlanID, PlanError>;
    async fn get_alternatives(
        &self,
        token: &Token,
        workout_id: WorkoutID,
        order: u32,
    ) -> Result<Vec<Exercise>, PlanError>;
    async fn replace_workout_exercise(
        &self,
        token: &Token,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutExercise, PlanError>;
    fn get_supported_splits(&self) -> Vec<(Goal, u8)>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub goal: Goal,
    pub sessions_per_week: u8,
    pub equipment: String,
    /// Exercises the user cannot perform.
    pub injuries: Vec<ExerciseID>,
}

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl PlanError {
    /// HTTP status code equivalent.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            PlanError::Unauthorized | PlanError::Storage(StorageError::Unauthorized) => 401,
            PlanError::Forbidden => 403,
            PlanError::NotFound | PlanError::Swap(SwapError::WorkoutExerciseNotFound) => 404,
            PlanError::Conflict | PlanError::Swap(SwapError::ExerciseAlreadyInPlan(_)) => 409,
            PlanError::Generation(
                GenerationError::NoBlueprintForGoalSessions { .. }
                | GenerationError::InsufficientCandidatesForSlot(_),
            )
            | PlanError::Swap(
                SwapError::UnknownExercise(_) | SwapError::ExerciseNotEligibleForSlot { .. },
            ) => 422,
            PlanError::Generation(GenerationError::CatalogUnavailable(_))
            | PlanError::Swap(SwapError::CatalogUnavailable(_)) => 503,
            PlanError::Storage(_) | PlanError::Other(_) => 500,
        }
    }
}

impl From<ReadError> for PlanError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => PlanError::NotFound,
            ReadError::Storage(storage) => PlanError::Storage(storage),
            ReadError::Other(other) => PlanError::Other(other),
        }
    }
}

impl From<CreateError> for PlanError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Conflict => PlanError::Conflict,
            CreateError::Storage(storage) => PlanError::Storage(storage),
            CreateError::Other(other) => PlanError::Other(other),
        }
    }
}

impl From<UpdateError> for PlanError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::NotFound => PlanError::NotFound,
            UpdateError::Conflict => PlanError::Conflict,
            UpdateError::Storage(storage) => PlanError::Storage(storage),
            UpdateError::Other(other) => PlanError::Other(other),
        }
    }
}

impl From<DeleteError> for PlanError {
    fn from(value: DeleteError) -> Self {
        match value {
            DeleteError::NotFound => PlanError::NotFound,
            DeleteError::Storage(storage) => PlanError::Storage(storage),
            DeleteError::Other(other) => PlanError::Other(other),
        }
    }
}

pub struct Service<R> {
    repository: R,
    registry: Arc<Registry>,
}

impl<R> Service<R> {
    pub fn new(repository: R, registry: Arc<Registry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => {
                if err.status() < 500 {
                    debug!("failed to {} {}: {err}", $action, $entity);
                } else {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            }
        }
        result
    }};
}

impl<R> Service<R>
where
    R: ExerciseCatalog + PlanRepository + IdentityRepository,
{
    fn planner(&self) -> Planner<'_, R> {
        Planner::new(&self.registry, &self.repository)
    }

    async fn authenticate(&self, token: &Token) -> Result<User, PlanError> {
        match self.repository.read_current_user(token).await {
            Ok(user) => Ok(user),
            Err(ReadError::NotFound | ReadError::Storage(StorageError::Unauthorized)) => {
                Err(PlanError::Unauthorized)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn readable_plan(&self, user: &User, id: PlanID) -> Result<GeneratedPlan, PlanError> {
        let plan = self.repository.read_plan(id).await?;
        if !user.can_read(plan.user_id) {
            return Err(PlanError::Forbidden);
        }
        Ok(plan)
    }

    async fn generate_and_store(
        &self,
        token: &Token,
        request: CreatePlan,
    ) -> Result<GeneratedPlan, PlanError> {
        let user = self.authenticate(token).await?;
        let plan = self
            .planner()
            .generate(&PlanRequest {
                user_id: user.id,
                goal: request.goal,
                sessions_per_week: request.sessions_per_week,
                equipment: request.equipment,
                excluded_exercises: request.injuries.into_iter().collect::<BTreeSet<_>>(),
                start_date: Local::now().date_naive(),
            })
            .await?;
        Ok(self.repository.create_plan(plan).await?)
    }

    async fn latest_plan(&self, token: &Token) -> Result<GeneratedPlan, PlanError> {
        let user = self.authenticate(token).await?;
        Ok(self.repository.read_latest_plan(user.id).await?)
    }

    async fn plan(&self, token: &Token, id: PlanID) -> Result<GeneratedPlan, PlanError> {
        let user = self.authenticate(token).await?;
        self.readable_plan(&user, id).await
    }

    async fn plan_exercises(&self, token: &Token, id: PlanID) -> Result<Vec<Exercise>, PlanError> {
        let user = self.authenticate(token).await?;
        let plan = self.readable_plan(&user, id).await?;
        let mut exercises = self
            .repository
            .read_exercises_by_ids(&plan.exercise_ids().collect::<BTreeSet<_>>())
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect::<BTreeMap<_, _>>();
        Ok(plan
            .exercise_ids()
            .filter_map(|exercise_id| {
                let exercise = exercises.remove(&exercise_id);
                if exercise.is_none() {
                    warn!("exercise {exercise_id} of plan {id} is missing in the catalog");
                }
                exercise
            })
            .collect())
    }

    async fn remove_plan(&self, token: &Token, id: PlanID) -> Result<PlanID, PlanError> {
        let user = self.authenticate(token).await?;
        let plan = self.repository.read_plan(id).await?;
        if !user.can_modify(plan.user_id) {
            return Err(PlanError::Forbidden);
        }
        Ok(self.repository.delete_plan(id).await?)
    }

    async fn alternatives(
        &self,
        token: &Token,
        workout_id: WorkoutID,
        order: u32,
    ) -> Result<Vec<Exercise>, PlanError> {
        let user = self.authenticate(token).await?;
        let plan = self.repository.read_plan_by_workout(workout_id).await?;
        if !user.can_read(plan.user_id) {
            return Err(PlanError::Forbidden);
        }
        Ok(self
            .planner()
            .alternatives(&plan, workout_id, order)
            .await?)
    }

    async fn swap(
        &self,
        token: &Token,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutExercise, PlanError> {
        let user = self.authenticate(token).await?;
        let plan = self.repository.read_plan_by_workout(workout_id).await?;
        if !user.can_modify(plan.user_id) {
            return Err(PlanError::Forbidden);
        }
        self.planner()
            .validate_swap(&plan, workout_id, order, exercise_id)
            .await?;
        Ok(self
            .repository
            .replace_workout_exercise(workout_id, order, exercise_id)
            .await?)
    }
}

impl<R> PlanService for Service<R>
where
    R: ExerciseCatalog + PlanRepository + IdentityRepository,
{
    async fn create_plan(
        &self,
        token: &Token,
        request: CreatePlan,
    ) -> Result<GeneratedPlan, PlanError> {
        log_on_error!(self.generate_and_store(token, request), "create", "plan")
    }

    async fn get_latest_plan(&self, token: &Token) -> Result<GeneratedPlan, PlanError> {
        log_on_error!(self.latest_plan(token), "get", "latest plan")
    }

    async fn get_plan(&self, token: &Token, id: PlanID) -> Result<GeneratedPlan, PlanError> {
        log_on_error!(self.plan(token, id), "get", "plan")
    }

    async fn get_plan_exercises(
        &self,
        token: &Token,
        id: PlanID,
    ) -> Result<Vec<Exercise>, PlanError> {
        log_on_error!(self.plan_exercises(token, id), "get", "plan exercises")
    }

    async fn delete_plan(&self, token: &Token, id: PlanID) -> Result<PlanID, PlanError> {
        log_on_error!(self.remove_plan(token, id), "delete", "plan")
    }

    async fn get_alternatives(
        &self,
        token: &Token,
        workout_id: WorkoutID,
        order: u32,
    ) -> Result<Vec<Exercise>, PlanError> {
        log_on_error!(
            self.alternatives(token, workout_id, order),
            "get",
            "alternatives"
        )
    }

    async fn replace_workout_exercise(
        &self,
        token: &Token,
        workout_id: WorkoutID,
        order: u32,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutExercise, PlanError> {
        log_on_error!(
            self.swap(token, workout_id, order, exercise_id),
            "replace",
            "workout exercise"
        )
    }

    fn get_supported_splits(&self) -> Vec<(Goal, u8)> {
        self.registry.blueprints.supported().collect()
    }
}
