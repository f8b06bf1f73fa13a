#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod classifier;

mod blueprint;
mod equipment;
mod error;
mod exercise;
mod generator;
mod name;
mod plan;
mod registry;
mod service;
mod swap;
mod tag;
mod user;

#[cfg(test)]
mod fixtures;

pub use blueprint::{Blueprints, Day, Goal, Slot};
pub use equipment::{AllowedEquipment, EquipmentContext, EquipmentError, EquipmentPolicy};
pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{Equipment, Exercise, ExerciseCatalog, ExerciseID};
pub use generator::{GenerationError, PlanRequest, Planner};
pub use name::{Name, NameError};
pub use plan::{
    GeneratedPlan, PlanID, PlanRepository, Prescription, Workout, WorkoutExercise, WorkoutID,
};
pub use registry::{Registry, RegistryError};
pub use service::{CreatePlan, PlanError, PlanService, Service};
pub use swap::SwapError;
pub use tag::{Tag, TagGroup};
pub use user::{IdentityRepository, Role, Token, User, UserID};
