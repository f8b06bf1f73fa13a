use std::str::FromStr;

use chrono::NaiveDate;
use log::warn;
use planner_domain::{self as domain, classifier};
use uuid::Uuid;

/// Catalog responses are either a plain array or wrapped in a `data` object.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum List<T> {
    Plain(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> From<List<T>> for Vec<T> {
    fn from(value: List<T>) -> Self {
        match value {
            List::Plain(items) | List::Wrapped { data: items } => items,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    #[serde(default, alias = "primaryMuscle")]
    pub primary_muscle: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "bodyParts")]
    pub body_parts: Vec<String>,
    #[serde(default, alias = "targetMuscles")]
    pub target_muscles: Vec<String>,
    #[serde(default, alias = "secondaryMuscles")]
    pub secondary_muscles: Vec<String>,
    #[serde(default, alias = "gifUrl", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Derived from the tags and the name if the catalog does not provide it.
    #[serde(default, alias = "isCompound", skip_serializing_if = "Option::is_none")]
    pub is_compound: Option<bool>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            primary_muscle: value.primary_muscle.clone(),
            equipment: value.equipment.to_string(),
            tags: value.tags.iter().map(|t| t.slug().to_string()).collect(),
            body_parts: value.body_parts.clone(),
            target_muscles: value.target_muscles.clone(),
            secondary_muscles: value.secondary_muscles.clone(),
            image: value.image.clone(),
            is_compound: Some(value.is_compound),
        }
    }
}

impl From<Exercise> for domain::Exercise {
    fn from(value: Exercise) -> Self {
        let tags = value
            .tags
            .iter()
            .filter_map(|slug| match domain::Tag::from_str(slug) {
                Ok(tag) => Some(tag),
                Err(_) => {
                    warn!("ignoring unknown tag \"{slug}\" of exercise {}", value.id);
                    None
                }
            })
            .collect();
        let primary_muscle = if value.primary_muscle.trim().is_empty() {
            value.target_muscles.first().cloned().unwrap_or_default()
        } else {
            value.primary_muscle
        };
        let mut exercise = Self {
            id: value.id.into(),
            name: value.name,
            primary_muscle,
            equipment: domain::Equipment::new(&value.equipment),
            tags,
            body_parts: value.body_parts,
            target_muscles: value.target_muscles,
            secondary_muscles: value.secondary_muscles,
            image: value.image,
            is_compound: false,
        };
        let is_compound = value.is_compound.unwrap_or_else(|| {
            exercise
                .primary_tag()
                .is_some_and(|tag| classifier::is_compound(&exercise, tag))
        });
        exercise.is_compound = is_compound;
        exercise
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<User> for domain::User {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into(),
            roles: value
                .roles
                .iter()
                .filter_map(|role| match domain::Role::from_str(role) {
                    Ok(role) => Some(role),
                    Err(_) => {
                        warn!("ignoring unknown role \"{role}\" of user {}", value.id);
                        None
                    }
                })
                .collect(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: Uuid,
    pub user_id: u64,
    pub goal: String,
    pub sessions_per_week: u8,
    pub equipment: String,
    pub start_date: NaiveDate,
    pub registry_version: u32,
    pub excluded_exercises: Vec<u32>,
    pub workouts: Vec<Workout>,
}

impl From<&domain::GeneratedPlan> for Plan {
    fn from(value: &domain::GeneratedPlan) -> Self {
        Self {
            id: *value.id,
            user_id: *value.user_id,
            goal: value.goal.to_string(),
            sessions_per_week: value.sessions_per_week,
            equipment: value.equipment.to_string(),
            start_date: value.start_date,
            registry_version: value.registry_version,
            excluded_exercises: value.excluded_exercises.iter().map(|id| **id).collect(),
            workouts: value.workouts.iter().map(Workout::from).collect(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub id: Uuid,
    pub day_index: u32,
    pub name: String,
    pub notes: String,
    pub exercises: Vec<WorkoutExercise>,
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: *value.id,
            day_index: value.day_index,
            name: value.name.to_string(),
            notes: value.notes.clone(),
            exercises: value.exercises.iter().map(WorkoutExercise::from).collect(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub exercise_id: u32,
    pub order: u32,
    pub sets: u32,
    pub rep_min: u32,
    pub rep_max: u32,
    pub rest_sec: u32,
    pub slot_tag: String,
    pub fallback_tags: Vec<String>,
}

impl From<&domain::WorkoutExercise> for WorkoutExercise {
    fn from(value: &domain::WorkoutExercise) -> Self {
        Self {
            exercise_id: *value.exercise_id,
            order: value.order,
            sets: value.sets,
            rep_min: value.rep_min,
            rep_max: value.rep_max,
            rest_sec: value.rest_sec,
            slot_tag: value.slot_tag.to_string(),
            fallback_tags: value.fallback_tags.iter().map(ToString::to_string).collect(),
        }
    }
}
