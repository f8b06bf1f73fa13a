use std::collections::BTreeSet;

use derive_more::{Deref, Display};

use crate::{AllowedEquipment, ReadError, Tag};

/// Read-only view of the external exercise catalog.
///
/// Tags are assigned by the batch classifier ahead of time; the catalog answers tag queries
/// from that index instead of classifying exercises on the fly.
#[allow(async_fn_in_trait)]
pub trait ExerciseCatalog {
    async fn read_exercises_by_tag(
        &self,
        tag: Tag,
        equipment: &AllowedEquipment,
    ) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn read_exercises_by_ids(
        &self,
        ids: &BTreeSet<ExerciseID>,
    ) -> Result<Vec<Exercise>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub primary_muscle: String,
    pub equipment: Equipment,
    pub tags: Vec<Tag>,
    pub body_parts: Vec<String>,
    pub target_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub image: Option<String>,
    pub is_compound: bool,
}

impl Exercise {
    #[must_use]
    pub fn primary_tag(&self) -> Option<Tag> {
        self.tags.first().copied()
    }

    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Key used to spread selections over different muscle/equipment combinations.
    #[must_use]
    pub fn variation_key(&self) -> (String, &Equipment) {
        (self.primary_muscle.to_lowercase(), &self.equipment)
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(u32);

impl From<u32> for ExerciseID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Normalized equipment name as used by the catalog.
#[derive(Debug, Display, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Equipment(String);

impl Equipment {
    pub const BODY_WEIGHT: &'static str = "body weight";

    #[must_use]
    pub fn new(name: &str) -> Self {
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let canonical = match normalized.as_str() {
            "" | "none" | "no equipment" | "bodyweight" | "body-weight" => Self::BODY_WEIGHT,
            "resistance band" | "resistance bands" | "bands" => "band",
            "dumbbells" => "dumbbell",
            "barbells" => "barbell",
            "kettlebells" => "kettlebell",
            other => other,
        };
        Self(canonical.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Equipment {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
