//! Registry
//!
//! Split blueprints and equipment policies are loaded once at start-up into a [`Registry`].
//! The registry is never mutated afterwards; a changed configuration means a new registry
//! with a new version.

use crate::{Blueprints, EquipmentContext, EquipmentPolicy, Goal, NameError, Tag};

#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    pub version: u32,
    pub blueprints: Blueprints,
    pub equipment: EquipmentPolicy,
}

impl Registry {
    pub const BUILTIN_VERSION: u32 = 1;

    #[must_use]
    pub fn new(version: u32, blueprints: Blueprints, equipment: EquipmentPolicy) -> Self {
        Self {
            version,
            blueprints,
            equipment,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(
            Self::BUILTIN_VERSION,
            Blueprints::default(),
            EquipmentPolicy::default(),
        )
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("unknown goal \"{0}\"")]
    UnknownGoal(String),
    #[error("unknown tag \"{0}\"")]
    UnknownTag(String),
    #[error("unknown equipment context \"{0}\"")]
    UnknownEquipmentContext(String),
    #[error("invalid sessions per week \"{0}\"")]
    InvalidSessionsPerWeek(String),
    #[error("invalid day name \"{0}\": {1}")]
    InvalidDayName(String, NameError),
    #[error("{goal} with {sessions_per_week} sessions per week has {days} days")]
    DayCountMismatch {
        goal: Goal,
        sessions_per_week: u8,
        days: usize,
    },
    #[error("day \"{0}\" has no slots")]
    EmptyDay(String),
    #[error("slot {tag} of day \"{day}\" has a count of zero")]
    ZeroCount { day: String, tag: Tag },
    #[error("slot {tag} of day \"{day}\" requires more compound movements than its count")]
    MinCompoundExceedsCount { day: String, tag: Tag },
    #[error("slot {tag} of day \"{day}\" requires compound movements of an isolation pattern")]
    MinCompoundOnIsolationSlot { day: String, tag: Tag },
    #[error("slot {tag} of day \"{day}\" repeats a tag in its fallback chain")]
    RepeatedFallback { day: String, tag: Tag },
    #[error("gym equipment policy is missing")]
    MissingGymPolicy,
    #[error("gym equipment policy must allow all equipment")]
    RestrictedGymPolicy,
    #[error("equipment policy for {0} allows no equipment")]
    EmptyEquipmentPolicy(EquipmentContext),
}
