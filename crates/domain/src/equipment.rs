use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use log::warn;

use crate::{Equipment, RegistryError};

/// Training environment declared by a user.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentContext {
    Gym,
    Dumbbells,
    Home,
    Travel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedEquipment {
    Any,
    Only(BTreeSet<Equipment>),
}

impl AllowedEquipment {
    #[must_use]
    pub fn only(equipment: &[&str]) -> Self {
        Self::Only(equipment.iter().map(|e| Equipment::new(e)).collect())
    }

    #[must_use]
    pub fn permits(&self, equipment: &Equipment) -> bool {
        match self {
            AllowedEquipment::Any => true,
            AllowedEquipment::Only(allowed) => allowed.contains(equipment),
        }
    }

    /// Comma separated list for catalog queries, `None` if every equipment is allowed.
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        match self {
            AllowedEquipment::Any => None,
            AllowedEquipment::Only(allowed) => Some(
                allowed
                    .iter()
                    .map(Equipment::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentError {
    #[error("unknown equipment context \"{0}\"")]
    UnknownEquipmentContext(String),
}

/// Maps equipment contexts to the equipment usable in them.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentPolicy {
    policies: BTreeMap<EquipmentContext, AllowedEquipment>,
}

impl EquipmentPolicy {
    pub fn new(
        policies: impl IntoIterator<Item = (EquipmentContext, AllowedEquipment)>,
    ) -> Result<Self, RegistryError> {
        let policies = policies.into_iter().collect::<BTreeMap<_, _>>();

        match policies.get(&EquipmentContext::Gym) {
            None => return Err(RegistryError::MissingGymPolicy),
            Some(AllowedEquipment::Only(_)) => return Err(RegistryError::RestrictedGymPolicy),
            Some(AllowedEquipment::Any) => {}
        }

        for (context, allowed) in &policies {
            if let AllowedEquipment::Only(equipment) = allowed {
                if equipment.is_empty() {
                    return Err(RegistryError::EmptyEquipmentPolicy(*context));
                }
            }
        }

        Ok(Self { policies })
    }

    pub fn allowed_equipment(
        &self,
        context_name: &str,
    ) -> Result<(EquipmentContext, &AllowedEquipment), EquipmentError> {
        EquipmentContext::from_str(context_name.trim())
            .ok()
            .and_then(|context| self.policies.get(&context).map(|a| (context, a)))
            .ok_or_else(|| EquipmentError::UnknownEquipmentContext(context_name.to_string()))
    }

    /// Like [`Self::allowed_equipment`], but falls back to the unrestricted gym policy.
    #[must_use]
    pub fn resolve(&self, context_name: &str) -> (EquipmentContext, &AllowedEquipment) {
        match self.allowed_equipment(context_name) {
            Ok(resolved) => resolved,
            Err(err) => {
                static ANY: AllowedEquipment = AllowedEquipment::Any;
                warn!("{err}, using gym policy");
                (EquipmentContext::Gym, &ANY)
            }
        }
    }

    #[must_use]
    pub fn get(&self, context: EquipmentContext) -> Option<&AllowedEquipment> {
        self.policies.get(&context)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EquipmentContext, &AllowedEquipment)> {
        self.policies.iter()
    }
}

impl Default for EquipmentPolicy {
    fn default() -> Self {
        Self {
            policies: BTreeMap::from([
                (EquipmentContext::Gym, AllowedEquipment::Any),
                (
                    EquipmentContext::Dumbbells,
                    AllowedEquipment::only(&["dumbbell", Equipment::BODY_WEIGHT]),
                ),
                (
                    EquipmentContext::Home,
                    AllowedEquipment::only(&[Equipment::BODY_WEIGHT, "band", "dumbbell"]),
                ),
                (
                    EquipmentContext::Travel,
                    AllowedEquipment::only(&[Equipment::BODY_WEIGHT, "band"]),
                ),
            ]),
        }
    }
}
