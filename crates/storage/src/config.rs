//! Registry configuration
//!
//! The split blueprints and equipment policies can be loaded from a JSON file with the
//! following layout:
//!
//! ```json
//! {
//!   "version": 2,
//!   "equipment": { "gym": "*", "travel": ["body weight", "band"] },
//!   "splits": {
//!     "muscle_gain": {
//!       "3": [
//!         { "name": "Push", "notes": "", "slots": [
//!           { "tag": "horizontal_push", "count": 2, "min_compound": 1 }
//!         ] }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, path::Path, str::FromStr};

use log::info;
use planner_domain as domain;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Registry(#[from] domain::RegistryError),
    #[error("invalid equipment policy \"{0}\", expected \"*\" or a list")]
    InvalidEquipmentPolicy(String),
}

pub fn load(path: &Path) -> Result<domain::Registry, ConfigError> {
    let registry = parse(&std::fs::read_to_string(path)?)?;
    info!(
        "loaded registry version {} from {}",
        registry.version,
        path.display()
    );
    Ok(registry)
}

pub fn parse(json: &str) -> Result<domain::Registry, ConfigError> {
    domain::Registry::try_from(serde_json::from_str::<Registry>(json)?)
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Registry {
    pub version: u32,
    pub equipment: BTreeMap<String, Equipment>,
    pub splits: BTreeMap<String, BTreeMap<String, Vec<Day>>>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Equipment {
    All(String),
    Only(Vec<String>),
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Day {
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub slots: Vec<Slot>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Slot {
    pub tag: String,
    pub count: u32,
    #[serde(default)]
    pub min_compound: u32,
    #[serde(default)]
    pub fallback: Vec<String>,
}

impl TryFrom<Registry> for domain::Registry {
    type Error = ConfigError;

    fn try_from(value: Registry) -> Result<Self, Self::Error> {
        let equipment = domain::EquipmentPolicy::new(
            value
                .equipment
                .into_iter()
                .map(|(context, equipment)| -> Result<_, ConfigError> {
                    let context = domain::EquipmentContext::from_str(&context)
                        .map_err(|_| domain::RegistryError::UnknownEquipmentContext(context))?;
                    let allowed = match equipment {
                        Equipment::All(all) if all == "*" => domain::AllowedEquipment::Any,
                        Equipment::All(other) => {
                            return Err(ConfigError::InvalidEquipmentPolicy(other));
                        }
                        Equipment::Only(only) => domain::AllowedEquipment::Only(
                            only.iter().map(|e| domain::Equipment::new(e)).collect(),
                        ),
                    };
                    Ok((context, allowed))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?,
        )?;

        let mut splits = vec![];
        for (goal, by_sessions) in value.splits {
            let goal = domain::Goal::from_str(&goal)
                .map_err(|_| domain::RegistryError::UnknownGoal(goal))?;
            for (sessions_per_week, days) in by_sessions {
                let sessions_per_week = sessions_per_week
                    .parse::<u8>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(domain::RegistryError::InvalidSessionsPerWeek(
                        sessions_per_week,
                    ))?;
                splits.push((
                    (goal, sessions_per_week),
                    days.into_iter()
                        .map(domain::Day::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                ));
            }
        }

        Ok(domain::Registry::new(
            value.version,
            domain::Blueprints::new(splits)?,
            equipment,
        ))
    }
}

impl TryFrom<Day> for domain::Day {
    type Error = domain::RegistryError;

    fn try_from(value: Day) -> Result<Self, Self::Error> {
        Ok(Self {
            name: domain::Name::new(&value.name)
                .map_err(|err| domain::RegistryError::InvalidDayName(value.name.clone(), err))?,
            notes: value.notes,
            slots: value
                .slots
                .into_iter()
                .map(domain::Slot::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl TryFrom<Slot> for domain::Slot {
    type Error = domain::RegistryError;

    fn try_from(value: Slot) -> Result<Self, Self::Error> {
        Ok(domain::Slot::new(tag(value.tag)?, value.count)
            .min_compound(value.min_compound)
            .fallback(
                &value
                    .fallback
                    .into_iter()
                    .map(tag)
                    .collect::<Result<Vec<_>, _>>()?,
            ))
    }
}

fn tag(slug: String) -> Result<domain::Tag, domain::RegistryError> {
    domain::Tag::from_str(&slug).map_err(|_| domain::RegistryError::UnknownTag(slug))
}
