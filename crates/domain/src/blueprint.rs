use std::collections::{BTreeMap, BTreeSet};

use crate::{Name, RegistryError, Tag};

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
pub enum Goal {
    MuscleGain,
    GeneralFitness,
    FatLoss,
    Performance,
}

/// Requirement of a training day: `count` exercises of the pattern `tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub tag: Tag,
    pub count: u32,
    /// Number of the selected exercises that must be compound movements.
    pub min_compound: u32,
    /// Tags tried in order when `tag` alone does not yield enough candidates.
    pub fallback: Vec<Tag>,
}

impl Slot {
    #[must_use]
    pub fn new(tag: Tag, count: u32) -> Self {
        Self {
            tag,
            count,
            min_compound: 0,
            fallback: vec![],
        }
    }

    #[must_use]
    pub fn min_compound(mut self, min_compound: u32) -> Self {
        self.min_compound = min_compound;
        self
    }

    #[must_use]
    pub fn fallback(mut self, fallback: &[Tag]) -> Self {
        self.fallback = fallback.to_vec();
        self
    }

    /// The slot tag followed by its fallback chain.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        std::iter::once(self.tag).chain(self.fallback.iter().copied())
    }

    fn validate(&self, day: &Name) -> Result<(), RegistryError> {
        if self.count == 0 {
            return Err(RegistryError::ZeroCount {
                day: day.to_string(),
                tag: self.tag,
            });
        }

        if self.min_compound > self.count {
            return Err(RegistryError::MinCompoundExceedsCount {
                day: day.to_string(),
                tag: self.tag,
            });
        }

        if self.min_compound > 0 && !self.tags().any(Tag::is_compound_pattern) {
            return Err(RegistryError::MinCompoundOnIsolationSlot {
                day: day.to_string(),
                tag: self.tag,
            });
        }

        let mut seen = BTreeSet::new();
        if !self.tags().all(|tag| seen.insert(tag)) {
            return Err(RegistryError::RepeatedFallback {
                day: day.to_string(),
                tag: self.tag,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub name: Name,
    pub notes: String,
    pub slots: Vec<Slot>,
}

impl Day {
    #[must_use]
    pub fn num_exercises(&self) -> u32 {
        self.slots.iter().map(|s| s.count).sum()
    }
}

/// Weekly split templates keyed by goal and sessions per week.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprints {
    splits: BTreeMap<(Goal, u8), Vec<Day>>,
}

impl Blueprints {
    pub fn new(
        splits: impl IntoIterator<Item = ((Goal, u8), Vec<Day>)>,
    ) -> Result<Self, RegistryError> {
        let splits = splits.into_iter().collect::<BTreeMap<_, _>>();

        for (&(goal, sessions_per_week), days) in &splits {
            if days.len() != usize::from(sessions_per_week) {
                return Err(RegistryError::DayCountMismatch {
                    goal,
                    sessions_per_week,
                    days: days.len(),
                });
            }

            for day in days {
                if day.slots.is_empty() {
                    return Err(RegistryError::EmptyDay(day.name.to_string()));
                }
                for slot in &day.slots {
                    slot.validate(&day.name)?;
                }
            }
        }

        Ok(Self { splits })
    }

    /// Exact lookup, there is no matching across different session counts.
    #[must_use]
    pub fn lookup(&self, goal: Goal, sessions_per_week: u8) -> Option<&[Day]> {
        self.splits
            .get(&(goal, sessions_per_week))
            .map(Vec::as_slice)
    }

    pub fn supported(&self) -> impl Iterator<Item = (Goal, u8)> + '_ {
        self.splits.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Goal, u8), &Vec<Day>)> {
        self.splits.iter()
    }
}

impl Default for Blueprints {
    fn default() -> Self {
        Self {
            splits: builtin()
                .into_iter()
                .map(|(key, days)| {
                    (
                        key,
                        days.into_iter()
                            .map(|(name, notes, slots)| Day {
                                name: Name::from_static(name),
                                notes: notes.to_string(),
                                slots,
                            })
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

type DayTemplate = (&'static str, &'static str, Vec<Slot>);

#[allow(clippy::too_many_lines)]
fn builtin() -> Vec<((Goal, u8), Vec<DayTemplate>)> {
    use Tag::{
        Cardio, Carry, CoreAntiExtension, CoreRotation, Hinge, HorizontalPull, HorizontalPush,
        Lunge, Squat, VerticalPull, VerticalPush,
    };

    vec![
        (
            (Goal::MuscleGain, 3),
            vec![
                (
                    "Push",
                    "Chest, shoulders and triceps",
                    vec![
                        Slot::new(HorizontalPush, 2).min_compound(1),
                        Slot::new(VerticalPush, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPush]),
                        Slot::new(CoreAntiExtension, 1).fallback(&[CoreRotation]),
                    ],
                ),
                (
                    "Pull",
                    "Back and biceps",
                    vec![
                        Slot::new(VerticalPull, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPull]),
                        Slot::new(HorizontalPull, 2).min_compound(1),
                        Slot::new(CoreRotation, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
                (
                    "Legs",
                    "Quads, hamstrings and glutes",
                    vec![
                        Slot::new(Squat, 1).min_compound(1),
                        Slot::new(Hinge, 1).min_compound(1),
                        Slot::new(Lunge, 1).fallback(&[Squat]),
                        Slot::new(Carry, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
            ],
        ),
        (
            (Goal::MuscleGain, 4),
            vec![
                (
                    "Upper A",
                    "Horizontal emphasis",
                    vec![
                        Slot::new(HorizontalPush, 1).min_compound(1),
                        Slot::new(HorizontalPull, 1).min_compound(1),
                        Slot::new(VerticalPush, 1).fallback(&[HorizontalPush]),
                        Slot::new(VerticalPull, 1).fallback(&[HorizontalPull]),
                        Slot::new(CoreAntiExtension, 1).fallback(&[CoreRotation]),
                    ],
                ),
                (
                    "Lower A",
                    "Squat emphasis",
                    vec![
                        Slot::new(Squat, 1).min_compound(1),
                        Slot::new(Hinge, 1).min_compound(1),
                        Slot::new(Lunge, 1).fallback(&[Squat]),
                        Slot::new(CoreRotation, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
                (
                    "Upper B",
                    "Vertical emphasis",
                    vec![
                        Slot::new(VerticalPush, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPush]),
                        Slot::new(VerticalPull, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPull]),
                        Slot::new(HorizontalPush, 1),
                        Slot::new(HorizontalPull, 1),
                        Slot::new(CoreRotation, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
                (
                    "Lower B",
                    "Hinge emphasis",
                    vec![
                        Slot::new(Hinge, 1).min_compound(1),
                        Slot::new(Squat, 1).min_compound(1),
                        Slot::new(Lunge, 1).fallback(&[Squat]),
                        Slot::new(Carry, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
            ],
        ),
        (
            (Goal::GeneralFitness, 3),
            vec![
                (
                    "Full Body A",
                    "Squat, push and pull",
                    vec![
                        Slot::new(Squat, 1).min_compound(1).fallback(&[Lunge]),
                        Slot::new(HorizontalPush, 1).min_compound(1),
                        Slot::new(HorizontalPull, 1).min_compound(1),
                        Slot::new(CoreAntiExtension, 1),
                    ],
                ),
                (
                    "Full Body B",
                    "Hinge, press and pull-down",
                    vec![
                        Slot::new(Hinge, 1).min_compound(1),
                        Slot::new(VerticalPush, 1).fallback(&[HorizontalPush]),
                        Slot::new(VerticalPull, 1).fallback(&[HorizontalPull]),
                        Slot::new(CoreRotation, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
                (
                    "Full Body C",
                    "Single leg work and carries",
                    vec![
                        Slot::new(Lunge, 1).fallback(&[Squat]),
                        Slot::new(HorizontalPush, 1),
                        Slot::new(HorizontalPull, 1),
                        Slot::new(Carry, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
            ],
        ),
        (
            (Goal::FatLoss, 3),
            vec![
                (
                    "Circuit A",
                    "Move quickly between exercises",
                    vec![
                        Slot::new(Squat, 1).min_compound(1).fallback(&[Lunge]),
                        Slot::new(HorizontalPush, 1),
                        Slot::new(HorizontalPull, 1),
                        Slot::new(Cardio, 1).fallback(&[Carry, Lunge]),
                    ],
                ),
                (
                    "Circuit B",
                    "Move quickly between exercises",
                    vec![
                        Slot::new(Hinge, 1).min_compound(1).fallback(&[Squat]),
                        Slot::new(VerticalPush, 1).fallback(&[HorizontalPush]),
                        Slot::new(VerticalPull, 1).fallback(&[HorizontalPull]),
                        Slot::new(Cardio, 1).fallback(&[Carry, Lunge]),
                    ],
                ),
                (
                    "Circuit C",
                    "Move quickly between exercises",
                    vec![
                        Slot::new(Lunge, 1).fallback(&[Squat]),
                        Slot::new(CoreAntiExtension, 1).fallback(&[CoreRotation]),
                        Slot::new(CoreRotation, 1).fallback(&[CoreAntiExtension]),
                        Slot::new(Cardio, 1).fallback(&[Carry, Lunge]),
                    ],
                ),
            ],
        ),
        (
            (Goal::Performance, 4),
            vec![
                (
                    "Lower Strength",
                    "Heavy squat and hinge",
                    vec![
                        Slot::new(Squat, 1).min_compound(1),
                        Slot::new(Hinge, 1).min_compound(1),
                        Slot::new(Lunge, 1).fallback(&[Squat]),
                        Slot::new(CoreAntiExtension, 1).fallback(&[CoreRotation]),
                    ],
                ),
                (
                    "Upper Strength",
                    "Heavy presses and rows",
                    vec![
                        Slot::new(HorizontalPush, 1).min_compound(1),
                        Slot::new(HorizontalPull, 1).min_compound(1),
                        Slot::new(VerticalPush, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPush]),
                        Slot::new(VerticalPull, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPull]),
                    ],
                ),
                (
                    "Lower Power",
                    "Fast concentric reps",
                    vec![
                        Slot::new(Hinge, 1).min_compound(1),
                        Slot::new(Squat, 1).min_compound(1),
                        Slot::new(Carry, 1).fallback(&[Lunge]),
                        Slot::new(CoreRotation, 1).fallback(&[CoreAntiExtension]),
                    ],
                ),
                (
                    "Upper Power",
                    "Fast concentric reps",
                    vec![
                        Slot::new(VerticalPush, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPush]),
                        Slot::new(VerticalPull, 1)
                            .min_compound(1)
                            .fallback(&[HorizontalPull]),
                        Slot::new(HorizontalPush, 1),
                        Slot::new(HorizontalPull, 1),
                    ],
                ),
            ],
        ),
    ]
}
