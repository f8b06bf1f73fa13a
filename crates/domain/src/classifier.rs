//! Tag classifier
//!
//! Assigns one canonical movement pattern to each catalog exercise. Classification runs as a
//! batch over the catalog; the generator only consumes the resulting tag index.
//!
//! Keywords match anywhere in the normalized name (lowercase, punctuation replaced by
//! spaces), so `squat` matches "Hacksquat" and `push up` matches "Push-Ups". `row` is the
//! exception: it has to start a word, so "Throw" and "Narrow Stance" are no rows. Muscle
//! groups also match at word starts.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::{Exercise, Tag};

/// A single classification rule. Rules are evaluated in list order and the first match wins.
pub struct Rule {
    pub name: &'static str,
    pub tag: Tag,
    predicate: fn(&Features) -> bool,
}

impl Rule {
    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        (self.predicate)(&Features::of(exercise))
    }
}

pub static RULES: [Rule; 11] = [
    Rule {
        name: "cardio",
        tag: Tag::Cardio,
        predicate: |f| {
            f.body_parts
                .iter()
                .chain(&f.target_muscles)
                .any(|m| m == "cardio" || m == "cardiovascular system")
        },
    },
    Rule {
        name: "squat",
        tag: Tag::Squat,
        predicate: |f| f.name_has(&["squat", "leg press", "goblet", "pistol"]),
    },
    Rule {
        name: "hinge",
        tag: Tag::Hinge,
        predicate: |f| {
            f.name_has(&[
                "deadlift",
                "rdl",
                "romanian",
                "hip thrust",
                "kettlebell swing",
                "good morning",
                "glute bridge",
            ])
        },
    },
    Rule {
        name: "lunge",
        tag: Tag::Lunge,
        predicate: |f| f.name_has(&["lunge", "step up"]),
    },
    Rule {
        name: "carry",
        tag: Tag::Carry,
        predicate: |f| f.name_has(&["carry", "farmer", "suitcase", "waiter walk"]),
    },
    Rule {
        name: "vertical push",
        tag: Tag::VerticalPush,
        predicate: |f| {
            f.name_has(&[
                "overhead",
                "shoulder press",
                "military",
                "push press",
                "arnold press",
                "handstand push",
            ])
        },
    },
    Rule {
        name: "horizontal push",
        tag: Tag::HorizontalPush,
        predicate: |f| {
            f.name_has(&["bench", "push up", "pushup", "dip", "chest press", "fly"])
                || (f.primary_muscle.contains("chest") && f.name_has(&["press", "push"]))
        },
    },
    Rule {
        name: "vertical pull",
        tag: Tag::VerticalPull,
        predicate: |f| {
            f.name_has(&[
                "pull up", "pullup", "chin up", "chinup", "pulldown", "pull down",
            ])
        },
    },
    Rule {
        name: "horizontal pull",
        tag: Tag::HorizontalPull,
        predicate: |f| f.name_has_word(&["row"]) && !f.is_rowing_machine(),
    },
    Rule {
        name: "core anti-extension",
        tag: Tag::CoreAntiExtension,
        predicate: |f| {
            f.name_has(&["plank", "ab wheel", "rollout", "roll out", "dead bug", "hollow"])
                || (f.muscles_mention(&["abs", "core"]) && f.name_has(&["plank", "rollout"]))
        },
    },
    Rule {
        name: "core rotation",
        tag: Tag::CoreRotation,
        predicate: |f| {
            f.name_has(&[
                "woodchop",
                "wood chop",
                "pallof",
                "russian twist",
                "landmine rotation",
                "cable rotation",
            ])
        },
    },
];

/// Muscle group rules for exercises no keyword rule matched.
pub static FALLBACK_RULES: [Rule; 7] = [
    Rule {
        name: "quads",
        tag: Tag::Squat,
        predicate: |f| f.muscles_mention(&["quad"]),
    },
    Rule {
        name: "glutes and hamstrings",
        tag: Tag::Hinge,
        predicate: |f| f.muscles_mention(&["glute", "hamstring"]),
    },
    Rule {
        name: "abs and core",
        tag: Tag::CoreAntiExtension,
        predicate: |f| f.muscles_mention(&["abs", "core"]),
    },
    Rule {
        name: "chest, shoulders and triceps",
        tag: Tag::HorizontalPush,
        predicate: |f| f.muscles_mention(&["chest", "pectoral", "shoulder", "delt", "tricep"]),
    },
    Rule {
        name: "back, lats and biceps",
        tag: Tag::HorizontalPull,
        predicate: |f| f.muscles_mention(&["back", "lat", "bicep"]),
    },
    Rule {
        name: "press or push",
        tag: Tag::HorizontalPush,
        predicate: |f| f.name_has(&["press", "push"]),
    },
    Rule {
        name: "row",
        tag: Tag::HorizontalPull,
        predicate: |f| f.name_has_word(&["row"]),
    },
];

const DEFAULT_TAG: Tag = Tag::HorizontalPull;

const ISOLATION_KEYWORDS: [&str; 10] = [
    "curl",
    "extension",
    "raise",
    "fly",
    "flye",
    "kickback",
    "pullover",
    "shrug",
    "crossover",
    "pec deck",
];

/// First matching keyword rule, `None` if the exercise needs the muscle group fallback.
#[must_use]
pub fn classify(exercise: &Exercise) -> Option<Tag> {
    first_match(&RULES, &Features::of(exercise))
}

#[must_use]
pub fn fallback_tag(exercise: &Exercise) -> Tag {
    first_match(&FALLBACK_RULES, &Features::of(exercise)).unwrap_or(DEFAULT_TAG)
}

#[must_use]
pub fn assign_tag(exercise: &Exercise) -> Tag {
    assignment(exercise).0
}

/// Assigned tag and whether the muscle group fallback decided it.
fn assignment(exercise: &Exercise) -> (Tag, bool) {
    match classify(exercise) {
        Some(tag) => (tag, false),
        None => (fallback_tag(exercise), true),
    }
}

/// Multi-joint pattern without an isolation keyword in the name.
#[must_use]
pub fn is_compound(exercise: &Exercise, tag: Tag) -> bool {
    tag.is_compound_pattern() && !Features::of(exercise).name_has(&ISOLATION_KEYWORDS)
}

/// Replaces the tags of the exercise by its assigned tag and derives the compound flag.
#[must_use]
pub fn tag_exercise(exercise: Exercise) -> Exercise {
    let (tag, _) = assignment(&exercise);
    with_tag(exercise, tag)
}

fn with_tag(mut exercise: Exercise, tag: Tag) -> Exercise {
    exercise.is_compound = is_compound(&exercise, tag);
    exercise.tags = vec![tag];
    exercise
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagSummary {
    pub tags: BTreeMap<Tag, usize>,
    pub fallback: usize,
    pub compound: usize,
}

pub fn tag_catalog(exercises: Vec<Exercise>) -> (Vec<Exercise>, TagSummary) {
    let mut summary = TagSummary::default();

    let exercises = exercises
        .into_iter()
        .map(|exercise| {
            let (tag, fallback) = assignment(&exercise);
            if fallback {
                summary.fallback += 1;
            }
            let exercise = with_tag(exercise, tag);
            debug!(
                "tagged exercise {} \"{}\" as {tag}{}",
                exercise.id,
                exercise.name,
                if exercise.is_compound {
                    " (compound)"
                } else {
                    ""
                }
            );
            *summary.tags.entry(tag).or_default() += 1;
            if exercise.is_compound {
                summary.compound += 1;
            }
            exercise
        })
        .collect::<Vec<_>>();

    for (tag, count) in &summary.tags {
        info!("{count} exercises tagged as {tag}");
    }
    info!(
        "tagged {} exercises, {} by muscle group fallback, {} compound",
        exercises.len(),
        summary.fallback,
        summary.compound
    );

    (exercises, summary)
}

fn first_match(rules: &[Rule], features: &Features) -> Option<Tag> {
    rules
        .iter()
        .find(|rule| (rule.predicate)(features))
        .map(|rule| rule.tag)
}

struct Features {
    name: String,
    muscles: String,
    primary_muscle: String,
    equipment: String,
    body_parts: Vec<String>,
    target_muscles: Vec<String>,
}

impl Features {
    fn of(exercise: &Exercise) -> Self {
        let target_muscles = exercise
            .target_muscles
            .iter()
            .map(|m| m.trim().to_lowercase())
            .collect::<Vec<_>>();
        Self {
            name: words(&exercise.name),
            muscles: words(
                &std::iter::once(exercise.primary_muscle.as_str())
                    .chain(target_muscles.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            primary_muscle: exercise.primary_muscle.to_lowercase(),
            equipment: exercise.equipment.as_str().to_string(),
            body_parts: exercise
                .body_parts
                .iter()
                .map(|b| b.trim().to_lowercase())
                .collect(),
            target_muscles,
        }
    }

    fn name_has(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.name.contains(k))
    }

    fn name_has_word(&self, keywords: &[&str]) -> bool {
        has_word_prefix(&self.name, keywords)
    }

    fn muscles_mention(&self, keywords: &[&str]) -> bool {
        has_word_prefix(&self.muscles, keywords)
    }

    fn is_rowing_machine(&self) -> bool {
        self.name_has_word(&["rowing", "rower", "erg"])
            || self.equipment.contains("rowing")
            || self.equipment.contains("erg")
    }
}

/// Lowercase words separated and surrounded by single spaces.
fn words(text: &str) -> String {
    let text = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>();
    format!(" {} ", text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn has_word_prefix(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(&format!(" {k}")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::Equipment;

    use super::*;

    fn exercise(name: &str, primary_muscle: &str, equipment: &str) -> Exercise {
        Exercise {
            id: 1.into(),
            name: name.to_string(),
            primary_muscle: primary_muscle.to_string(),
            equipment: Equipment::new(equipment),
            tags: vec![],
            body_parts: vec![],
            target_muscles: vec![],
            secondary_muscles: vec![],
            image: None,
            is_compound: false,
        }
    }

    fn with_parts(mut exercise: Exercise, body_parts: &[&str], targets: &[&str]) -> Exercise {
        exercise.body_parts = body_parts.iter().map(ToString::to_string).collect();
        exercise.target_muscles = targets.iter().map(ToString::to_string).collect();
        exercise
    }

    #[rstest]
    #[case(exercise("Barbell Back Squat", "quads", "barbell"), Some(Tag::Squat))]
    #[case(exercise("Goblet Squats", "quads", "dumbbell"), Some(Tag::Squat))]
    #[case(exercise("Hacksquat", "quads", "sled machine"), Some(Tag::Squat))]
    #[case(exercise("Barbell Frontsquat", "quads", "barbell"), Some(Tag::Squat))]
    #[case(exercise("Trap Bar Deadlifts", "glutes", "trap bar"), Some(Tag::Hinge))]
    #[case(exercise("Decline Pushups", "chest", "body weight"), Some(Tag::HorizontalPush))]
    #[case(exercise("Incline Butterfly", "chest", "leverage machine"), Some(Tag::HorizontalPush))]
    #[case(exercise("Seated Cable Rows", "upper back", "cable"), Some(Tag::HorizontalPull))]
    #[case(exercise("Sled Leg Press", "quads", "sled machine"), Some(Tag::Squat))]
    #[case(exercise("Romanian Deadlift", "hamstrings", "barbell"), Some(Tag::Hinge))]
    #[case(exercise("Single Leg RDL", "hamstrings", "dumbbell"), Some(Tag::Hinge))]
    #[case(exercise("Barbell Hip Thrust", "glutes", "barbell"), Some(Tag::Hinge))]
    #[case(exercise("Kettlebell Swing", "glutes", "kettlebell"), Some(Tag::Hinge))]
    #[case(exercise("Walking Lunges", "quads", "dumbbell"), Some(Tag::Lunge))]
    #[case(exercise("Box Step-Up", "quads", "body weight"), Some(Tag::Lunge))]
    #[case(exercise("Farmer's Walk", "forearms", "dumbbell"), Some(Tag::Carry))]
    #[case(exercise("Suitcase Carry", "obliques", "kettlebell"), Some(Tag::Carry))]
    #[case(exercise("Military Press", "shoulders", "barbell"), Some(Tag::VerticalPush))]
    #[case(exercise("Dumbbell Shoulder Press", "delts", "dumbbell"), Some(Tag::VerticalPush))]
    #[case(exercise("Barbell Bench Press", "chest", "barbell"), Some(Tag::HorizontalPush))]
    #[case(exercise("Push-Up", "chest", "body weight"), Some(Tag::HorizontalPush))]
    #[case(exercise("Chest Dip", "chest", "body weight"), Some(Tag::HorizontalPush))]
    #[case(exercise("Machine Press", "Chest", "leverage machine"), Some(Tag::HorizontalPush))]
    #[case(exercise("Pull-Up", "lats", "body weight"), Some(Tag::VerticalPull))]
    #[case(exercise("Chin Up", "lats", "body weight"), Some(Tag::VerticalPull))]
    #[case(exercise("Cable Pulldown", "lats", "cable"), Some(Tag::VerticalPull))]
    #[case(exercise("Bent Over Row", "upper back", "barbell"), Some(Tag::HorizontalPull))]
    #[case(exercise("Inverted Rows", "upper back", "body weight"), Some(Tag::HorizontalPull))]
    #[case(exercise("Front Plank", "abs", "body weight"), Some(Tag::CoreAntiExtension))]
    #[case(exercise("Ab Wheel Rollout", "abs", "wheel roller"), Some(Tag::CoreAntiExtension))]
    #[case(exercise("Dead Bug", "abs", "body weight"), Some(Tag::CoreAntiExtension))]
    #[case(exercise("Cable Woodchop", "obliques", "cable"), Some(Tag::CoreRotation))]
    #[case(exercise("Pallof Press", "abs", "band"), Some(Tag::CoreRotation))]
    #[case(exercise("Russian Twist", "abs", "body weight"), Some(Tag::CoreRotation))]
    #[case(exercise("Leg Curl", "hamstrings", "leverage machine"), None)]
    #[case(exercise("Medicine Ball Throw", "chest", "medicine ball"), None)]
    #[case(exercise("Narrow Stance Calf Raise", "calves", "body weight"), None)]
    #[case(exercise("Arrow Lateral Raise", "delts", "dumbbell"), None)]
    fn test_classify(#[case] exercise: Exercise, #[case] expected: Option<Tag>) {
        assert_eq!(classify(&exercise), expected);
    }

    #[rstest]
    #[case(with_parts(exercise("Jumping Jack", "", "body weight"), &["cardio"], &[]))]
    #[case(with_parts(exercise("Burpee Squat", "", "body weight"), &[], &["Cardiovascular System"]))]
    #[case(with_parts(exercise("Rowing Sprint", "", "rowing machine"), &["CARDIO"], &["lats"]))]
    fn test_classify_cardio_first(#[case] exercise: Exercise) {
        assert_eq!(classify(&exercise), Some(Tag::Cardio));
    }

    #[rstest]
    #[case("Overhead Squat", Tag::Squat)]
    #[case("Squat to Push Press", Tag::Squat)]
    #[case("Deadlift to Row", Tag::Hinge)]
    #[case("Lunge with Overhead Press", Tag::Lunge)]
    #[case("Overhead Carry", Tag::Carry)]
    #[case("Push Press", Tag::VerticalPush)]
    #[case("Bench Supported Row", Tag::HorizontalPush)]
    #[case("Pull-Up to Row", Tag::VerticalPull)]
    #[case("Plank Row", Tag::HorizontalPull)]
    #[case("Plank with Rotation Woodchop", Tag::CoreAntiExtension)]
    fn test_classify_priority(#[case] name: &str, #[case] expected: Tag) {
        assert_eq!(classify(&exercise(name, "", "body weight")), Some(expected));
    }

    #[test]
    fn test_rules_one_by_one() {
        let cases = [
            ("cardio", with_parts(exercise("Jog", "", ""), &["cardio"], &[])),
            ("squat", exercise("Pistol Squat", "quads", "")),
            ("hinge", exercise("Good Morning", "hamstrings", "barbell")),
            ("lunge", exercise("Reverse Lunge", "quads", "")),
            ("carry", exercise("Waiter Walk", "shoulders", "kettlebell")),
            ("vertical push", exercise("Arnold Press", "delts", "dumbbell")),
            ("horizontal push", exercise("Cable Fly", "chest", "cable")),
            ("vertical pull", exercise("Lat Pull-Down", "lats", "cable")),
            ("horizontal pull", exercise("Seated Cable Row", "upper back", "cable")),
            ("core anti-extension", exercise("Hollow Hold", "abs", "")),
            ("core rotation", exercise("Landmine Rotation", "obliques", "barbell")),
        ];

        for (rule, (name, exercise)) in RULES.iter().zip(cases) {
            assert_eq!(rule.name, name);
            assert!(rule.matches(&exercise), "{name} should match");
            assert!(
                RULES
                    .iter()
                    .take_while(|r| r.name != name)
                    .all(|r| !r.matches(&exercise)),
                "{name} should be the first match"
            );
        }
    }

    #[test]
    fn test_horizontal_pull_excludes_rowing_machine() {
        assert_eq!(
            classify(&exercise("Ergometer Row", "back", "ergometer")),
            None
        );
        assert_eq!(classify(&exercise("Row", "back", "rowing machine")), None);
        assert_eq!(
            classify(&exercise("Upright Row", "traps", "barbell")),
            Some(Tag::HorizontalPull)
        );
    }

    #[test]
    fn test_core_anti_extension_by_muscle() {
        let e = with_parts(exercise("Side Plank", "", "body weight"), &[], &["abs"]);
        assert!(RULES[9].matches(&e));
    }

    #[rstest]
    #[case(exercise("Leg Extension", "Quadriceps", "leverage machine"), Tag::Squat)]
    #[case(exercise("Leg Curl", "hamstrings", "leverage machine"), Tag::Hinge)]
    #[case(exercise("Cable Kickback", "glutes", "cable"), Tag::Hinge)]
    #[case(exercise("Crunch", "abs", "body weight"), Tag::CoreAntiExtension)]
    #[case(exercise("Lateral Raise", "delts", "dumbbell"), Tag::HorizontalPush)]
    #[case(exercise("Skull Crusher", "triceps", "ez barbell"), Tag::HorizontalPush)]
    #[case(exercise("Hammer Curl", "biceps", "dumbbell"), Tag::HorizontalPull)]
    #[case(exercise("Face Pull", "upper back", "cable"), Tag::HorizontalPull)]
    #[case(exercise("Sled Push", "", "sled"), Tag::HorizontalPush)]
    #[case(exercise("Calf Raise", "calves", "body weight"), Tag::HorizontalPull)]
    #[case(exercise("Abductor Machine", "abductors", "leverage machine"), Tag::HorizontalPull)]
    fn test_fallback_tag(#[case] exercise: Exercise, #[case] expected: Tag) {
        assert_eq!(fallback_tag(&exercise), expected);
        assert_eq!(assign_tag(&exercise), expected);
    }

    #[test]
    fn test_fallback_uses_target_muscles() {
        let e = with_parts(exercise("Machine Fly", "", "leverage machine"), &[], &["pectorals"]);
        assert_eq!(fallback_tag(&e), Tag::HorizontalPush);
    }

    #[rstest]
    #[case(exercise("Barbell Back Squat", "quads", "barbell"), Tag::Squat, true)]
    #[case(exercise("Barbell Bench Press", "chest", "barbell"), Tag::HorizontalPush, true)]
    #[case(exercise("Dumbbell Fly", "chest", "dumbbell"), Tag::HorizontalPush, false)]
    #[case(exercise("Overhead Triceps Extension", "triceps", "dumbbell"), Tag::VerticalPush, false)]
    #[case(exercise("Lateral Raise", "delts", "dumbbell"), Tag::HorizontalPush, false)]
    #[case(exercise("Walking Lunge", "quads", "dumbbell"), Tag::Lunge, false)]
    #[case(exercise("Front Plank", "abs", "body weight"), Tag::CoreAntiExtension, false)]
    fn test_is_compound(#[case] exercise: Exercise, #[case] tag: Tag, #[case] expected: bool) {
        assert_eq!(assign_tag(&exercise), tag);
        assert_eq!(is_compound(&exercise, tag), expected);
    }

    #[test]
    fn test_tag_exercise_replaces_tags() {
        let mut e = exercise("Pendlay Row", "upper back", "barbell");
        e.tags = vec![Tag::Cardio, Tag::Hinge];
        let tagged = tag_exercise(e);
        assert_eq!(tagged.tags, vec![Tag::HorizontalPull]);
        assert!(tagged.is_compound);
    }

    #[test]
    fn test_tag_catalog() {
        let (tagged, summary) = tag_catalog(vec![
            exercise("Barbell Back Squat", "quads", "barbell"),
            exercise("Leg Extension", "quads", "leverage machine"),
            exercise("Front Plank", "abs", "body weight"),
            exercise("Calf Raise", "calves", "body weight"),
        ]);

        assert_eq!(
            tagged.iter().map(|e| e.tags.clone()).collect::<Vec<_>>(),
            vec![
                vec![Tag::Squat],
                vec![Tag::Squat],
                vec![Tag::CoreAntiExtension],
                vec![Tag::HorizontalPull]
            ]
        );
        assert_eq!(
            summary,
            TagSummary {
                tags: BTreeMap::from([
                    (Tag::Squat, 2),
                    (Tag::HorizontalPull, 1),
                    (Tag::CoreAntiExtension, 1)
                ]),
                fallback: 2,
                compound: 1,
            }
        );
        assert_eq!(
            tagged,
            vec![
                tag_exercise(exercise("Barbell Back Squat", "quads", "barbell")),
                tag_exercise(exercise("Leg Extension", "quads", "leverage machine")),
                tag_exercise(exercise("Front Plank", "abs", "body weight")),
                tag_exercise(exercise("Calf Raise", "calves", "body weight")),
            ]
        );
    }
}
