use std::slice::Iter;

/// Canonical movement pattern of an exercise.
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
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Tag {
    Squat,
    Hinge,
    Lunge,
    Carry,
    HorizontalPush,
    VerticalPush,
    HorizontalPull,
    VerticalPull,
    CoreAntiExtension,
    CoreRotation,
    Cardio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TagGroup {
    Pattern,
    Core,
    Meta,
}

impl Tag {
    pub fn iter() -> Iter<'static, Tag> {
        static TAGS: [Tag; 11] = [
            Tag::Squat,
            Tag::Hinge,
            Tag::Lunge,
            Tag::Carry,
            Tag::HorizontalPush,
            Tag::VerticalPush,
            Tag::HorizontalPull,
            Tag::VerticalPull,
            Tag::CoreAntiExtension,
            Tag::CoreRotation,
            Tag::Cardio,
        ];
        TAGS.iter()
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tag::Squat => "Squat",
            Tag::Hinge => "Hinge",
            Tag::Lunge => "Lunge",
            Tag::Carry => "Carry",
            Tag::HorizontalPush => "Horizontal Push",
            Tag::VerticalPush => "Vertical Push",
            Tag::HorizontalPull => "Horizontal Pull",
            Tag::VerticalPull => "Vertical Pull",
            Tag::CoreAntiExtension => "Core Anti-Extension",
            Tag::CoreRotation => "Core Rotation",
            Tag::Cardio => "Cardio",
        }
    }

    #[must_use]
    pub fn group(self) -> TagGroup {
        match self {
            Tag::Squat
            | Tag::Hinge
            | Tag::Lunge
            | Tag::Carry
            | Tag::HorizontalPush
            | Tag::VerticalPush
            | Tag::HorizontalPull
            | Tag::VerticalPull => TagGroup::Pattern,
            Tag::CoreAntiExtension | Tag::CoreRotation => TagGroup::Core,
            Tag::Cardio => TagGroup::Meta,
        }
    }

    /// Whether exercises of this pattern can count as compound movements.
    #[must_use]
    pub fn is_compound_pattern(self) -> bool {
        matches!(
            self,
            Tag::Squat
                | Tag::Hinge
                | Tag::HorizontalPush
                | Tag::VerticalPush
                | Tag::HorizontalPull
                | Tag::VerticalPull
        )
    }
}
