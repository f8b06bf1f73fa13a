use derive_more::{AsRef, Display};

/// Display name of a training day or workout.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LENGTH: usize = 48;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let normalized_name = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = normalized_name.chars().count();

        if len > Self::MAX_LENGTH {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(normalized_name))
    }

    /// For compiled-in names that are known to be valid.
    pub(crate) fn from_static(name: &'static str) -> Self {
        Name(name.to_string())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name must be {max} characters or fewer ({0} > {max})", max = Name::MAX_LENGTH)]
    TooLong(usize),
}
