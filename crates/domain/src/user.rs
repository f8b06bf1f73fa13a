use std::collections::BTreeSet;

use derive_more::{Deref, Display};

use crate::ReadError;

#[allow(async_fn_in_trait)]
pub trait IdentityRepository {
    /// Resolves the user behind a bearer token.
    async fn read_current_user(&self, token: &Token) -> Result<User, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub roles: BTreeSet<Role>,
}

impl User {
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Owners, coaches and admins may look at a plan.
    #[must_use]
    pub fn can_read(&self, owner: UserID) -> bool {
        self.id == owner || self.has_role(Role::Coach) || self.has_role(Role::Admin)
    }

    /// Only owners and admins may change or delete a plan.
    #[must_use]
    pub fn can_modify(&self, owner: UserID) -> bool {
        self.id == owner || self.has_role(Role::Admin)
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(u64);

impl From<u64> for UserID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Member,
    Coach,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn new(token: &str) -> Self {
        let token = token.trim();
        Self(
            token
                .strip_prefix("Bearer ")
                .unwrap_or(token)
                .trim()
                .to_string(),
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
