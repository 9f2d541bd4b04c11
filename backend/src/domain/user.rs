//! User identity and membership types.
//!
//! Users are created by the external identity provider on first
//! authentication; this core only reads them and mutates their
//! organization binding when they create or join an organization.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque caller identity reference issued by the external identity provider.
///
/// The inner value is not a UUID; identity providers use their own id
/// formats, so the only structural requirement is non-emptiness.
///
/// # Examples
/// ```
/// use statuspage::domain::UserId;
///
/// let id = UserId::new("user_2x9Y").expect("non-empty id");
/// assert_eq!(id.as_ref(), "user_2x9Y");
/// assert!(UserId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(String);

/// Validation error raised by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdValidationError {
    /// The identity reference was empty or whitespace.
    #[error("user id must not be empty")]
    Empty,
}

impl UserId {
    /// Validate and wrap an external identity reference.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a user holds within their organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created the organization.
    Owner,
    /// Joined an existing organization through a team.
    Member,
}

impl Role {
    /// Stable lowercase identifier used in persistence and payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            other => Err(ParseRoleError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Error raised when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct ParseRoleError {
    /// The rejected input.
    pub value: String,
}

/// A user record bound to an external identity.
///
/// Membership is strictly single-tenant: at most one organization and at
/// most one team, both optional until the user creates or joins an
/// organization.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// External identity reference.
    pub id: UserId,
    /// Display name supplied by the identity provider.
    pub display_name: String,
    /// Email supplied by the identity provider.
    pub email: String,
    /// Role within the organization; unset until membership is bound.
    pub role: Option<Role>,
    /// Owning organization, if any.
    pub organization_id: Option<Uuid>,
    /// Team the user joined through, if any.
    pub team_id: Option<Uuid>,
}

impl User {
    /// Whether the user currently belongs to an organization.
    pub fn is_member(&self) -> bool {
        self.organization_id.is_some()
    }
}
