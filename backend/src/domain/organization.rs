//! Organization and team aggregates.
//!
//! The organization is the root aggregate: teams, services, and incidents
//! are owned by exactly one organization and never move. The slug is the
//! only public lookup key and is immutable once set.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// URL-safe unique identifier for an organization.
///
/// Slugs are lowercase ASCII letters, digits, and hyphens. They are
/// globally unique and used verbatim in public status-page URLs.
///
/// # Examples
/// ```
/// use statuspage::domain::Slug;
///
/// let slug = Slug::new("acme-status").expect("valid slug");
/// assert_eq!(slug.as_str(), "acme-status");
/// assert!(Slug::new("Not A Slug").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Slug(String);

/// Validation errors raised by [`Slug::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// The slug was empty or whitespace.
    #[error("slug must not be empty")]
    Empty,
    /// The slug contained a character outside `[a-z0-9-]`.
    #[error("slug must contain only lowercase letters, digits, and hyphens")]
    InvalidCharacter,
}

impl Slug {
    /// Validate and wrap a slug.
    pub fn new(raw: impl Into<String>) -> Result<Self, SlugValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugValidationError::InvalidCharacter);
        }
        Ok(Self(raw))
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An organization publishing a status page.
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    /// Primary identifier.
    pub id: Uuid,
    /// Human-readable name, unique across organizations.
    pub name: String,
    /// Public lookup key; immutable once set.
    pub slug: Slug,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A team within an organization.
///
/// Teams exist only to gate membership admission; they carry no further
/// behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    /// Primary identifier.
    pub id: Uuid,
    /// Team name, unique within the organization.
    pub name: String,
    /// Owning organization.
    pub organization_id: Uuid,
}
