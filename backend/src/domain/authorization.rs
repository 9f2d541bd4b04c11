//! Named authorization predicates evaluated before mutations.
//!
//! Cross-entity ownership checks are explicit, testable units rather than
//! inline comparisons scattered across call sites. The distinction between
//! "not found" and "not yours" is deliberate and surfaced as different
//! error codes.

use uuid::Uuid;

use super::error::Error;
use super::user::User;

/// Whether an entity belongs to the caller's organization.
pub fn same_organization(entity_organization: Uuid, caller_organization: Uuid) -> bool {
    entity_organization == caller_organization
}

/// Fail with [`Error::forbidden`] when the entity belongs to another
/// organization than the caller's.
pub fn ensure_same_organization(
    entity_organization: Uuid,
    caller_organization: Uuid,
    entity: &str,
) -> Result<(), Error> {
    if same_organization(entity_organization, caller_organization) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "Not permitted to update this {entity}"
        )))
    }
}

/// The caller's organization id, or [`Error::not_found`] when the user is
/// not part of any organization.
pub fn require_organization(user: &User) -> Result<Uuid, Error> {
    user.organization_id
        .ok_or_else(|| Error::not_found("User not found or not part of an organization"))
}
