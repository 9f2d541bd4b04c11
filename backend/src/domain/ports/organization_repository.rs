//! Port for organization persistence, including the transactional
//! multi-row create.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::organization::{Organization, Slug, Team};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by organization repository adapters.
    pub enum OrganizationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "organization repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "organization repository query failed: {message}",
        /// The slug unique constraint rejected the insert. Raised when a
        /// concurrent create wins the race after the pre-insert check.
        DuplicateSlug { slug: String } =>
            "organization slug already exists: {slug}",
    }
}

/// All rows staged by the atomic organization create.
///
/// The adapter must commit the organization, the owner's membership
/// binding, one team per name, and one service per name as a single
/// transaction; no partial organization state may ever be observable.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrganization {
    /// Unique human-readable name.
    pub name: String,
    /// Unique URL-safe lookup key.
    pub slug: Slug,
    /// The creating user; bound with role `owner`.
    pub owner: UserId,
    /// Team names to create, one row each.
    pub teams: Vec<String>,
    /// Service names to create, one row each, seeded `Operational`.
    pub services: Vec<String>,
}

/// Port for reading and creating organizations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Find an organization by primary id.
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// Find an organization by its public slug.
    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// Find an organization matching both name and slug.
    ///
    /// The double-key lookup backs the join-organization contract; slug
    /// alone is deliberately not sufficient there.
    async fn find_by_name_and_slug(
        &self,
        name: &str,
        slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// All teams of an organization.
    async fn list_teams(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Team>, OrganizationRepositoryError>;

    /// All organizations, for the public directory.
    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationRepositoryError>;

    /// Atomically create an organization with its owner binding, teams,
    /// and services. All rows commit together or none do.
    async fn create(
        &self,
        new_organization: &NewOrganization,
    ) -> Result<Organization, OrganizationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise organizations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrganizationRepository;

#[async_trait]
impl OrganizationRepository for FixtureOrganizationRepository {
    async fn find_by_id(
        &self,
        _id: Uuid,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(None)
    }

    async fn find_by_slug(
        &self,
        _slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(None)
    }

    async fn find_by_name_and_slug(
        &self,
        _name: &str,
        _slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(None)
    }

    async fn list_teams(
        &self,
        _organization_id: Uuid,
    ) -> Result<Vec<Team>, OrganizationRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        new_organization: &NewOrganization,
    ) -> Result<Organization, OrganizationRepositoryError> {
        Ok(Organization {
            id: Uuid::nil(),
            name: new_organization.name.clone(),
            slug: new_organization.slug.clone(),
            created_at: chrono::Utc::now(),
        })
    }
}
