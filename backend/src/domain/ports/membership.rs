//! Driving ports for organization membership: create, join, and lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::organization::{Organization, Slug, Team};
use crate::domain::user::{User, UserId};

/// Request payload for the atomic organization create.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrganizationRequest {
    /// Authenticated caller; becomes the owner.
    pub caller: UserId,
    /// Organization name.
    pub name: String,
    /// Requested slug, validated before use.
    pub slug: String,
    /// Initial service names; must be non-empty.
    pub services: Vec<String>,
    /// Initial team names; must be non-empty.
    pub teams: Vec<String>,
}

/// Response payload for a successful organization create.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrganizationResponse {
    /// Identifier of the created organization.
    pub organization_id: Uuid,
    /// The slug it is reachable under.
    pub slug: Slug,
}

/// Request payload for joining an existing organization.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOrganizationRequest {
    /// Authenticated caller; must not already belong to an organization.
    pub caller: UserId,
    /// Organization name; must match together with the slug.
    pub name: String,
    /// Organization slug; must match together with the name.
    pub slug: String,
    /// Exact (case-sensitive) team name within the organization.
    pub team_name: String,
}

/// Response payload for a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOrganizationResponse {
    /// The organization the caller was bound to.
    pub organization: Organization,
    /// The team the caller joined through.
    pub team: Team,
}

/// The caller's current organization binding, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipStatus {
    /// The bound organization; `None` while the caller is organization-less.
    pub organization: Option<Organization>,
}

/// Driving port for membership mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Create an organization with initial teams and services; the caller
    /// becomes its owner. Atomic: all rows commit together or none do.
    async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<CreateOrganizationResponse, Error>;

    /// Admit the caller into an existing organization through a team.
    async fn join_organization(
        &self,
        request: JoinOrganizationRequest,
    ) -> Result<JoinOrganizationResponse, Error>;
}

/// Driving port for membership reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipQuery: Send + Sync {
    /// The caller's organization binding, used for onboarding redirects.
    async fn membership_status(&self, caller: &UserId) -> Result<MembershipStatus, Error>;

    /// The caller's full user record.
    async fn current_user(&self, caller: &UserId) -> Result<User, Error>;
}

/// Fixture implementation returning canned responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembership;

#[async_trait]
impl MembershipCommand for FixtureMembership {
    async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<CreateOrganizationResponse, Error> {
        let slug = Slug::new(request.slug)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(CreateOrganizationResponse {
            organization_id: Uuid::nil(),
            slug,
        })
    }

    async fn join_organization(
        &self,
        _request: JoinOrganizationRequest,
    ) -> Result<JoinOrganizationResponse, Error> {
        Err(Error::not_found(
            "Organization not found. Please check the name and slug.",
        ))
    }
}

#[async_trait]
impl MembershipQuery for FixtureMembership {
    async fn membership_status(&self, _caller: &UserId) -> Result<MembershipStatus, Error> {
        Ok(MembershipStatus { organization: None })
    }

    async fn current_user(&self, _caller: &UserId) -> Result<User, Error> {
        Err(Error::not_found("User not found"))
    }
}
