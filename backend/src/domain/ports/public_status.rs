//! Driving port for the unauthenticated public status surface.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::incident::Incident;
use crate::domain::organization::{Organization, Slug};
use crate::domain::service::Service;
use crate::domain::status::OverallStatus;

/// Everything a public status page needs for one organization.
///
/// `overall` is derived from the service statuses at read time; it is
/// never stored. Viewers poll this bundle on a short cadence, so
/// producing it must stay side-effect-free.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBundle {
    /// The organization looked up by slug.
    pub organization: Organization,
    /// Its services with current statuses.
    pub services: Vec<Service>,
    /// Severity-ranked summary of the services.
    pub overall: OverallStatus,
    /// Open incidents, most recent first.
    pub open_incidents: Vec<Incident>,
    /// Closed incidents, most recent first.
    pub closed_incidents: Vec<Incident>,
}

/// Driving port for public, unauthenticated reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicStatusQuery: Send + Sync {
    /// The status bundle for the organization behind `slug`.
    async fn organization_bundle(&self, slug: &Slug) -> Result<StatusBundle, Error>;

    /// All organizations, for the public directory.
    async fn list_organizations(&self) -> Result<Vec<Organization>, Error>;
}

/// Fixture implementation for wiring without a backing store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePublicStatusQuery;

#[async_trait]
impl PublicStatusQuery for FixturePublicStatusQuery {
    async fn organization_bundle(&self, _slug: &Slug) -> Result<StatusBundle, Error> {
        Err(Error::not_found("Organization not found"))
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        Ok(Vec::new())
    }
}
