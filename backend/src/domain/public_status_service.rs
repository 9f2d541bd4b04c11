//! Public status domain service: unauthenticated, read-only views over
//! organizations, services, and incidents.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::incident::IncidentBoard;
use crate::domain::organization::{Organization, Slug};
use crate::domain::ports::{
    IncidentRepository, IncidentRepositoryError, OrganizationRepository,
    OrganizationRepositoryError, PublicStatusQuery, ServiceRepository, ServiceRepositoryError,
    StatusBundle,
};
use crate::domain::status::overall_status;

/// Implements [`PublicStatusQuery`] over the organization, service, and
/// incident repositories. Strictly read-only.
#[derive(Clone)]
pub struct PublicStatusService<O, S, I> {
    organizations: Arc<O>,
    services: Arc<S>,
    incidents: Arc<I>,
}

impl<O, S, I> PublicStatusService<O, S, I> {
    /// Create a new public status service.
    pub fn new(organizations: Arc<O>, services: Arc<S>, incidents: Arc<I>) -> Self {
        Self {
            organizations,
            services,
            incidents,
        }
    }
}

fn map_organization_error(error: OrganizationRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_service_error(error: ServiceRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_incident_error(error: IncidentRepositoryError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl<O, S, I> PublicStatusQuery for PublicStatusService<O, S, I>
where
    O: OrganizationRepository,
    S: ServiceRepository,
    I: IncidentRepository,
{
    async fn organization_bundle(&self, slug: &Slug) -> Result<StatusBundle, Error> {
        let organization = self
            .organizations
            .find_by_slug(slug)
            .await
            .map_err(map_organization_error)?
            .ok_or_else(|| Error::not_found("Organization not found"))?;

        let services = self
            .services
            .list_for_organization(organization.id)
            .await
            .map_err(map_service_error)?;
        // Derived per request, never stored.
        let overall = overall_status(services.iter().map(|service| service.status));

        let incidents = self
            .incidents
            .list_for_organization(organization.id)
            .await
            .map_err(map_incident_error)?;
        let board = IncidentBoard::partition(incidents);

        Ok(StatusBundle {
            organization,
            services,
            overall,
            open_incidents: board.open,
            closed_incidents: board.closed,
        })
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        self.organizations
            .list_all()
            .await
            .map_err(map_organization_error)
    }
}
