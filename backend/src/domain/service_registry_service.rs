//! Service registry domain service: listing, creation, and status
//! overwrites scoped to the caller's organization.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::authorization::{ensure_same_organization, require_organization};
use crate::domain::error::Error;
use crate::domain::ports::{
    CreateServiceRequest, NewService, ServiceRegistry, ServiceRepository, ServiceRepositoryError,
    SetServiceStatusRequest, UserRepository, UserRepositoryError,
};
use crate::domain::service::{Service, ServiceStatus};
use crate::domain::user::{User, UserId};

/// Implements [`ServiceRegistry`] over the user and service repositories.
#[derive(Clone)]
pub struct ServiceRegistryService<U, S> {
    users: Arc<U>,
    services: Arc<S>,
}

impl<U, S> ServiceRegistryService<U, S> {
    /// Create a new service registry service.
    pub fn new(users: Arc<U>, services: Arc<S>) -> Self {
        Self { users, services }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_service_error(error: ServiceRepositoryError) -> Error {
    Error::internal(error.to_string())
}

impl<U, S> ServiceRegistryService<U, S>
where
    U: UserRepository,
    S: ServiceRepository,
{
    /// Resolve the caller to their organization binding.
    async fn require_member(&self, caller: &UserId) -> Result<Uuid, Error> {
        let user: User = self
            .users
            .find_by_id(caller)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found or not part of an organization"))?;
        require_organization(&user)
    }
}

#[async_trait]
impl<U, S> ServiceRegistry for ServiceRegistryService<U, S>
where
    U: UserRepository,
    S: ServiceRepository,
{
    async fn list_services(&self, caller: &UserId) -> Result<Vec<Service>, Error> {
        let organization_id = self.require_member(caller).await?;
        self.services
            .list_for_organization(organization_id)
            .await
            .map_err(map_service_error)
    }

    async fn create_service(
        &self,
        caller: &UserId,
        request: CreateServiceRequest,
    ) -> Result<Service, Error> {
        let name = request.name.trim().to_owned();
        if name.is_empty() {
            return Err(Error::invalid_request("Service name is required"));
        }
        let organization_id = self.require_member(caller).await?;

        // Initial status is never caller-supplied.
        let created = self
            .services
            .insert(&NewService {
                name,
                status: ServiceStatus::Operational,
                organization_id,
            })
            .await
            .map_err(map_service_error)?;

        info!(
            service = %created.id,
            organization = %organization_id,
            "service created"
        );
        Ok(created)
    }

    async fn set_service_status(
        &self,
        caller: &UserId,
        request: SetServiceStatusRequest,
    ) -> Result<Service, Error> {
        let organization_id = self.require_member(caller).await?;

        // Existence is checked before ownership so a missing service is
        // not_found while someone else's service is forbidden.
        let service = self
            .services
            .find_by_id(request.service_id)
            .await
            .map_err(map_service_error)?
            .ok_or_else(|| Error::not_found("Service not found"))?;
        ensure_same_organization(service.organization_id, organization_id, "service")?;

        let updated = self
            .services
            .set_status(request.service_id, request.status)
            .await
            .map_err(map_service_error)?;

        info!(
            service = %updated.id,
            organization = %organization_id,
            status = %updated.status,
            "service status updated"
        );
        Ok(updated)
    }
}
