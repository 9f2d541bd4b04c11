//! Driving port for the organization-scoped service registry.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::service::{Service, ServiceStatus};
use crate::domain::user::UserId;

/// Request payload for creating a service.
///
/// There is deliberately no status field: callers cannot set an initial
/// status; every service starts `Operational`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateServiceRequest {
    /// Service name.
    pub name: String,
}

/// Request payload for overwriting a service's status.
#[derive(Debug, Clone, PartialEq)]
pub struct SetServiceStatusRequest {
    /// Target service.
    pub service_id: Uuid,
    /// New status; already parsed into the closed enum at the boundary.
    pub status: ServiceStatus,
}

/// Driving port for service reads and mutations, scoped to the caller's
/// organization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// All services of the caller's organization.
    async fn list_services(&self, caller: &UserId) -> Result<Vec<Service>, Error>;

    /// Create a service in the caller's organization, seeded `Operational`.
    async fn create_service(
        &self,
        caller: &UserId,
        request: CreateServiceRequest,
    ) -> Result<Service, Error>;

    /// Overwrite a service's status after ownership checks.
    async fn set_service_status(
        &self,
        caller: &UserId,
        request: SetServiceStatusRequest,
    ) -> Result<Service, Error>;
}

/// Fixture implementation for wiring without a backing store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureServiceRegistry;

#[async_trait]
impl ServiceRegistry for FixtureServiceRegistry {
    async fn list_services(&self, _caller: &UserId) -> Result<Vec<Service>, Error> {
        Ok(Vec::new())
    }

    async fn create_service(
        &self,
        _caller: &UserId,
        request: CreateServiceRequest,
    ) -> Result<Service, Error> {
        Ok(Service {
            id: Uuid::nil(),
            name: request.name,
            status: ServiceStatus::Operational,
            organization_id: Uuid::nil(),
        })
    }

    async fn set_service_status(
        &self,
        _caller: &UserId,
        _request: SetServiceStatusRequest,
    ) -> Result<Service, Error> {
        Err(Error::not_found("Service not found"))
    }
}
