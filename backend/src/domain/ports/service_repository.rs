//! Port for service persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::service::{Service, ServiceStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by service repository adapters.
    pub enum ServiceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "service repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "service repository query failed: {message}",
    }
}

/// Row staged by a service create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    /// Service name as shown on the status page.
    pub name: String,
    /// Initial status; the registry always seeds `Operational`.
    pub status: ServiceStatus,
    /// Owning organization.
    pub organization_id: Uuid,
}

/// Port for reading and mutating services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// All services of an organization.
    async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Service>, ServiceRepositoryError>;

    /// Insert a new service.
    async fn insert(&self, new_service: &NewService) -> Result<Service, ServiceRepositoryError>;

    /// Find a service by primary id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, ServiceRepositoryError>;

    /// Overwrite a service's status. Any status may move to any other.
    async fn set_status(
        &self,
        id: Uuid,
        status: ServiceStatus,
    ) -> Result<Service, ServiceRepositoryError>;
}

/// Fixture implementation for tests that do not exercise services.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureServiceRepository;

#[async_trait]
impl ServiceRepository for FixtureServiceRepository {
    async fn list_for_organization(
        &self,
        _organization_id: Uuid,
    ) -> Result<Vec<Service>, ServiceRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, new_service: &NewService) -> Result<Service, ServiceRepositoryError> {
        Ok(Service {
            id: Uuid::nil(),
            name: new_service.name.clone(),
            status: new_service.status,
            organization_id: new_service.organization_id,
        })
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Service>, ServiceRepositoryError> {
        Ok(None)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ServiceStatus,
    ) -> Result<Service, ServiceRepositoryError> {
        Ok(Service {
            id,
            name: String::new(),
            status,
            organization_id: Uuid::nil(),
        })
    }
}
