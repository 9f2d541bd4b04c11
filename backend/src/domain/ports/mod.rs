//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod incident_lifecycle;
mod incident_repository;
mod membership;
mod organization_repository;
mod public_status;
mod service_registry;
mod service_repository;
mod user_repository;

#[cfg(test)]
pub use incident_lifecycle::MockIncidentLifecycle;
pub use incident_lifecycle::{CreateIncidentRequest, FixtureIncidentLifecycle, IncidentLifecycle};
#[cfg(test)]
pub use incident_repository::MockIncidentRepository;
pub use incident_repository::{
    CloseOutcome, FixtureIncidentRepository, IncidentRepository, IncidentRepositoryError,
    NewIncident,
};
#[cfg(test)]
pub use membership::{MockMembershipCommand, MockMembershipQuery};
pub use membership::{
    CreateOrganizationRequest, CreateOrganizationResponse, FixtureMembership,
    JoinOrganizationRequest, JoinOrganizationResponse, MembershipCommand, MembershipQuery,
    MembershipStatus,
};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::{
    FixtureOrganizationRepository, NewOrganization, OrganizationRepository,
    OrganizationRepositoryError,
};
#[cfg(test)]
pub use public_status::MockPublicStatusQuery;
pub use public_status::{FixturePublicStatusQuery, PublicStatusQuery, StatusBundle};
#[cfg(test)]
pub use service_registry::MockServiceRegistry;
pub use service_registry::{
    CreateServiceRequest, FixtureServiceRegistry, ServiceRegistry, SetServiceStatusRequest,
};
#[cfg(test)]
pub use service_repository::MockServiceRepository;
pub use service_repository::{
    FixtureServiceRepository, NewService, ServiceRepository, ServiceRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, MembershipBinding, UserRepository, UserRepositoryError,
};
