//! Domain layer: entities, errors, ports, and the services implementing
//! the driving ports.
//!
//! Nothing in this layer touches HTTP or the database. Inbound adapters
//! call the driving ports ([`ports::MembershipCommand`],
//! [`ports::ServiceRegistry`], [`ports::IncidentLifecycle`],
//! [`ports::PublicStatusQuery`]); outbound adapters implement the driven
//! repository ports.

pub mod authorization;
pub mod error;
pub mod incident;
pub mod organization;
pub mod ports;
pub mod service;
pub mod status;
pub mod user;

mod incident_service;
mod membership_service;
mod public_status_service;
mod service_registry_service;

pub use error::{Error, ErrorCode};
pub use incident::{Incident, IncidentBoard};
pub use incident_service::IncidentService;
pub use membership_service::MembershipService;
pub use organization::{Organization, Slug, SlugValidationError, Team};
pub use public_status_service::PublicStatusService;
pub use service::{Service, ServiceStatus};
pub use service_registry_service::ServiceRegistryService;
pub use status::{OverallStatus, overall_status};
pub use user::{Role, User, UserId};
