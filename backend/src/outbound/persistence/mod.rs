//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters translating between Diesel rows and domain types; no
//! business logic lives here. Row structs (`models.rs`) and the schema
//! (`schema.rs`) stay internal to this module. Connections come from a
//! `bb8` pool with native async support through `diesel-async`.

mod diesel_incident_repository;
mod diesel_organization_repository;
mod diesel_service_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_incident_repository::DieselIncidentRepository;
pub use diesel_organization_repository::DieselOrganizationRepository;
pub use diesel_service_repository::DieselServiceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
