//! HTTP inbound adapter exposing REST endpoints.

pub mod dto;
pub mod error;
pub mod health;
pub mod incidents;
pub mod membership;
pub mod public;
pub mod services;
pub mod session;
pub mod state;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the versioned API surface on a service config.
///
/// `HttpState` must be supplied separately via `web::Data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(membership::create_organization)
            .service(membership::join_organization)
            .service(membership::membership_status)
            .service(membership::current_user)
            .service(services::list_services)
            .service(services::create_service)
            .service(services::set_service_status)
            .service(incidents::list_incidents)
            .service(incidents::create_incident)
            .service(incidents::close_incident)
            .service(public::list_public_organizations)
            .service(public::public_status_bundle),
    );
}
