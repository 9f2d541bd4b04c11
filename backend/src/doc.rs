//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: all paths from the inbound layer, the shared payload
//! schemas, and the session cookie security scheme. Swagger UI serves the
//! generated document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::dto::{
    IncidentBody, OrganizationBody, ServiceBody, TeamBody, UserBody,
};
use crate::inbound::http::incidents::{CreateIncidentRequestBody, IncidentBoardResponseBody};
use crate::inbound::http::membership::{
    CreateOrganizationRequestBody, CreateOrganizationResponseBody, JoinOrganizationRequestBody,
    JoinOrganizationResponseBody, MembershipStatusResponseBody,
};
use crate::inbound::http::public::StatusBundleResponseBody;
use crate::inbound::http::services::{CreateServiceRequestBody, SetServiceStatusRequestBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Status page backend API",
        description = "Multi-tenant status pages: organizations, services, \
                       incidents, and the public aggregated view."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::membership::create_organization,
        crate::inbound::http::membership::join_organization,
        crate::inbound::http::membership::membership_status,
        crate::inbound::http::membership::current_user,
        crate::inbound::http::services::list_services,
        crate::inbound::http::services::create_service,
        crate::inbound::http::services::set_service_status,
        crate::inbound::http::incidents::list_incidents,
        crate::inbound::http::incidents::create_incident,
        crate::inbound::http::incidents::close_incident,
        crate::inbound::http::public::list_public_organizations,
        crate::inbound::http::public::public_status_bundle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        OrganizationBody,
        TeamBody,
        ServiceBody,
        IncidentBody,
        UserBody,
        CreateOrganizationRequestBody,
        CreateOrganizationResponseBody,
        JoinOrganizationRequestBody,
        JoinOrganizationResponseBody,
        MembershipStatusResponseBody,
        CreateServiceRequestBody,
        SetServiceStatusRequestBody,
        CreateIncidentRequestBody,
        IncidentBoardResponseBody,
        StatusBundleResponseBody,
    )),
    tags(
        (name = "organizations", description = "Organization membership operations"),
        (name = "services", description = "Service registry operations"),
        (name = "incidents", description = "Incident lifecycle operations"),
        (name = "public", description = "Unauthenticated status-page views"),
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
