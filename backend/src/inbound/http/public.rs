//! Public, unauthenticated status handlers.
//!
//! ```text
//! GET /api/v1/public/organizations
//! GET /api/v1/public/organizations/{slug}
//! ```
//!
//! Viewers poll these on a short cadence; both endpoints are strictly
//! read-only.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, Slug};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{IncidentBody, OrganizationBody, ServiceBody};
use crate::inbound::http::state::HttpState;

/// Everything a public status page needs for one organization.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBundleResponseBody {
    /// The organization looked up by slug.
    pub organization: OrganizationBody,
    /// Its services with current statuses.
    pub services: Vec<ServiceBody>,
    /// Severity-ranked summary, e.g. `Partial Outage` or `Unknown`.
    pub overall_status: String,
    /// Open incidents, most recent first.
    pub open_incidents: Vec<IncidentBody>,
    /// Closed incidents, most recent first.
    pub closed_incidents: Vec<IncidentBody>,
}

/// Public directory of all organizations.
#[utoipa::path(
    get,
    path = "/api/v1/public/organizations",
    responses(
        (status = 200, description = "All organizations", body = [OrganizationBody])
    ),
    tags = ["public"],
    operation_id = "listPublicOrganizations",
    security(())
)]
#[get("/public/organizations")]
pub async fn list_public_organizations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<OrganizationBody>>> {
    let organizations = state.public_status.list_organizations().await?;
    Ok(web::Json(
        organizations.into_iter().map(OrganizationBody::from).collect(),
    ))
}

/// Public status bundle for one organization.
#[utoipa::path(
    get,
    path = "/api/v1/public/organizations/{slug}",
    params(("slug", description = "Organization slug")),
    responses(
        (status = 200, description = "Status bundle", body = StatusBundleResponseBody),
        (status = 404, description = "Organization not found", body = Error)
    ),
    tags = ["public"],
    operation_id = "publicStatusBundle",
    security(())
)]
#[get("/public/organizations/{slug}")]
pub async fn public_status_bundle(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StatusBundleResponseBody>> {
    // A string that cannot be a slug cannot name an organization.
    let slug =
        Slug::new(path.into_inner()).map_err(|_| Error::not_found("Organization not found"))?;
    let bundle = state.public_status.organization_bundle(&slug).await?;

    Ok(web::Json(StatusBundleResponseBody {
        organization: OrganizationBody::from(bundle.organization),
        services: bundle.services.into_iter().map(ServiceBody::from).collect(),
        overall_status: bundle.overall.as_str().to_owned(),
        open_incidents: bundle
            .open_incidents
            .into_iter()
            .map(IncidentBody::from)
            .collect(),
        closed_incidents: bundle
            .closed_incidents
            .into_iter()
            .map(IncidentBody::from)
            .collect(),
    }))
}
