//! Membership HTTP handlers.
//!
//! ```text
//! POST /api/v1/organizations
//! POST /api/v1/organizations/join
//! GET  /api/v1/organizations/membership
//! GET  /api/v1/users/me
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{CreateOrganizationRequest, JoinOrganizationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{OrganizationBody, TeamBody, UserBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request payload for creating an organization.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequestBody {
    /// Organization name.
    pub name: String,
    /// Requested URL-safe slug.
    pub slug: String,
    /// Initial service names.
    pub services: Vec<String>,
    /// Initial team names.
    pub teams: Vec<String>,
}

/// Response payload for a successful organization create.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationResponseBody {
    /// Identifier of the created organization.
    #[schema(format = "uuid")]
    pub organization_id: String,
    /// The slug it is reachable under.
    pub slug: String,
}

/// Request payload for joining an organization.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinOrganizationRequestBody {
    /// Organization name; must match together with the slug.
    pub name: String,
    /// Organization slug; must match together with the name.
    pub slug: String,
    /// Exact team name within the organization.
    pub team_name: String,
}

/// Response payload for a successful join.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinOrganizationResponseBody {
    /// The organization the caller was bound to.
    pub organization: OrganizationBody,
    /// The team the caller joined through.
    pub team: TeamBody,
}

/// Response payload for the membership check.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatusResponseBody {
    /// Whether the caller belongs to an organization.
    pub has_organization: bool,
    /// The bound organization, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationBody>,
}

/// Create an organization; the caller becomes its owner.
#[utoipa::path(
    post,
    path = "/api/v1/organizations",
    request_body = CreateOrganizationRequestBody,
    responses(
        (status = 200, description = "Organization created", body = CreateOrganizationResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "Slug already taken", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "createOrganization",
    security(("SessionCookie" = []))
)]
#[post("/organizations")]
pub async fn create_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrganizationRequestBody>,
) -> ApiResult<web::Json<CreateOrganizationResponseBody>> {
    let caller = session.require_user_id()?;
    let body = payload.into_inner();

    let response = state
        .membership
        .create_organization(CreateOrganizationRequest {
            caller,
            name: body.name,
            slug: body.slug,
            services: body.services,
            teams: body.teams,
        })
        .await?;

    Ok(web::Json(CreateOrganizationResponseBody {
        organization_id: response.organization_id.to_string(),
        slug: response.slug.to_string(),
    }))
}

/// Join an existing organization through one of its teams.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/join",
    request_body = JoinOrganizationRequestBody,
    responses(
        (status = 200, description = "Joined the organization", body = JoinOrganizationResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Organization or team not found", body = Error),
        (status = 409, description = "Caller already belongs to an organization", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "joinOrganization",
    security(("SessionCookie" = []))
)]
#[post("/organizations/join")]
pub async fn join_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<JoinOrganizationRequestBody>,
) -> ApiResult<web::Json<JoinOrganizationResponseBody>> {
    let caller = session.require_user_id()?;
    let body = payload.into_inner();

    let response = state
        .membership
        .join_organization(JoinOrganizationRequest {
            caller,
            name: body.name,
            slug: body.slug,
            team_name: body.team_name,
        })
        .await?;

    Ok(web::Json(JoinOrganizationResponseBody {
        organization: OrganizationBody::from(response.organization),
        team: TeamBody::from(response.team),
    }))
}

/// Report whether the caller belongs to an organization.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/membership",
    responses(
        (status = 200, description = "Membership status", body = MembershipStatusResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "membershipStatus",
    security(("SessionCookie" = []))
)]
#[get("/organizations/membership")]
pub async fn membership_status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MembershipStatusResponseBody>> {
    let caller = session.require_user_id()?;
    let status = state.membership_query.membership_status(&caller).await?;

    Ok(web::Json(MembershipStatusResponseBody {
        has_organization: status.organization.is_some(),
        organization: status.organization.map(OrganizationBody::from),
    }))
}

/// The authenticated caller's user record.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserBody>> {
    let caller = session.require_user_id()?;
    let user = state.membership_query.current_user(&caller).await?;
    Ok(web::Json(UserBody::from(user)))
}
