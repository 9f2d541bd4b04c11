//! Incident lifecycle HTTP handlers.
//!
//! ```text
//! GET   /api/v1/incidents
//! POST  /api/v1/incidents
//! PATCH /api/v1/incidents/{incident_id}/close
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::CreateIncidentRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::IncidentBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Request payload for opening an incident.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequestBody {
    /// Incident name or short description.
    pub name: String,
}

/// The caller's incidents partitioned open/closed, most recent first.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentBoardResponseBody {
    /// Incidents with no close timestamp.
    pub open: Vec<IncidentBody>,
    /// Closed incidents.
    pub closed: Vec<IncidentBody>,
}

/// List the caller's organization's incidents, partitioned open/closed.
#[utoipa::path(
    get,
    path = "/api/v1/incidents",
    responses(
        (status = 200, description = "Incidents partitioned open/closed", body = IncidentBoardResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Caller has no organization", body = Error)
    ),
    tags = ["incidents"],
    operation_id = "listIncidents",
    security(("SessionCookie" = []))
)]
#[get("/incidents")]
pub async fn list_incidents(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<IncidentBoardResponseBody>> {
    let caller = session.require_user_id()?;
    let board = state.incidents.list_incidents(&caller).await?;
    Ok(web::Json(IncidentBoardResponseBody {
        open: board.open.into_iter().map(IncidentBody::from).collect(),
        closed: board.closed.into_iter().map(IncidentBody::from).collect(),
    }))
}

/// Open an incident in the caller's organization.
#[utoipa::path(
    post,
    path = "/api/v1/incidents",
    request_body = CreateIncidentRequestBody,
    responses(
        (status = 200, description = "Incident opened", body = IncidentBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Caller has no organization", body = Error)
    ),
    tags = ["incidents"],
    operation_id = "createIncident",
    security(("SessionCookie" = []))
)]
#[post("/incidents")]
pub async fn create_incident(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateIncidentRequestBody>,
) -> ApiResult<web::Json<IncidentBody>> {
    let caller = session.require_user_id()?;
    let created = state
        .incidents
        .create_incident(
            &caller,
            CreateIncidentRequest {
                name: payload.into_inner().name,
            },
        )
        .await?;
    Ok(web::Json(IncidentBody::from(created)))
}

/// Close an open incident. A second close attempt is a conflict.
#[utoipa::path(
    patch,
    path = "/api/v1/incidents/{incident_id}/close",
    params(("incident_id", description = "Incident identifier")),
    responses(
        (status = 200, description = "Incident closed", body = IncidentBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Incident belongs to another organization", body = Error),
        (status = 404, description = "Incident not found", body = Error),
        (status = 409, description = "Incident is already closed", body = Error)
    ),
    tags = ["incidents"],
    operation_id = "closeIncident",
    security(("SessionCookie" = []))
)]
#[patch("/incidents/{incident_id}/close")]
pub async fn close_incident(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<IncidentBody>> {
    let caller = session.require_user_id()?;
    let incident_id = parse_uuid(path.into_inner(), FieldName::new("incidentId"))?;
    let closed = state.incidents.close_incident(&caller, incident_id).await?;
    Ok(web::Json(IncidentBody::from(closed)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::domain::ports::MockIncidentLifecycle;
    use crate::domain::{Incident, IncidentBoard};
    use crate::test_support::{login_cookie, login_route, test_session_middleware};

    use super::*;

    fn state_with(incidents: MockIncidentLifecycle) -> HttpState {
        HttpState {
            incidents: Arc::new(incidents),
            ..HttpState::default()
        }
    }

    fn incident(hour: u32, closed: bool) -> Incident {
        let created_at = Utc
            .with_ymd_and_hms(2026, 8, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp");
        Incident {
            id: Uuid::new_v4(),
            name: "API down".to_owned(),
            organization_id: Uuid::new_v4(),
            created_at,
            closed_at: closed.then(|| created_at + chrono::Duration::hours(1)),
        }
    }

    async fn call(
        state: HttpState,
        request: test::TestRequest,
        authenticated: bool,
    ) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(login_route())
                .configure(crate::inbound::http::configure),
        )
        .await;

        let request = if authenticated {
            let cookie = login_cookie(&app, "user_1").await;
            request.cookie(cookie)
        } else {
            request
        };
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    #[actix_web::test]
    async fn list_requires_authentication() {
        let (status, body) = call(
            state_with(MockIncidentLifecycle::new()),
            test::TestRequest::get().uri("/api/v1/incidents"),
            false,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn list_returns_both_partitions() {
        let board = IncidentBoard {
            open: vec![incident(12, false)],
            closed: vec![incident(9, true), incident(8, true)],
        };
        let mut incidents = MockIncidentLifecycle::new();
        incidents
            .expect_list_incidents()
            .returning(move |_| Ok(board.clone()));

        let (status, body) = call(
            state_with(incidents),
            test::TestRequest::get().uri("/api/v1/incidents"),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["open"].as_array().expect("open array").len(), 1);
        assert_eq!(body["closed"].as_array().expect("closed array").len(), 2);
        assert!(body["open"][0].get("closedAt").is_none());
        assert!(body["closed"][0].get("closedAt").is_some());
    }

    #[actix_web::test]
    async fn create_returns_the_open_incident() {
        let mut incidents = MockIncidentLifecycle::new();
        incidents
            .expect_create_incident()
            .withf(|caller, request| caller.as_ref() == "user_1" && request.name == "API down")
            .returning(|_, request| {
                Ok(Incident {
                    id: Uuid::new_v4(),
                    name: request.name,
                    organization_id: Uuid::new_v4(),
                    created_at: Utc::now(),
                    closed_at: None,
                })
            });

        let (status, body) = call(
            state_with(incidents),
            test::TestRequest::post()
                .uri("/api/v1/incidents")
                .set_json(json!({ "name": "API down" })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "API down");
        assert!(body.get("closedAt").is_none());
    }

    #[actix_web::test]
    async fn second_close_surfaces_as_conflict() {
        let mut incidents = MockIncidentLifecycle::new();
        incidents
            .expect_close_incident()
            .returning(|_, _| Err(Error::conflict("Incident is already closed")));

        let (status, body) = call(
            state_with(incidents),
            test::TestRequest::patch()
                .uri(&format!("/api/v1/incidents/{}/close", Uuid::new_v4())),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Incident is already closed");
    }

    #[actix_web::test]
    async fn malformed_incident_id_is_rejected() {
        let mut incidents = MockIncidentLifecycle::new();
        incidents.expect_close_incident().never();

        let (status, body) = call(
            state_with(incidents),
            test::TestRequest::patch().uri("/api/v1/incidents/not-a-uuid/close"),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "incidentId");
    }

    #[actix_web::test]
    async fn close_returns_the_closed_incident() {
        let incident_id = Uuid::new_v4();
        let mut incidents = MockIncidentLifecycle::new();
        incidents
            .expect_close_incident()
            .withf(move |_, id| *id == incident_id)
            .returning(|_, id| {
                let created_at = Utc::now();
                Ok(Incident {
                    id,
                    name: "API down".to_owned(),
                    organization_id: Uuid::new_v4(),
                    created_at,
                    closed_at: Some(created_at),
                })
            });

        let (status, body) = call(
            state_with(incidents),
            test::TestRequest::patch().uri(&format!("/api/v1/incidents/{incident_id}/close")),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], incident_id.to_string());
        assert!(body.get("closedAt").is_some());
    }
}
