//! Service registry HTTP handlers.
//!
//! ```text
//! GET   /api/v1/services
//! POST  /api/v1/services
//! PATCH /api/v1/services/{service_id}/status
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{CreateServiceRequest, SetServiceStatusRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ServiceBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_service_status, parse_uuid};

/// Request payload for creating a service.
///
/// Deliberately has no status field: every service starts `Operational`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequestBody {
    /// Service name.
    pub name: String,
}

/// Request payload for overwriting a service's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetServiceStatusRequestBody {
    /// One of the four status labels, e.g. `Major Outage`.
    pub status: String,
}

/// List the caller's organization's services.
#[utoipa::path(
    get,
    path = "/api/v1/services",
    responses(
        (status = 200, description = "Services of the caller's organization", body = [ServiceBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Caller has no organization", body = Error)
    ),
    tags = ["services"],
    operation_id = "listServices",
    security(("SessionCookie" = []))
)]
#[get("/services")]
pub async fn list_services(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ServiceBody>>> {
    let caller = session.require_user_id()?;
    let services = state.services.list_services(&caller).await?;
    Ok(web::Json(
        services.into_iter().map(ServiceBody::from).collect(),
    ))
}

/// Create a service in the caller's organization.
#[utoipa::path(
    post,
    path = "/api/v1/services",
    request_body = CreateServiceRequestBody,
    responses(
        (status = 200, description = "Service created, seeded Operational", body = ServiceBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Caller has no organization", body = Error)
    ),
    tags = ["services"],
    operation_id = "createService",
    security(("SessionCookie" = []))
)]
#[post("/services")]
pub async fn create_service(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateServiceRequestBody>,
) -> ApiResult<web::Json<ServiceBody>> {
    let caller = session.require_user_id()?;
    let created = state
        .services
        .create_service(
            &caller,
            CreateServiceRequest {
                name: payload.into_inner().name,
            },
        )
        .await?;
    Ok(web::Json(ServiceBody::from(created)))
}

/// Overwrite a service's status.
#[utoipa::path(
    patch,
    path = "/api/v1/services/{service_id}/status",
    params(("service_id", description = "Service identifier")),
    request_body = SetServiceStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = ServiceBody),
        (status = 400, description = "Invalid status value", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Service belongs to another organization", body = Error),
        (status = 404, description = "Service not found", body = Error)
    ),
    tags = ["services"],
    operation_id = "setServiceStatus",
    security(("SessionCookie" = []))
)]
#[patch("/services/{service_id}/status")]
pub async fn set_service_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SetServiceStatusRequestBody>,
) -> ApiResult<web::Json<ServiceBody>> {
    let caller = session.require_user_id()?;
    let service_id = parse_uuid(path.into_inner(), FieldName::new("serviceId"))?;
    let status = parse_service_status(payload.into_inner().status, FieldName::new("status"))?;

    let updated = state
        .services
        .set_service_status(&caller, SetServiceStatusRequest { service_id, status })
        .await?;
    Ok(web::Json(ServiceBody::from(updated)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::domain::ports::MockServiceRegistry;
    use crate::domain::{Service, ServiceStatus};
    use crate::test_support::{login_cookie, login_route, test_session_middleware};

    use super::*;

    fn state_with(services: MockServiceRegistry) -> HttpState {
        HttpState {
            services: Arc::new(services),
            ..HttpState::default()
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
            state_with(MockServiceRegistry::new()),
            test::TestRequest::get().uri("/api/v1/services"),
            false,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn create_echoes_forced_operational_status() {
        let org = Uuid::new_v4();
        let mut services = MockServiceRegistry::new();
        services
            .expect_create_service()
            .withf(|caller, request| caller.as_ref() == "user_1" && request.name == "API")
            .returning(move |_, request| {
                Ok(Service {
                    id: Uuid::new_v4(),
                    name: request.name,
                    status: ServiceStatus::Operational,
                    organization_id: org,
                })
            });

        let (status, body) = call(
            state_with(services),
            test::TestRequest::post()
                .uri("/api/v1/services")
                .set_json(json!({ "name": "API" })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Operational");
        assert_eq!(body["name"], "API");
    }

    #[actix_web::test]
    async fn unknown_status_label_is_rejected_at_the_boundary() {
        let mut services = MockServiceRegistry::new();
        services.expect_set_service_status().never();

        let (status, body) = call(
            state_with(services),
            test::TestRequest::patch()
                .uri(&format!("/api/v1/services/{}/status", Uuid::new_v4()))
                .set_json(json!({ "status": "Down" })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid status value");
    }

    #[actix_web::test]
    async fn malformed_service_id_is_rejected() {
        let mut services = MockServiceRegistry::new();
        services.expect_set_service_status().never();

        let (status, body) = call(
            state_with(services),
            test::TestRequest::patch()
                .uri("/api/v1/services/not-a-uuid/status")
                .set_json(json!({ "status": "Operational" })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "serviceId");
    }

    #[actix_web::test]
    async fn foreign_service_update_is_forbidden() {
        let mut services = MockServiceRegistry::new();
        services
            .expect_set_service_status()
            .returning(|_, _| Err(Error::forbidden("Not permitted to update this service")));

        let (status, body) = call(
            state_with(services),
            test::TestRequest::patch()
                .uri(&format!("/api/v1/services/{}/status", Uuid::new_v4()))
                .set_json(json!({ "status": "Major Outage" })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }

    #[actix_web::test]
    async fn status_update_round_trips_the_label() {
        let service_id = Uuid::new_v4();
        let org = Uuid::new_v4();
        let mut services = MockServiceRegistry::new();
        services
            .expect_set_service_status()
            .withf(move |_, request| {
                request.service_id == service_id
                    && request.status == ServiceStatus::DegradedPerformance
            })
            .returning(move |_, request| {
                Ok(Service {
                    id: request.service_id,
                    name: "API".to_owned(),
                    status: request.status,
                    organization_id: org,
                })
            });

        let (status, body) = call(
            state_with(services),
            test::TestRequest::patch()
                .uri(&format!("/api/v1/services/{service_id}/status"))
                .set_json(json!({ "status": "Degraded Performance" })),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Degraded Performance");
    }
}
