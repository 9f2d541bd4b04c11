//! Backend entry-point: wires the REST API, persistence, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use statuspage::ApiDoc;
use statuspage::Trace;
use statuspage::domain::{
    IncidentService, MembershipService, PublicStatusService, ServiceRegistryService,
};
use statuspage::inbound::http::health::{HealthState, live, ready};
use statuspage::inbound::http::state::HttpState;
use statuspage::inbound::http::{self};
use statuspage::outbound::persistence::{
    DbPool, DieselIncidentRepository, DieselOrganizationRepository, DieselServiceRepository,
    DieselUserRepository, PoolConfig,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let http_state = web::Data::new(build_state(&pool));
    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .wrap(session)
            .wrap(Trace)
            .configure(http::configure)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(("0.0.0.0", 8080))?;

    health_state.mark_ready();
    server.run().await
}

/// Load the session signing key, falling back to an ephemeral key in
/// development builds.
fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Wire the domain services over the Diesel adapters.
fn build_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let organizations = Arc::new(DieselOrganizationRepository::new(pool.clone()));
    let services = Arc::new(DieselServiceRepository::new(pool.clone()));
    let incidents = Arc::new(DieselIncidentRepository::new(pool.clone()));

    let membership = Arc::new(MembershipService::new(users.clone(), organizations.clone()));
    HttpState {
        membership: membership.clone(),
        membership_query: membership,
        services: Arc::new(ServiceRegistryService::new(users.clone(), services.clone())),
        incidents: Arc::new(IncidentService::new(
            users,
            incidents.clone(),
            Arc::new(mockable::DefaultClock),
        )),
        public_status: Arc::new(PublicStatusService::new(organizations, services, incidents)),
    }
}
