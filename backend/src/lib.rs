//! Multi-tenant status-page backend.
//!
//! Organizations register, declare the services they run, and publish
//! incidents against them; unauthenticated viewers read per-organization
//! status pages with an overall health level derived from the individual
//! service statuses.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities,
//! ports, and application services; `inbound::http` adapts them to REST;
//! `outbound::persistence` adapts them to PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a trace id to every response.
pub use middleware::Trace;
