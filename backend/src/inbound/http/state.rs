//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureIncidentLifecycle, FixtureMembership, FixturePublicStatusQuery, FixtureServiceRegistry,
    IncidentLifecycle, MembershipCommand, MembershipQuery, PublicStatusQuery, ServiceRegistry,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Organization creation and admission.
    pub membership: Arc<dyn MembershipCommand>,
    /// Membership status and current-user lookups.
    pub membership_query: Arc<dyn MembershipQuery>,
    /// Organization-scoped service registry.
    pub services: Arc<dyn ServiceRegistry>,
    /// Organization-scoped incident lifecycle.
    pub incidents: Arc<dyn IncidentLifecycle>,
    /// Unauthenticated public status reads.
    pub public_status: Arc<dyn PublicStatusQuery>,
}

impl Default for HttpState {
    fn default() -> Self {
        let membership = Arc::new(FixtureMembership);
        Self {
            membership: membership.clone(),
            membership_query: membership,
            services: Arc::new(FixtureServiceRegistry),
            incidents: Arc::new(FixtureIncidentLifecycle),
            public_status: Arc::new(FixturePublicStatusQuery),
        }
    }
}
