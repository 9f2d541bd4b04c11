//! Port for incident persistence and the guarded close.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::incident::Incident;

use super::define_port_error;

define_port_error! {
    /// Errors raised by incident repository adapters.
    pub enum IncidentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "incident repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "incident repository query failed: {message}",
    }
}

/// Row staged by an incident create. Incidents start open.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    /// Incident name or short description.
    pub name: String,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Outcome of a guarded close attempt.
///
/// Adapters must guard the close on the incident still being open so
/// concurrent closes are serialised by the store: exactly one caller gets
/// [`CloseOutcome::Closed`], later callers observe
/// [`CloseOutcome::AlreadyClosed`].
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    /// This call performed the transition; the updated incident.
    Closed(Incident),
    /// The incident was already closed before this call committed.
    AlreadyClosed,
    /// No incident with that id exists.
    Missing,
}

/// Port for reading and mutating incidents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// All incidents of an organization, most recent first.
    async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Incident>, IncidentRepositoryError>;

    /// Insert a new open incident.
    async fn insert(
        &self,
        new_incident: &NewIncident,
    ) -> Result<Incident, IncidentRepositoryError>;

    /// Find an incident by primary id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, IncidentRepositoryError>;

    /// Set the close timestamp, guarded on the incident still being open.
    async fn close(
        &self,
        id: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<CloseOutcome, IncidentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise incidents.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIncidentRepository;

#[async_trait]
impl IncidentRepository for FixtureIncidentRepository {
    async fn list_for_organization(
        &self,
        _organization_id: Uuid,
    ) -> Result<Vec<Incident>, IncidentRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(
        &self,
        new_incident: &NewIncident,
    ) -> Result<Incident, IncidentRepositoryError> {
        Ok(Incident {
            id: Uuid::nil(),
            name: new_incident.name.clone(),
            organization_id: new_incident.organization_id,
            created_at: new_incident.created_at,
            closed_at: None,
        })
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Incident>, IncidentRepositoryError> {
        Ok(None)
    }

    async fn close(
        &self,
        _id: Uuid,
        _closed_at: DateTime<Utc>,
    ) -> Result<CloseOutcome, IncidentRepositoryError> {
        Ok(CloseOutcome::Missing)
    }
}
