//! Driving port for the incident lifecycle.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::incident::{Incident, IncidentBoard};
use crate::domain::user::UserId;

/// Request payload for creating an incident.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIncidentRequest {
    /// Incident name or short description.
    pub name: String,
}

/// Driving port for incident reads and lifecycle transitions, scoped to
/// the caller's organization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentLifecycle: Send + Sync {
    /// The caller's incidents partitioned open/closed, most recent first.
    async fn list_incidents(&self, caller: &UserId) -> Result<IncidentBoard, Error>;

    /// Open a new incident in the caller's organization.
    async fn create_incident(
        &self,
        caller: &UserId,
        request: CreateIncidentRequest,
    ) -> Result<Incident, Error>;

    /// Transition an incident from open to closed, exactly once.
    ///
    /// A second close attempt is an explicit conflict, never a silent
    /// no-op.
    async fn close_incident(&self, caller: &UserId, incident_id: Uuid) -> Result<Incident, Error>;
}

/// Fixture implementation for wiring without a backing store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIncidentLifecycle;

#[async_trait]
impl IncidentLifecycle for FixtureIncidentLifecycle {
    async fn list_incidents(&self, _caller: &UserId) -> Result<IncidentBoard, Error> {
        Ok(IncidentBoard::default())
    }

    async fn create_incident(
        &self,
        _caller: &UserId,
        request: CreateIncidentRequest,
    ) -> Result<Incident, Error> {
        Ok(Incident {
            id: Uuid::nil(),
            name: request.name,
            organization_id: Uuid::nil(),
            created_at: chrono::Utc::now(),
            closed_at: None,
        })
    }

    async fn close_incident(
        &self,
        _caller: &UserId,
        _incident_id: Uuid,
    ) -> Result<Incident, Error> {
        Err(Error::not_found("Incident not found"))
    }
}
