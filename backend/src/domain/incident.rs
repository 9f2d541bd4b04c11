//! Incidents and their open/closed lifecycle.
//!
//! An incident is created open and transitions to closed exactly once.
//! Closed incidents are immutable; there is no reopening. The open/closed
//! partition is a pure filter on `closed_at` nullity computed at read time,
//! never stored.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An incident reported against an organization.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    /// Primary identifier.
    pub id: Uuid,
    /// Incident name or short description.
    pub name: String,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Creation timestamp; incidents start open.
    pub created_at: DateTime<Utc>,
    /// Close timestamp; `None` while the incident is open. Set exactly
    /// once, after which the incident is terminal.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Whether the incident is still open.
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Read-time partition of an organization's incidents.
///
/// Both sequences are ordered by creation time descending (most recent
/// first).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncidentBoard {
    /// Incidents with no close timestamp.
    pub open: Vec<Incident>,
    /// Incidents that have been closed.
    pub closed: Vec<Incident>,
}

impl IncidentBoard {
    /// Partition incidents by `closed_at` nullity, sorting each side by
    /// creation time descending.
    ///
    /// The input order does not matter; sorting happens here so callers
    /// and adapters need not guarantee it.
    pub fn partition(incidents: Vec<Incident>) -> Self {
        let (open, closed): (Vec<_>, Vec<_>) =
            incidents.into_iter().partition(Incident::is_open);
        let mut board = Self { open, closed };
        board.open.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        board.closed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        board
    }
}
