//! Response payloads shared by authenticated and public handlers.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Incident, Organization, Service, Team, User};

/// Organization payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationBody {
    /// Organization identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Organization name.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
    /// Creation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Organization> for OrganizationBody {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            slug: value.slug.to_string(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Team payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamBody {
    /// Team identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Team name.
    pub name: String,
}

impl From<Team> for TeamBody {
    fn from(value: Team) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
        }
    }
}

/// Service payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBody {
    /// Service identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Service name.
    pub name: String,
    /// Current status label, e.g. `Partial Outage`.
    pub status: String,
    /// Owning organization.
    #[schema(format = "uuid")]
    pub organization_id: String,
}

impl From<Service> for ServiceBody {
    fn from(value: Service) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            status: value.status.as_str().to_owned(),
            organization_id: value.organization_id.to_string(),
        }
    }
}

/// Incident payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentBody {
    /// Incident identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Incident name or short description.
    pub name: String,
    /// Owning organization.
    #[schema(format = "uuid")]
    pub organization_id: String,
    /// Creation timestamp, RFC 3339.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Close timestamp, RFC 3339; absent while the incident is open.
    #[schema(format = "date-time")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

impl From<Incident> for IncidentBody {
    fn from(value: Incident) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            organization_id: value.organization_id.to_string(),
            created_at: value.created_at.to_rfc3339(),
            closed_at: value.closed_at.map(|closed_at| closed_at.to_rfc3339()),
        }
    }
}

/// User payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    /// External identity reference.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Role within the organization, when bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Organization binding, when present.
    #[schema(format = "uuid")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Team binding, when present.
    #[schema(format = "uuid")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name,
            email: value.email,
            role: value.role.map(|role| role.as_str().to_owned()),
            organization_id: value.organization_id.map(|id| id.to_string()),
            team_id: value.team_id.map(|id| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{ServiceStatus, Slug, UserId};

    use super::*;

    #[test]
    fn service_body_uses_operator_labels() {
        let body = ServiceBody::from(Service {
            id: Uuid::new_v4(),
            name: "API".to_owned(),
            status: ServiceStatus::DegradedPerformance,
            organization_id: Uuid::new_v4(),
        });
        assert_eq!(body.status, "Degraded Performance");
    }

    #[test]
    fn open_incident_omits_closed_at() {
        let body = IncidentBody::from(Incident {
            id: Uuid::new_v4(),
            name: "API down".to_owned(),
            organization_id: Uuid::new_v4(),
            created_at: Utc
                .with_ymd_and_hms(2026, 8, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
            closed_at: None,
        });
        let value = serde_json::to_value(&body).expect("serialise incident");
        assert!(value.get("closedAt").is_none());
        assert_eq!(value["createdAt"], "2026-08-01T09:00:00+00:00");
    }

    #[test]
    fn organization_body_round_trips_slug() {
        let body = OrganizationBody::from(Organization {
            id: Uuid::new_v4(),
            name: "Acme".to_owned(),
            slug: Slug::new("acme").expect("valid slug"),
            created_at: Utc::now(),
        });
        assert_eq!(body.slug, "acme");
    }

    #[test]
    fn user_body_flattens_bindings() {
        let org = Uuid::new_v4();
        let body = UserBody::from(User {
            id: UserId::new("user_1").expect("valid id"),
            display_name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            role: Some(crate::domain::Role::Owner),
            organization_id: Some(org),
            team_id: None,
        });
        assert_eq!(body.role.as_deref(), Some("owner"));
        assert_eq!(body.organization_id, Some(org.to_string()));
        assert!(body.team_id.is_none());
    }
}
