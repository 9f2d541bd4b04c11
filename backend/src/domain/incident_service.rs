//! Incident lifecycle domain service: the open ledger, creation, and the
//! once-only close transition.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::authorization::{ensure_same_organization, require_organization};
use crate::domain::error::Error;
use crate::domain::incident::{Incident, IncidentBoard};
use crate::domain::ports::{
    CloseOutcome, CreateIncidentRequest, IncidentLifecycle, IncidentRepository,
    IncidentRepositoryError, NewIncident, UserRepository, UserRepositoryError,
};
use crate::domain::user::{User, UserId};

/// Implements [`IncidentLifecycle`] over the user and incident
/// repositories. Timestamps come from the injected clock so transitions
/// are testable against fixed instants.
#[derive(Clone)]
pub struct IncidentService<U, I> {
    users: Arc<U>,
    incidents: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<U, I> IncidentService<U, I> {
    /// Create a new incident lifecycle service.
    pub fn new(users: Arc<U>, incidents: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            incidents,
            clock,
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_incident_error(error: IncidentRepositoryError) -> Error {
    Error::internal(error.to_string())
}

impl<U, I> IncidentService<U, I>
where
    U: UserRepository,
    I: IncidentRepository,
{
    async fn require_member(&self, caller: &UserId) -> Result<Uuid, Error> {
        let user: User = self
            .users
            .find_by_id(caller)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found or not part of an organization"))?;
        require_organization(&user)
    }
}

#[async_trait]
impl<U, I> IncidentLifecycle for IncidentService<U, I>
where
    U: UserRepository,
    I: IncidentRepository,
{
    async fn list_incidents(&self, caller: &UserId) -> Result<IncidentBoard, Error> {
        let organization_id = self.require_member(caller).await?;
        let incidents = self
            .incidents
            .list_for_organization(organization_id)
            .await
            .map_err(map_incident_error)?;
        Ok(IncidentBoard::partition(incidents))
    }

    async fn create_incident(
        &self,
        caller: &UserId,
        request: CreateIncidentRequest,
    ) -> Result<Incident, Error> {
        let name = request.name.trim().to_owned();
        if name.is_empty() {
            return Err(Error::invalid_request("Incident name is required"));
        }
        let organization_id = self.require_member(caller).await?;

        let created = self
            .incidents
            .insert(&NewIncident {
                name,
                organization_id,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_incident_error)?;

        info!(
            incident = %created.id,
            organization = %organization_id,
            "incident opened"
        );
        Ok(created)
    }

    async fn close_incident(&self, caller: &UserId, incident_id: Uuid) -> Result<Incident, Error> {
        let organization_id = self.require_member(caller).await?;

        // Existence is checked before ownership so a missing incident is
        // not_found while someone else's incident is forbidden.
        let incident = self
            .incidents
            .find_by_id(incident_id)
            .await
            .map_err(map_incident_error)?
            .ok_or_else(|| Error::not_found("Incident not found"))?;
        ensure_same_organization(incident.organization_id, organization_id, "incident")?;

        // The store guards the transition on the incident still being
        // open, so concurrent closes resolve to exactly one winner.
        match self
            .incidents
            .close(incident_id, self.clock.utc())
            .await
            .map_err(map_incident_error)?
        {
            CloseOutcome::Closed(closed) => {
                info!(
                    incident = %closed.id,
                    organization = %organization_id,
                    "incident closed"
                );
                Ok(closed)
            }
            CloseOutcome::AlreadyClosed => Err(Error::conflict("Incident is already closed")),
            CloseOutcome::Missing => Err(Error::not_found("Incident not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockall::predicate::eq;
    use rstest::rstest;

    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockIncidentRepository, MockUserRepository};
    use crate::domain::user::Role;

    use super::*;

    fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 15, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    fn fixture_clock() -> Arc<dyn Clock> {
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        })
    }

    fn caller() -> UserId {
        UserId::new("user_1").expect("valid id")
    }

    fn member(organization_id: Uuid) -> User {
        User {
            id: caller(),
            display_name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            role: Some(Role::Member),
            organization_id: Some(organization_id),
            team_id: None,
        }
    }

    fn incident_row(organization_id: Uuid, closed_at: Option<DateTime<Utc>>) -> Incident {
        Incident {
            id: Uuid::new_v4(),
            name: "API down".to_owned(),
            organization_id,
            created_at: fixture_timestamp(),
            closed_at,
        }
    }

    fn users_for(organization_id: Uuid) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(member(organization_id))));
        users
    }

    fn lifecycle(
        users: MockUserRepository,
        incidents: MockIncidentRepository,
    ) -> IncidentService<MockUserRepository, MockIncidentRepository> {
        IncidentService::new(Arc::new(users), Arc::new(incidents), fixture_clock())
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_clock_time_and_starts_open() {
        let org = Uuid::new_v4();
        let mut incidents = MockIncidentRepository::new();
        incidents
            .expect_insert()
            .withf(move |new_incident| {
                new_incident.organization_id == org
                    && new_incident.created_at == fixture_timestamp()
                    && new_incident.name == "API down"
            })
            .returning(|new_incident| {
                Ok(Incident {
                    id: Uuid::new_v4(),
                    name: new_incident.name.clone(),
                    organization_id: new_incident.organization_id,
                    created_at: new_incident.created_at,
                    closed_at: None,
                })
            });

        let created = lifecycle(users_for(org), incidents)
            .create_incident(
                &caller(),
                CreateIncidentRequest {
                    name: " API down ".to_owned(),
                },
            )
            .await
            .expect("create succeeds");
        assert!(created.is_open());
        assert_eq!(created.created_at, fixture_timestamp());
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_blank_names() {
        let err = lifecycle(MockUserRepository::new(), MockIncidentRepository::new())
            .create_incident(
                &caller(),
                CreateIncidentRequest {
                    name: "   ".to_owned(),
                },
            )
            .await
            .expect_err("blank name");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn list_partitions_open_and_closed() {
        let org = Uuid::new_v4();
        let open = incident_row(org, None);
        let closed = incident_row(org, Some(fixture_timestamp()));
        let rows = vec![open.clone(), closed.clone()];

        let mut incidents = MockIncidentRepository::new();
        incidents
            .expect_list_for_organization()
            .with(eq(org))
            .returning(move |_| Ok(rows.clone()));

        let board = lifecycle(users_for(org), incidents)
            .list_incidents(&caller())
            .await
            .expect("list succeeds");
        assert_eq!(board.open, vec![open]);
        assert_eq!(board.closed, vec![closed]);
    }

    #[rstest]
    #[tokio::test]
    async fn close_wins_exactly_once() {
        let org = Uuid::new_v4();
        let open = incident_row(org, None);
        let id = open.id;

        let mut incidents = MockIncidentRepository::new();
        incidents
            .expect_find_by_id()
            .returning(move |_| Ok(Some(open.clone())));
        incidents
            .expect_close()
            .with(eq(id), eq(fixture_timestamp()))
            .returning(move |incident_id, closed_at| {
                Ok(CloseOutcome::Closed(Incident {
                    id: incident_id,
                    name: "API down".to_owned(),
                    organization_id: org,
                    created_at: fixture_timestamp(),
                    closed_at: Some(closed_at),
                }))
            });

        let closed = lifecycle(users_for(org), incidents)
            .close_incident(&caller(), id)
            .await
            .expect("close succeeds");
        assert_eq!(closed.closed_at, Some(fixture_timestamp()));
    }

    #[rstest]
    #[tokio::test]
    async fn second_close_is_a_conflict_not_a_noop() {
        let org = Uuid::new_v4();
        let already = incident_row(org, Some(fixture_timestamp()));

        let mut incidents = MockIncidentRepository::new();
        incidents
            .expect_find_by_id()
            .returning(move |_| Ok(Some(already.clone())));
        incidents
            .expect_close()
            .returning(|_, _| Ok(CloseOutcome::AlreadyClosed));

        let err = lifecycle(users_for(org), incidents)
            .close_incident(&caller(), Uuid::new_v4())
            .await
            .expect_err("already closed");
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Incident is already closed");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_incident_is_not_found() {
        let org = Uuid::new_v4();
        let mut incidents = MockIncidentRepository::new();
        incidents.expect_find_by_id().returning(|_| Ok(None));
        incidents.expect_close().never();

        let err = lifecycle(users_for(org), incidents)
            .close_incident(&caller(), Uuid::new_v4())
            .await
            .expect_err("missing incident");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn foreign_incident_is_forbidden() {
        let org = Uuid::new_v4();
        let other_org = Uuid::new_v4();
        let foreign = incident_row(other_org, None);

        let mut incidents = MockIncidentRepository::new();
        incidents
            .expect_find_by_id()
            .returning(move |_| Ok(Some(foreign.clone())));
        incidents.expect_close().never();

        let err = lifecycle(users_for(org), incidents)
            .close_incident(&caller(), Uuid::new_v4())
            .await
            .expect_err("foreign incident");
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("incident"));
    }
}
