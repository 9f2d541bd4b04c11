//! PostgreSQL-backed [`IncidentRepository`] implementation using Diesel.
//!
//! The close is a guarded update filtered on `closed_at IS NULL`, so the
//! database serialises concurrent closes and exactly one caller performs
//! the transition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Incident;
use crate::domain::ports::{
    CloseOutcome, IncidentRepository, IncidentRepositoryError, NewIncident,
};

use super::models::{IncidentRow, NewIncidentRow};
use super::pool::{DbPool, PoolError};
use super::schema::incidents;

/// Diesel-backed implementation of the [`IncidentRepository`] port.
#[derive(Clone)]
pub struct DieselIncidentRepository {
    pool: DbPool,
}

impl DieselIncidentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IncidentRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            IncidentRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> IncidentRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            IncidentRepositoryError::connection("database connection error")
        }
        _ => IncidentRepositoryError::query("database error"),
    }
}

fn row_to_incident(row: IncidentRow) -> Incident {
    Incident {
        id: row.id,
        name: row.name,
        organization_id: row.organization_id,
        created_at: row.created_at,
        closed_at: row.closed_at,
    }
}

#[async_trait]
impl IncidentRepository for DieselIncidentRepository {
    async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Incident>, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<IncidentRow> = incidents::table
            .filter(incidents::organization_id.eq(organization_id))
            .order(incidents::created_at.desc())
            .select(IncidentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_incident).collect())
    }

    async fn insert(
        &self,
        new_incident: &NewIncident,
    ) -> Result<Incident, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewIncidentRow {
            id: Uuid::new_v4(),
            name: &new_incident.name,
            organization_id: new_incident.organization_id,
            created_at: new_incident.created_at,
        };
        let inserted: IncidentRow = diesel::insert_into(incidents::table)
            .values(&row)
            .returning(IncidentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_incident(inserted))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<IncidentRow> = incidents::table
            .find(id)
            .select(IncidentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_incident))
    }

    async fn close(
        &self,
        id: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<CloseOutcome, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: Option<IncidentRow> =
            diesel::update(incidents::table.find(id).filter(incidents::closed_at.is_null()))
                .set(incidents::closed_at.eq(closed_at))
                .returning(IncidentRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return Ok(CloseOutcome::Closed(row_to_incident(row)));
        }

        // The guard matched nothing; tell apart a closed incident from a
        // missing one.
        let existing: Option<IncidentRow> = incidents::table
            .find(id)
            .select(IncidentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(match existing {
            Some(_) => CloseOutcome::AlreadyClosed,
            None => CloseOutcome::Missing,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, IncidentRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn open_row_maps_to_open_incident() {
        let incident = row_to_incident(IncidentRow {
            id: Uuid::new_v4(),
            name: "API down".to_owned(),
            organization_id: Uuid::new_v4(),
            created_at: Utc::now(),
            closed_at: None,
        });
        assert!(incident.is_open());
    }

    #[rstest]
    fn closed_row_maps_to_closed_incident() {
        let closed_at = Utc::now();
        let incident = row_to_incident(IncidentRow {
            id: Uuid::new_v4(),
            name: "API down".to_owned(),
            organization_id: Uuid::new_v4(),
            created_at: closed_at,
            closed_at: Some(closed_at),
        });
        assert!(!incident.is_open());
        assert_eq!(incident.closed_at, Some(closed_at));
    }
}
