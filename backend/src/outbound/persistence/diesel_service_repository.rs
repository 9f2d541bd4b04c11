//! PostgreSQL-backed [`ServiceRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewService, ServiceRepository, ServiceRepositoryError};
use crate::domain::{Service, ServiceStatus};

use super::models::{NewServiceRow, ServiceRow};
use super::pool::{DbPool, PoolError};
use super::schema::services;

/// Diesel-backed implementation of the [`ServiceRepository`] port.
#[derive(Clone)]
pub struct DieselServiceRepository {
    pool: DbPool,
}

impl DieselServiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ServiceRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ServiceRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ServiceRepositoryError {
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
            ServiceRepositoryError::connection("database connection error")
        }
        _ => ServiceRepositoryError::query("database error"),
    }
}

fn row_to_service(row: ServiceRow) -> Result<Service, ServiceRepositoryError> {
    let status: ServiceStatus = row
        .status
        .parse()
        .map_err(|err| ServiceRepositoryError::query(format!("invalid stored status: {err}")))?;
    Ok(Service {
        id: row.id,
        name: row.name,
        status,
        organization_id: row.organization_id,
    })
}

#[async_trait]
impl ServiceRepository for DieselServiceRepository {
    async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Service>, ServiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ServiceRow> = services::table
            .filter(services::organization_id.eq(organization_id))
            .order(services::name.asc())
            .select(ServiceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_service).collect()
    }

    async fn insert(&self, new_service: &NewService) -> Result<Service, ServiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewServiceRow {
            id: Uuid::new_v4(),
            name: &new_service.name,
            status: new_service.status.as_str(),
            organization_id: new_service.organization_id,
        };
        let inserted: ServiceRow = diesel::insert_into(services::table)
            .values(&row)
            .returning(ServiceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_service(inserted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, ServiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ServiceRow> = services::table
            .find(id)
            .select(ServiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_service).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ServiceStatus,
    ) -> Result<Service, ServiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: ServiceRow = diesel::update(services::table.find(id))
            .set(services::status.eq(status.as_str()))
            .returning(ServiceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_service(updated)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn row(status: &str) -> ServiceRow {
        ServiceRow {
            id: Uuid::new_v4(),
            name: "API".to_owned(),
            status: status.to_owned(),
            organization_id: Uuid::new_v4(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, ServiceRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[case("Operational", ServiceStatus::Operational)]
    #[case("Degraded Performance", ServiceStatus::DegradedPerformance)]
    #[case("Partial Outage", ServiceStatus::PartialOutage)]
    #[case("Major Outage", ServiceStatus::MajorOutage)]
    fn stored_labels_parse(#[case] raw: &str, #[case] expected: ServiceStatus) {
        let service = row_to_service(row(raw)).expect("valid row");
        assert_eq!(service.status, expected);
    }

    #[rstest]
    fn unknown_stored_label_is_a_query_error() {
        let err = row_to_service(row("offline")).expect_err("invalid status");
        assert!(matches!(err, ServiceRepositoryError::Query { .. }));
    }
}
