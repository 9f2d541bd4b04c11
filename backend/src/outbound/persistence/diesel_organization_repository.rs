//! PostgreSQL-backed [`OrganizationRepository`] implementation using Diesel.
//!
//! The atomic create commits the organization, its teams, its services,
//! and the owner's membership binding in one transaction.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewOrganization, OrganizationRepository, OrganizationRepositoryError};
use crate::domain::{Organization, Role, ServiceStatus, Slug, Team};

use super::models::{
    NewOrganizationRow, NewServiceRow, NewTeamRow, OrganizationRow, TeamRow, UserBindingUpdate,
};
use super::pool::{DbPool, PoolError};
use super::schema::{organizations, services, teams, users};

/// Diesel-backed implementation of the [`OrganizationRepository`] port.
#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrganizationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            OrganizationRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> OrganizationRepositoryError {
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
            OrganizationRepositoryError::connection("database connection error")
        }
        _ => OrganizationRepositoryError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but recognises the slug unique constraint
/// so a lost insert race surfaces as [`OrganizationRepositoryError::DuplicateSlug`].
fn map_create_error(error: diesel::result::Error, slug: &Slug) -> OrganizationRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        let hits_slug = info
            .constraint_name()
            .is_some_and(|name| name.contains("slug"));
        if hits_slug {
            return OrganizationRepositoryError::duplicate_slug(slug.as_str());
        }
    }
    map_diesel_error(error)
}

fn row_to_organization(row: OrganizationRow) -> Result<Organization, OrganizationRepositoryError> {
    let slug = Slug::new(row.slug)
        .map_err(|err| OrganizationRepositoryError::query(format!("invalid stored slug: {err}")))?;
    Ok(Organization {
        id: row.id,
        name: row.name,
        slug,
        created_at: row.created_at,
    })
}

fn row_to_team(row: TeamRow) -> Team {
    Team {
        id: row.id,
        name: row.name,
        organization_id: row.organization_id,
    }
}

#[async_trait]
impl OrganizationRepository for DieselOrganizationRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrganizationRow> = organizations::table
            .find(id)
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_organization).transpose()
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrganizationRow> = organizations::table
            .filter(organizations::slug.eq(slug.as_str()))
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_organization).transpose()
    }

    async fn find_by_name_and_slug(
        &self,
        name: &str,
        slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrganizationRow> = organizations::table
            .filter(organizations::name.eq(name))
            .filter(organizations::slug.eq(slug.as_str()))
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_organization).transpose()
    }

    async fn list_teams(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Team>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TeamRow> = teams::table
            .filter(teams::organization_id.eq(organization_id))
            .order(teams::name.asc())
            .select(TeamRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_team).collect())
    }

    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrganizationRow> = organizations::table
            .order(organizations::name.asc())
            .select(OrganizationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_organization).collect()
    }

    async fn create(
        &self,
        new_organization: &NewOrganization,
    ) -> Result<Organization, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let organization_id = Uuid::new_v4();
        let created_at = Utc::now();
        let organization_row = NewOrganizationRow {
            id: organization_id,
            name: &new_organization.name,
            slug: new_organization.slug.as_str(),
            created_at,
        };
        let team_rows: Vec<NewTeamRow<'_>> = new_organization
            .teams
            .iter()
            .map(|name| NewTeamRow {
                id: Uuid::new_v4(),
                name,
                organization_id,
            })
            .collect();
        let service_rows: Vec<NewServiceRow<'_>> = new_organization
            .services
            .iter()
            .map(|name| NewServiceRow {
                id: Uuid::new_v4(),
                name,
                status: ServiceStatus::Operational.as_str(),
                organization_id,
            })
            .collect();
        let owner_binding = UserBindingUpdate {
            role: Role::Owner.as_str(),
            organization_id,
            team_id: None,
        };
        let owner_id = new_organization.owner.as_ref();

        let row = conn
            .transaction(|conn| {
                async move {
                    let organization: OrganizationRow = diesel::insert_into(organizations::table)
                        .values(&organization_row)
                        .returning(OrganizationRow::as_returning())
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(teams::table)
                        .values(&team_rows)
                        .execute(conn)
                        .await?;

                    diesel::insert_into(services::table)
                        .values(&service_rows)
                        .execute(conn)
                        .await?;

                    let bound = diesel::update(users::table.find(owner_id))
                        .set(&owner_binding)
                        .execute(conn)
                        .await?;
                    if bound == 0 {
                        // Roll back the whole create when the owner row
                        // vanished between validation and commit.
                        return Err(diesel::result::Error::NotFound);
                    }

                    Ok(organization)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_create_error(err, &new_organization.slug))?;

        row_to_organization(row)
    }
}
