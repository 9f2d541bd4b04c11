//! In-memory adapters and session helpers for tests.
//!
//! Enabled by the `test-support` cargo feature so integration tests can
//! exercise the full HTTP surface without a database. The in-memory
//! repositories share one [`InMemoryStore`] so the transactional
//! organization create stays observable across ports, mirroring the
//! relational adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{HttpResponse, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    CloseOutcome, IncidentRepository, IncidentRepositoryError, MembershipBinding, NewIncident,
    NewOrganization, NewService, OrganizationRepository, OrganizationRepositoryError,
    ServiceRepository, ServiceRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, Incident, Organization, Role, Service, ServiceStatus, Slug, Team, User, UserId,
};
use crate::inbound::http::session::SessionContext;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing key per invocation, names the cookie
/// `session`, and disables the `Secure` flag for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Test-only login resource persisting the path's user id in the session.
///
/// Mount alongside the API under test, then capture the returned cookie
/// and attach it to subsequent requests.
pub fn login_route() -> actix_web::Resource {
    web::resource("/test/login/{user_id}").route(web::post().to(
        |session: SessionContext, path: web::Path<String>| async move {
            let user_id = UserId::new(path.into_inner())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.persist_user(&user_id)?;
            Ok::<_, Error>(HttpResponse::Ok().finish())
        },
    ))
}

/// Log in through [`login_route`] and return the session cookie.
#[cfg(test)]
pub async fn login_cookie<S, B>(app: &S, user_id: &str) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri(&format!("/test/login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<UserId, User>,
    organizations: HashMap<Uuid, Organization>,
    teams: HashMap<Uuid, Team>,
    services: HashMap<Uuid, Service>,
    incidents: HashMap<Uuid, Incident>,
}

/// Shared backing store for the in-memory repository adapters.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("in-memory store poisoned")
    }

    /// Seed a user record, as the external identity provider would.
    pub fn seed_user(&self, user: User) {
        self.lock().users.insert(user.id.clone(), user);
    }

    /// Seed an organization-less user with placeholder profile fields.
    pub fn seed_bare_user(&self, id: &str) -> UserId {
        let user_id = UserId::new(id).expect("valid user id");
        self.seed_user(User {
            id: user_id.clone(),
            display_name: format!("User {id}"),
            email: format!("{id}@example.com"),
            role: None,
            organization_id: None,
            team_id: None,
        });
        user_id
    }

    /// The stored user record, if any.
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.lock().users.get(id).cloned()
    }

    /// The stored service record, if any.
    pub fn service(&self, id: Uuid) -> Option<Service> {
        self.lock().services.get(&id).cloned()
    }
}

/// In-memory [`UserRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    /// Adapter over a shared store.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.store.lock().users.get(id).cloned())
    }

    async fn bind_membership(
        &self,
        binding: &MembershipBinding,
    ) -> Result<(), UserRepositoryError> {
        let mut inner = self.store.lock();
        let user = inner
            .users
            .get_mut(&binding.user_id)
            .ok_or_else(|| UserRepositoryError::query("user row missing"))?;
        user.organization_id = Some(binding.organization_id);
        user.team_id = binding.team_id;
        user.role = Some(binding.role);
        Ok(())
    }
}

/// In-memory [`OrganizationRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryOrganizationRepository {
    store: InMemoryStore,
}

impl InMemoryOrganizationRepository {
    /// Adapter over a shared store.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(self.store.lock().organizations.get(&id).cloned())
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(self
            .store
            .lock()
            .organizations
            .values()
            .find(|organization| organization.slug == *slug)
            .cloned())
    }

    async fn find_by_name_and_slug(
        &self,
        name: &str,
        slug: &Slug,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(self
            .store
            .lock()
            .organizations
            .values()
            .find(|organization| organization.name == name && organization.slug == *slug)
            .cloned())
    }

    async fn list_teams(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Team>, OrganizationRepositoryError> {
        Ok(self
            .store
            .lock()
            .teams
            .values()
            .filter(|team| team.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationRepositoryError> {
        let mut organizations: Vec<Organization> =
            self.store.lock().organizations.values().cloned().collect();
        organizations.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(organizations)
    }

    async fn create(
        &self,
        new_organization: &NewOrganization,
    ) -> Result<Organization, OrganizationRepositoryError> {
        let mut inner = self.store.lock();
        if inner
            .organizations
            .values()
            .any(|organization| organization.slug == new_organization.slug)
        {
            return Err(OrganizationRepositoryError::duplicate_slug(
                new_organization.slug.as_str(),
            ));
        }
        if !inner.users.contains_key(&new_organization.owner) {
            return Err(OrganizationRepositoryError::query("owner row missing"));
        }

        let organization = Organization {
            id: Uuid::new_v4(),
            name: new_organization.name.clone(),
            slug: new_organization.slug.clone(),
            created_at: Utc::now(),
        };
        inner
            .organizations
            .insert(organization.id, organization.clone());
        for name in &new_organization.teams {
            let team = Team {
                id: Uuid::new_v4(),
                name: name.clone(),
                organization_id: organization.id,
            };
            inner.teams.insert(team.id, team);
        }
        for name in &new_organization.services {
            let service = Service {
                id: Uuid::new_v4(),
                name: name.clone(),
                status: ServiceStatus::Operational,
                organization_id: organization.id,
            };
            inner.services.insert(service.id, service);
        }
        let owner = inner
            .users
            .get_mut(&new_organization.owner)
            .expect("checked above");
        owner.organization_id = Some(organization.id);
        owner.team_id = None;
        owner.role = Some(Role::Owner);

        Ok(organization)
    }
}

/// In-memory [`ServiceRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryServiceRepository {
    store: InMemoryStore,
}

impl InMemoryServiceRepository {
    /// Adapter over a shared store.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Service>, ServiceRepositoryError> {
        let mut services: Vec<Service> = self
            .store
            .lock()
            .services
            .values()
            .filter(|service| service.organization_id == organization_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn insert(&self, new_service: &NewService) -> Result<Service, ServiceRepositoryError> {
        let service = Service {
            id: Uuid::new_v4(),
            name: new_service.name.clone(),
            status: new_service.status,
            organization_id: new_service.organization_id,
        };
        self.store
            .lock()
            .services
            .insert(service.id, service.clone());
        Ok(service)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, ServiceRepositoryError> {
        Ok(self.store.lock().services.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ServiceStatus,
    ) -> Result<Service, ServiceRepositoryError> {
        let mut inner = self.store.lock();
        let service = inner
            .services
            .get_mut(&id)
            .ok_or_else(|| ServiceRepositoryError::query("service row missing"))?;
        service.status = status;
        Ok(service.clone())
    }
}

/// In-memory [`IncidentRepository`] with the guarded close.
#[derive(Debug, Clone)]
pub struct InMemoryIncidentRepository {
    store: InMemoryStore,
}

impl InMemoryIncidentRepository {
    /// Adapter over a shared store.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentRepository {
    async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Incident>, IncidentRepositoryError> {
        let mut incidents: Vec<Incident> = self
            .store
            .lock()
            .incidents
            .values()
            .filter(|incident| incident.organization_id == organization_id)
            .cloned()
            .collect();
        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(incidents)
    }

    async fn insert(
        &self,
        new_incident: &NewIncident,
    ) -> Result<Incident, IncidentRepositoryError> {
        let incident = Incident {
            id: Uuid::new_v4(),
            name: new_incident.name.clone(),
            organization_id: new_incident.organization_id,
            created_at: new_incident.created_at,
            closed_at: None,
        };
        self.store
            .lock()
            .incidents
            .insert(incident.id, incident.clone());
        Ok(incident)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, IncidentRepositoryError> {
        Ok(self.store.lock().incidents.get(&id).cloned())
    }

    async fn close(
        &self,
        id: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<CloseOutcome, IncidentRepositoryError> {
        let mut inner = self.store.lock();
        let Some(incident) = inner.incidents.get_mut(&id) else {
            return Ok(CloseOutcome::Missing);
        };
        // Check-and-set under the same lock, like the guarded UPDATE.
        if incident.closed_at.is_some() {
            return Ok(CloseOutcome::AlreadyClosed);
        }
        incident.closed_at = Some(closed_at);
        Ok(CloseOutcome::Closed(incident.clone()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    fn store_with_owner() -> (InMemoryStore, UserId) {
        let store = InMemoryStore::new();
        let owner = store.seed_bare_user("user_owner");
        (store, owner)
    }

    #[tokio::test]
    async fn create_commits_all_rows_together() {
        let (store, owner) = store_with_owner();
        let repo = InMemoryOrganizationRepository::new(store.clone());

        let organization = repo
            .create(&NewOrganization {
                name: "Acme".to_owned(),
                slug: Slug::new("acme").expect("valid slug"),
                owner: owner.clone(),
                teams: vec!["Eng".to_owned()],
                services: vec!["API".to_owned(), "Web".to_owned()],
            })
            .await
            .expect("create succeeds");

        let services = InMemoryServiceRepository::new(store.clone())
            .list_for_organization(organization.id)
            .await
            .expect("list services");
        assert_eq!(services.len(), 2);
        assert!(
            services
                .iter()
                .all(|service| service.status == ServiceStatus::Operational)
        );

        let teams = repo
            .list_teams(organization.id)
            .await
            .expect("list teams");
        assert_eq!(teams.len(), 1);

        let bound = store.user(&owner).expect("owner present");
        assert_eq!(bound.organization_id, Some(organization.id));
        assert_eq!(bound.role, Some(Role::Owner));
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let (store, owner) = store_with_owner();
        let repo = InMemoryOrganizationRepository::new(store);
        let new_organization = NewOrganization {
            name: "Acme".to_owned(),
            slug: Slug::new("acme").expect("valid slug"),
            owner,
            teams: vec!["Eng".to_owned()],
            services: vec!["API".to_owned()],
        };
        repo.create(&new_organization).await.expect("first create");
        let err = repo
            .create(&new_organization)
            .await
            .expect_err("second create");
        assert!(matches!(
            err,
            OrganizationRepositoryError::DuplicateSlug { .. }
        ));
    }

    #[tokio::test]
    async fn guarded_close_has_one_winner() {
        let store = InMemoryStore::new();
        let repo = InMemoryIncidentRepository::new(store);
        let incident = repo
            .insert(&NewIncident {
                name: "API down".to_owned(),
                organization_id: Uuid::new_v4(),
                created_at: Utc::now(),
            })
            .await
            .expect("insert");

        let first = repo.close(incident.id, Utc::now()).await.expect("close");
        assert!(matches!(first, CloseOutcome::Closed(_)));
        let second = repo.close(incident.id, Utc::now()).await.expect("close");
        assert_eq!(second, CloseOutcome::AlreadyClosed);
    }
}
