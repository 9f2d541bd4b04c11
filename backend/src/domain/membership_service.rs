//! Membership domain service: organization creation, admission, and
//! caller binding lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::error::Error;
use crate::domain::organization::Slug;
use crate::domain::ports::{
    CreateOrganizationRequest, CreateOrganizationResponse, JoinOrganizationRequest,
    JoinOrganizationResponse, MembershipBinding, MembershipCommand, MembershipQuery,
    MembershipStatus, NewOrganization, OrganizationRepository, OrganizationRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::user::{Role, User, UserId};

/// Implements [`MembershipCommand`] and [`MembershipQuery`] over the user
/// and organization repositories.
#[derive(Clone)]
pub struct MembershipService<U, O> {
    users: Arc<U>,
    organizations: Arc<O>,
}

impl<U, O> MembershipService<U, O> {
    /// Create a new membership service.
    pub fn new(users: Arc<U>, organizations: Arc<O>) -> Self {
        Self {
            users,
            organizations,
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_organization_error(error: OrganizationRepositoryError) -> Error {
    match error {
        // Backstop for the race where a concurrent create wins between the
        // pre-insert check and the commit; the unique constraint reports it.
        OrganizationRepositoryError::DuplicateSlug { .. } => {
            Error::conflict("Organization slug is already taken")
        }
        other => Error::internal(other.to_string()),
    }
}

/// Trim a list of names, rejecting blank entries.
fn normalise_names(raw: Vec<String>, what: &str) -> Result<Vec<String>, Error> {
    let names: Vec<String> = raw.into_iter().map(|name| name.trim().to_owned()).collect();
    if names.iter().any(String::is_empty) {
        return Err(Error::invalid_request(format!(
            "{what} names must not be empty"
        )));
    }
    Ok(names)
}

impl<U, O> MembershipService<U, O>
where
    U: UserRepository,
    O: OrganizationRepository,
{
    async fn require_user(&self, caller: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(caller)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl<U, O> MembershipCommand for MembershipService<U, O>
where
    U: UserRepository,
    O: OrganizationRepository,
{
    async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<CreateOrganizationResponse, Error> {
        let name = request.name.trim().to_owned();
        let raw_slug = request.slug.trim().to_owned();
        if name.is_empty() || raw_slug.is_empty() {
            return Err(Error::invalid_request(
                "Organization name and slug are required",
            ));
        }
        let slug = Slug::new(raw_slug).map_err(|err| Error::invalid_request(err.to_string()))?;

        if request.services.is_empty() {
            return Err(Error::invalid_request("At least one service is required"));
        }
        if request.teams.is_empty() {
            return Err(Error::invalid_request("At least one team is required"));
        }
        let services = normalise_names(request.services, "Service")?;
        let teams = normalise_names(request.teams, "Team")?;

        self.require_user(&request.caller).await?;

        // Checked before mutation; the unique constraint backstops races.
        if self
            .organizations
            .find_by_slug(&slug)
            .await
            .map_err(map_organization_error)?
            .is_some()
        {
            return Err(Error::conflict("Organization slug is already taken"));
        }

        let created = self
            .organizations
            .create(&NewOrganization {
                name,
                slug,
                owner: request.caller.clone(),
                teams,
                services,
            })
            .await
            .map_err(map_organization_error)?;

        info!(
            organization = %created.id,
            slug = %created.slug,
            owner = %request.caller,
            "organization created"
        );

        Ok(CreateOrganizationResponse {
            organization_id: created.id,
            slug: created.slug,
        })
    }

    async fn join_organization(
        &self,
        request: JoinOrganizationRequest,
    ) -> Result<JoinOrganizationResponse, Error> {
        let name = request.name.trim().to_owned();
        let raw_slug = request.slug.trim().to_owned();
        if name.is_empty() || raw_slug.is_empty() {
            return Err(Error::invalid_request(
                "Organization name and slug are required",
            ));
        }
        let team_name = request.team_name.trim().to_owned();
        if team_name.is_empty() {
            return Err(Error::invalid_request("Team name is required"));
        }
        let slug = Slug::new(raw_slug).map_err(|err| Error::invalid_request(err.to_string()))?;

        let caller = self.require_user(&request.caller).await?;
        if caller.is_member() {
            return Err(Error::conflict(
                "You are already a member of an organization",
            ));
        }

        // Both name and slug must agree. This double-key lookup is the
        // admission contract, not an optimisation; slug alone is not enough.
        let organization = self
            .organizations
            .find_by_name_and_slug(&name, &slug)
            .await
            .map_err(map_organization_error)?
            .ok_or_else(|| {
                Error::not_found("Organization not found. Please check the name and slug.")
            })?;

        let team = self
            .organizations
            .list_teams(organization.id)
            .await
            .map_err(map_organization_error)?
            .into_iter()
            .find(|team| team.name == team_name)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Team \"{team_name}\" not found in this organization"
                ))
            })?;

        self.users
            .bind_membership(&MembershipBinding {
                user_id: request.caller.clone(),
                organization_id: organization.id,
                team_id: Some(team.id),
                role: Role::Member,
            })
            .await
            .map_err(map_user_error)?;

        info!(
            organization = %organization.id,
            team = %team.id,
            member = %request.caller,
            "member admitted"
        );

        Ok(JoinOrganizationResponse { organization, team })
    }
}

#[async_trait]
impl<U, O> MembershipQuery for MembershipService<U, O>
where
    U: UserRepository,
    O: OrganizationRepository,
{
    async fn membership_status(&self, caller: &UserId) -> Result<MembershipStatus, Error> {
        let user = self.require_user(caller).await?;
        let Some(organization_id) = user.organization_id else {
            return Ok(MembershipStatus { organization: None });
        };
        let organization = self
            .organizations
            .find_by_id(organization_id)
            .await
            .map_err(map_organization_error)?;
        if organization.is_none() {
            warn!(
                user = %caller,
                organization = %organization_id,
                "user references a missing organization"
            );
        }
        Ok(MembershipStatus { organization })
    }

    async fn current_user(&self, caller: &UserId) -> Result<User, Error> {
        self.require_user(caller).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::rstest;
    use uuid::Uuid;

    use crate::domain::ErrorCode;
    use crate::domain::organization::{Organization, Team};
    use crate::domain::ports::{MockOrganizationRepository, MockUserRepository};

    use super::*;

    fn caller() -> UserId {
        UserId::new("user_1").expect("valid id")
    }

    fn user(organization_id: Option<Uuid>) -> User {
        User {
            id: caller(),
            display_name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            role: None,
            organization_id,
            team_id: None,
        }
    }

    fn organization(slug: &str) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            name: "Acme".to_owned(),
            slug: Slug::new(slug).expect("valid slug"),
            created_at: Utc::now(),
        }
    }

    fn create_request() -> CreateOrganizationRequest {
        CreateOrganizationRequest {
            caller: caller(),
            name: "Acme".to_owned(),
            slug: "acme".to_owned(),
            services: vec!["API".to_owned(), "Web".to_owned()],
            teams: vec!["Eng".to_owned()],
        }
    }

    fn join_request(team_name: &str) -> JoinOrganizationRequest {
        JoinOrganizationRequest {
            caller: caller(),
            name: "Acme".to_owned(),
            slug: "acme".to_owned(),
            team_name: team_name.to_owned(),
        }
    }

    fn service(
        users: MockUserRepository,
        organizations: MockOrganizationRepository,
    ) -> MembershipService<MockUserRepository, MockOrganizationRepository> {
        MembershipService::new(Arc::new(users), Arc::new(organizations))
    }

    #[rstest]
    #[tokio::test]
    async fn create_stages_all_rows_and_owner() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(caller()))
            .returning(|_| Ok(Some(user(None))));

        let mut organizations = MockOrganizationRepository::new();
        organizations.expect_find_by_slug().returning(|_| Ok(None));
        organizations
            .expect_create()
            .withf(|new_organization| {
                new_organization.name == "Acme"
                    && new_organization.slug.as_str() == "acme"
                    && new_organization.owner == caller()
                    && new_organization.services == vec!["API", "Web"]
                    && new_organization.teams == vec!["Eng"]
            })
            .returning(|new_organization| {
                Ok(Organization {
                    id: Uuid::new_v4(),
                    name: new_organization.name.clone(),
                    slug: new_organization.slug.clone(),
                    created_at: Utc::now(),
                })
            });

        let response = service(users, organizations)
            .create_organization(create_request())
            .await
            .expect("create succeeds");
        assert_eq!(response.slug.as_str(), "acme");
    }

    #[rstest]
    #[case::blank_name("", "acme")]
    #[case::blank_slug("Acme", " ")]
    #[case::unsafe_slug("Acme", "Not A Slug")]
    #[tokio::test]
    async fn create_validates_name_and_slug(#[case] name: &str, #[case] slug: &str) {
        let request = CreateOrganizationRequest {
            name: name.to_owned(),
            slug: slug.to_owned(),
            ..create_request()
        };
        let err = service(MockUserRepository::new(), MockOrganizationRepository::new())
            .create_organization(request)
            .await
            .expect_err("validation fails");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn create_requires_services_and_teams() {
        for request in [
            CreateOrganizationRequest {
                services: Vec::new(),
                ..create_request()
            },
            CreateOrganizationRequest {
                teams: Vec::new(),
                ..create_request()
            },
        ] {
            let err = service(MockUserRepository::new(), MockOrganizationRepository::new())
                .create_organization(request)
                .await
                .expect_err("validation fails");
            assert_eq!(err.code, ErrorCode::InvalidRequest);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_conflicts_on_taken_slug_without_mutating() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(user(None))));

        let mut organizations = MockOrganizationRepository::new();
        organizations
            .expect_find_by_slug()
            .returning(|_| Ok(Some(organization("acme"))));
        organizations.expect_create().never();

        let err = service(users, organizations)
            .create_organization(create_request())
            .await
            .expect_err("slug is taken");
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn create_maps_constraint_race_to_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(user(None))));

        let mut organizations = MockOrganizationRepository::new();
        organizations.expect_find_by_slug().returning(|_| Ok(None));
        organizations
            .expect_create()
            .returning(|_| Err(OrganizationRepositoryError::duplicate_slug("acme")));

        let err = service(users, organizations)
            .create_organization(create_request())
            .await
            .expect_err("constraint violation");
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn join_conflicts_when_already_a_member() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(Some(Uuid::new_v4())))));
        users.expect_bind_membership().never();

        let mut organizations = MockOrganizationRepository::new();
        organizations.expect_find_by_name_and_slug().never();

        let err = service(users, organizations)
            .join_organization(join_request("Eng"))
            .await
            .expect_err("already a member");
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "You are already a member of an organization");
    }

    #[rstest]
    #[tokio::test]
    async fn join_requires_name_and_slug_to_agree() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(user(None))));

        let mut organizations = MockOrganizationRepository::new();
        organizations
            .expect_find_by_name_and_slug()
            .withf(|name, slug| name == "Acme" && slug.as_str() == "acme")
            .returning(|_, _| Ok(None));

        let err = service(users, organizations)
            .join_organization(join_request("Eng"))
            .await
            .expect_err("organization not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn join_team_match_is_case_sensitive_and_non_mutating() {
        let org = organization("acme");
        let org_id = org.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(user(None))));
        users.expect_bind_membership().never();

        let mut organizations = MockOrganizationRepository::new();
        organizations
            .expect_find_by_name_and_slug()
            .returning(move |_, _| Ok(Some(org.clone())));
        organizations.expect_list_teams().returning(move |_| {
            Ok(vec![Team {
                id: Uuid::new_v4(),
                name: "Eng".to_owned(),
                organization_id: org_id,
            }])
        });

        let err = service(users, organizations)
            .join_organization(join_request("eng"))
            .await
            .expect_err("team name is case-sensitive");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("eng"));
    }

    #[rstest]
    #[tokio::test]
    async fn join_binds_member_to_matched_team() {
        let org = organization("acme");
        let org_id = org.id;
        let team_id = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(Some(user(None))));
        users
            .expect_bind_membership()
            .withf(move |binding| {
                binding.user_id == caller()
                    && binding.organization_id == org_id
                    && binding.team_id == Some(team_id)
                    && binding.role == Role::Member
            })
            .returning(|_| Ok(()));

        let mut organizations = MockOrganizationRepository::new();
        organizations
            .expect_find_by_name_and_slug()
            .returning(move |_, _| Ok(Some(org.clone())));
        organizations.expect_list_teams().returning(move |_| {
            Ok(vec![Team {
                id: team_id,
                name: "Eng".to_owned(),
                organization_id: org_id,
            }])
        });

        let response = service(users, organizations)
            .join_organization(join_request("Eng"))
            .await
            .expect("join succeeds");
        assert_eq!(response.team.id, team_id);
        assert_eq!(response.organization.id, org_id);
    }

    #[rstest]
    #[tokio::test]
    async fn membership_status_reports_binding() {
        let org = organization("acme");
        let org_id = org.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user(Some(org_id)))));

        let mut organizations = MockOrganizationRepository::new();
        organizations
            .expect_find_by_id()
            .with(eq(org_id))
            .returning(move |_| Ok(Some(org.clone())));

        let status = service(users, organizations)
            .membership_status(&caller())
            .await
            .expect("status succeeds");
        assert_eq!(
            status.organization.map(|organization| organization.id),
            Some(org_id)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn current_user_is_not_found_for_unknown_identity() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = service(users, MockOrganizationRepository::new())
            .current_user(&caller())
            .await
            .expect_err("unknown identity");
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
