//! Port for user identity resolution and membership binding.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Membership binding applied to a user when they create or join an
/// organization.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipBinding {
    /// The user being bound.
    pub user_id: UserId,
    /// The organization joined or created.
    pub organization_id: Uuid,
    /// Team joined through; `None` for organization creators.
    pub team_id: Option<Uuid>,
    /// Role granted by the binding.
    pub role: Role,
}

/// Port resolving caller identities to user records and binding
/// memberships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their external identity reference.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Bind a user to an organization (and optionally a team) with a role.
    async fn bind_membership(
        &self,
        binding: &MembershipBinding,
    ) -> Result<(), UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn bind_membership(
        &self,
        _binding: &MembershipBinding,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_find_returns_none() {
        let repo = FixtureUserRepository;
        let found = repo
            .find_by_id(&UserId::new("user_1").expect("valid id"))
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_bind_succeeds() {
        let repo = FixtureUserRepository;
        let binding = MembershipBinding {
            user_id: UserId::new("user_1").expect("valid id"),
            organization_id: Uuid::new_v4(),
            team_id: None,
            role: Role::Owner,
        };
        repo.bind_membership(&binding)
            .await
            .expect("fixture bind succeeds");
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = UserRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
