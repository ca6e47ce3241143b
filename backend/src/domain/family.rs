//! Family directory: who shares a code with whom.
//!
//! Groups are never stored. Membership is whatever the user table says at the
//! moment of the query, so a code change re-scopes visibility of everything
//! the user has authored, in both directions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{
    FamilyCodeGenerator, FamilyCommand, FamilyOverview, FamilyQuery, UserPersistenceError,
    UserRepository,
};
use super::{Error, FamilyCode, Username};

/// Map user repository failures onto the domain error surface.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} already exists"))
        }
    }
}

/// Uniformly random codes from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomFamilyCodeGenerator;

impl FamilyCodeGenerator for RandomFamilyCodeGenerator {
    fn generate(&self) -> FamilyCode {
        FamilyCode::sample(&mut rand::thread_rng())
    }
}

/// Resolves family codes and group membership over a [`UserRepository`].
#[derive(Clone)]
pub struct FamilyDirectory {
    users: Arc<dyn UserRepository>,
    codes: Arc<dyn FamilyCodeGenerator>,
}

impl FamilyDirectory {
    /// Create a directory over the given repository and code source.
    pub fn new(users: Arc<dyn UserRepository>, codes: Arc<dyn FamilyCodeGenerator>) -> Self {
        Self { users, codes }
    }

    /// Current code of `username`, or `None` for unknown users.
    pub async fn family_code_of(&self, username: &Username) -> Result<Option<FamilyCode>, Error> {
        self.users
            .find_by_username(username)
            .await
            .map(|user| user.map(|user| user.family_code()))
            .map_err(map_user_persistence_error)
    }

    /// Overwrite the code of `username`. Returns `false` for unknown users.
    pub async fn set_family_code(&self, username: &Username, code: FamilyCode) -> Result<bool, Error> {
        self.users
            .set_family_code(username, code)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Fresh pseudo-random code. Collisions with existing families are
    /// allowed and silently merge the two groups.
    pub fn generate_code(&self) -> FamilyCode {
        self.codes.generate()
    }

    /// Every user currently holding `code`.
    pub async fn members_of(&self, code: FamilyCode) -> Result<Vec<Username>, Error> {
        self.users
            .list_family_members(code)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Code of an authenticated user, failing when the account has vanished.
    pub(crate) async fn require_family_code(&self, username: &Username) -> Result<FamilyCode, Error> {
        self.family_code_of(username)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    async fn overview_for(&self, code: FamilyCode) -> Result<FamilyOverview, Error> {
        let members = self.members_of(code).await?;
        Ok(FamilyOverview {
            family_code: code,
            members,
        })
    }
}

#[async_trait]
impl FamilyQuery for FamilyDirectory {
    async fn overview(&self, username: &Username) -> Result<FamilyOverview, Error> {
        let code = self.require_family_code(username).await?;
        self.overview_for(code).await
    }
}

#[async_trait]
impl FamilyCommand for FamilyDirectory {
    async fn change_code(
        &self,
        username: &Username,
        code: FamilyCode,
    ) -> Result<FamilyOverview, Error> {
        if !self.set_family_code(username, code).await? {
            return Err(Error::unauthorized("session user no longer exists"));
        }
        info!(username = %username, family_code = %code, "family code changed");
        self.overview_for(code).await
    }
}
