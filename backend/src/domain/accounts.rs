//! Registration and login over the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::family::{FamilyDirectory, map_user_persistence_error};
use super::ports::{
    LoginService, PasswordHashError, PasswordHasher, Registration, RegistrationService,
    UserRepository,
};
use super::{Credentials, Error, PasswordHash, User, Username};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const DECOY_PASSWORD: &str = "taskboard-decoy-password";

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("credential check failed: {error}"))
}

/// Account use-cases: create users and check their passwords.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    directory: FamilyDirectory,
    decoy: Option<PasswordHash>,
}

impl AccountService {
    /// Create the service from its collaborators.
    ///
    /// A decoy hash is computed up front so logins for unknown usernames pay
    /// the same verification cost as real ones.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        directory: FamilyDirectory,
    ) -> Self {
        let decoy = match hasher.hash(DECOY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(error) => {
                warn!(%error, "decoy hash unavailable; unknown logins skip verification");
                None
            }
        };
        Self {
            users,
            hasher,
            directory,
            decoy,
        }
    }

    fn verify_decoy(&self, password: &str) {
        let Some(decoy) = &self.decoy else {
            return;
        };
        if let Err(error) = self.hasher.verify(password, decoy) {
            warn!(%error, "decoy verification failed");
        }
    }

    fn already_exists(username: &Username) -> Error {
        Error::conflict(format!("username {username} already exists"))
    }
}

#[async_trait]
impl RegistrationService for AccountService {
    async fn register(&self, credentials: &Credentials) -> Result<Registration, Error> {
        let username = credentials.username();
        let existing = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            warn!(username = %username, "registration rejected: username taken");
            return Err(Self::already_exists(username));
        }

        let password_hash = self
            .hasher
            .hash(credentials.password())
            .map_err(map_hash_error)?;
        let family_code = self.directory.generate_code();
        let user = User::new(username.clone(), password_hash, family_code);
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;

        info!(username = %username, family_code = %family_code, "user registered");
        Ok(Registration {
            username: username.clone(),
            family_code,
        })
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Username, Error> {
        let username = credentials.username();
        let Some(user) = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_persistence_error)?
        else {
            self.verify_decoy(credentials.password());
            warn!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(map_hash_error)?;
        if !matches {
            warn!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(username = %username, "user logged in");
        Ok(username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::ErrorCode;
    use crate::domain::family::RandomFamilyCodeGenerator;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use crate::domain::FamilyCode;
    use rstest::{fixture, rstest};

    /// Reversible stand-in so tests skip the cost of a real KDF.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
            PasswordHash::new(format!("plain${password}"))
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        }

        fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
            hash.as_ref()
                .strip_prefix("plain$")
                .map(|stored| stored == password)
                .ok_or_else(|| PasswordHashError::malformed_hash("missing prefix"))
        }
    }

    /// Counts verifications on top of [`PlainHasher`].
    #[derive(Default)]
    struct CountingHasher {
        verifications: AtomicUsize,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
            PlainHasher.hash(password)
        }

        fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            PlainHasher.verify(password, hash)
        }
    }

    fn service(users: MockUserRepository) -> AccountService {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let directory =
            FamilyDirectory::new(Arc::clone(&users), Arc::new(RandomFamilyCodeGenerator));
        AccountService::new(users, Arc::new(PlainHasher), directory)
    }

    fn stored(name: &str, hash: &str) -> User {
        User::new(
            Username::new(name).expect("valid username"),
            PasswordHash::new(hash).expect("non-empty hash"),
            FamilyCode::new("482913").expect("valid family code"),
        )
    }

    #[fixture]
    fn alice() -> Credentials {
        Credentials::try_from_parts("alice", "hunter2").expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn register_stores_hashed_password_and_code(alice: Credentials) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_insert()
            .withf(|user| {
                user.username().as_ref() == "alice"
                    && user.password_hash().as_ref() == "plain$hunter2"
                    && (100_000..=999_999).contains(&user.family_code().value())
            })
            .times(1)
            .returning(|_| Ok(()));

        let registration = service(users).register(&alice).await.expect("registered");

        assert_eq!(registration.username.as_ref(), "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_taken_username(alice: Credentials) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(stored("alice", "plain$other"))));
        users.expect_insert().never();

        let err = service(users)
            .register(&alice)
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(err.message().contains("already exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn register_reports_insert_race_as_conflict(alice: Credentials) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_insert()
            .returning(|_| Err(UserPersistenceError::duplicate_username("alice")));

        let err = service(users)
            .register(&alice)
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_accepts_matching_password(alice: Credentials) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(stored("alice", "plain$hunter2"))));

        let username = service(users)
            .authenticate(&alice)
            .await
            .expect("authenticated");

        assert_eq!(username.as_ref(), "alice");
    }

    #[rstest]
    #[case(Some("plain$different"))]
    #[case(None)]
    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_identical(
        alice: Credentials,
        #[case] stored_hash: Option<&'static str>,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(stored_hash.map(|hash| stored("alice", hash))));

        let err = service(users)
            .authenticate(&alice)
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_stored_hash_is_internal(alice: Credentials) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(stored("alice", "not-a-hash"))));

        let err = service(users)
            .authenticate(&alice)
            .await
            .expect_err("malformed");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("plain$different"))]
    #[tokio::test]
    async fn every_rejected_login_runs_one_verification(
        alice: Credentials,
        #[case] stored_hash: Option<&'static str>,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(stored_hash.map(|hash| stored("alice", hash))));
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let hasher = Arc::new(CountingHasher::default());
        let directory =
            FamilyDirectory::new(Arc::clone(&users), Arc::new(RandomFamilyCodeGenerator));
        let accounts = AccountService::new(users, hasher.clone(), directory);

        let err = accounts.authenticate(&alice).await.expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), 1);
    }
}
