//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{FamilyCode, PasswordHash, User, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => UserPersistenceError::connection("database connection error"),
        DieselFailure::UniqueViolation => UserPersistenceError::query("unique constraint violated"),
        DieselFailure::ForeignKeyViolation => {
            UserPersistenceError::query("foreign key constraint violated")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "family codes are at most 999_999"
)]
pub(super) fn family_code_column(code: FamilyCode) -> i32 {
    code.value() as i32
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user is invalid: {err}"))
    };
    let username = Username::new(&row.username).map_err(invalid)?;
    let password_hash = PasswordHash::new(row.password_hash).map_err(invalid)?;
    let family_code = u32::try_from(row.family_code)
        .ok()
        .and_then(|value| FamilyCode::from_value(value).ok())
        .ok_or_else(|| UserPersistenceError::query("stored family code is out of range"))?;
    Ok(User::new(username, password_hash, family_code))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            username: user.username().as_ref(),
            password_hash: user.password_hash().as_ref(),
            family_code: family_code_column(user.family_code()),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(&err) {
                DieselFailure::UniqueViolation => {
                    UserPersistenceError::duplicate_username(user.username().as_ref())
                }
                _ => map_diesel_error(&err),
            })?;
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;
        row.map(row_to_user).transpose()
    }

    async fn set_family_code(
        &self,
        username: &Username,
        code: FamilyCode,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.filter(users::username.eq(username.as_ref())))
            .set(users::family_code.eq(family_code_column(code)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(updated > 0)
    }

    async fn list_family_members(
        &self,
        code: FamilyCode,
    ) -> Result<Vec<Username>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let names: Vec<String> = users::table
            .filter(users::family_code.eq(family_code_column(code)))
            .order((users::created_at.asc(), users::username.asc()))
            .select(users::username)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        names
            .into_iter()
            .map(|name| {
                Username::new(name).map_err(|err| {
                    UserPersistenceError::query(format!("stored username is invalid: {err}"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(username: &str, family_code: i32) -> UserRow {
        UserRow {
            username: username.to_owned(),
            password_hash: "$argon2id$v=19$stub".to_owned(),
            family_code,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_become_users() {
        let user = row_to_user(row("alice", 482_913)).expect("valid row");
        assert_eq!(user.username().as_ref(), "alice");
        assert_eq!(user.family_code().value(), 482_913);
    }

    #[rstest]
    #[case(row("a b", 482_913))]
    #[case(row("alice", 12))]
    #[case(row("alice", -482_913))]
    fn corrupt_rows_are_query_errors(#[case] row: UserRow) {
        assert!(matches!(
            row_to_user(row),
            Err(UserPersistenceError::Query { .. })
        ));
    }

    #[rstest]
    fn family_codes_fit_the_column() {
        let code = FamilyCode::new("999999").expect("valid family code");
        assert_eq!(family_code_column(code), 999_999);
    }
}
