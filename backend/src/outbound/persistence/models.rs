//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain values on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{tasks, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub family_code: i32,
    #[expect(dead_code, reason = "audit column not surfaced in the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub family_code: i32,
}

/// Row read from `tasks`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub image_width: i32,
    pub image_height: i32,
    #[expect(dead_code, reason = "audit column not surfaced in the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable task.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(crate) struct NewTaskRow<'a> {
    pub owner: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub price: &'a str,
    pub image: String,
    pub image_width: i32,
    pub image_height: i32,
}
