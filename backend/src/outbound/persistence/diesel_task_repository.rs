//! PostgreSQL-backed `TaskRepository`.
//!
//! Images are stored as base64 text next to their pixel dimensions. Family
//! listings join `tasks` to `users` on the owner and filter by the owner's
//! current code, so visibility follows code changes without rewriting tasks.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskPersistenceError, TaskRepository};
use crate::domain::{EncodedImage, FamilyCode, NewTask, Task, TaskId, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::diesel_user_repository::family_code_column;
use super::models::{NewTaskRow, TaskRow};
use super::pool::{DbPool, PoolError};
use super::schema::{tasks, users};

/// Diesel implementation of [`TaskRepository`].
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskPersistenceError {
    TaskPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> TaskPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => TaskPersistenceError::connection("database connection error"),
        DieselFailure::ForeignKeyViolation => {
            TaskPersistenceError::query("task owner does not exist")
        }
        DieselFailure::UniqueViolation => TaskPersistenceError::query("unique constraint violated"),
        DieselFailure::Query(message) => TaskPersistenceError::query(message),
    }
}

fn dimension_column(value: u32) -> Result<i32, TaskPersistenceError> {
    i32::try_from(value).map_err(|_| TaskPersistenceError::query("image dimension overflow"))
}

fn dimension_value(value: i32) -> Result<u32, TaskPersistenceError> {
    u32::try_from(value).map_err(|_| TaskPersistenceError::query("stored dimension is negative"))
}

fn row_to_task(row: TaskRow) -> Result<Task, TaskPersistenceError> {
    let owner = Username::new(&row.owner)
        .map_err(|err| TaskPersistenceError::query(format!("stored owner is invalid: {err}")))?;
    let image = EncodedImage::from_base64(
        &row.image,
        dimension_value(row.image_width)?,
        dimension_value(row.image_height)?,
    )
    .map_err(|err| TaskPersistenceError::query(err.to_string()))?;
    Ok(Task {
        id: TaskId::new(row.id),
        owner,
        title: row.title,
        description: row.description,
        price: row.price,
        image,
    })
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn insert(&self, task: &NewTask) -> Result<TaskId, TaskPersistenceError> {
        let row = NewTaskRow {
            owner: task.owner.as_ref(),
            title: task.draft.title(),
            description: task.draft.description(),
            price: task.draft.price(),
            image: task.image.to_base64(),
            image_width: dimension_column(task.image.width())?,
            image_height: dimension_column(task.image.height())?,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(tasks::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(TaskId::new(id))
    }

    async fn list_for_family(&self, code: FamilyCode) -> Result<Vec<Task>, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TaskRow> = tasks::table
            .inner_join(users::table)
            .filter(users::family_code.eq(family_code_column(code)))
            .order(tasks::id.asc())
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        rows.into_iter().map(row_to_task).collect()
    }
}
