//! Port for task persistence.

use async_trait::async_trait;

use crate::domain::{FamilyCode, NewTask, Task, TaskId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by task repository adapters.
    pub enum TaskPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Port for the task store.
///
/// The store trusts its callers: image payloads are persisted as given and
/// never re-validated against the ingestion budget.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new immutable task and return its assigned identifier.
    ///
    /// Identifiers increase with insertion order.
    async fn insert(&self, task: &NewTask) -> Result<TaskId, TaskPersistenceError>;

    /// Every task authored by a user whose family code is currently `code`,
    /// in insertion order.
    ///
    /// An unknown or empty family yields an empty list, never an error.
    async fn list_for_family(&self, code: FamilyCode)
    -> Result<Vec<Task>, TaskPersistenceError>;
}
