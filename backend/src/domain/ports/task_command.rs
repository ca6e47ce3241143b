//! Driving port for task creation.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, TaskDraft, TaskId, Username};

/// Raw task submission as received from an inbound adapter.
#[derive(Debug, Clone)]
pub struct TaskSubmission {
    pub draft: TaskDraft,
    pub image: ImageUpload,
}

/// Domain use-case port for posting tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Run the image through ingestion and persist the task for `owner`.
    ///
    /// Delivery is at-most-once: a failed call stores nothing, and a retried
    /// call may create a second task.
    async fn create_task(
        &self,
        owner: &Username,
        submission: TaskSubmission,
    ) -> Result<TaskId, Error>;
}
