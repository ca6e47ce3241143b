//! Task creation and the family dashboard.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::family::FamilyDirectory;
use super::image_ingestion::ImageIngestionPool;
use super::ports::{
    Dashboard, DashboardQuery, TaskCommand, TaskPersistenceError, TaskRepository, TaskSubmission,
};
use super::{Error, NewTask, TaskId, Username};

fn map_task_persistence_error(error: TaskPersistenceError) -> Error {
    match error {
        TaskPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("task repository unavailable: {message}"))
        }
        TaskPersistenceError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
    }
}

/// Task use-cases: ingest and store new tasks, list tasks for a family.
#[derive(Clone)]
pub struct TaskBoardService {
    tasks: Arc<dyn TaskRepository>,
    directory: FamilyDirectory,
    ingestion: ImageIngestionPool,
}

impl TaskBoardService {
    /// Create the service from its collaborators.
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        directory: FamilyDirectory,
        ingestion: ImageIngestionPool,
    ) -> Self {
        Self {
            tasks,
            directory,
            ingestion,
        }
    }
}

#[async_trait]
impl TaskCommand for TaskBoardService {
    async fn create_task(
        &self,
        owner: &Username,
        submission: TaskSubmission,
    ) -> Result<TaskId, Error> {
        let TaskSubmission { draft, image } = submission;
        let image = self.ingestion.ingest(image).await?;
        let task = NewTask {
            owner: owner.clone(),
            draft,
            image,
        };
        let id = self
            .tasks
            .insert(&task)
            .await
            .map_err(map_task_persistence_error)?;

        info!(
            task_id = %id,
            owner = %owner,
            image_bytes = task.image.len(),
            width = task.image.width(),
            height = task.image.height(),
            "task created"
        );
        Ok(id)
    }
}

#[async_trait]
impl DashboardQuery for TaskBoardService {
    async fn dashboard(&self, username: &Username) -> Result<Dashboard, Error> {
        // One read of the code; the listing must not see a later change.
        let family_code = self.directory.require_family_code(username).await?;
        let tasks = self
            .tasks
            .list_for_family(family_code)
            .await
            .map_err(map_task_persistence_error)?;
        Ok(Dashboard {
            username: username.clone(),
            family_code,
            tasks,
        })
    }
}
