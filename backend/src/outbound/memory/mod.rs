//! In-process store implementing both repository ports.
//!
//! Used when no database URL is configured and as the backing store for
//! HTTP integration tests. Semantics match the Diesel adapters: usernames are
//! unique, task ids grow with insertion order, and family listings join on
//! the owners' current codes.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    TaskPersistenceError, TaskRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{FamilyCode, NewTask, Task, TaskId, User, Username};

#[derive(Default)]
struct BoardState {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_task_id: i64,
}

impl BoardState {
    fn user_mut(&mut self, username: &Username) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.username() == username)
    }
}

/// Thread-safe in-memory users and tasks.
#[derive(Default)]
pub struct InMemoryBoardStore {
    state: RwLock<BoardState>,
}

impl InMemoryBoardStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryBoardStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username() == user.username()) {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn set_family_code(
        &self,
        username: &Username,
        code: FamilyCode,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.state.write().await;
        let Some(user) = state.user_mut(username) else {
            return Ok(false);
        };
        *user = user.clone().with_family_code(code);
        Ok(true)
    }

    async fn list_family_members(
        &self,
        code: FamilyCode,
    ) -> Result<Vec<Username>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|user| user.family_code() == code)
            .map(|user| user.username().clone())
            .collect())
    }
}

#[async_trait]
impl TaskRepository for InMemoryBoardStore {
    async fn insert(&self, task: &NewTask) -> Result<TaskId, TaskPersistenceError> {
        let mut state = self.state.write().await;
        if !state.users.iter().any(|user| user.username() == &task.owner) {
            return Err(TaskPersistenceError::query(format!(
                "task owner {} does not exist",
                task.owner
            )));
        }
        state.next_task_id += 1;
        let id = TaskId::new(state.next_task_id);
        state.tasks.push(Task::from_new(id, task.clone()));
        Ok(id)
    }

    async fn list_for_family(&self, code: FamilyCode) -> Result<Vec<Task>, TaskPersistenceError> {
        // Members and tasks are read under one lock so the join is consistent.
        let state = self.state.read().await;
        let members: HashSet<&Username> = state
            .users
            .iter()
            .filter(|user| user.family_code() == code)
            .map(User::username)
            .collect();
        Ok(state
            .tasks
            .iter()
            .filter(|task| members.contains(&task.owner))
            .cloned()
            .collect())
    }
}
