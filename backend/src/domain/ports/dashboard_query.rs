//! Driving port for the family dashboard.

use async_trait::async_trait;

use crate::domain::{Error, FamilyCode, Task, Username};

/// Tasks visible to a user together with the family code used to select them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub username: Username,
    pub family_code: FamilyCode,
    pub tasks: Vec<Task>,
}

/// Domain use-case port for listing visible tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Tasks authored by everyone currently sharing the acting user's code.
    async fn dashboard(&self, username: &Username) -> Result<Dashboard, Error>;
}
