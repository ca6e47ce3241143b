//! Driving ports for reading and changing family membership.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, FamilyCode, Username};

/// Snapshot of a user's family as of one query.
///
/// `members` was read with the same `family_code` value that is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyOverview {
    #[schema(value_type = String, example = "482913")]
    pub family_code: FamilyCode,
    #[schema(value_type = Vec<String>, example = json!(["alice", "bob"]))]
    pub members: Vec<Username>,
}

/// Read side of the family directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FamilyQuery: Send + Sync {
    /// Current code and members for the acting user.
    async fn overview(&self, username: &Username) -> Result<FamilyOverview, Error>;
}

/// Write side of the family directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FamilyCommand: Send + Sync {
    /// Move the acting user to `code` and return the resulting family.
    async fn change_code(
        &self,
        username: &Username,
        code: FamilyCode,
    ) -> Result<FamilyOverview, Error>;
}
