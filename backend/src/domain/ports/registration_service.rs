//! Driving port for account registration.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Credentials, Error, FamilyCode, Username};

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
    #[schema(value_type = String, example = "482913")]
    pub family_code: FamilyCode,
}

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account with a freshly generated family code.
    ///
    /// A taken username fails with [`crate::domain::ErrorCode::Conflict`].
    async fn register(&self, credentials: &Credentials) -> Result<Registration, Error>;
}
