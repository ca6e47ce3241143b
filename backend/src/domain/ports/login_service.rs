//! Driving port for login.
//!
//! Inbound adapters call this to authenticate credentials without knowing the
//! backing store or hashing scheme.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, Username};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated username.
    ///
    /// Unknown accounts and wrong passwords fail identically with
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn authenticate(&self, credentials: &Credentials) -> Result<Username, Error>;
}
