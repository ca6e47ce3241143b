//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DashboardQuery, FamilyCommand, FamilyQuery, LoginService, RegistrationService, TaskCommand,
};

/// Largest multipart body accepted by default (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub family_query: Arc<dyn FamilyQuery>,
    pub family_command: Arc<dyn FamilyCommand>,
    pub tasks: Arc<dyn TaskCommand>,
    pub dashboard: Arc<dyn DashboardQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub family_query: Arc<dyn FamilyQuery>,
    pub family_command: Arc<dyn FamilyCommand>,
    pub tasks: Arc<dyn TaskCommand>,
    pub dashboard: Arc<dyn DashboardQuery>,
    /// Upper bound on raw upload bytes read from a task submission.
    pub max_upload_bytes: usize,
}

impl HttpState {
    /// Construct state with an explicit upload cap.
    #[must_use]
    pub fn new(ports: HttpStatePorts, max_upload_bytes: usize) -> Self {
        let HttpStatePorts {
            login,
            registration,
            family_query,
            family_command,
            tasks,
            dashboard,
        } = ports;
        Self {
            login,
            registration,
            family_query,
            family_command,
            tasks,
            dashboard,
            max_upload_bytes,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_MAX_UPLOAD_BYTES)
    }
}
