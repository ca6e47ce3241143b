//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the session cookie security scheme. Swagger UI serves it in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{FamilyOverview, Registration};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::tasks::{
    DashboardResponse, TaskCreatedResponse, TaskImageResponse, TaskResponse,
};
use crate::inbound::http::users::{CredentialsRequest, FamilyCodeRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Family task board API",
        description = "Register, share a family code and post priced tasks with photos."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::get_family,
        crate::inbound::http::users::change_family,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        FamilyCodeRequest,
        Registration,
        FamilyOverview,
        TaskCreatedResponse,
        TaskImageResponse,
        TaskResponse,
        DashboardResponse
    )),
    tags(
        (name = "users", description = "Registration and sessions"),
        (name = "family", description = "Family code membership"),
        (name = "tasks", description = "Posting and listing tasks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
