//! Account and family API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","password":"hunter2"}
//! POST /api/v1/login {"username":"alice","password":"hunter2"}
//! POST /api/v1/logout
//! GET /api/v1/family
//! PUT /api/v1/family {"familyCode":"482913"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{FamilyOverview, Registration};
use crate::domain::{
    ApiResult, Credentials, CredentialsValidationError, Error, FamilyCode, UserValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials body shared by `POST /api/v1/register` and `POST /api/v1/login`.
///
/// Example JSON:
/// `{"username":"alice","password":"hunter2"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Body for `PUT /api/v1/family`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyCodeRequest {
    #[schema(example = "482913")]
    pub family_code: String,
}

fn map_credentials_validation_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match &err {
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::Username(inner) => (
            "username",
            match inner {
                UserValidationError::EmptyUsername => "empty_username",
                UserValidationError::UsernameTooShort { .. } => "username_too_short",
                UserValidationError::UsernameTooLong { .. } => "username_too_long",
                _ => "invalid_username",
            },
        ),
    };
    warn!(field, code, "rejected credentials payload");
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn parse_credentials(payload: CredentialsRequest) -> Result<Credentials, Error> {
    Credentials::try_from(payload).map_err(map_credentials_validation_error)
}

/// Create an account with a freshly generated family code.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = Registration),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = parse_credentials(payload.into_inner())?;
    let registration = state.registration.register(&credentials).await?;
    Ok(HttpResponse::Created().json(registration))
}

/// Authenticate and bind the username to the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = parse_credentials(payload.into_inner())?;
    let username = state.login.authenticate(&credentials).await?;
    session.persist_user(&username)?;
    Ok(HttpResponse::Ok().finish())
}

/// Drop the session binding.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Current family code and the members sharing it.
#[utoipa::path(
    get,
    path = "/api/v1/family",
    responses(
        (status = 200, description = "Family overview", body = FamilyOverview),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["family"],
    operation_id = "getFamily"
)]
#[get("/family")]
pub async fn get_family(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FamilyOverview>> {
    let username = session.require_username()?;
    let overview = state.family_query.overview(&username).await?;
    Ok(web::Json(overview))
}

/// Join another family by adopting its code.
#[utoipa::path(
    put,
    path = "/api/v1/family",
    request_body = FamilyCodeRequest,
    responses(
        (status = 200, description = "Family changed", body = FamilyOverview),
        (status = 400, description = "Invalid family code", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["family"],
    operation_id = "changeFamily"
)]
#[put("/family")]
pub async fn change_family(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FamilyCodeRequest>,
) -> ApiResult<web::Json<FamilyOverview>> {
    let username = session.require_username()?;
    let code = FamilyCode::new(&payload.family_code).map_err(|err| {
        warn!(%username, "rejected family code");
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "familyCode", "code": "invalid_family_code" }))
    })?;
    let overview = state.family_command.change_code(&username, code).await?;
    Ok(web::Json(overview))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
