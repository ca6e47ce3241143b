//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;

use crate::domain::Username;
use crate::domain::ports::{
    MockDashboardQuery, MockFamilyCommand, MockFamilyQuery, MockLoginService,
    MockRegistrationService, MockTaskCommand,
};
use crate::inbound::http::state::{DEFAULT_MAX_UPLOAD_BYTES, HttpState, HttpStatePorts};

/// Cookie name used by [`test_session_middleware`].
pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// `POST /api/v1/login` request for `alice`; pair with [`MockPorts::logging_in_as`].
pub fn login_request() -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({ "username": "alice", "password": "hunter2" }))
}

/// Driving-port mocks with no expectations; calling an unprimed port panics.
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub family_query: MockFamilyQuery,
    pub family_command: MockFamilyCommand,
    pub tasks: MockTaskCommand,
    pub dashboard: MockDashboardQuery,
    pub max_upload_bytes: usize,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            login: MockLoginService::new(),
            registration: MockRegistrationService::new(),
            family_query: MockFamilyQuery::new(),
            family_command: MockFamilyCommand::new(),
            tasks: MockTaskCommand::new(),
            dashboard: MockDashboardQuery::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl MockPorts {
    /// Accept any credentials as `username`.
    pub fn logging_in_as(mut self, username: &str) -> Self {
        let username = Username::new(username).expect("valid username");
        self.login
            .expect_authenticate()
            .returning(move |_| Ok(username.clone()));
        self
    }

    /// Freeze the mocks into shared handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            login: Arc::new(self.login),
            registration: Arc::new(self.registration),
            family_query: Arc::new(self.family_query),
            family_command: Arc::new(self.family_command),
            tasks: Arc::new(self.tasks),
            dashboard: Arc::new(self.dashboard),
        };
        web::Data::new(HttpState::new(ports, self.max_upload_bytes))
    }
}

/// Boundary used by [`multipart_body`].
pub const MULTIPART_BOUNDARY: &str = "taskboard-test-boundary";

/// One part of a hand-built `multipart/form-data` body.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub file: Option<(&'a str, &'a str)>,
    pub data: &'a [u8],
}

impl<'a> FormPart<'a> {
    /// Plain text field.
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file: None,
            data: value.as_bytes(),
        }
    }

    /// File field with a filename and declared content type.
    pub fn file(name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file: Some(("upload.bin", content_type)),
            data,
        }
    }
}

/// Encode `parts` as a `multipart/form-data` body using [`MULTIPART_BOUNDARY`].
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((filename, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                    .as_bytes(),
            ),
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// `Content-Type` header value matching [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}
