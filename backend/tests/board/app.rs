//! Shared harness for end-to-end task board tests.
//!
//! Builds the full application over in-memory repositories with cheap
//! password hashing so each test runs against the real wiring.

use std::io::Cursor;
use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use serde_json::{Value, json};

use taskboard::domain::CompressionPolicy;
use taskboard::inbound::http::health::HealthState;
use taskboard::inbound::http::session_config::SessionSettings;
use taskboard::outbound::security::Argon2PasswordHasher;
use taskboard::server::{AppDependencies, IngestionSettings, Repositories, build_http_state};

pub const PASSWORD: &str = "correct-horse";
pub const SESSION_COOKIE: &str = "session";
const BOUNDARY: &str = "taskboard-e2e-boundary";
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Full application dependencies over a fresh in-memory store.
pub fn dependencies() -> AppDependencies {
    let hasher = Argon2PasswordHasher::with_costs(64, 1, 1).expect("argon2 test params");
    let ingestion = IngestionSettings {
        policy: CompressionPolicy::default(),
        workers: 2,
    };
    let http_state = build_http_state(
        Repositories::in_memory(),
        Arc::new(hasher),
        ingestion,
        MAX_UPLOAD_BYTES,
    );
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
    }
}

/// Register `username` and return the issued family code.
pub async fn register<S>(app: &S, username: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({ "username": username, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["username"], username);
    body["familyCode"]
        .as_str()
        .expect("family code in registration body")
        .to_owned()
}

/// Log `username` in and return the session cookie.
pub async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}

/// Fetch the dashboard as the owner of `cookie`.
pub async fn dashboard<S>(app: &S, cookie: &Cookie<'static>) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::get()
            .uri("/api/v1/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    test::read_body_json(response).await
}

/// Switch the session user to `code`.
pub async fn join_family<S>(app: &S, cookie: &Cookie<'static>, code: &str) -> StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::put()
            .uri("/api/v1/family")
            .cookie(cookie.clone())
            .set_json(json!({ "familyCode": code }))
            .to_request(),
    )
    .await
    .status()
}

/// Submit a task with an attached file.
pub async fn post_task<S>(
    app: &S,
    cookie: &Cookie<'static>,
    title: &str,
    file: (&str, &[u8]),
) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (content_type, data) = file;
    let mut body = Vec::new();
    for (name, value) in [
        ("title", title),
        ("description", "Needs doing this week"),
        ("price", "12.50"),
    ] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/tasks")
            .cookie(cookie.clone())
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request(),
    )
    .await
}

/// Busy JPEG that stays large under compression.
pub fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9e37_79b9;
    let image = RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [a, b, c, _] = state.to_le_bytes();
        Rgb([
            (a & 0x3f).wrapping_add(u8::try_from(x % 192).unwrap_or_default()),
            (b & 0x3f).wrapping_add(u8::try_from(y % 192).unwrap_or_default()),
            c & 0x3f,
        ])
    });
    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode_image(&image)
        .expect("encode fixture");
    bytes.into_inner()
}
