//! Tests for account and family HTTP handlers.

use super::*;
use crate::domain::Username;
use crate::inbound::http::test_utils::{
    MockPorts, login_request, session_cookie, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::Value;

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(login)
                .service(logout)
                .service(get_family)
                .service(change_family),
        )
}

fn username(raw: &str) -> Username {
    Username::new(raw).expect("valid username")
}

fn code(raw: &str) -> FamilyCode {
    FamilyCode::new(raw).expect("valid family code")
}

fn credentials(username: &str, password: &str) -> CredentialsRequest {
    CredentialsRequest {
        username: username.into(),
        password: password.into(),
    }
}

#[actix_web::test]
async fn register_returns_created_with_family_code() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register()
        .withf(|creds| creds.username().as_ref() == "alice" && creds.password() == "hunter2")
        .times(1)
        .returning(|creds| {
            Ok(Registration {
                username: creds.username().clone(),
                family_code: FamilyCode::new("482913").expect("valid family code"),
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(credentials("alice", "hunter2"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["familyCode"], "482913");
}

#[rstest]
#[case("   ", "pw", "username", "empty_username")]
#[case("al", "pw", "username", "username_too_short")]
#[case("bob smith", "pw", "username", "invalid_username")]
#[case("alice", "", "password", "empty_password")]
#[actix_web::test]
async fn register_rejects_invalid_credentials(
    #[case] name: &str,
    #[case] password: &str,
    #[case] field: &str,
    #[case] detail_code: &str,
) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(credentials(name, password))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], detail_code);
}

#[actix_web::test]
async fn register_conflict_maps_to_409() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register()
        .returning(|_| Err(Error::conflict("username alice already exists")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(credentials("alice", "hunter2"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn login_failure_sets_no_session() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .returning(|_| Err(Error::unauthorized("invalid credentials")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(&app, login_request().to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(
        res.response()
            .cookies()
            .all(|cookie| cookie.name() != "session")
    );
}

#[actix_web::test]
async fn family_requires_login() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/family")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn family_overview_uses_session_username() {
    let mut ports = MockPorts::default().logging_in_as("alice");
    ports
        .family_query
        .expect_overview()
        .with(eq(username("alice")))
        .times(1)
        .returning(|_| {
            Ok(FamilyOverview {
                family_code: FamilyCode::new("482913").expect("valid family code"),
                members: vec![
                    Username::new("alice").expect("valid username"),
                    Username::new("bob").expect("valid username"),
                ],
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let login_res = actix_test::call_service(&app, login_request().to_request()).await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/family")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["familyCode"], "482913");
    assert_eq!(body["members"], serde_json::json!(["alice", "bob"]));
}

#[rstest]
#[case("12345")]
#[case("012345")]
#[case("abcdef")]
#[actix_web::test]
async fn change_family_rejects_malformed_codes(#[case] raw: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default().logging_in_as("alice"))).await;
    let cookie = session_cookie(&actix_test::call_service(&app, login_request().to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/family")
            .cookie(cookie)
            .set_json(FamilyCodeRequest {
                family_code: raw.into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "familyCode");
}

#[actix_web::test]
async fn change_family_passes_parsed_code() {
    let mut ports = MockPorts::default().logging_in_as("alice");
    ports
        .family_command
        .expect_change_code()
        .with(eq(username("alice")), eq(code("222222")))
        .times(1)
        .returning(|name, family_code| {
            Ok(FamilyOverview {
                family_code,
                members: vec![name.clone()],
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&actix_test::call_service(&app, login_request().to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/family")
            .cookie(cookie)
            .set_json(FamilyCodeRequest {
                family_code: " 222222 ".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["familyCode"], "222222");
    assert_eq!(body["members"], serde_json::json!(["alice"]));
}

#[actix_web::test]
async fn logout_clears_session() {
    let app = actix_test::init_service(test_app(MockPorts::default().logging_in_as("alice"))).await;
    let cookie = session_cookie(&actix_test::call_service(&app, login_request().to_request()).await);

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&logout_res);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/family")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
