//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers resolve the acting user from the session cookie and talk to the
//! domain only through the driving ports bundled in [`state::HttpState`].

pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

/// Mount every `/api/v1` endpoint on `cfg`.
///
/// The session middleware is applied by the caller so tests and the server
/// can pick their own cookie settings.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::get_family)
        .service(users::change_family)
        .service(tasks::create_task)
        .service(tasks::dashboard);
}
