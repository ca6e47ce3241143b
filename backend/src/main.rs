//! Task board entry point: loads settings, wires adapters and serves HTTP.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use taskboard::inbound::http::health::HealthState;
use taskboard::inbound::http::session_config::{BuildMode, session_settings_from_env};
use taskboard::outbound::security::Argon2PasswordHasher;
use taskboard::server::{
    AppDependencies, AppSettings, IngestionSettings, Repositories, build_http_state,
    create_server,
};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let repositories = match settings.database_url.as_deref() {
        Some(url) => Repositories::postgres(url)
            .await
            .wrap_err("failed to prepare database")?,
        None => {
            warn!("TASKBOARD_DATABASE_URL not set; data lives in memory only");
            Repositories::in_memory()
        }
    };
    let ingestion = IngestionSettings {
        policy: settings
            .compression_policy()
            .wrap_err("invalid image limits")?,
        workers: settings.ingestion_workers,
    };
    let http_state = build_http_state(
        repositories,
        Arc::new(Argon2PasswordHasher::default()),
        ingestion,
        settings.max_upload_bytes,
    );

    let bind_addr = settings.bind_addr();
    info!(host = %bind_addr.0, port = bind_addr.1, "starting server");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        AppDependencies {
            health_state: health_state.clone(),
            http_state: web::Data::new(http_state),
            session,
        },
        bind_addr,
    )?;
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
