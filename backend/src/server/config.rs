//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from a `--flag`, a `TASKBOARD_*` environment variable
//! or a configuration file; absent values fall back to the defaults below.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CompressionPolicy, CompressionPolicyError, ImageBounds};

const DEFAULT_HOST: &str = "0.0.0.0";

/// Runtime settings for the task board server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKBOARD")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string; unset keeps everything in memory.
    pub database_url: Option<String>,
    /// Cap on raw multipart bytes read per task submission.
    #[ortho_config(default = 10_485_760)]
    pub max_upload_bytes: usize,
    /// Concurrent image compressions.
    #[ortho_config(default = 4)]
    pub ingestion_workers: usize,
    /// Largest stored photo in bytes.
    #[ortho_config(default = 600_000)]
    pub max_image_bytes: usize,
    /// Bounding box width for stored photos.
    #[ortho_config(default = 600)]
    pub max_width: u32,
    /// Bounding box height for stored photos.
    #[ortho_config(default = 300)]
    pub max_height: u32,
}

impl AppSettings {
    /// Socket address parts for `HttpServer::bind`.
    pub fn bind_addr(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            self.port,
        )
    }

    /// Compression policy built from the image limits.
    pub fn compression_policy(&self) -> Result<CompressionPolicy, CompressionPolicyError> {
        CompressionPolicy::new(
            self.max_image_bytes,
            ImageBounds::new(self.max_width, self.max_height),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading.

    use super::*;
    use std::ffi::OsString;

    use crate::domain::image_ingestion::{
        DEFAULT_MAX_HEIGHT, DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_WIDTH,
    };
    use crate::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "TASKBOARD_HOST",
        "TASKBOARD_PORT",
        "TASKBOARD_DATABASE_URL",
        "TASKBOARD_MAX_UPLOAD_BYTES",
        "TASKBOARD_INGESTION_WORKERS",
        "TASKBOARD_MAX_IMAGE_BYTES",
        "TASKBOARD_MAX_WIDTH",
        "TASKBOARD_MAX_HEIGHT",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("taskboard")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), (DEFAULT_HOST.to_owned(), 8080));
        assert!(settings.database_url.is_none());
        assert_eq!(settings.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(settings.ingestion_workers, 4);
        let policy = settings.compression_policy().expect("default policy");
        assert_eq!(policy.max_bytes(), DEFAULT_MAX_IMAGE_BYTES);
        assert_eq!(
            policy.bounds(),
            ImageBounds::new(DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TASKBOARD_HOST", Some("127.0.0.1".to_owned())),
            ("TASKBOARD_PORT", Some("9090".to_owned())),
            (
                "TASKBOARD_DATABASE_URL",
                Some("postgres://localhost/taskboard".to_owned()),
            ),
            ("TASKBOARD_MAX_UPLOAD_BYTES", None),
            ("TASKBOARD_INGESTION_WORKERS", Some("2".to_owned())),
            ("TASKBOARD_MAX_IMAGE_BYTES", Some("100000".to_owned())),
            ("TASKBOARD_MAX_WIDTH", Some("320".to_owned())),
            ("TASKBOARD_MAX_HEIGHT", Some("200".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), ("127.0.0.1".to_owned(), 9090));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/taskboard")
        );
        assert_eq!(settings.ingestion_workers, 2);
        let policy = settings.compression_policy().expect("custom policy");
        assert_eq!(policy.max_bytes(), 100_000);
        assert_eq!(policy.bounds(), ImageBounds::new(320, 200));
    }

    #[rstest]
    fn zero_budget_is_rejected() {
        let settings = AppSettings {
            host: None,
            port: 8080,
            database_url: None,
            max_upload_bytes: 1024,
            ingestion_workers: 1,
            max_image_bytes: 0,
            max_width: 600,
            max_height: 300,
        };
        assert_eq!(
            settings.compression_policy(),
            Err(CompressionPolicyError::ZeroBudget)
        );
    }
}
