//! Environment parsing helpers for session configuration.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, COOKIE_SECURE_ENV, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Boolean environment toggle with the value debug builds fall back to.
pub(super) struct BoolToggle {
    name: &'static str,
    debug_default: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, debug_default: bool) -> Self {
        Self {
            name,
            debug_default,
        }
    }
}

pub(super) fn parse_bool_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    toggle: BoolToggle,
) -> Result<bool, SessionConfigError> {
    let BoolToggle {
        name,
        debug_default,
    } = toggle;
    let Some(value) = env.string(name) else {
        return debug_warn_or_error(
            mode,
            debug_default,
            SessionConfigError::MissingEnv { name },
            || warn!("{name} not set; defaulting to {debug_default}"),
        );
    };
    if let Some(flag) = parse_bool(&value) {
        return Ok(flag);
    }
    let shown = value.clone();
    debug_warn_or_error(
        mode,
        debug_default,
        SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        },
        || warn!(value = %shown, "invalid {name}; defaulting to {debug_default}"),
    )
}

/// Return `fallback` with a warning in debug builds, `error` otherwise.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => debug_warn_or_error(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || {
                warn!(
                    "{SAMESITE_ENV}=None with {COOKIE_SECURE_ENV}=0; browsers may reject the cookie"
                );
            },
        ),
        _ => {
            let shown = value.clone();
            debug_warn_or_error(
                mode,
                default_same_site,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
                || warn!(value = %shown, "invalid {SAMESITE_ENV}; using default"),
            )
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
