//! Family task board backend.
//!
//! Users register, share a six-digit family code and post priced tasks with
//! a photo. Every photo is normalised to a bounded JPEG before storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
