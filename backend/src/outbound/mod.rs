//! Outbound adapters implementing the domain ports.
//!
//! - `memory`: in-process users and tasks.
//! - `persistence`: PostgreSQL via Diesel.
//! - `raster`: image codec backed by the `image` crate.
//! - `security`: Argon2id password hashing.

pub mod memory;
pub mod persistence;
pub mod raster;
pub mod security;
