//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin: they translate between row structs and domain
//! types and map database failures into port errors. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module.
//!
//! # Example
//!
//! ```no_run
//! use taskboard::outbound::persistence::{DbPool, DieselTaskRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/taskboard")).await?;
//! pool.run_migrations().await?;
//! let tasks = DieselTaskRepository::new(pool);
//! # let _ = tasks;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_task_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
