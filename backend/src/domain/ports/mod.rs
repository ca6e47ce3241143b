//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, codec, hashing, code generation) expose typed
//! errors declared with [`define_port_error`]. Driving ports return the
//! domain [`crate::domain::Error`] so inbound adapters can map it directly.

mod macros;
pub(crate) use macros::define_port_error;

mod dashboard_query;
mod family_code_generator;
mod family_service;
mod image_codec;
mod login_service;
mod password_hasher;
mod registration_service;
mod task_command;
mod task_repository;
mod user_repository;

#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::{Dashboard, DashboardQuery};
pub use family_code_generator::FamilyCodeGenerator;
#[cfg(test)]
pub use family_code_generator::MockFamilyCodeGenerator;
#[cfg(test)]
pub use family_service::{MockFamilyCommand, MockFamilyQuery};
pub use family_service::{FamilyCommand, FamilyOverview, FamilyQuery};
pub use image_codec::{ImageCodec, ImageCodecError};
#[cfg(test)]
pub use image_codec::MockImageCodec;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::{Registration, RegistrationService};
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::{TaskCommand, TaskSubmission};
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskPersistenceError, TaskRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
