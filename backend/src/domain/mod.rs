//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed entities of the family task board and
//! the use-cases that operate on them. Adapters live in `inbound` and
//! `outbound`; nothing here knows about HTTP, SQL or image file formats.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, Username, FamilyCode: accounts and their family membership.
//! - Task, TaskDraft, NewTask: posted tasks.
//! - SizeConstrainedCompressor, ImageIngestionPool: the upload pipeline.
//! - FamilyDirectory, AccountService, TaskBoardService: use-case services.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod family;
pub mod image;
pub mod image_ingestion;
pub mod ports;
pub mod task;
pub mod task_board;
pub mod trace_id;
pub mod user;

pub use self::accounts::AccountService;
pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::family::{FamilyDirectory, RandomFamilyCodeGenerator};
pub use self::image::{
    EncodeOptions, EncodedImage, ImageBounds, ImageTextDecodeError, Quality,
    STORED_IMAGE_CONTENT_TYPE,
};
pub use self::image_ingestion::{
    CompressionPolicy, CompressionPolicyError, ImageIngestionError, ImageIngestionPool,
    ImageUpload, SizeConstrainedCompressor,
};
pub use self::task::{NewTask, Task, TaskDraft, TaskId, TaskValidationError};
pub use self::task_board::TaskBoardService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    FAMILY_CODE_MAX, FAMILY_CODE_MIN, FamilyCode, PasswordHash, User, UserValidationError,
    Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use taskboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
