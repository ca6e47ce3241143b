//! Task board API handlers.
//!
//! ```text
//! POST /api/v1/tasks   multipart/form-data: title, description, price, image
//! GET  /api/v1/dashboard
//! ```
//!
//! Uploads are streamed field by field and the running byte total is capped
//! at [`HttpState::max_upload_bytes`] before anything reaches the domain.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, get, post, web};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::{Dashboard, TaskSubmission};
use crate::domain::{
    ApiResult, Error, ImageUpload, STORED_IMAGE_CONTENT_TYPE, Task, TaskDraft, TaskId,
    TaskValidationError,
};
use crate::inbound::http::error::map_multipart_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const IMAGE_FIELD: &str = "image";

/// Response body for `POST /api/v1/tasks`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskCreatedResponse {
    #[schema(value_type = i64, example = 42)]
    pub id: TaskId,
}

/// Stored photo as rendered to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskImageResponse {
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    /// Base64-encoded image bytes.
    pub data: String,
}

/// One visible task.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: TaskImageResponse,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let image = TaskImageResponse {
            content_type: STORED_IMAGE_CONTENT_TYPE.to_owned(),
            width: task.image.width(),
            height: task.image.height(),
            data: task.image.to_base64(),
        };
        Self {
            id: task.id.value(),
            owner: task.owner.into(),
            title: task.title,
            description: task.description,
            price: task.price,
            image,
        }
    }
}

/// Response body for `GET /api/v1/dashboard`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "482913")]
    pub family_code: String,
    pub tasks: Vec<TaskResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(board: Dashboard) -> Self {
        Self {
            username: board.username.into(),
            family_code: board.family_code.into(),
            tasks: board.tasks.into_iter().map(TaskResponse::from).collect(),
        }
    }
}

/// Form fields collected from a task submission.
#[derive(Default)]
struct TaskForm {
    title: String,
    description: String,
    price: String,
    image: Option<ImageUpload>,
}

async fn read_field(field: &mut Field, remaining: &mut usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err| map_multipart_error(&err))?
    {
        if chunk.len() > *remaining {
            warn!("task upload exceeded the request size cap");
            return Err(Error::payload_too_large("upload exceeds the size limit"));
        }
        *remaining -= chunk.len();
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

fn into_text(name: &str, bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|_| {
        Error::invalid_request(format!("{name} must be UTF-8 text"))
            .with_details(json!({ "field": name, "code": "invalid_encoding" }))
    })
}

async fn read_task_form(payload: &mut Multipart, max_bytes: usize) -> Result<TaskForm, Error> {
    let mut remaining = max_bytes;
    let mut form = TaskForm::default();
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| map_multipart_error(&err))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = read_field(&mut field, &mut remaining).await?;
        match name.as_str() {
            "title" => form.title = into_text("title", bytes)?,
            "description" => form.description = into_text("description", bytes)?,
            "price" => form.price = into_text("price", bytes)?,
            IMAGE_FIELD => form.image = Some(ImageUpload::new(bytes, content_type)),
            _ => {}
        }
    }
    Ok(form)
}

fn map_task_validation_error(err: TaskValidationError) -> Error {
    let (field, code) = match &err {
        TaskValidationError::EmptyTitle => ("title", "empty_title"),
        TaskValidationError::TooLong { field, .. } => (*field, "too_long"),
    };
    warn!(field, code, "rejected task submission");
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Post a task with a photo for the acting user's family.
///
/// The photo is normalised to a bounded JPEG before anything is stored.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body(content_type = "multipart/form-data", description = "Fields title, description, price and an image file"),
    responses(
        (status = 201, description = "Task created", body = TaskCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 413, description = "Upload too large", body = Error),
        (status = 415, description = "Upload is not an image", body = Error),
        (status = 422, description = "Image could not be decoded or compressed", body = Error),
        (status = 503, description = "Image workers unavailable", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    let owner = session.require_username()?;
    let form = read_task_form(&mut payload, state.max_upload_bytes).await?;
    let draft = TaskDraft::try_from_parts(&form.title, &form.description, &form.price)
        .map_err(map_task_validation_error)?;
    let image = form.image.ok_or_else(|| {
        Error::invalid_request("image file is required")
            .with_details(json!({ "field": IMAGE_FIELD, "code": "missing_image" }))
    })?;
    let id = state
        .tasks
        .create_task(&owner, TaskSubmission { draft, image })
        .await?;
    Ok(HttpResponse::Created().json(TaskCreatedResponse { id }))
}

/// Tasks of everyone currently sharing the acting user's family code.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Visible tasks", body = DashboardResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardResponse>> {
    let username = session.require_username()?;
    let board = state.dashboard.dashboard(&username).await?;
    Ok(web::Json(board.into()))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
