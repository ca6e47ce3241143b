//! Task data model.
//!
//! Tasks are immutable once stored. Ownership is the authoring account; the
//! set of readers is derived at query time from the owner's current family
//! code.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EncodedImage, Username};

/// Maximum length of a task title in characters.
pub const TITLE_MAX: usize = 120;
/// Maximum length of a task description in characters.
pub const DESCRIPTION_MAX: usize = 4_000;
/// Maximum length of the free-form price text in characters.
pub const PRICE_MAX: usize = 32;

/// Validation errors for task fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// A field exceeded its length limit.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Stable task identifier assigned by the store in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a store-assigned identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated text fields of a task submission.
///
/// The price stays free text: it is trimmed and length-bounded but its
/// numeric format is never checked.
///
/// # Examples
/// ```
/// use taskboard::domain::TaskDraft;
///
/// let draft = TaskDraft::try_from_parts(" Wash car ", "weekly", "10").unwrap();
/// assert_eq!(draft.title(), "Wash car");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    price: String,
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, TaskValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(TaskValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

impl TaskDraft {
    /// Validate raw form values.
    pub fn try_from_parts(
        title: &str,
        description: &str,
        price: &str,
    ) -> Result<Self, TaskValidationError> {
        let title = bounded("title", title, TITLE_MAX)?;
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(Self {
            title,
            description: bounded("description", description, DESCRIPTION_MAX)?,
            price: bounded("price", price, PRICE_MAX)?,
        })
    }

    /// Short task title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Longer description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free-form price text.
    pub fn price(&self) -> &str {
        &self.price
    }
}

/// Task ready for persistence: validated fields plus a compliant image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub owner: Username,
    pub draft: TaskDraft,
    pub image: EncodedImage,
}

/// Stored task as returned by listing queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub owner: Username,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: EncodedImage,
}

impl Task {
    /// Materialise a stored task from a persisted submission.
    #[must_use]
    pub fn from_new(id: TaskId, task: NewTask) -> Self {
        let NewTask {
            owner,
            draft,
            image,
        } = task;
        let TaskDraft {
            title,
            description,
            price,
        } = draft;
        Self {
            id,
            owner,
            title,
            description,
            price,
            image,
        }
    }
}
