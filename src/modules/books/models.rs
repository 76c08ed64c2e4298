use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::entity::{book, book::UnknownStatus, note, ReadingStatus};

/// A tracked book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<book::Model> for Book {
    fn from(model: book::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// A note attached to a book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub book_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<note::Model> for Note {
    fn from(model: note::Model) -> Self {
        Self {
            id: model.id,
            book_id: model.book_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// Body of `POST /books` and `PUT /books/{id}`.
///
/// Absent fields deserialize as empty strings so they fail the same
/// checks as explicitly empty ones.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct BookPayload {
    #[validate(length(
        min = 1,
        max = 300,
        message = "title must be between 1 and 300 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 30,
        message = "author must be between 1 and 30 characters"
    ))]
    pub author: String,
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

/// Validated book fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
}

impl TryFrom<BookPayload> for BookFields {
    type Error = UnknownStatus;

    fn try_from(payload: BookPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            status: payload.status.parse()?,
            title: payload.title,
            author: payload.author,
        })
    }
}

/// Body of `POST /books/{id}/notes`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NotePayload {
    #[validate(length(
        min = 1,
        max = 500,
        message = "content must be between 1 and 500 characters"
    ))]
    pub content: String,
}

/// Acknowledgement returned by `DELETE /books/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    match status.parse::<ReadingStatus>() {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_status").with_message(Cow::Borrowed(
            "status must be one of not_started, in_progress, finished",
        ))),
    }
}
