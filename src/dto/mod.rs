mod validation;

pub use validation::{TextField, ValidationReport};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use std::collections::BTreeMap;

use crate::{
    models::{Note, NotePatch},
    repository::query::ListParams,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the last successful update
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Note body as received. Every field decodes regardless of its JSON type;
/// type and shape checks happen in [`NoteBody::validate_as`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteBody {
    #[serde(default)]
    pub title: TextField,
    #[serde(default)]
    pub content: TextField,
}

impl NoteBody {
    /// Build and validate a request, reporting type errors and validation
    /// failures of all fields together.
    pub fn validate_as<T>(&self) -> Result<T, ValidationReport>
    where
        T: Validate + for<'a> From<&'a Self>,
    {
        let request = T::from(self);
        let mut report = request
            .validate()
            .map_or_else(ValidationReport::from, |()| ValidationReport::default());

        for (field, value) in [("title", &self.title), ("content", &self.content)] {
            if let Some(message) = value.type_error() {
                report.field_errors.insert(field.to_string(), vec![message]);
            }
        }

        if report.is_empty() {
            Ok(request)
        } else {
            Err(report)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema, Validate)]
pub struct CreateNoteRequest {
    /// Note title, 1 to 200 characters
    #[validate(
        required(message = "Required"),
        length(min = 1, max = 200, message = "Must be between 1 and 200 characters")
    )]
    pub title: Option<String>,
    /// Note content
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Must not be empty")
    )]
    pub content: Option<String>,
}

impl From<&NoteBody> for CreateNoteRequest {
    fn from(body: &NoteBody) -> Self {
        Self {
            title: body.title.text(),
            content: body.content.text(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema, Validate)]
pub struct UpdateNoteRequest {
    /// New title, 1 to 200 characters
    #[validate(length(min = 1, max = 200, message = "Must be between 1 and 200 characters"))]
    pub title: Option<String>,
    /// New content
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub content: Option<String>,
}

impl From<&NoteBody> for UpdateNoteRequest {
    fn from(body: &NoteBody) -> Self {
        Self {
            title: body.title.text(),
            content: body.content.text(),
        }
    }
}

impl From<UpdateNoteRequest> for NotePatch {
    fn from(request: UpdateNoteRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
        }
    }
}

/// Raw list parameters. Values are kept as strings so that malformed input
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Substring to look for in title or content
    pub q: Option<String>,
    /// `created_at` (default) or `updated_at`
    pub sort: Option<String>,
    /// `asc` or `desc` (default)
    pub order: Option<String>,
    /// Page size, clamped to 0..=100, default 10
    pub limit: Option<String>,
    /// Rows to skip, default 0
    pub offset: Option<String>,
}

impl ListNotesQuery {
    /// Collect raw query pairs. A key given more than once is ignored, so
    /// that parameter falls back to its default.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in pairs {
            values.entry(key).or_default().push(value);
        }

        let mut single = |key: &str| {
            values
                .remove(key)
                .filter(|found| found.len() == 1)
                .and_then(|mut found| found.pop())
        };

        Self {
            q: single("q"),
            sort: single("sort"),
            order: single("order"),
            limit: single("limit"),
            offset: single("offset"),
        }
    }
}

impl From<&ListNotesQuery> for ListParams {
    fn from(query: &ListNotesQuery) -> Self {
        Self::resolve(
            query.q.as_deref(),
            query.sort.as_deref(),
            query.order.as_deref(),
            query.limit.as_deref(),
            query.offset.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
