use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;
use validator::Validate;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, HealthResponse, ListNotesQuery, NoteBody, NoteResponse,
        UpdateNoteRequest,
    },
    error::ApiError,
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(health, create_note, get_all_notes, get_one_note, update_note, delete_note),
    components(schemas(NoteResponse, CreateNoteRequest, UpdateNoteRequest, HealthResponse)),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

/// Unwrap and validate a JSON body. Unreadable bodies become form errors,
/// everything else is reported per field.
fn validated<T>(payload: Result<Json<NoteBody>, JsonRejection>) -> Result<T, ApiError>
where
    T: Validate + for<'a> From<&'a NoteBody>,
{
    let Json(body) = payload?;
    body.validate_as().map_err(ApiError::Validation)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<NoteBody>, JsonRejection>,
) -> Response {
    let request = match validated::<CreateNoteRequest>(payload) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match service.create_note(request).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => {
            tracing::error!("failed to create note entry: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Filtered page of notes", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(
    State(service): State<Arc<NoteService>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    // Listing has no failure path: an unreadable query string means defaults.
    let query = pairs.map_or_else(
        |_| ListNotesQuery::default(),
        |Query(pairs)| ListNotesQuery::from_pairs(pairs),
    );

    match service.list_notes(&query).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => {
            tracing::error!("failed to get note entries: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = path else {
        return ApiError::NotFound.into_response();
    };

    match service.get_one_note(id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => ApiError::NotFound.into_response(),
        Err(e) => {
            tracing::error!("failed to get note entry: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Invalid request body"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NoteBody>, JsonRejection>,
) -> Response {
    let request = match validated::<UpdateNoteRequest>(payload) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let Ok(Path(id)) = path else {
        return ApiError::NotFound.into_response();
    };

    match service.update_note(id, request).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => ApiError::NotFound.into_response(),
        Err(e) => {
            tracing::error!("failed to update note entry: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = path else {
        return ApiError::NotFound.into_response();
    };

    match service.delete_note(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => ApiError::NotFound.into_response(),
        Err(e) => {
            tracing::error!("failed to delete note entry: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
