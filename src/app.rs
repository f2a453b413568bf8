use axum::{
    Json, Router,
    http::HeaderValue,
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{handlers::rest, service::NoteService};

/// CORS for the configured browser origins. Invalid entries are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(service: Arc<NoteService>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(rest::health))
        .route(
            "/api/notes",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            "/api/notes/{id}",
            get(rest::get_one_note)
                .patch(rest::update_note)
                .delete(rest::delete_note),
        )
        .route(
            "/api-doc/openapi.json",
            get(|| async { Json(rest::ApiDoc::openapi()) }),
        )
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
