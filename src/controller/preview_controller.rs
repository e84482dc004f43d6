use axum::extract::Path;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use uuid::Uuid;
use crate::controller::session::AdminSession;
use crate::controller::AppState;

pub fn router() -> Router {
    Router::new().route("/previews/:draft/:image", get(serve_preview))
}

/// Bytes of a staged image; gone as soon as the image is removed or the draft saved.
pub async fn serve_preview(
    _session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path((draft, image)): Path<(Uuid, Uuid)>,
) -> Response {
    return match app_state.drafts.preview(draft, image).await {
        Some((content_type, bytes)) => (
            [
                (CONTENT_TYPE, content_type),
                (CACHE_CONTROL, "no-store".to_string()),
            ],
            bytes,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    };
}
