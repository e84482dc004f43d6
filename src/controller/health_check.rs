use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use crate::controller::AppState;

pub fn router() -> Router {
    Router::new().route("/health", get(get_health_check))
}

/// Liveness probe; does not call the backend.
async fn get_health_check(Extension(app_state): Extension<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "environment": app_state.config.environment,
    }))
}
