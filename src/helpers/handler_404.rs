use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use tera::Context;
use crate::views::Views;

pub async fn page_not_found_handler(
    Extension(views): Extension<Arc<Views>>,
) -> impl IntoResponse {
    let mut context = Context::new();
    context.insert("title", "Page not found");
    (StatusCode::NOT_FOUND, views.render("not_found.html", &context))
}
