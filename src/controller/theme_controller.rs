use axum::http::header::{REFERER, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::post;
use axum::Router;
use url::Url;
use crate::controller::session::{dark_mode_cookie, Theme};

pub fn router() -> Router {
    Router::new().route("/theme/toggle", post(toggle_theme))
}

/// Path and query of the page the toggle was pressed on, never another origin.
/// A path starting with `//` would read as a host, so it falls back to `/`.
fn return_path(headers: &HeaderMap) -> String {
    headers
        .get(REFERER)
        .and_then(|referer| referer.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .filter(|referer| !referer.path().starts_with("//"))
        .map(|referer| match referer.query() {
            Some(query) => format!("{}?{}", referer.path(), query),
            None => referer.path().to_string(),
        })
        .unwrap_or_else(|| "/".to_string())
}

pub async fn toggle_theme(theme: Theme, headers: HeaderMap) -> Response {
    (
        [(SET_COOKIE, dark_mode_cookie(!theme.dark_mode))],
        Redirect::to(&return_path(&headers)),
    )
        .into_response()
}
