use axum::extract::Query;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;
use tera::Context;
use tracing::{info, warn};
use crate::controller::session::{clear_token_cookie, read_cookie, token_cookie, Theme, TOKEN_COOKIE};
use crate::controller::AppState;
use crate::helpers::alert::{with_alert, Alert, AlertQuery};

pub fn router() -> Router {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn render_login(app_state: &AppState, theme: Theme, username: &str, alert: Option<Alert>) -> Response {
    let mut context = Context::new();
    context.insert("title", "Admin Login");
    context.insert("dark_mode", &theme.dark_mode);
    context.insert("username_value", username);
    context.insert("alerts", &alert.into_iter().collect::<Vec<_>>());
    app_state.views.render("login.html", &context)
}

pub async fn login_page(
    Extension(app_state): Extension<AppState>,
    theme: Theme,
    headers: HeaderMap,
    Query(alert_query): Query<AlertQuery>,
) -> Response {
    if let Some(token) = read_cookie(&headers, TOKEN_COOKIE).filter(|token| !token.is_empty()) {
        if app_state.backend.current_user(&token).await.is_ok() {
            return Redirect::to("/").into_response();
        }
    }
    render_login(&app_state, theme, "", alert_query.into_alert())
}

pub async fn login(
    Extension(app_state): Extension<AppState>,
    theme: Theme,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        let alert = Alert::danger("Please enter both username and password");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            render_login(&app_state, theme, username, Some(alert)),
        )
            .into_response();
    }

    let session_res = app_state.backend.login(username, &form.password).await;

    return match session_res {
        Ok(session) => {
            info!("Admin {} signed in", session.user.username);
            (
                [(SET_COOKIE, token_cookie(&session.token, app_state.config.secure_cookies))],
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Something went wrong signing in {} due to: {}", username, e);
            let alert = Alert::danger(e.user_message("Login failed. Please try again."));
            (
                StatusCode::UNAUTHORIZED,
                render_login(&app_state, theme, username, Some(alert)),
            )
                .into_response()
        }
    };
}

pub async fn logout(Extension(app_state): Extension<AppState>) -> Response {
    (
        [(SET_COOKIE, clear_token_cookie(app_state.config.secure_cookies))],
        Redirect::to(&with_alert("/login", &Alert::info("You have been logged out"))),
    )
        .into_response()
}
