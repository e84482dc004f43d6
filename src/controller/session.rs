use std::convert::Infallible;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Extension;
use cookie::{Cookie, SameSite};
use tracing::warn;
use crate::controller::AppState;
use crate::models::user::User;

pub const TOKEN_COOKIE: &str = "token";
pub const DARK_MODE_COOKIE: &str = "darkMode";

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(raw).flatten() {
            if cookie.name() == name {
                return Some(cookie.value().to_string());
            }
        }
    }
    None
}

pub fn token_cookie(token: &str, secure: bool) -> String {
    Cookie::build((TOKEN_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
        .to_string()
}

pub fn clear_token_cookie(secure: bool) -> String {
    let mut cookie = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

pub fn dark_mode_cookie(enabled: bool) -> String {
    Cookie::build((DARK_MODE_COOKIE, enabled.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build()
        .to_string()
}

/// Drops the token and sends the browser back to the login page.
pub fn session_expired(secure: bool) -> Response {
    (
        [(SET_COOKIE, clear_token_cookie(secure))],
        Redirect::to("/login"),
    )
        .into_response()
}

fn dark_mode(headers: &HeaderMap) -> bool {
    read_cookie(headers, DARK_MODE_COOKIE).as_deref() == Some("true")
}

/// A signed-in administrator whose token the backend still accepts.
#[derive(Clone, Debug)]
pub struct AdminSession {
    pub token: String,
    pub user: User,
    pub dark_mode: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let secure = app_state.config.secure_cookies;

        let Some(token) = read_cookie(&parts.headers, TOKEN_COOKIE).filter(|token| !token.is_empty()) else {
            return Err(session_expired(secure));
        };

        return match app_state.backend.current_user(&token).await {
            Ok(user) => Ok(Self {
                token,
                user,
                dark_mode: dark_mode(&parts.headers),
            }),
            Err(e) => {
                if !e.is_unauthorized() {
                    warn!("Something went wrong verifying admin session due to: {}", e);
                }
                Err(session_expired(secure))
            }
        };
    }
}

/// Theme preference for pages that render without a session.
#[derive(Clone, Copy, Debug, Default)]
pub struct Theme {
    pub dark_mode: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for Theme
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            dark_mode: dark_mode(&parts.headers),
        })
    }
}
