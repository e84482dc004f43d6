use std::sync::Arc;
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::backend_api::BackendApiRepo;
use crate::repositories::draft_store::DraftStore;
use crate::views::Views;

pub mod auth_controller;
pub mod dashboard_controller;
pub mod enquiry_controller;
pub mod health_check;
pub mod listing_controller;
pub mod preview_controller;
pub mod session;
pub mod theme_controller;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendApiRepo>,
    pub views: Arc<Views>,
    pub drafts: DraftStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = BackendApiRepo::new(&config.api_base_url, config.request_timeout())?;
        let views = Views::new()?;
        Ok(Self {
            backend: Arc::new(backend),
            views: Arc::new(views),
            drafts: DraftStore::new(config.draft_limits()),
            config: Arc::new(config),
        })
    }
}

pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let address = app_state.config.listen_address;
    let application = application(app_state);

    info!("Admin dashboard listening on: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the dashboard server")
}

/// Every route plus the shared layers, ready to serve.
pub fn application(app_state: AppState) -> Router {
    let config = app_state.config.clone();

    router_endpoints()
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(GlobalConcurrencyLimitLayer::new(config.max_in_flight_requests)),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(Extension(app_state.views.clone()))
        .layer(Extension(app_state))
}

pub fn router_endpoints() -> Router {
    Router::new()
        .merge(health_check::router())
        .merge(auth_controller::router())
        .merge(theme_controller::router())
        .merge(dashboard_controller::router())
        .merge(preview_controller::router())
        .nest("/enquiries", enquiry_controller::router())
        .nest("/listings", listing_controller::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;
    use axum::body::Body;
    use axum::http::Request;
    use clap::Parser;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use super::*;

    pub fn app_state(api_base_url: &str) -> AppState {
        let config = Config::parse_from(["tour-admin-dashboard", "--api-base-url", api_base_url]);
        AppState {
            backend: Arc::new(BackendApiRepo::new(api_base_url, Duration::from_secs(5)).unwrap()),
            views: Arc::new(Views::new().unwrap()),
            drafts: DraftStore::new(config.draft_limits()),
            config: Arc::new(config),
        }
    }

    pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let builder = Request::builder().uri(uri);
        let builder = match token {
            Some(token) => builder.header("cookie", format!("token={}", token)),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    /// Backend stub that accepts any token as the signed-in admin.
    pub async fn signed_in_backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": { "username": "admin" }
            })))
            .mount(&server)
            .await;
        server
    }

    pub async fn body_text(response: axum::response::Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
