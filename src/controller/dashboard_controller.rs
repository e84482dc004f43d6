use axum::extract::Query;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router};
use serde::Serialize;
use tracing::warn;
use crate::controller::session::{session_expired, AdminSession};
use crate::controller::AppState;
use crate::helpers::alert::{Alert, AlertQuery};
use crate::helpers::date_format::relative_time;
use crate::repositories::backend_api::ApiError;
use crate::views::charts::{line_chart, pie_chart, Slice, CHART_COLORS};
use crate::views::page_context;

pub fn router() -> Router {
    Router::new().route("/", get(dashboard_overview))
}

#[derive(Serialize)]
struct StatCard {
    label: &'static str,
    count: u64,
    color: &'static str,
}

#[derive(Serialize)]
struct ActivityEntry {
    tone: &'static str,
    message: String,
    when: String,
}

/// Falls back to the default value, logging and remembering that something failed.
fn or_default<T: Default>(result: Result<T, ApiError>, what: &str, failed: &mut bool) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Something went wrong retrieving dashboard {} due to: {}", what, e);
            *failed = true;
            T::default()
        }
    }
}

pub async fn dashboard_overview(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Query(alert_query): Query<AlertQuery>,
) -> Response {
    let backend = &app_state.backend;
    let token = session.token.as_str();
    let (stats_res, charts_res, activity_res, quick_res) = futures::join!(
        backend.dashboard_stats(token),
        backend.dashboard_charts(token),
        backend.recent_activity(token),
        backend.quick_stats(token),
    );

    let unauthorized = [
        stats_res.as_ref().err(),
        charts_res.as_ref().err(),
        activity_res.as_ref().err(),
        quick_res.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    .any(ApiError::is_unauthorized);
    if unauthorized {
        return session_expired(app_state.config.secure_cookies);
    }

    let mut failed = false;
    let stats = or_default(stats_res, "stats", &mut failed);
    let charts = or_default(charts_res, "chart data", &mut failed);
    let activity = or_default(activity_res, "recent activity", &mut failed);
    let quick_stats = or_default(quick_res, "quick stats", &mut failed);

    let mut alerts: Vec<Alert> = alert_query.into_alert().into_iter().collect();
    if failed {
        alerts.push(Alert::danger("Failed to load some dashboard data. Please refresh to try again."));
    }

    let cards: Vec<StatCard> = stats
        .distribution()
        .iter()
        .zip(CHART_COLORS)
        .map(|(&(label, count), color)| StatCard { label, count, color })
        .collect();
    let slices: Vec<Slice> = cards
        .iter()
        .map(|card| Slice {
            label: card.label,
            value: card.count as f64,
            color: card.color,
        })
        .collect();

    let now = app_state.config.now();
    let activity: Vec<ActivityEntry> = activity
        .iter()
        .map(|entry| ActivityEntry {
            tone: entry.tone(),
            message: entry.message.clone(),
            when: relative_time(entry.timestamp, now),
        })
        .collect();

    let mut context = page_context("Dashboard Overview", "/", &session, &alerts);
    context.insert("cards", &cards);
    context.insert("total", &stats.total());
    context.insert("trend_chart", &line_chart("Enquiries over time", &charts.combined()));
    context.insert("distribution_chart", &pie_chart("Enquiry distribution", &slices));
    context.insert("activity", &activity);
    context.insert("quick_stats", &quick_stats);
    app_state.views.render("dashboard.html", &context)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::controller::application;
    use crate::controller::test_support::{app_state, body_text, get, signed_in_backend};

    #[tokio::test]
    async fn overview_shows_totals_and_activity() {
        let server = signed_in_backend().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "tourPackageDetails": 4, "carRentalDetails": 3, "hotelEnquiries": 2, "contactForms": 1 }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/recent-activity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "type": "hotel", "message": "New hotel enquiry from Nisha", "timestamp": "2020-01-01T00:00:00Z" }]
            })))
            .mount(&server)
            .await;

        let response = application(app_state(&server.uri()))
            .oneshot(get("/", Some("abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("New hotel enquiry from Nisha"));
        assert!(body.contains("Jan 1, 2020"));
        assert!(body.contains("Failed to load some dashboard data"));
    }
}
