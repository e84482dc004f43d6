use std::collections::HashMap;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Form, Router};
use serde::Serialize;
use tera::Context;
use tracing::{info, warn};
use crate::controller::session::{session_expired, AdminSession};
use crate::controller::AppState;
use crate::helpers::alert::{redirect_with_alert, Alert, AlertQuery};
use crate::helpers::path_segment::encode_segment;
use crate::models::chart::EnquiryChart;
use crate::models::enquiry::{
    CarRentalDetail, ContactSubmission, Enquiry, EnquiryKind, EnquiryStatus, HomeEnquiry,
    HomeTab, HotelEnquiryDetail, TourPackageDetail,
};
use crate::repositories::backend_api::ApiError;
use crate::table::export::{build_csv, export_filename, CsvExport};
use crate::table::filter::{apply, FilterCriteria, FilterQuery, Filterable, Period};
use crate::table::pagination::PageWindow;
use crate::views::charts::{bar_chart, pie_chart, status_slices, CHART_COLORS};
use crate::views::form::{apply_submitted, collect_payload, FormField};
use crate::views::page_context;

pub fn router() -> Router {
    Router::new()
        .route("/", get(enquiries_index))
        .nest("/tour-packages", kind_router::<TourPackageDetail>())
        .nest("/car-rentals", kind_router::<CarRentalDetail>())
        .nest("/hotels", kind_router::<HotelEnquiryDetail>())
        .nest("/contact", kind_router::<ContactSubmission>())
        .nest("/home", kind_router::<HomeEnquiry>())
}

fn kind_router<K: EnquiryKind>() -> Router {
    Router::new()
        .route("/", get(list_enquiries::<K>))
        .route("/export", get(export_enquiries::<K>))
        .route("/edit/:id", get(edit_enquiry_page::<K>).post(update_enquiry::<K>))
        .route("/delete/:id", get(confirm_delete_enquiry::<K>).post(delete_enquiry::<K>))
}

fn base_path<K: EnquiryKind>() -> String {
    format!("/enquiries/{}", K::SLUG)
}

fn active_tab<K: EnquiryKind>(query: &FilterQuery) -> HomeTab {
    if K::TABBED {
        HomeTab::from_query(query.tab.as_deref())
    } else {
        HomeTab::All
    }
}

/// The list page to return to, keeping the home tab the admin was on.
fn list_location<K: EnquiryKind>(tab: HomeTab) -> String {
    if K::TABBED && tab != HomeTab::All {
        format!("{}?tab={}", base_path::<K>(), tab.as_str())
    } else {
        base_path::<K>()
    }
}

fn criteria_for<K: EnquiryKind>(query: &FilterQuery) -> FilterCriteria {
    let mut criteria = FilterCriteria::from_query(query);
    if !K::HAS_STATUS {
        criteria.status = None;
    }
    criteria
}

#[derive(Serialize)]
struct StatusBadge {
    label: &'static str,
    color: &'static str,
}

#[derive(Serialize)]
struct EnquiryRow {
    edit_href: String,
    delete_href: String,
    cells: Vec<String>,
    status: Option<StatusBadge>,
}

#[derive(Serialize)]
pub(crate) struct Choice {
    value: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct TabLink {
    href: String,
    label: &'static str,
    active: bool,
}

fn row<K: EnquiryKind>(enquiry: &Enquiry<K>, tab: HomeTab) -> EnquiryRow {
    EnquiryRow {
        edit_href: item_href::<K>("edit", &enquiry.id, tab),
        delete_href: item_href::<K>("delete", &enquiry.id, tab),
        cells: K::table_cells(enquiry),
        status: K::HAS_STATUS.then(|| StatusBadge {
            label: enquiry.status.label(),
            color: enquiry.status.color(),
        }),
    }
}

fn status_choices() -> Vec<Choice> {
    EnquiryStatus::ALL
        .iter()
        .map(|status| Choice {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

pub(crate) fn period_choices() -> Vec<Choice> {
    Period::ALL
        .iter()
        .map(|period| Choice {
            value: period.as_str(),
            label: period.label(),
        })
        .collect()
}

fn tab_links<K: EnquiryKind>(active: HomeTab) -> Vec<TabLink> {
    if !K::TABBED {
        return Vec::new();
    }
    HomeTab::ALL
        .iter()
        .map(|tab| TabLink {
            href: format!("{}?tab={}", base_path::<K>(), tab.as_str()),
            label: tab.label(),
            active: *tab == active,
        })
        .collect()
}

pub async fn list_enquiries<K: EnquiryKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Query(query): Query<FilterQuery>,
    Query(alert_query): Query<AlertQuery>,
) -> Response {
    let config = &app_state.config;
    let tab = active_tab::<K>(&query);
    let criteria = criteria_for::<K>(&query);
    let hints = criteria.backend_query(config.fetch_limit);

    let (records_res, chart_res) = futures::join!(
        app_state.backend.list_enquiries::<K>(&session.token, tab, &hints),
        app_state.backend.enquiry_chart::<K>(&session.token, tab),
    );

    let unauthorized = [records_res.as_ref().err(), chart_res.as_ref().err()]
        .into_iter()
        .flatten()
        .any(ApiError::is_unauthorized);
    if unauthorized {
        return session_expired(config.secure_cookies);
    }

    let mut alerts: Vec<Alert> = alert_query.into_alert().into_iter().collect();
    let mut records = match records_res {
        Ok(records) => records,
        Err(e) => {
            warn!("Something went wrong retrieving {} due to: {}", K::RESOURCE, e);
            alerts.push(Alert::danger(format!(
                "Failed to load {}. Please try again.",
                K::TITLE.to_lowercase()
            )));
            Vec::new()
        }
    };
    let chart = match chart_res {
        Ok(chart) => chart,
        Err(e) => {
            warn!("Something went wrong retrieving {} chart due to: {}", K::RESOURCE, e);
            alerts.push(Alert::danger("Failed to load chart data."));
            EnquiryChart::placeholder(K::CHART_LABEL)
        }
    };

    for record in records.iter_mut() {
        record.localize(config.utc_offset);
    }
    let outcome = apply(&records, &criteria, config.now());
    if let Some(warning) = outcome.warning {
        alerts.push(Alert::warning(warning.to_string()));
    }

    let window = PageWindow::new(outcome.records.len(), config.enquiry_page_size, query.page());
    let rows: Vec<EnquiryRow> = window
        .slice(&outcome.records)
        .iter()
        .map(|enquiry| row(*enquiry, tab))
        .collect();

    let base = base_path::<K>();
    let filter_query = query.without_page();
    let mut context = page_context(K::TITLE, &base, &session, &alerts);
    context.insert("base_path", &base);
    context.insert("noun", K::NOUN);
    context.insert("headers", K::TABLE_HEADERS);
    context.insert("has_status", &K::HAS_STATUS);
    context.insert("column_count", &(K::TABLE_HEADERS.len() + if K::HAS_STATUS { 2 } else { 1 }));
    context.insert("rows", &rows);
    context.insert("page", &window);
    context.insert("pages", &window.pages());
    context.insert("has_previous", &window.has_previous());
    context.insert("has_next", &window.has_next());
    context.insert("summary", &window.summary());
    context.insert("filter_query", &filter_query);
    context.insert("export_href", &format!("{}/export?{}", base, filter_query));
    context.insert("search", &criteria.search);
    context.insert("status", &criteria.status.map(|status| status.as_str()).unwrap_or(""));
    context.insert("period", criteria.period.as_str());
    context.insert("from_date", query.from_date.as_deref().unwrap_or(""));
    context.insert("to_date", query.to_date.as_deref().unwrap_or(""));
    context.insert("tab", tab.as_str());
    context.insert("tabs", &tab_links::<K>(tab));
    context.insert("status_choices", &status_choices());
    context.insert("period_choices", &period_choices());
    context.insert(
        "trend_chart",
        &bar_chart(K::CHART_LABEL, &chart.time_series, CHART_COLORS[2]),
    );
    if K::HAS_STATUS {
        context.insert(
            "status_chart",
            &pie_chart("Status distribution", &status_slices(&chart.status_breakdown)),
        );
    }
    app_state.views.render("enquiries.html", &context)
}

/// `?tab=...` appended to edit/delete links on the tabbed page.
fn item_query<K: EnquiryKind>(tab: HomeTab) -> String {
    if K::TABBED {
        format!("?tab={}", tab.as_str())
    } else {
        String::new()
    }
}

/// Edit or delete URL of one record, the id encoded as a single segment.
fn item_href<K: EnquiryKind>(action: &str, id: &str, tab: HomeTab) -> String {
    format!("{}/{}/{}{}", base_path::<K>(), action, encode_segment(id), item_query::<K>(tab))
}

pub async fn export_enquiries<K: EnquiryKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let config = &app_state.config;
    let tab = active_tab::<K>(&query);
    let criteria = criteria_for::<K>(&query);
    let hints = criteria.backend_query(config.fetch_limit);
    let back = list_location::<K>(tab);

    let mut records = match app_state
        .backend
        .list_enquiries::<K>(&session.token, tab, &hints)
        .await
    {
        Ok(records) => records,
        Err(ApiError::Unauthorized) => return session_expired(config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong exporting {} due to: {}", K::RESOURCE, e);
            return redirect_with_alert(&back, Alert::danger("Failed to export data. Please try again."))
                .into_response();
        }
    };

    for record in records.iter_mut() {
        record.localize(config.utc_offset);
    }
    let outcome = apply(&records, &criteria, config.now());
    let csv = build_csv(
        K::CSV_HEADERS,
        outcome.records.iter().map(|enquiry| K::csv_record(enquiry)),
    );

    return match csv {
        Ok(body) => {
            info!("Exported {} {} records", outcome.records.len(), K::RESOURCE);
            CsvExport {
                filename: export_filename(&K::export_stem(tab), config.now().date()),
                body,
            }
            .into_response()
        }
        Err(e) => {
            warn!("Something went wrong building {} csv due to: {:?}", K::RESOURCE, e);
            redirect_with_alert(&back, Alert::danger("Failed to export data. Please try again."))
                .into_response()
        }
    };
}

fn render_edit_form<K: EnquiryKind>(
    app_state: &AppState,
    session: &AdminSession,
    id: &str,
    tab: HomeTab,
    fields: &[FormField],
    alerts: &[Alert],
) -> Response {
    let base = base_path::<K>();
    let mut context = page_context(&format!("Edit {}", K::NOUN), &base, session, alerts);
    context.insert("heading", &format!("Edit {}", K::NOUN));
    context.insert("fields", fields);
    context.insert("action", &item_href::<K>("edit", id, tab));
    context.insert("back_href", &list_location::<K>(tab));
    app_state.views.render("enquiry_edit.html", &context)
}

fn load_failed<K: EnquiryKind>(app_state: &AppState, tab: HomeTab, e: ApiError) -> Response {
    if e.is_unauthorized() {
        return session_expired(app_state.config.secure_cookies);
    }
    warn!("Something went wrong retrieving {} due to: {}", K::RESOURCE, e);
    let message = e.user_message(&format!("Failed to load {}. Please try again.", K::NOUN.to_lowercase()));
    redirect_with_alert(&list_location::<K>(tab), Alert::danger(message)).into_response()
}

pub async fn edit_enquiry_page<K: EnquiryKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let tab = active_tab::<K>(&query);
    return match app_state.backend.get_enquiry::<K>(&session.token, &id).await {
        Ok(enquiry) => render_edit_form::<K>(&app_state, &session, &id, tab, &enquiry.edit_fields(), &[]),
        Err(e) => load_failed::<K>(&app_state, tab, e),
    };
}

pub async fn update_enquiry<K: EnquiryKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response {
    let tab = active_tab::<K>(&query);
    let enquiry = match app_state.backend.get_enquiry::<K>(&session.token, &id).await {
        Ok(enquiry) => enquiry,
        Err(e) => return load_failed::<K>(&app_state, tab, e),
    };

    let mut fields = enquiry.edit_fields();
    let payload = match collect_payload(&fields, &submitted) {
        Ok(payload) => payload,
        Err(e) => {
            apply_submitted(&mut fields, &submitted);
            let alerts = [Alert::danger(e.to_string())];
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                render_edit_form::<K>(&app_state, &session, &id, tab, &fields, &alerts),
            )
                .into_response();
        }
    };

    let update_res = app_state
        .backend
        .update_enquiry::<K>(&session.token, &id, &payload)
        .await;

    return match update_res {
        Ok(()) => {
            info!("Updated {} {}", K::RESOURCE, id);
            redirect_with_alert(
                &list_location::<K>(tab),
                Alert::success(format!("{} updated successfully!", K::NOUN)),
            )
            .into_response()
        }
        Err(ApiError::Unauthorized) => session_expired(app_state.config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong updating {} {} due to: {}", K::RESOURCE, id, e);
            apply_submitted(&mut fields, &submitted);
            let fallback = format!("Failed to update {}. Please try again.", K::NOUN.to_lowercase());
            let alerts = [Alert::danger(e.user_message(&fallback))];
            (
                StatusCode::BAD_GATEWAY,
                render_edit_form::<K>(&app_state, &session, &id, tab, &fields, &alerts),
            )
                .into_response()
        }
    };
}

/// Confirmation page shared by enquiry and listing deletes.
pub fn render_confirm_delete(
    app_state: &AppState,
    session: &AdminSession,
    current_path: &str,
    noun: &str,
    action: &str,
    cancel_href: &str,
) -> Response {
    let mut context: Context = page_context(&format!("Delete {}", noun), current_path, session, &[]);
    context.insert("noun", &noun.to_lowercase());
    context.insert("action", action);
    context.insert("cancel_href", cancel_href);
    app_state.views.render("confirm_delete.html", &context)
}

pub async fn confirm_delete_enquiry<K: EnquiryKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let tab = active_tab::<K>(&query);
    let base = base_path::<K>();
    render_confirm_delete(
        &app_state,
        &session,
        &base,
        K::NOUN,
        &item_href::<K>("delete", &id, tab),
        &list_location::<K>(tab),
    )
}

pub async fn delete_enquiry<K: EnquiryKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let tab = active_tab::<K>(&query);
    let back = list_location::<K>(tab);

    return match app_state.backend.delete_enquiry::<K>(&session.token, &id).await {
        Ok(()) => {
            info!("Deleted {} {}", K::RESOURCE, id);
            redirect_with_alert(&back, Alert::success(format!("{} deleted successfully", K::NOUN)))
                .into_response()
        }
        Err(ApiError::Unauthorized) => session_expired(app_state.config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong deleting {} {} due to: {}", K::RESOURCE, id, e);
            let fallback = format!("Failed to delete {}. Please try again.", K::NOUN.to_lowercase());
            redirect_with_alert(&back, Alert::danger(e.user_message(&fallback))).into_response()
        }
    };
}

/// Redirect used by the bare `/enquiries` path.
pub async fn enquiries_index() -> Redirect {
    Redirect::to("/enquiries/tour-packages")
}
