use std::collections::BTreeMap;
use axum::extract::{Multipart, Path, Query};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Router};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;
use crate::controller::enquiry_controller::{period_choices, render_confirm_delete};
use crate::controller::session::{session_expired, AdminSession};
use crate::controller::AppState;
use crate::helpers::alert::{redirect_with_alert, Alert, AlertQuery};
use crate::helpers::path_segment::encode_segment;
use crate::models::listing::{CarRental, Hotel, ListingKind};
use crate::repositories::backend_api::ApiError;
use crate::repositories::draft_store::{ListingDraft, StageError};
use crate::table::export::{build_csv, export_filename, CsvExport};
use crate::table::filter::{apply, FilterCriteria, FilterQuery, Filterable};
use crate::table::pagination::PageWindow;
use crate::uploads::image_validation::validate_batch;
use crate::uploads::UploadedImage;
use crate::views::page_context;

const DRAFT_EXPIRED: &str = "Your form session expired. Please start again.";

pub fn router() -> Router {
    Router::new()
        .route("/", get(listings_index))
        .nest("/hotels", kind_router::<Hotel>())
        .nest("/car-rentals", kind_router::<CarRental>())
}

fn kind_router<L: ListingKind>() -> Router {
    Router::new()
        .route("/", get(new_listing_page::<L>))
        .route("/export", get(export_listings::<L>))
        .route("/drafts/:draft", get(draft_page::<L>).post(submit_draft::<L>))
        .route("/edit/:id", get(edit_listing::<L>))
        .route("/delete/:id", get(confirm_delete_listing::<L>).post(delete_listing::<L>))
}

pub async fn listings_index() -> Redirect {
    Redirect::to("/listings/hotels")
}

fn base_path<L: ListingKind>() -> String {
    format!("/listings/{}", L::SLUG)
}

fn with_filters(location: String, query: &FilterQuery) -> String {
    let filters = query.without_page();
    if filters.is_empty() {
        location
    } else {
        format!("{}?{}", location, filters)
    }
}

fn draft_location<L: ListingKind>(draft: Uuid, query: &FilterQuery) -> String {
    with_filters(format!("{}/drafts/{}", base_path::<L>(), draft), query)
}

fn criteria_for(query: &FilterQuery) -> FilterCriteria {
    let mut criteria = FilterCriteria::from_query(query);
    criteria.status = None;
    criteria
}

/// Backend image paths are relative to the API host.
pub fn resolve_image_url(api_base_url: &str, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("data:") {
        return raw.to_string();
    }
    Url::parse(api_base_url)
        .and_then(|base| base.join(raw))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn title_case(noun: &str) -> String {
    noun.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[derive(Serialize)]
struct ListingRow {
    edit_href: String,
    delete_href: String,
    name: String,
    image: String,
    cells: Vec<String>,
}

fn row<L: ListingKind>(listing: &L, api_base_url: &str) -> ListingRow {
    let mut cells = listing.table_cells();
    let image = if cells.is_empty() {
        String::new()
    } else {
        cells.remove(0)
    };
    let base = base_path::<L>();
    let id = encode_segment(listing.id());
    ListingRow {
        edit_href: format!("{}/edit/{}", base, id),
        delete_href: format!("{}/delete/{}", base, id),
        name: listing.display_name().to_string(),
        image: resolve_image_url(api_base_url, &image),
        cells,
    }
}

async fn fetch_listings<L: ListingKind>(
    app_state: &AppState,
    session: &AdminSession,
    criteria: &FilterCriteria,
) -> Result<Vec<L>, ApiError> {
    let hints = criteria.backend_query(app_state.config.fetch_limit);
    let mut listings = app_state.backend.list_listings::<L>(&session.token, &hints).await?;
    for listing in listings.iter_mut() {
        listing.localize(app_state.config.utc_offset);
    }
    Ok(listings)
}

async fn render_listing_page<L: ListingKind>(
    app_state: &AppState,
    session: &AdminSession,
    draft_id: Uuid,
    draft: &ListingDraft,
    query: &FilterQuery,
    mut alerts: Vec<Alert>,
) -> Response {
    let config = &app_state.config;
    let criteria = criteria_for(query);

    let listings = match fetch_listings::<L>(app_state, session, &criteria).await {
        Ok(listings) => listings,
        Err(ApiError::Unauthorized) => return session_expired(config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong retrieving {} due to: {}", L::RESOURCE, e);
            alerts.push(Alert::danger(format!(
                "Failed to load {}. Please try again.",
                L::TITLE.to_lowercase()
            )));
            Vec::new()
        }
    };

    let outcome = apply(&listings, &criteria, config.now());
    if let Some(warning) = outcome.warning {
        alerts.push(Alert::warning(warning.to_string()));
    }
    let window = PageWindow::new(outcome.records.len(), config.listing_page_size, query.page());
    let rows: Vec<ListingRow> = window
        .slice(&outcome.records)
        .iter()
        .map(|listing| row(*listing, &config.api_base_url))
        .collect();

    let base = base_path::<L>();
    let noun = title_case(L::NOUN);
    let editing = draft.editing.is_some();
    let existing_images: Vec<String> = draft
        .existing_images
        .iter()
        .map(|image| resolve_image_url(&config.api_base_url, image))
        .collect();
    let filter_query = query.without_page();

    let mut context = page_context(&format!("Manage {}", L::TITLE), &base, session, &alerts);
    context.insert("noun", L::NOUN);
    context.insert(
        "heading",
        &if editing {
            format!("Edit {}", noun)
        } else {
            format!("Add New {}", noun)
        },
    );
    context.insert("editing", &editing);
    context.insert("submit_label", &if editing { format!("Update {}", noun) } else { format!("Add {}", noun) });
    context.insert("form_action", &draft_location::<L>(draft_id, query));
    context.insert("fields", &L::form_fields(&draft.fields));
    context.insert("previews", &draft.previews(draft_id));
    context.insert("existing_images", &existing_images);
    context.insert("headers", L::TABLE_HEADERS);
    context.insert("column_count", &(L::TABLE_HEADERS.len() + 1));
    context.insert("rows", &rows);
    context.insert("page", &window);
    context.insert("pages", &window.pages());
    context.insert("has_previous", &window.has_previous());
    context.insert("has_next", &window.has_next());
    context.insert("summary", &window.summary());
    context.insert("page_base", &format!("{}/drafts/{}", base, draft_id));
    context.insert("filter_query", &filter_query);
    context.insert("export_href", &with_filters(format!("{}/export", base), query));
    context.insert("search", &criteria.search);
    context.insert("period", criteria.period.as_str());
    context.insert("from_date", query.from_date.as_deref().unwrap_or(""));
    context.insert("to_date", query.to_date.as_deref().unwrap_or(""));
    context.insert("period_choices", &period_choices());
    app_state.views.render("listings.html", &context)
}

/// A fresh create form next to the table.
pub async fn new_listing_page<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Query(query): Query<FilterQuery>,
    Query(alert_query): Query<AlertQuery>,
) -> Response {
    let draft_id = app_state
        .drafts
        .create(L::SLUG, L::blank_values(), None, Vec::new())
        .await;
    let Some(draft) = app_state.drafts.snapshot(draft_id, L::SLUG).await else {
        return redirect_with_alert(&base_path::<L>(), Alert::info(DRAFT_EXPIRED)).into_response();
    };
    let alerts = alert_query.into_alert().into_iter().collect();
    render_listing_page::<L>(&app_state, &session, draft_id, &draft, &query, alerts).await
}

pub async fn draft_page<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(draft_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
    Query(alert_query): Query<AlertQuery>,
) -> Response {
    let Some(draft) = app_state.drafts.snapshot(draft_id, L::SLUG).await else {
        return redirect_with_alert(&with_filters(base_path::<L>(), &query), Alert::info(DRAFT_EXPIRED))
            .into_response();
    };
    let alerts = alert_query.into_alert().into_iter().collect();
    render_listing_page::<L>(&app_state, &session, draft_id, &draft, &query, alerts).await
}

/// The button that submitted the listing form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormAction {
    Upload,
    Save,
    Remove(Uuid),
    Reset,
}

impl FormAction {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "upload" => Some(FormAction::Upload),
            "save" => Some(FormAction::Save),
            "reset" => Some(FormAction::Reset),
            other => other
                .strip_prefix("remove:")
                .and_then(|image| Uuid::parse_str(image).ok())
                .map(FormAction::Remove),
        }
    }
}

#[derive(Debug, Default)]
struct Submission {
    action: String,
    fields: BTreeMap<String, String>,
    images: Vec<UploadedImage>,
}

async fn read_submission(mut multipart: Multipart) -> anyhow::Result<Submission> {
    let mut submission = Submission::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "" => continue,
            "images" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                submission.images.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "action" => submission.action = field.text().await?,
            _ => {
                let value = field.text().await?;
                submission.fields.insert(name, value);
            }
        }
    }
    Ok(submission)
}

/// Validates and stages a picked batch, returning how many images were added.
async fn stage_images(app_state: &AppState, draft_id: Uuid, images: Vec<UploadedImage>) -> Result<usize, Alert> {
    if images.is_empty() {
        return Ok(0);
    }
    validate_batch(&images).map_err(|rejection| Alert::danger(rejection.to_string()))?;
    return match app_state.drafts.stage(draft_id, images).await {
        Ok(staged) => Ok(staged.len()),
        Err(StageError::Missing) => Err(Alert::info(DRAFT_EXPIRED)),
        Err(e) => Err(Alert::danger(e.to_string())),
    };
}

pub async fn submit_draft<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(draft_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
    multipart: Multipart,
) -> Response {
    let location = draft_location::<L>(draft_id, &query);
    if app_state.drafts.snapshot(draft_id, L::SLUG).await.is_none() {
        return redirect_with_alert(&with_filters(base_path::<L>(), &query), Alert::info(DRAFT_EXPIRED))
            .into_response();
    }

    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Something went wrong reading {} form due to: {:?}", L::RESOURCE, e);
            return redirect_with_alert(
                &location,
                Alert::danger("Failed to read the submitted form. Please try again."),
            )
            .into_response();
        }
    };
    app_state.drafts.update_fields(draft_id, submission.fields).await;

    let Some(action) = FormAction::parse(&submission.action) else {
        return redirect_with_alert(&location, Alert::danger("Unknown form action")).into_response();
    };

    let alert = match action {
        FormAction::Upload => match stage_images(&app_state, draft_id, submission.images).await {
            Ok(0) => Some(Alert::warning("Please choose at least one image to upload")),
            Ok(_) => None,
            Err(alert) => Some(alert),
        },
        FormAction::Remove(image) => {
            if app_state.drafts.revoke(draft_id, image).await {
                None
            } else {
                Some(Alert::info("That image was already removed"))
            }
        }
        FormAction::Reset => {
            app_state.drafts.reset(draft_id, L::blank_values()).await;
            None
        }
        FormAction::Save => {
            if let Err(alert) = stage_images(&app_state, draft_id, submission.images).await {
                return redirect_with_alert(&location, alert).into_response();
            }
            let back = with_filters(base_path::<L>(), &query);
            return save_draft::<L>(&app_state, &session, draft_id, &location, &back).await;
        }
    };

    return match alert {
        Some(alert) => redirect_with_alert(&location, alert).into_response(),
        None => Redirect::to(&location).into_response(),
    };
}

async fn save_draft<L: ListingKind>(
    app_state: &AppState,
    session: &AdminSession,
    draft_id: Uuid,
    location: &str,
    back: &str,
) -> Response {
    let Some(draft) = app_state.drafts.snapshot(draft_id, L::SLUG).await else {
        return redirect_with_alert(back, Alert::info(DRAFT_EXPIRED)).into_response();
    };

    if draft.editing.is_none() && draft.staged.is_empty() {
        let alert = Alert::danger(format!("Please upload at least one image of the {}", L::IMAGE_SUBJECT));
        return redirect_with_alert(location, alert).into_response();
    }
    let fields = match L::multipart_fields(&draft.fields) {
        Ok(fields) => fields,
        Err(e) => return redirect_with_alert(location, Alert::danger(e.to_string())).into_response(),
    };

    let backend = &app_state.backend;
    let (save_res, verb, success) = match draft.editing.as_deref() {
        Some(id) => (
            backend
                .update_listing::<L>(&session.token, id, fields, &draft.staged, &draft.existing_images)
                .await,
            "update",
            L::UPDATED_MESSAGE,
        ),
        None => (
            backend.create_listing::<L>(&session.token, fields, &draft.staged).await,
            "add",
            L::CREATED_MESSAGE,
        ),
    };

    return match save_res {
        Ok(()) => {
            info!("Saved {} ({}) with {} new images", L::NOUN, verb, draft.staged.len());
            app_state.drafts.discard(draft_id).await;
            redirect_with_alert(back, Alert::success(success)).into_response()
        }
        Err(ApiError::Unauthorized) => session_expired(app_state.config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong saving {} due to: {}", L::RESOURCE, e);
            let fallback = format!("Failed to {} {}. Please try again later.", verb, L::NOUN);
            redirect_with_alert(location, Alert::danger(e.user_message(&fallback))).into_response()
        }
    };
}

/// Loads a listing into a new draft and sends the admin to its form.
pub async fn edit_listing<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let back = with_filters(base_path::<L>(), &query);
    let listings = match fetch_listings::<L>(&app_state, &session, &FilterCriteria::default()).await {
        Ok(listings) => listings,
        Err(ApiError::Unauthorized) => return session_expired(app_state.config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong retrieving {} {} due to: {}", L::RESOURCE, id, e);
            let message = e.user_message(&format!("Failed to load {}. Please try again.", L::NOUN));
            return redirect_with_alert(&back, Alert::danger(message)).into_response();
        }
    };

    let Some(listing) = listings.into_iter().find(|listing| listing.id() == id) else {
        let message = format!("{} not found", title_case(L::NOUN));
        return redirect_with_alert(&back, Alert::warning(message)).into_response();
    };

    let draft_id = app_state
        .drafts
        .create(
            L::SLUG,
            listing.form_values(),
            Some(listing.id().to_string()),
            listing.images().to_vec(),
        )
        .await;
    Redirect::to(&draft_location::<L>(draft_id, &query)).into_response()
}

pub async fn confirm_delete_listing<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    let base = base_path::<L>();
    render_confirm_delete(
        &app_state,
        &session,
        &base,
        L::NOUN,
        &format!("{}/delete/{}", base, encode_segment(&id)),
        &base,
    )
}

pub async fn delete_listing<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    let base = base_path::<L>();
    return match app_state.backend.delete_listing::<L>(&session.token, &id).await {
        Ok(()) => {
            info!("Deleted {} {}", L::RESOURCE, id);
            redirect_with_alert(&base, Alert::success(L::DELETED_MESSAGE)).into_response()
        }
        Err(ApiError::Unauthorized) => session_expired(app_state.config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong deleting {} {} due to: {}", L::RESOURCE, id, e);
            let fallback = format!("Failed to delete {}. Please try again.", L::NOUN);
            redirect_with_alert(&base, Alert::danger(e.user_message(&fallback))).into_response()
        }
    };
}

pub async fn export_listings<L: ListingKind>(
    session: AdminSession,
    Extension(app_state): Extension<AppState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let config = &app_state.config;
    let back = with_filters(base_path::<L>(), &query);
    let criteria = criteria_for(&query);

    let listings = match fetch_listings::<L>(&app_state, &session, &criteria).await {
        Ok(listings) => listings,
        Err(ApiError::Unauthorized) => return session_expired(config.secure_cookies),
        Err(e) => {
            warn!("Something went wrong exporting {} due to: {}", L::RESOURCE, e);
            return redirect_with_alert(&back, Alert::danger("Failed to export data. Please try again."))
                .into_response();
        }
    };

    let outcome = apply(&listings, &criteria, config.now());
    if outcome.records.is_empty() {
        return redirect_with_alert(&back, Alert::info("No data to export")).into_response();
    }

    return match build_csv(L::CSV_HEADERS, outcome.records.iter().map(|listing| listing.csv_record())) {
        Ok(body) => {
            info!("Exported {} {} records", outcome.records.len(), L::RESOURCE);
            CsvExport {
                filename: export_filename(L::EXPORT_STEM, config.now().date()),
                body,
            }
            .into_response()
        }
        Err(e) => {
            warn!("Something went wrong building {} csv due to: {:?}", L::RESOURCE, e);
            redirect_with_alert(&back, Alert::danger("Failed to export data. Please try again."))
                .into_response()
        }
    };
}
