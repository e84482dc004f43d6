use std::time::Duration;
use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use url::Url;
use crate::helpers::path_segment::{encode_segment, is_addressable};
use crate::models::chart::EnquiryChart;
use crate::models::dashboard::{Activity, DashboardCharts, DashboardStats, QuickStats};
use crate::models::enquiry::{Enquiry, EnquiryKind, HomeTab};
use crate::models::envelope::{ApiEnvelope, ErrorBody};
use crate::models::listing::ListingKind;
use crate::models::user::{CurrentUserResponse, IssuedSession, LoginRequest, LoginResponse, User};
use crate::repositories::draft_store::StagedImage;

pub const AUTH_HEADER: &str = "x-auth-token";

/// How many backend pages a single list walks before giving up on the rest.
const MAX_LIST_PAGES: u64 = 100;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session token was refused by the backend")]
    Unauthorized,
    #[error("backend answered {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected backend response: {0}")]
    Decode(String),
    #[error("record id {0:?} cannot be addressed")]
    InvalidId(String),
}

impl ApiError {
    /// What the administrator gets to read: the backend's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Client for the REST backend that owns every record the dashboard shows.
pub struct BackendApiRepo {
    client: Client,
    base_url: Url,
}

impl BackendApiRepo {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid backend base url: {}", base_url))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the backend http client")?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ApiError::Decode(format!("bad endpoint {}: {}", joined, e)))
    }

    /// `/api/<resource>/<id>` with the id always kept as one encoded segment.
    fn item_endpoint(&self, resource: &str, id: &str) -> Result<Url, ApiError> {
        if !is_addressable(id) {
            return Err(ApiError::InvalidId(id.to_string()));
        }
        let mut url = self.endpoint(&format!("/api/{}", resource))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Decode(format!("backend url {} cannot carry a path", self.base_url)))?
            .push(&encode_segment(id));
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header(AUTH_HEADER, token)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(rejection(response).await);
        }
        Ok(response)
    }

    async fn envelope<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiEnvelope<T>, ApiError> {
        let response = self.send(builder).await?;
        let status = response.status();
        let envelope: ApiEnvelope<T> = decode(response).await?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                status,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.envelope::<T>(builder)
            .await?
            .data
            .ok_or_else(|| ApiError::Decode("response carried no data".to_string()))
    }

    /// Collects every page the backend reports, so a capped `limit` never drops records.
    async fn list<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let hints: Vec<&(&'static str, String)> = query.iter().filter(|(name, _)| *name != "page").collect();
        let mut records = Vec::new();
        let mut page: u64 = 1;
        loop {
            let builder = self
                .client
                .get(url.clone())
                .query(&[("page", page.to_string())])
                .query(&hints);
            let envelope = self.envelope::<Vec<T>>(self.authorized(builder, token)).await?;
            let fetched = envelope.data.unwrap_or_default();
            let exhausted = fetched.is_empty();
            records.extend(fetched);

            let total_pages = envelope.pagination.map(|pagination| pagination.total_pages).unwrap_or(1);
            if exhausted || page >= total_pages {
                return Ok(records);
            }
            if page >= MAX_LIST_PAGES {
                warn!("Stopped reading {} after {} of {} pages", url.path(), page, total_pages);
                return Ok(records);
            }
            page += 1;
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedSession, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint("/api/auth/login")?)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(rejection(response).await);
        }

        let login: LoginResponse = decode(response).await?;
        return match (login.success, login.token, login.user) {
            (true, Some(token), Some(user)) => Ok(IssuedSession { token, user }),
            (_, _, _) => Err(ApiError::Rejected {
                status,
                message: login.message,
            }),
        };
    }

    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let builder = self.authorized(self.client.get(self.endpoint("/api/auth/user")?), token);
        let current: CurrentUserResponse = decode(self.send(builder).await?).await?;
        match (current.success, current.user) {
            (true, Some(user)) => Ok(user),
            _ => Err(ApiError::Unauthorized),
        }
    }

    pub async fn list_enquiries<K: EnquiryKind>(
        &self,
        token: &str,
        tab: HomeTab,
        query: &[(&'static str, String)],
    ) -> Result<Vec<Enquiry<K>>, ApiError> {
        self.list(self.endpoint(&K::list_path(tab))?, token, query).await
    }

    pub async fn get_enquiry<K: EnquiryKind>(&self, token: &str, id: &str) -> Result<Enquiry<K>, ApiError> {
        let builder = self.client.get(self.item_endpoint(K::RESOURCE, id)?);
        self.data(self.authorized(builder, token)).await
    }

    pub async fn update_enquiry<K: EnquiryKind>(
        &self,
        token: &str,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        let builder = self.client.put(self.item_endpoint(K::RESOURCE, id)?).json(payload);
        self.envelope::<Value>(self.authorized(builder, token)).await?;
        Ok(())
    }

    pub async fn delete_enquiry<K: EnquiryKind>(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let builder = self.client.delete(self.item_endpoint(K::RESOURCE, id)?);
        self.envelope::<Value>(self.authorized(builder, token)).await?;
        Ok(())
    }

    pub async fn enquiry_chart<K: EnquiryKind>(&self, token: &str, tab: HomeTab) -> Result<EnquiryChart, ApiError> {
        let builder = self.client.get(self.endpoint(&K::chart_path(tab))?);
        let payload: Value = self.data(self.authorized(builder, token)).await?;
        EnquiryChart::from_payload(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn dashboard_stats(&self, token: &str) -> Result<DashboardStats, ApiError> {
        let builder = self.client.get(self.endpoint("/api/dashboard/stats")?);
        self.data(self.authorized(builder, token)).await
    }

    pub async fn dashboard_charts(&self, token: &str) -> Result<DashboardCharts, ApiError> {
        let builder = self.client.get(self.endpoint("/api/dashboard/chart-data")?);
        self.data(self.authorized(builder, token)).await
    }

    pub async fn recent_activity(&self, token: &str) -> Result<Vec<Activity>, ApiError> {
        let builder = self.client.get(self.endpoint("/api/dashboard/recent-activity")?);
        let envelope = self.envelope::<Vec<Activity>>(self.authorized(builder, token)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn quick_stats(&self, token: &str) -> Result<QuickStats, ApiError> {
        let builder = self.client.get(self.endpoint("/api/dashboard/quick-stats")?);
        self.data(self.authorized(builder, token)).await
    }

    pub async fn list_listings<L: ListingKind>(
        &self,
        token: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<L>, ApiError> {
        self.list(self.endpoint(&format!("/api/{}", L::RESOURCE))?, token, query).await
    }

    pub async fn create_listing<L: ListingKind>(
        &self,
        token: &str,
        fields: Vec<(&'static str, String)>,
        images: &[StagedImage],
    ) -> Result<(), ApiError> {
        let form = listing_form(fields, images, None)?;
        let builder = self
            .client
            .post(self.endpoint(&format!("/api/{}", L::RESOURCE))?)
            .multipart(form);
        self.envelope::<Value>(self.authorized(builder, token)).await?;
        Ok(())
    }

    pub async fn update_listing<L: ListingKind>(
        &self,
        token: &str,
        id: &str,
        fields: Vec<(&'static str, String)>,
        images: &[StagedImage],
        existing_images: &[String],
    ) -> Result<(), ApiError> {
        let form = listing_form(fields, images, Some(existing_images))?;
        let builder = self
            .client
            .put(self.item_endpoint(L::RESOURCE, id)?)
            .multipart(form);
        self.envelope::<Value>(self.authorized(builder, token)).await?;
        Ok(())
    }

    pub async fn delete_listing<L: ListingKind>(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let builder = self.client.delete(self.item_endpoint(L::RESOURCE, id)?);
        self.envelope::<Value>(self.authorized(builder, token)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn rejection(response: Response) -> ApiError {
    let status = response.status();
    let message = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message),
        Err(_) => None,
    };
    ApiError::Rejected { status, message }
}

fn listing_form(
    fields: Vec<(&'static str, String)>,
    images: &[StagedImage],
    existing_images: Option<&[String]>,
) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for image in images {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("images", part);
    }
    if let Some(existing_images) = existing_images {
        form = form.text("existingImages", Value::from(existing_images.to_vec()).to_string());
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::models::enquiry::{CarRentalDetail, ContactSubmission, HomeEnquiry};
    use crate::models::listing::Hotel;
    use super::*;

    async fn repo(server: &MockServer) -> BackendApiRepo {
        BackendApiRepo::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_string_contains("\"username\":\"admin\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "token": "abc123",
                "user": { "id": 1, "username": "admin" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = repo(&server).await.login("admin", "secret").await.unwrap();
        assert_eq!(session.token, "abc123");
        assert_eq!(session.user.username, "admin");
        assert_eq!(session.user.id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn refused_login_keeps_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let error = repo(&server).await.login("admin", "wrong").await.unwrap_err();
        assert!(!error.is_unauthorized());
        assert_eq!(error.user_message("Login failed"), "Invalid credentials");
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/user"))
            .and(header(AUTH_HEADER, "stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let error = repo(&server).await.current_user("stale").await.unwrap_err();
        assert!(error.is_unauthorized());
    }

    #[tokio::test]
    async fn enquiries_are_listed_with_token_and_hints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/car-rental-detail"))
            .and(header(AUTH_HEADER, "abc123"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "1000"))
            .and(query_param("status", "pending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{
                    "id": 1,
                    "name": "John",
                    "email": "john@example.com",
                    "phone": "1",
                    "carName": "Swift",
                    "status": "pending",
                    "createdAt": "2026-10-10T10:00:00Z"
                }],
                "pagination": { "totalPages": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = vec![
            ("page", "1".to_string()),
            ("limit", "1000".to_string()),
            ("status", "pending".to_string()),
        ];
        let enquiries = repo(&server)
            .await
            .list_enquiries::<CarRentalDetail>("abc123", HomeTab::All, &query)
            .await
            .unwrap();
        assert_eq!(enquiries.len(), 1);
        assert_eq!(enquiries[0].details.car_name.as_deref(), Some("Swift"));
    }

    #[tokio::test]
    async fn malformed_record_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/home-enquiries/cars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "id": 1, "status": "pending", "createdAt": "yesterday" }]
            })))
            .mount(&server)
            .await;

        let error = repo(&server)
            .await
            .list_enquiries::<HomeEnquiry>("abc123", HomeTab::Cars, &[])
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn contact_chart_is_read_from_its_own_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contact/chart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "labels": ["Jan"], "datasets": [{ "data": [2] }] }
            })))
            .mount(&server)
            .await;

        let chart = repo(&server)
            .await
            .enquiry_chart::<ContactSubmission>("abc123", HomeTab::All)
            .await
            .unwrap();
        assert_eq!(chart.time_series.primary(), &[2.0]);
    }

    #[tokio::test]
    async fn update_failure_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/hotels-list/7"))
            .and(body_string_contains("name=\"existingImages\""))
            .and(body_string_contains("name=\"images\"; filename=\"lobby.png\""))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "Price must be positive" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let images = vec![StagedImage {
            id: Uuid::new_v4(),
            file_name: "lobby.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"PNGDATA"),
        }];
        let error = repo(&server)
            .await
            .update_listing::<Hotel>(
                "abc123",
                "7",
                vec![("name", "Sea Breeze".to_string())],
                &images,
                &["/uploads/old.jpg".to_string()],
            )
            .await
            .unwrap_err();
        assert_eq!(
            error.user_message("Failed to update hotel. Please try again later."),
            "Price must be positive"
        );
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/car-rental-detail/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Enquiry not found"
            })))
            .mount(&server)
            .await;

        let error = repo(&server)
            .await
            .delete_enquiry::<CarRentalDetail>("abc123", "3")
            .await
            .unwrap_err();
        assert_eq!(error.user_message("Failed"), "Enquiry not found");
    }

    #[tokio::test]
    async fn every_reported_page_is_collected() {
        let server = MockServer::start().await;
        for (page, ids) in [("1", [1, 2]), ("2", [3, 4])] {
            let records: Vec<serde_json::Value> = ids
                .iter()
                .map(|id| json!({ "id": id, "name": format!("Guest {}", id), "createdAt": "2026-10-10T10:00:00Z" }))
                .collect();
            Mock::given(method("GET"))
                .and(path("/api/contact"))
                .and(query_param("page", page))
                .and(query_param("limit", "2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "data": records,
                    "pagination": { "totalPages": 2, "total": 4 }
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let query = vec![("page", "1".to_string()), ("limit", "2".to_string())];
        let submissions = repo(&server)
            .await
            .list_enquiries::<ContactSubmission>("abc123", HomeTab::All, &query)
            .await
            .unwrap();
        let ids: Vec<&str> = submissions.iter().map(|submission| submission.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn ids_stay_inside_their_resource() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/contact/..%2Fhotels-list%2F7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/hotels-list/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(0)
            .mount(&server)
            .await;

        let repo = repo(&server).await;
        repo.delete_enquiry::<ContactSubmission>("abc123", "../hotels-list/7")
            .await
            .unwrap();
        let error = repo
            .delete_listing::<Hotel>("abc123", "..")
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::InvalidId(_)));
    }
}
