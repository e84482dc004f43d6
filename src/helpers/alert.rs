use axum::response::Redirect;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Success => "success",
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }

    /// Unknown levels read as `Info` rather than failing the page.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "success" => AlertLevel::Success,
            "warning" => AlertLevel::Warning,
            "danger" => AlertLevel::Danger,
            _ => AlertLevel::Info,
        }
    }
}

/// A banner shown at the top of the next rendered page.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Danger, message)
    }
}

/// Alert carried across a redirect as `?notice=...&level=...`.
#[derive(Clone, Deserialize, Debug, Default)]
pub struct AlertQuery {
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl AlertQuery {
    pub fn into_alert(self) -> Option<Alert> {
        let message = self.notice.filter(|notice| !notice.trim().is_empty())?;
        let level = self.level.as_deref().map(AlertLevel::parse).unwrap_or(AlertLevel::Info);
        Some(Alert::new(level, message))
    }
}

pub fn with_alert(location: &str, alert: &Alert) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("notice", &alert.message)
        .append_pair("level", alert.level.as_str())
        .finish();
    let separator = if location.contains('?') { '&' } else { '?' };
    format!("{}{}{}", location, separator, query)
}

pub fn redirect_with_alert(location: &str, alert: Alert) -> Redirect {
    Redirect::to(&with_alert(location, &alert))
}
