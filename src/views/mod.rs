use anyhow::Context as _;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::warn;
use crate::controller::session::AdminSession;
use crate::helpers::alert::Alert;

pub mod charts;
pub mod form;

const TEMPLATES: [(&str, &str); 9] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("enquiries.html", include_str!("../../templates/enquiries.html")),
    ("enquiry_edit.html", include_str!("../../templates/enquiry_edit.html")),
    ("listings.html", include_str!("../../templates/listings.html")),
    ("confirm_delete.html", include_str!("../../templates/confirm_delete.html")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("not_found.html", include_str!("../../templates/not_found.html")),
];

/// HTML pages, compiled into the binary.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .context("Failed to load page templates")?;
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Response {
        return match self.tera.render(template, context) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                warn!("Something went wrong rendering {} due to: {:?}", template, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to render page, please try again!",
                )
                    .into_response()
            }
        };
    }
}

#[derive(Serialize)]
struct NavLink {
    href: &'static str,
    label: &'static str,
    active: bool,
}

const NAVIGATION: [(&str, &str); 8] = [
    ("/", "Dashboard"),
    ("/enquiries/tour-packages", "Tour Package Enquiries"),
    ("/enquiries/car-rentals", "Car Rental Enquiries"),
    ("/enquiries/hotels", "Hotel Enquiries"),
    ("/enquiries/contact", "Contact Forms"),
    ("/enquiries/home", "Home Enquiries"),
    ("/listings/hotels", "Manage Hotels"),
    ("/listings/car-rentals", "Manage Car Rentals"),
];

/// Context every signed-in page starts from: layout, navigation and banners.
pub fn page_context(title: &str, current_path: &str, session: &AdminSession, alerts: &[Alert]) -> Context {
    let navigation: Vec<NavLink> = NAVIGATION
        .iter()
        .map(|&(href, label)| NavLink {
            href,
            label,
            active: href == current_path,
        })
        .collect();

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("current_path", current_path);
    context.insert("username", &session.user.username);
    context.insert("dark_mode", &session.dark_mode);
    context.insert("navigation", &navigation);
    context.insert("alerts", alerts);
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_parses() {
        let views = Views::new().unwrap();
        let mut context = Context::new();
        context.insert("title", "Page not found");
        let response = views.render("not_found.html", &context);
        assert_eq!(response.status(), StatusCode::OK);
    }
}
