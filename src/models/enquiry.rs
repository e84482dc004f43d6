use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use time::OffsetDateTime;
use crate::helpers::date_format::{display_date, display_optional_date, input_date};
use crate::models::{deserialize_id, deserialize_optional_id};
use crate::views::form::FormField;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl EnquiryStatus {
    pub const ALL: [EnquiryStatus; 4] = [
        EnquiryStatus::Pending,
        EnquiryStatus::Confirmed,
        EnquiryStatus::Cancelled,
        EnquiryStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::Confirmed => "confirmed",
            EnquiryStatus::Cancelled => "cancelled",
            EnquiryStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "Pending",
            EnquiryStatus::Confirmed => "Confirmed",
            EnquiryStatus::Cancelled => "Cancelled",
            EnquiryStatus::Completed => "Completed",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "#FFC107",
            EnquiryStatus::Confirmed => "#28A745",
            EnquiryStatus::Cancelled => "#DC3545",
            EnquiryStatus::Completed => "#6C757D",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn options() -> Vec<(&'static str, &'static str)> {
        Self::ALL
            .iter()
            .map(|status| (status.as_str(), status.label()))
            .collect()
    }
}

/// A customer enquiry as the backend lists it; `D` carries the kind-specific fields.
#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry<D> {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: EnquiryStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub details: D,
}

/// Home page enquiry tabs; every other enquiry kind ignores them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HomeTab {
    #[default]
    All,
    Cars,
    TourPackages,
    Hotels,
}

impl HomeTab {
    pub const ALL: [HomeTab; 4] = [HomeTab::All, HomeTab::Cars, HomeTab::TourPackages, HomeTab::Hotels];

    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.unwrap_or("all") {
            "cars" => HomeTab::Cars,
            "tourPackages" => HomeTab::TourPackages,
            "hotels" => HomeTab::Hotels,
            _ => HomeTab::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeTab::All => "all",
            HomeTab::Cars => "cars",
            HomeTab::TourPackages => "tourPackages",
            HomeTab::Hotels => "hotels",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HomeTab::All => "All Enquiries",
            HomeTab::Cars => "Car Rental",
            HomeTab::TourPackages => "Tour Package",
            HomeTab::Hotels => "Hotel Booking",
        }
    }
}

/// Everything that differs between the enquiry pages: backend paths, labels, columns and forms.
pub trait EnquiryKind: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path segment under `/enquiries`.
    const SLUG: &'static str;
    /// Resource name under the backend's `/api`.
    const RESOURCE: &'static str;
    const TITLE: &'static str;
    /// What one record is called in notices, e.g. "Enquiry" or "Submission".
    const NOUN: &'static str;
    const CHART_LABEL: &'static str;
    const TABLE_HEADERS: &'static [&'static str];
    const CSV_HEADERS: &'static [&'static str];
    const HAS_STATUS: bool = true;
    const TABBED: bool = false;

    fn list_path(_tab: HomeTab) -> String {
        format!("/api/{}", Self::RESOURCE)
    }

    fn chart_path(_tab: HomeTab) -> String {
        format!("/api/{}/stats/chart", Self::RESOURCE)
    }

    fn export_stem(tab: HomeTab) -> String;

    fn table_cells(enquiry: &Enquiry<Self>) -> Vec<String>;

    fn csv_record(enquiry: &Enquiry<Self>) -> Vec<String>;

    /// Kind-specific inputs of the edit form, between the contact fields and the message.
    fn detail_fields(enquiry: &Enquiry<Self>) -> Vec<FormField>;
}

impl<D: EnquiryKind> Enquiry<D> {
    pub fn edit_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::text("name", "Name", self.name.clone()).required(),
            FormField::email("email", "Email", self.email.clone()).required(),
            FormField::tel("phone", "Phone", self.phone.clone()).required(),
        ];
        fields.extend(D::detail_fields(self));
        fields.push(FormField::textarea(
            "message",
            "Message",
            self.message.clone().unwrap_or_default(),
        ));
        if D::HAS_STATUS {
            fields.push(
                FormField::select("status", "Status", self.status.as_str(), &EnquiryStatus::options())
                    .required(),
            );
        }
        fields
    }

    pub fn received_on(&self) -> String {
        display_date(self.created_at.date())
    }
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => placeholder.to_string(),
    }
}

fn count_cell(value: Option<u32>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

#[serde_as]
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TourPackageDetail {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub package_id: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub travel_date: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub adults: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub children: Option<u32>,
}

impl TourPackageDetail {
    fn package(&self) -> String {
        self.package_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.package_id.clone())
            .unwrap_or_default()
    }
}

impl EnquiryKind for TourPackageDetail {
    const SLUG: &'static str = "tour-packages";
    const RESOURCE: &'static str = "tour-package-detail";
    const TITLE: &'static str = "Tour Package Enquiries";
    const NOUN: &'static str = "Enquiry";
    const CHART_LABEL: &'static str = "Tour Package Enquiries";
    const TABLE_HEADERS: &'static [&'static str] =
        &["Name", "Email", "Phone", "Package", "Travel Date", "Adults", "Children", "Received"];
    const CSV_HEADERS: &'static [&'static str] =
        &["Name", "Email", "Phone", "Package", "Travel Date", "Adults", "Children", "Status"];

    fn export_stem(_tab: HomeTab) -> String {
        "tour-package-enquiries".to_string()
    }

    fn table_cells(enquiry: &Enquiry<Self>) -> Vec<String> {
        let detail = &enquiry.details;
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            detail.package(),
            display_optional_date(detail.travel_date.as_deref()),
            count_cell(detail.adults),
            count_cell(detail.children),
            enquiry.received_on(),
        ]
    }

    fn csv_record(enquiry: &Enquiry<Self>) -> Vec<String> {
        let detail = &enquiry.details;
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            detail.package(),
            display_optional_date(detail.travel_date.as_deref()),
            count_cell(detail.adults),
            count_cell(detail.children),
            enquiry.status.as_str().to_string(),
        ]
    }

    fn detail_fields(enquiry: &Enquiry<Self>) -> Vec<FormField> {
        let detail = &enquiry.details;
        vec![
            FormField::text("packageId", "Package ID", detail.package_id.clone().unwrap_or_default()),
            FormField::text("packageName", "Package", detail.package_name.clone().unwrap_or_default()),
            FormField::date("travelDate", "Travel Date", input_date(detail.travel_date.as_deref())),
            FormField::number("adults", "Adults", count_cell(detail.adults.or(Some(1)))),
            FormField::number("children", "Children", count_cell(detail.children.or(Some(0)))),
        ]
    }
}

#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CarRentalDetail {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub car_id: Option<String>,
    #[serde(default)]
    pub car_name: Option<String>,
    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub return_location: Option<String>,
}

impl CarRentalDetail {
    fn car(&self) -> String {
        self.car_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.car_id.clone())
            .unwrap_or_default()
    }
}

impl EnquiryKind for CarRentalDetail {
    const SLUG: &'static str = "car-rentals";
    const RESOURCE: &'static str = "car-rental-detail";
    const TITLE: &'static str = "Car Rental Enquiries";
    const NOUN: &'static str = "Enquiry";
    const CHART_LABEL: &'static str = "Car Rental Bookings";
    const TABLE_HEADERS: &'static [&'static str] = &[
        "Name",
        "Email",
        "Phone",
        "Car",
        "Pickup Date",
        "Return Date",
        "Pickup Location",
        "Return Location",
        "Received",
    ];
    const CSV_HEADERS: &'static [&'static str] = &[
        "Name",
        "Email",
        "Phone",
        "Car",
        "Pickup Date",
        "Return Date",
        "Pickup Location",
        "Return Location",
        "Status",
    ];

    fn export_stem(_tab: HomeTab) -> String {
        "car-rental-enquiries".to_string()
    }

    fn table_cells(enquiry: &Enquiry<Self>) -> Vec<String> {
        let mut cells = Self::csv_record(enquiry);
        cells.pop();
        cells.push(enquiry.received_on());
        cells
    }

    fn csv_record(enquiry: &Enquiry<Self>) -> Vec<String> {
        let detail = &enquiry.details;
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            detail.car(),
            display_optional_date(detail.pickup_date.as_deref()),
            display_optional_date(detail.return_date.as_deref()),
            detail.pickup_location.clone().unwrap_or_default(),
            detail.return_location.clone().unwrap_or_default(),
            enquiry.status.as_str().to_string(),
        ]
    }

    fn detail_fields(enquiry: &Enquiry<Self>) -> Vec<FormField> {
        let detail = &enquiry.details;
        vec![
            FormField::text("carId", "Car ID", detail.car_id.clone().unwrap_or_default()),
            FormField::text("carName", "Car", detail.car_name.clone().unwrap_or_default()),
            FormField::date("pickupDate", "Pickup Date", input_date(detail.pickup_date.as_deref())),
            FormField::date("returnDate", "Return Date", input_date(detail.return_date.as_deref())),
            FormField::text(
                "pickupLocation",
                "Pickup Location",
                detail.pickup_location.clone().unwrap_or_default(),
            ),
            FormField::text(
                "returnLocation",
                "Return Location",
                detail.return_location.clone().unwrap_or_default(),
            ),
        ]
    }
}

#[serde_as]
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HotelEnquiryDetail {
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub rooms: Option<u32>,
}

impl HotelEnquiryDetail {
    fn destination(&self) -> String {
        self.destination
            .clone()
            .filter(|destination| !destination.trim().is_empty())
            .or_else(|| self.hotel_name.clone())
            .unwrap_or_default()
    }
}

impl EnquiryKind for HotelEnquiryDetail {
    const SLUG: &'static str = "hotels";
    const RESOURCE: &'static str = "hotel-enquiry";
    const TITLE: &'static str = "Hotel Enquiries";
    const NOUN: &'static str = "Enquiry";
    const CHART_LABEL: &'static str = "Hotel Enquiries";
    const TABLE_HEADERS: &'static [&'static str] =
        &["Name", "Email", "Phone", "Destination", "Check-in", "Check-out", "Rooms", "Received"];
    const CSV_HEADERS: &'static [&'static str] =
        &["Name", "Email", "Phone", "Destination", "Check-in", "Check-out", "Rooms", "Status"];

    fn export_stem(_tab: HomeTab) -> String {
        "hotel-enquiries".to_string()
    }

    fn table_cells(enquiry: &Enquiry<Self>) -> Vec<String> {
        let mut cells = Self::csv_record(enquiry);
        cells.pop();
        cells.push(enquiry.received_on());
        cells
    }

    fn csv_record(enquiry: &Enquiry<Self>) -> Vec<String> {
        let detail = &enquiry.details;
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            detail.destination(),
            display_optional_date(detail.check_in.as_deref()),
            display_optional_date(detail.check_out.as_deref()),
            count_cell(detail.rooms.or(Some(1))),
            enquiry.status.as_str().to_string(),
        ]
    }

    fn detail_fields(enquiry: &Enquiry<Self>) -> Vec<FormField> {
        let detail = &enquiry.details;
        vec![
            FormField::text("hotelName", "Hotel", detail.hotel_name.clone().unwrap_or_default()),
            FormField::text("destination", "Destination", detail.destination.clone().unwrap_or_default()),
            FormField::date("checkIn", "Check-in Date", input_date(detail.check_in.as_deref())),
            FormField::date("checkOut", "Check-out Date", input_date(detail.check_out.as_deref())),
            FormField::number("rooms", "Rooms", count_cell(detail.rooms.or(Some(1)))),
        ]
    }
}

#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub subject: Option<String>,
}

impl EnquiryKind for ContactSubmission {
    const SLUG: &'static str = "contact";
    const RESOURCE: &'static str = "contact";
    const TITLE: &'static str = "Contact Form Submissions";
    const NOUN: &'static str = "Submission";
    const CHART_LABEL: &'static str = "Contact Form Submissions";
    const TABLE_HEADERS: &'static [&'static str] = &["Name", "Email", "Phone", "Subject", "Message", "Received"];
    const CSV_HEADERS: &'static [&'static str] = &["Name", "Email", "Phone", "Subject", "Message", "Date"];
    const HAS_STATUS: bool = false;

    fn chart_path(_tab: HomeTab) -> String {
        "/api/contact/chart".to_string()
    }

    fn export_stem(_tab: HomeTab) -> String {
        "contact-form-submissions".to_string()
    }

    fn table_cells(enquiry: &Enquiry<Self>) -> Vec<String> {
        let mut cells = Self::csv_record(enquiry);
        cells.pop();
        cells.push(enquiry.received_on());
        cells
    }

    fn csv_record(enquiry: &Enquiry<Self>) -> Vec<String> {
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            or_placeholder(&enquiry.details.subject, "N/A"),
            enquiry.message.clone().unwrap_or_default(),
            enquiry.received_on(),
        ]
    }

    fn detail_fields(enquiry: &Enquiry<Self>) -> Vec<FormField> {
        vec![FormField::text(
            "subject",
            "Subject",
            enquiry.details.subject.clone().unwrap_or_default(),
        )]
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum HomeFormType {
    #[serde(rename = "cars")]
    Cars,
    #[serde(rename = "tourPackages")]
    TourPackages,
    #[serde(rename = "hotels")]
    Hotels,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HomeFormType {
    pub fn label(&self) -> &'static str {
        match self {
            HomeFormType::Cars => "Car Rental",
            HomeFormType::TourPackages => "Tour Package",
            HomeFormType::Hotels => "Hotel Booking",
            HomeFormType::Unknown => "Unknown",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeFormType::Cars => "cars",
            HomeFormType::TourPackages => "tourPackages",
            HomeFormType::Hotels => "hotels",
            HomeFormType::Unknown => "",
        }
    }
}

const HOME_FORM_TYPES: &[(&str, &str)] = &[
    ("cars", "Car Rental"),
    ("tourPackages", "Tour Package"),
    ("hotels", "Hotel Booking"),
];

#[serde_as]
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HomeEnquiry {
    #[serde(default)]
    pub form_type: HomeFormType,
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub car_type: Option<String>,
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub travel_date: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub rooms: Option<u32>,
}

impl HomeEnquiry {
    /// Short human summary of the type-specific fields for the table.
    fn summary(&self) -> String {
        let parts: Vec<String> = match self.form_type {
            HomeFormType::Cars => vec![
                join_route(&self.from_location, &self.to_location),
                self.car_type.clone().unwrap_or_default(),
                display_optional_date(self.pickup_date.as_deref()),
            ],
            HomeFormType::TourPackages => vec![
                self.package_type.clone().unwrap_or_default(),
                self.duration.clone().unwrap_or_default(),
                self.travelers
                    .map(|travelers| format!("{} travellers", travelers))
                    .unwrap_or_default(),
            ],
            HomeFormType::Hotels => vec![
                self.destination.clone().unwrap_or_default(),
                format!(
                    "{} to {}",
                    display_optional_date(self.check_in.as_deref()),
                    display_optional_date(self.check_out.as_deref())
                ),
            ],
            HomeFormType::Unknown => Vec::new(),
        };
        parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

fn join_route(from: &Option<String>, to: &Option<String>) -> String {
    match (from.as_deref(), to.as_deref()) {
        (Some(from), Some(to)) => format!("{} → {}", from, to),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

impl EnquiryKind for HomeEnquiry {
    const SLUG: &'static str = "home";
    const RESOURCE: &'static str = "home-enquiries";
    const TITLE: &'static str = "Home Enquiries";
    const NOUN: &'static str = "Enquiry";
    const CHART_LABEL: &'static str = "Home Enquiries";
    const TABLE_HEADERS: &'static [&'static str] = &["Name", "Email", "Phone", "Type", "Details", "Received"];
    const CSV_HEADERS: &'static [&'static str] = &["Name", "Email", "Phone", "Type", "Date", "Status"];
    const TABBED: bool = true;

    fn list_path(tab: HomeTab) -> String {
        match tab {
            HomeTab::All => format!("/api/{}", Self::RESOURCE),
            tab => format!("/api/{}/{}", Self::RESOURCE, tab.as_str()),
        }
    }

    fn chart_path(tab: HomeTab) -> String {
        format!("/api/{}/chart/{}", Self::RESOURCE, tab.as_str())
    }

    fn export_stem(tab: HomeTab) -> String {
        format!("home-enquiries-{}", tab.as_str())
    }

    fn table_cells(enquiry: &Enquiry<Self>) -> Vec<String> {
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            enquiry.details.form_type.label().to_string(),
            enquiry.details.summary(),
            enquiry.received_on(),
        ]
    }

    fn csv_record(enquiry: &Enquiry<Self>) -> Vec<String> {
        vec![
            enquiry.name.clone(),
            enquiry.email.clone(),
            enquiry.phone.clone(),
            enquiry.details.form_type.label().to_string(),
            enquiry.received_on(),
            enquiry.status.as_str().to_string(),
        ]
    }

    fn detail_fields(enquiry: &Enquiry<Self>) -> Vec<FormField> {
        let detail = &enquiry.details;
        let mut fields = vec![FormField::select(
            "formType",
            "Type",
            detail.form_type.as_str(),
            HOME_FORM_TYPES,
        )];
        match detail.form_type {
            HomeFormType::Cars => fields.extend([
                FormField::text("fromLocation", "From", detail.from_location.clone().unwrap_or_default()),
                FormField::text("toLocation", "To", detail.to_location.clone().unwrap_or_default()),
                FormField::date("pickupDate", "Pickup Date", input_date(detail.pickup_date.as_deref())),
                FormField::text("carType", "Car Type", detail.car_type.clone().unwrap_or_default()),
            ]),
            HomeFormType::TourPackages => fields.extend([
                FormField::text("packageType", "Package Type", detail.package_type.clone().unwrap_or_default()),
                FormField::date("travelDate", "Travel Date", input_date(detail.travel_date.as_deref())),
                FormField::text("duration", "Duration", detail.duration.clone().unwrap_or_default()),
                FormField::number("travelers", "Travellers", count_cell(detail.travelers.or(Some(1)))),
            ]),
            HomeFormType::Hotels => fields.extend([
                FormField::text("destination", "Destination", detail.destination.clone().unwrap_or_default()),
                FormField::date("checkIn", "Check-in Date", input_date(detail.check_in.as_deref())),
                FormField::date("checkOut", "Check-out Date", input_date(detail.check_out.as_deref())),
                FormField::number("rooms", "Rooms", count_cell(detail.rooms.or(Some(1)))),
            ]),
            HomeFormType::Unknown => {}
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn car_rental_enquiry_decodes_with_flattened_details() {
        let enquiry: Enquiry<CarRentalDetail> = serde_json::from_value(json!({
            "id": 17,
            "name": "John Mathew",
            "email": "john@example.com",
            "phone": "9876543210",
            "carId": 4,
            "pickupDate": "2026-11-02T00:00:00.000Z",
            "returnDate": "2026-11-05",
            "pickupLocation": "Kochi",
            "status": "confirmed",
            "createdAt": "2026-10-01T09:15:00.000Z"
        }))
        .unwrap();

        assert_eq!(enquiry.id, "17");
        assert_eq!(enquiry.status, EnquiryStatus::Confirmed);
        assert_eq!(enquiry.details.car(), "4");
        assert_eq!(
            CarRentalDetail::csv_record(&enquiry),
            vec![
                "John Mathew",
                "john@example.com",
                "9876543210",
                "4",
                "Nov 2, 2026",
                "Nov 5, 2026",
                "Kochi",
                "",
                "confirmed",
            ]
        );
    }

    #[test]
    fn numeric_details_accept_strings() {
        let enquiry: Enquiry<TourPackageDetail> = serde_json::from_value(json!({
            "id": "a1",
            "name": "Meera",
            "packageName": "Munnar Escape",
            "adults": "2",
            "children": 1,
            "createdAt": "2026-10-01T09:15:00Z"
        }))
        .unwrap();

        assert_eq!(enquiry.details.adults, Some(2));
        assert_eq!(enquiry.details.children, Some(1));
        assert_eq!(enquiry.status, EnquiryStatus::Pending);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_value::<Enquiry<ContactSubmission>>(json!({
            "id": 1,
            "status": "archived",
            "createdAt": "2026-10-01T09:15:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn contact_submission_without_subject_exports_placeholder() {
        let enquiry: Enquiry<ContactSubmission> = serde_json::from_value(json!({
            "id": 3,
            "name": "Ravi",
            "email": "ravi@example.com",
            "phone": "123",
            "message": "Call me back",
            "createdAt": "2026-03-05T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(
            ContactSubmission::csv_record(&enquiry),
            vec!["Ravi", "ravi@example.com", "123", "N/A", "Call me back", "Mar 5, 2026"]
        );
        let names: Vec<_> = enquiry.edit_fields().iter().map(|field| field.name).collect();
        assert_eq!(names, vec!["name", "email", "phone", "subject", "message"]);
    }

    #[test]
    fn home_enquiry_paths_follow_the_tab() {
        assert_eq!(HomeEnquiry::list_path(HomeTab::All), "/api/home-enquiries");
        assert_eq!(HomeEnquiry::list_path(HomeTab::Hotels), "/api/home-enquiries/hotels");
        assert_eq!(HomeEnquiry::chart_path(HomeTab::All), "/api/home-enquiries/chart/all");
        assert_eq!(HomeEnquiry::export_stem(HomeTab::Cars), "home-enquiries-cars");
        assert_eq!(CarRentalDetail::chart_path(HomeTab::All), "/api/car-rental-detail/stats/chart");
        assert_eq!(ContactSubmission::chart_path(HomeTab::All), "/api/contact/chart");
    }

    #[test]
    fn home_enquiry_edit_fields_depend_on_form_type() {
        let enquiry: Enquiry<HomeEnquiry> = serde_json::from_value(json!({
            "id": 9,
            "name": "Anil",
            "formType": "hotels",
            "destination": "Goa",
            "checkIn": "2026-12-20",
            "createdAt": "2026-10-01T09:15:00Z"
        }))
        .unwrap();

        let names: Vec<_> = enquiry.edit_fields().iter().map(|field| field.name).collect();
        assert_eq!(
            names,
            vec!["name", "email", "phone", "formType", "destination", "checkIn", "checkOut", "rooms", "message", "status"]
        );
        assert_eq!(HomeEnquiry::table_cells(&enquiry)[3], "Hotel Booking");
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(EnquiryStatus::parse("Confirmed"), Some(EnquiryStatus::Confirmed));
        assert_eq!(EnquiryStatus::parse("all"), None);
    }
}
