use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use crate::models::chart::{Dataset, TimeSeries};

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub tour_package_details: u64,
    #[serde(default)]
    pub car_rental_details: u64,
    #[serde(default)]
    pub hotel_enquiries: u64,
    #[serde(default)]
    pub contact_forms: u64,
}

impl DashboardStats {
    pub fn total(&self) -> u64 {
        self.tour_package_details + self.car_rental_details + self.hotel_enquiries + self.contact_forms
    }

    pub fn distribution(&self) -> [(&'static str, u64); 4] {
        [
            ("Tour Packages", self.tour_package_details),
            ("Car Rentals", self.car_rental_details),
            ("Hotel Bookings", self.hotel_enquiries),
            ("Contact Forms", self.contact_forms),
        ]
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    #[serde(default)]
    pub tour_package_details: TimeSeries,
    #[serde(default)]
    pub car_rental_details: TimeSeries,
    #[serde(default)]
    pub hotel_enquiries: TimeSeries,
    #[serde(default)]
    pub contact_forms: TimeSeries,
}

impl DashboardCharts {
    /// Folds the four per-type series into one multi-series chart on the first non-empty label set.
    pub fn combined(&self) -> TimeSeries {
        let series = [
            ("Tour Packages", &self.tour_package_details),
            ("Car Rentals", &self.car_rental_details),
            ("Hotel Bookings", &self.hotel_enquiries),
            ("Contact Forms", &self.contact_forms),
        ];
        let labels = series
            .iter()
            .map(|(_, series)| &series.labels)
            .find(|labels| !labels.is_empty())
            .cloned()
            .unwrap_or_default();

        TimeSeries {
            datasets: series
                .iter()
                .map(|(label, series)| Dataset {
                    label: Some(label.to_string()),
                    data: series.primary().to_vec(),
                })
                .collect(),
            labels,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Activity {
    pub fn tone(&self) -> &'static str {
        match self.kind.as_str() {
            "tourPackage" => "warning",
            "carRental" => "success",
            "hotel" => "primary",
            "contact" => "danger",
            "user" => "info",
            _ => "secondary",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    #[serde(default)]
    pub today: u64,
    #[serde(default)]
    pub week: u64,
    #[serde(default)]
    pub month: u64,
    #[serde(default)]
    pub conversion_rate: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn combined_series_uses_first_non_empty_labels() {
        let charts: DashboardCharts = serde_json::from_value(json!({
            "tourPackageDetails": { "labels": [], "datasets": [{ "data": [] }] },
            "carRentalDetails": { "labels": ["Jan", "Feb"], "datasets": [{ "data": [1, 2] }] },
            "hotelEnquiries": { "labels": ["Jan", "Feb"], "datasets": [{ "data": [0, 4] }] }
        }))
        .unwrap();

        let combined = charts.combined();
        assert_eq!(combined.labels, vec!["Jan", "Feb"]);
        assert_eq!(combined.datasets.len(), 4);
        assert_eq!(combined.datasets[2].data, vec![0.0, 4.0]);
        assert!(combined.datasets[3].data.is_empty());
    }

    #[test]
    fn stats_default_missing_counts_to_zero() {
        let stats: DashboardStats =
            serde_json::from_value(json!({ "hotelEnquiries": 3, "contactForms": 2 })).unwrap();
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.distribution()[2], ("Hotel Bookings", 3));
    }

    #[test]
    fn activity_tone_follows_type() {
        let activity: Activity = serde_json::from_value(json!({
            "type": "carRental",
            "message": "New car rental enquiry from Asha",
            "timestamp": "2026-10-01T08:30:00.000Z"
        }))
        .unwrap();
        assert_eq!(activity.tone(), "success");
    }
}
