use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::enquiry::EnquiryStatus;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct TimeSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<f64>,
}

impl TimeSeries {
    pub fn empty(label: &str) -> Self {
        Self {
            labels: Vec::new(),
            datasets: vec![Dataset {
                label: Some(label.to_string()),
                data: Vec::new(),
            }],
        }
    }

    /// Values of the first dataset, which is all the single-series charts plot.
    pub fn primary(&self) -> &[f64] {
        self.datasets
            .first()
            .map(|dataset| dataset.data.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusCount {
    pub status: String,
    #[serde(default)]
    pub count: u64,
}

/// Aggregate behind an enquiry page: submissions over time plus the status breakdown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnquiryChart {
    pub time_series: TimeSeries,
    pub status_breakdown: Vec<StatusCount>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WrappedChart {
    time_series_data: TimeSeries,
    #[serde(default)]
    status_data: Vec<StatusCount>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BareChart {
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    datasets: Vec<Dataset>,
    #[serde(default)]
    status_data: Vec<StatusCount>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChartPayload {
    Wrapped(WrappedChart),
    Bare(BareChart),
}

impl EnquiryChart {
    /// Some chart endpoints nest the series under `timeSeriesData`, others return it bare.
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        let chart = match serde_json::from_value::<ChartPayload>(payload)? {
            ChartPayload::Wrapped(wrapped) => Self {
                time_series: wrapped.time_series_data,
                status_breakdown: wrapped.status_data,
            },
            ChartPayload::Bare(bare) => Self {
                time_series: TimeSeries {
                    labels: bare.labels,
                    datasets: bare.datasets,
                },
                status_breakdown: bare.status_data,
            },
        };
        Ok(chart)
    }

    pub fn placeholder(label: &str) -> Self {
        Self {
            time_series: TimeSeries::empty(label),
            status_breakdown: [
                EnquiryStatus::Pending,
                EnquiryStatus::Confirmed,
                EnquiryStatus::Cancelled,
            ]
            .iter()
            .map(|status| StatusCount {
                status: status.as_str().to_string(),
                count: 0,
            })
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn wrapped_payload_keeps_status_breakdown() {
        let chart = EnquiryChart::from_payload(json!({
            "timeSeriesData": {
                "labels": ["Jan", "Feb"],
                "datasets": [{ "label": "Car Rental Bookings", "data": [3, 5] }]
            },
            "statusData": [
                { "status": "pending", "count": 4 },
                { "status": "confirmed", "count": 4 }
            ]
        }))
        .unwrap();

        assert_eq!(chart.time_series.labels, vec!["Jan", "Feb"]);
        assert_eq!(chart.time_series.primary(), &[3.0, 5.0]);
        assert_eq!(chart.status_breakdown.len(), 2);
    }

    #[test]
    fn bare_payload_is_read_as_time_series() {
        let chart = EnquiryChart::from_payload(json!({
            "labels": ["Mon"],
            "datasets": [{ "data": [1] }]
        }))
        .unwrap();

        assert_eq!(chart.time_series.labels, vec!["Mon"]);
        assert!(chart.status_breakdown.is_empty());
    }

    #[test]
    fn placeholder_has_zeroed_statuses() {
        let chart = EnquiryChart::placeholder("Hotel Enquiries");
        assert!(chart.time_series.labels.is_empty());
        assert_eq!(
            chart.time_series.datasets[0].label.as_deref(),
            Some("Hotel Enquiries")
        );
        assert!(chart.status_breakdown.iter().all(|slice| slice.count == 0));
        assert_eq!(chart.status_breakdown.len(), 3);
    }
}
