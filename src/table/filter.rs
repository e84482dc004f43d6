use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use thiserror::Error;
use time::{Date, OffsetDateTime, Time, UtcOffset};
use url::form_urlencoded;
use crate::helpers::date_format::{iso_date, parse_calendar_date};
use crate::models::enquiry::{Enquiry, EnquiryStatus};
use crate::models::listing::{CarRental, Hotel};

/// A record the list pages can search, narrow by status and bucket by creation time.
pub trait Filterable {
    fn search_fields(&self) -> Vec<&str>;

    fn created_at(&self) -> Option<OffsetDateTime>;

    /// Moves the creation time into the offset the dashboard displays dates in.
    fn localize(&mut self, offset: UtcOffset);

    fn status(&self) -> Option<EnquiryStatus> {
        None
    }
}

impl<D> Filterable for Enquiry<D> {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.phone]
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        Some(self.created_at)
    }

    fn localize(&mut self, offset: UtcOffset) {
        self.created_at = self.created_at.to_offset(offset);
    }

    fn status(&self) -> Option<EnquiryStatus> {
        Some(self.status)
    }
}

impl Filterable for Hotel {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.location, &self.provider_name, &self.provider_email]
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }

    fn localize(&mut self, offset: UtcOffset) {
        self.created_at = self.created_at.map(|created_at| created_at.to_offset(offset));
    }
}

impl Filterable for CarRental {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.provider_name, &self.provider_email]
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }

    fn localize(&mut self, offset: UtcOffset) {
        self.created_at = self.created_at.map(|created_at| created_at.to_offset(offset));
    }
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Today,
    Month,
    Year,
    Custom,
}

impl Period {
    pub const ALL: [Period; 5] = [Period::All, Period::Today, Period::Month, Period::Year, Period::Custom];

    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("today") => Period::Today,
            Some("month") => Period::Month,
            Some("year") => Period::Year,
            Some("custom") => Period::Custom,
            _ => Period::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Today => "today",
            Period::Month => "month",
            Period::Year => "year",
            Period::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::All => "All Time",
            Period::Today => "Today",
            Period::Month => "This Month",
            Period::Year => "This Year",
            Period::Custom => "Custom Range",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("Please select both start and end dates")]
    Incomplete,
    #[error("Start date must be on or before end date")]
    Inverted,
}

/// Query string shared by every list page.
#[serde_as]
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub search: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub period: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub tab: Option<String>,
}

impl FilterQuery {
    /// Requested page, where anything unparseable counts as the first.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(1)
    }

    /// The filter part of the query string, for page links and the export button.
    pub fn without_page(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let pairs = [
            ("search", &self.search),
            ("status", &self.status),
            ("period", &self.period),
            ("fromDate", &self.from_date),
            ("toDate", &self.to_date),
            ("tab", &self.tab),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub status: Option<EnquiryStatus>,
    pub period: Period,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl FilterCriteria {
    pub fn from_query(query: &FilterQuery) -> Self {
        Self {
            search: query.search.clone().unwrap_or_default(),
            status: query.status.as_deref().and_then(EnquiryStatus::parse),
            period: Period::parse(query.period.as_deref()),
            from: query.from_date.as_deref().and_then(parse_calendar_date),
            to: query.to_date.as_deref().and_then(parse_calendar_date),
        }
    }

    pub fn validate_range(&self) -> Result<(), RangeError> {
        if self.period != Period::Custom {
            return Ok(());
        }
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(RangeError::Inverted),
            (Some(_), Some(_)) => Ok(()),
            _ => Err(RangeError::Incomplete),
        }
    }

    /// Parameters forwarded to the backend list endpoint. The backend may ignore
    /// them; the local filter has the final word.
    pub fn backend_query(&self, fetch_limit: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", "1".to_string()), ("limit", fetch_limit.to_string())];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if self.period != Period::All {
            params.push(("period", self.period.as_str().to_string()));
        }
        if self.period == Period::Custom {
            if let (Some(from), Some(to)) = (self.from, self.to) {
                params.push(("fromDate", iso_date(from)));
                params.push(("toDate", iso_date(to)));
            }
        }
        params
    }

    /// Half-open `[start, end)` window of creation times for the period, computed
    /// in the offset of `now`.
    fn window(&self, now: OffsetDateTime) -> (Option<OffsetDateTime>, Option<OffsetDateTime>) {
        let offset = now.offset();
        let start_of = |date: Date| date.with_time(Time::MIDNIGHT).assume_offset(offset);
        let today = now.date();

        match self.period {
            Period::All => (None, None),
            Period::Today => (Some(start_of(today)), None),
            Period::Month => (Some(start_of(today.replace_day(1).unwrap_or(today))), None),
            Period::Year => (
                Some(start_of(Date::from_ordinal_date(today.year(), 1).unwrap_or(today))),
                None,
            ),
            Period::Custom => match (self.from, self.to) {
                (Some(from), Some(to)) => (Some(start_of(from)), to.next_day().map(start_of)),
                _ => (None, None),
            },
        }
    }
}

pub struct FilterOutcome<'a, T> {
    pub records: Vec<&'a T>,
    /// Set when the custom range was rejected and left out of the filter.
    pub warning: Option<RangeError>,
}

pub fn matches_search<T: Filterable>(record: &T, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

pub fn apply<'a, T: Filterable>(
    records: &'a [T],
    criteria: &FilterCriteria,
    now: OffsetDateTime,
) -> FilterOutcome<'a, T> {
    let warning = criteria.validate_range().err();
    let (start, end) = match warning {
        Some(_) => (None, None),
        None => criteria.window(now),
    };

    let records = records
        .iter()
        .filter(|record| matches_search(*record, &criteria.search))
        .filter(|record| match criteria.status {
            Some(wanted) => record.status().map_or(true, |status| status == wanted),
            None => true,
        })
        .filter(|record| {
            if start.is_none() && end.is_none() {
                return true;
            }
            let Some(created_at) = record.created_at() else {
                return false;
            };
            start.map_or(true, |start| created_at >= start) && end.map_or(true, |end| created_at < end)
        })
        .collect();

    FilterOutcome { records, warning }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use time::macros::{date, datetime, offset};
    use super::*;

    struct Row {
        name: &'static str,
        email: &'static str,
        status: EnquiryStatus,
        created_at: OffsetDateTime,
    }

    impl Filterable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.email]
        }

        fn created_at(&self) -> Option<OffsetDateTime> {
            Some(self.created_at)
        }

        fn localize(&mut self, offset: UtcOffset) {
            self.created_at = self.created_at.to_offset(offset);
        }

        fn status(&self) -> Option<EnquiryStatus> {
            Some(self.status)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "John Mathew",
                email: "jm@example.com",
                status: EnquiryStatus::Pending,
                created_at: datetime!(2026-10-18 08:00:00 UTC),
            },
            Row {
                name: "Asha",
                email: "JOHNNY@example.com",
                status: EnquiryStatus::Confirmed,
                created_at: datetime!(2026-10-01 00:00:00 UTC),
            },
            Row {
                name: "Ravi",
                email: "ravi@example.com",
                status: EnquiryStatus::Pending,
                created_at: datetime!(2026-09-30 23:59:59 UTC),
            },
            Row {
                name: "Meera",
                email: "meera@example.com",
                status: EnquiryStatus::Cancelled,
                created_at: datetime!(2025-12-31 12:00:00 UTC),
            },
        ]
    }

    fn names<'a>(outcome: &FilterOutcome<'a, Row>) -> Vec<&'a str> {
        outcome.records.iter().map(|row| row.name).collect()
    }

    const NOW: OffsetDateTime = datetime!(2026-10-18 12:00:00 UTC);

    #[rstest]
    #[case("john", vec!["John Mathew", "Asha"])]
    #[case("  ", vec!["John Mathew", "Asha", "Ravi", "Meera"])]
    #[case("nobody", vec![])]
    fn search_is_case_insensitive_substring(#[case] search: &str, #[case] expected: Vec<&str>) {
        let records = rows();
        let criteria = FilterCriteria {
            search: search.to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &criteria, NOW)), expected);
    }

    #[rstest]
    #[case(Period::Today, vec!["John Mathew"])]
    #[case(Period::Month, vec!["John Mathew", "Asha"])]
    #[case(Period::Year, vec!["John Mathew", "Asha", "Ravi"])]
    #[case(Period::All, vec!["John Mathew", "Asha", "Ravi", "Meera"])]
    fn periods_start_at_calendar_boundaries(#[case] period: Period, #[case] expected: Vec<&str>) {
        let records = rows();
        let criteria = FilterCriteria {
            period,
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &criteria, NOW)), expected);
    }

    #[test]
    fn period_boundaries_follow_the_offset_of_now() {
        let records = rows();
        let criteria = FilterCriteria {
            period: Period::Month,
            ..Default::default()
        };
        let now = NOW.to_offset(offset!(+5:30));
        // Ravi's 23:59:59 UTC is already Oct 1 at +05:30.
        assert_eq!(names(&apply(&records, &criteria, now)), vec!["John Mathew", "Asha", "Ravi"]);
    }

    #[test]
    fn custom_range_includes_the_whole_end_day() {
        let records = rows();
        let criteria = FilterCriteria {
            period: Period::Custom,
            from: Some(date!(2026 - 09 - 30)),
            to: Some(date!(2026 - 10 - 01)),
            ..Default::default()
        };
        let outcome = apply(&records, &criteria, NOW);
        assert_eq!(names(&outcome), vec!["Asha", "Ravi"]);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn incomplete_or_inverted_range_is_not_applied() {
        let records = rows();
        let incomplete = FilterCriteria {
            period: Period::Custom,
            from: Some(date!(2026 - 10 - 01)),
            ..Default::default()
        };
        let outcome = apply(&records, &incomplete, NOW);
        assert_eq!(outcome.warning, Some(RangeError::Incomplete));
        assert_eq!(outcome.records.len(), 4);

        let inverted = FilterCriteria {
            period: Period::Custom,
            from: Some(date!(2026 - 10 - 05)),
            to: Some(date!(2026 - 10 - 01)),
            status: Some(EnquiryStatus::Pending),
            ..Default::default()
        };
        let outcome = apply(&records, &inverted, NOW);
        assert_eq!(outcome.warning, Some(RangeError::Inverted));
        assert_eq!(names(&outcome), vec!["John Mathew", "Ravi"]);
        assert_eq!(
            RangeError::Inverted.to_string(),
            "Start date must be on or before end date"
        );
    }

    #[test]
    fn criteria_read_from_query_with_blank_values() {
        let query: FilterQuery = serde_json::from_value(serde_json::json!({
            "search": "",
            "status": "all",
            "period": "custom",
            "fromDate": "2026-10-01",
            "toDate": "",
            "page": "x"
        }))
        .unwrap();

        let criteria = FilterCriteria::from_query(&query);
        assert_eq!(criteria.search, "");
        assert_eq!(criteria.status, None);
        assert_eq!(criteria.period, Period::Custom);
        assert_eq!(criteria.to, None);
        assert_eq!(query.page(), 1);
        assert_eq!(criteria.validate_range(), Err(RangeError::Incomplete));
        assert_eq!(query.without_page(), "status=all&period=custom&fromDate=2026-10-01");
    }

    #[test]
    fn backend_query_forwards_only_meaningful_hints() {
        let criteria = FilterCriteria {
            search: " john ".to_string(),
            status: Some(EnquiryStatus::Confirmed),
            period: Period::Custom,
            from: Some(date!(2026 - 10 - 01)),
            to: Some(date!(2026 - 10 - 10)),
        };
        assert_eq!(
            criteria.backend_query(1000),
            vec![
                ("page", "1".to_string()),
                ("limit", "1000".to_string()),
                ("status", "confirmed".to_string()),
                ("search", "john".to_string()),
                ("period", "custom".to_string()),
                ("fromDate", "2026-10-01".to_string()),
                ("toDate", "2026-10-10".to_string()),
            ]
        );
        assert_eq!(
            FilterCriteria::default().backend_query(50),
            vec![("page", "1".to_string()), ("limit", "50".to_string())]
        );
    }
}
