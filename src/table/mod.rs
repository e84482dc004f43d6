pub mod export;
pub mod filter;
pub mod pagination;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;
    use crate::models::enquiry::{CarRentalDetail, Enquiry, EnquiryKind};
    use super::export::build_csv;
    use super::filter::{apply, FilterCriteria};
    use super::pagination::PageWindow;

    fn car_enquiries() -> Vec<Enquiry<CarRentalDetail>> {
        (1..=25)
            .map(|n| {
                let name = match n {
                    4 => "John Abraham".to_string(),
                    11 => "Elton Johns".to_string(),
                    19 => "JOHN K".to_string(),
                    n => format!("Customer {}", n),
                };
                serde_json::from_value(json!({
                    "id": n,
                    "name": name,
                    "email": format!("customer{}@example.com", n),
                    "phone": format!("90000000{:02}", n),
                    "carName": "Swift Dzire",
                    "status": "pending",
                    "createdAt": "2026-10-10T10:00:00Z"
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn searched_car_enquiries_fit_on_one_page() {
        let enquiries = car_enquiries();
        let criteria = FilterCriteria {
            search: "john".to_string(),
            ..Default::default()
        };

        let outcome = apply(&enquiries, &criteria, datetime!(2026-10-18 12:00:00 UTC));
        let window = PageWindow::new(outcome.records.len(), 10, 1);
        let rows = window.slice(&outcome.records);

        assert_eq!(window.current, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(rows.len(), 3);
        assert!(!window.has_previous());
        assert!(!window.has_next());

        let body = build_csv(
            CarRentalDetail::CSV_HEADERS,
            outcome.records.iter().map(|enquiry| CarRentalDetail::csv_record(enquiry)),
        )
        .unwrap();
        assert_eq!(String::from_utf8(body).unwrap().lines().count(), 4);
    }

    #[test]
    fn unfiltered_car_enquiries_span_three_pages() {
        let enquiries = car_enquiries();
        let outcome = apply(
            &enquiries,
            &FilterCriteria::default(),
            datetime!(2026-10-18 12:00:00 UTC),
        );
        let window = PageWindow::new(outcome.records.len(), 10, 2);

        assert_eq!(window.total_pages, 3);
        assert_eq!(window.slice(&outcome.records)[0].id, "11");
    }
}
