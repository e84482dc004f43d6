use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Accepts either a bare `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .map(|timestamp| timestamp.to_offset(time::UtcOffset::UTC).date())
}

/// `Mar 5, 2026`
pub fn display_date(date: Date) -> String {
    date.format(format_description!("[month repr:short] [day padding:none], [year]"))
        .unwrap_or_default()
}

pub fn display_optional_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_calendar_date) {
        Some(date) => display_date(date),
        None => match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => "Not specified".to_string(),
        },
    }
}

/// Value for an `<input type="date">`.
pub fn input_date(raw: Option<&str>) -> String {
    raw.and_then(parse_calendar_date)
        .map(iso_date)
        .unwrap_or_default()
}

pub fn iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub fn relative_time(timestamp: OffsetDateTime, now: OffsetDateTime) -> String {
    let seconds = (now - timestamp).whole_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }

    let (amount, unit) = match seconds {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 604_800 => (s / 86_400, "day"),
        _ => return display_date(timestamp.date()),
    };
    let plural = if amount > 1 { "s" } else { "" };
    format!("{} {}{} ago", amount, unit, plural)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use time::macros::{date, datetime};
    use super::*;

    #[rstest]
    #[case("2026-03-05", Some(date!(2026 - 03 - 05)))]
    #[case("2026-03-05T22:10:00.000Z", Some(date!(2026 - 03 - 05)))]
    #[case("2026-03-06T01:00:00+05:30", Some(date!(2026 - 03 - 05)))]
    #[case("", None)]
    #[case("next tuesday", None)]
    fn parses_calendar_dates(#[case] raw: &str, #[case] expected: Option<Date>) {
        assert_eq!(parse_calendar_date(raw), expected);
    }

    #[test]
    fn displays_dates_like_the_tables_do() {
        assert_eq!(display_date(date!(2026 - 03 - 05)), "Mar 5, 2026");
        assert_eq!(display_optional_date(None), "Not specified");
        assert_eq!(display_optional_date(Some("2026-12-24")), "Dec 24, 2026");
        assert_eq!(input_date(Some("2026-12-24T10:00:00Z")), "2026-12-24");
        assert_eq!(input_date(None), "");
    }

    #[rstest]
    #[case(datetime!(2026-10-18 11:59:30 UTC), "Just now")]
    #[case(datetime!(2026-10-18 11:59:00 UTC), "1 minute ago")]
    #[case(datetime!(2026-10-18 09:00:00 UTC), "3 hours ago")]
    #[case(datetime!(2026-10-16 12:00:00 UTC), "2 days ago")]
    #[case(datetime!(2026-09-01 12:00:00 UTC), "Sep 1, 2026")]
    fn relative_time_buckets(#[case] timestamp: OffsetDateTime, #[case] expected: &str) {
        let now = datetime!(2026-10-18 12:00:00 UTC);
        assert_eq!(relative_time(timestamp, now), expected);
    }
}
