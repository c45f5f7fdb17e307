//! Date normalisation between HTML date inputs and backend ISO 8601 instants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Normalise a form date into an ISO 8601 UTC instant with a time component.
///
/// Accepts `YYYY-MM-DD`, RFC 3339, and offset-less `YYYY-MM-DDTHH:MM:SS[.f]`.
/// Returns `None` for empty or unparseable input.
pub fn normalize_date(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(format!("{}T00:00:00Z", date.format("%Y-%m-%d")));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    None
}

/// The date part of an ISO 8601 date-time, as an HTML date input expects it.
pub fn date_part(input: &str) -> &str {
    input.split('T').next().unwrap_or_default().trim()
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_date_gets_midnight_utc() {
        assert_eq!(
            normalize_date("2001-02-03").as_deref(),
            Some("2001-02-03T00:00:00Z")
        );
    }

    #[test]
    fn rfc3339_is_converted_to_utc() {
        assert_eq!(
            normalize_date("2024-01-01T05:45:00+05:45").as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(
            normalize_date("2024-01-01T00:00:00Z").as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn offsetless_datetime_is_taken_as_utc() {
        assert_eq!(
            normalize_date("2024-03-10T08:30:00.250").as_deref(),
            Some("2024-03-10T08:30:00Z")
        );
    }

    #[test]
    fn empty_and_garbage_are_none() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
        assert_eq!(normalize_date("03/02/2001"), None);
        assert_eq!(normalize_date("2001-02-30"), None);
    }

    #[test]
    fn date_part_strips_time() {
        assert_eq!(date_part("2001-02-03T00:00:00Z"), "2001-02-03");
        assert_eq!(date_part("2001-02-03"), "2001-02-03");
        assert_eq!(date_part(""), "");
    }
}
