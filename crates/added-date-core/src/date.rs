use crate::error::EditError;
use added_date_models::DateSpec;
use chrono::NaiveDate;

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Parse `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (midnight).
///
/// Out-of-range values (month 13, February 30, second 60) are rejected.
pub fn parse_date(text: &str) -> Result<DateSpec, EditError> {
    let trimmed = text.trim();

    if let Some(spec) = DateSpec::parse_canonical(trimmed) {
        return Ok(spec);
    }

    NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(DateSpec::new)
        .ok_or_else(|| EditError::InvalidDateFormat(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_date_only_defaults_to_midnight() {
        let spec = parse_date("2020-10-31").unwrap();
        assert_eq!(spec.to_string(), "2020-10-31 00:00:00");
        assert_eq!(spec.value().hour(), 0);
        assert_eq!(spec.value().minute(), 0);
        assert_eq!(spec.value().second(), 0);
    }

    #[test]
    fn test_full_timestamp() {
        let spec = parse_date("2010-08-20 14:03:11").unwrap();
        assert_eq!(spec.to_string(), "2010-08-20 14:03:11");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            parse_date("  2010-08-20 ").unwrap(),
            parse_date("2010-08-20").unwrap()
        );
    }

    #[test]
    fn test_parse_is_idempotent_on_canonical_output() {
        for input in ["1999-12-31", "2000-02-29 23:59:59", "2024-06-01 08:00:00"] {
            let first = parse_date(input).unwrap();
            let second = parse_date(&first.to_string()).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.to_string(), second.to_string());
        }
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        let inputs = [
            "2020/10/31",
            "31-10-2020",
            "2020-13-01",
            "2021-02-29",
            "2020-04-31",
            "2020-10-31T10:00:00",
            "2020-10-31 25:00:00",
            "2020-10-31 23:59:60",
            "2020-10-31 10:00",
            "yesterday",
            "",
        ];
        for input in inputs {
            match parse_date(input) {
                Err(EditError::InvalidDateFormat(original)) => assert_eq!(original, input),
                other => panic!("expected InvalidDateFormat for {:?}, got {:?}", input, other),
            }
        }
    }
}
