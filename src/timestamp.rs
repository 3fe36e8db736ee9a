use chrono::{Local, NaiveDateTime};

/// `strftime` pattern for history timestamps: `YYYY-MM-DD HH:MM:SS`, 24-hour.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local wall-clock time as a history timestamp.
pub fn now() -> String {
    format(&Local::now().naive_local())
}

pub fn format(at: &NaiveDateTime) -> String {
    at.format(FORMAT).to_string()
}

/// True if `s` is exactly a timestamp produced by [`format`].
pub fn is_well_formed(s: &str) -> bool {
    s.len() == 19 && NaiveDateTime::parse_from_str(s, FORMAT).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn format_is_zero_padded_24_hour() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(14, 3, 7)
            .unwrap();
        assert_eq!(format(&at), "2024-01-05 14:03:07");
    }

    #[test]
    fn now_is_well_formed() {
        let ts = now();
        assert!(is_well_formed(&ts), "unexpected timestamp: {ts}");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(!is_well_formed("2024-01-05T14:03:07Z"));
        assert!(!is_well_formed("2024-1-5 14:03:07"));
        assert!(!is_well_formed(""));
    }
}
