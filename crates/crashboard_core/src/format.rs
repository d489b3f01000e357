use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats an ISO date or timestamp the way es-ES shows short dates
/// (`dd/mm/yyyy`). Unparseable input is returned unchanged.
pub fn format_es_date(raw: &str) -> String {
    let raw = raw.trim();
    parse_calendar_date(raw)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|stamp| stamp.date())
}

#[cfg(test)]
mod tests {
    use super::format_es_date;

    #[test]
    fn formats_plain_dates_with_two_digit_day_and_month() {
        assert_eq!(format_es_date("2024-03-05"), "05/03/2024");
    }

    #[test]
    fn formats_timestamps_by_their_calendar_date() {
        assert_eq!(format_es_date("2024-12-31T23:15:00"), "31/12/2024");
        assert_eq!(format_es_date("2024-07-01T08:00:00.123456"), "01/07/2024");
        assert_eq!(format_es_date("2024-07-01T08:00:00-03:00"), "01/07/2024");
        assert_eq!(format_es_date("2024-07-01 08:00:00"), "01/07/2024");
    }

    #[test]
    fn keeps_unparseable_input() {
        assert_eq!(format_es_date("sin fecha"), "sin fecha");
    }
}
