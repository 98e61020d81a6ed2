use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            "tomorrow" => Ok(Local::now().date_naive() + chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// The Monday on or before the given date. Weeks run Monday to Sunday.
pub(crate) fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Week start from an optional date argument (defaults to this week).
pub(crate) fn parse_week(date_str: Option<String>) -> Result<NaiveDate> {
    Ok(week_start_for(parse_date(date_str)?))
}

/// Render a quantity without trailing zeros: 2.0 -> "2", 2.5 -> "2.5".
pub(crate) fn format_qty(quantity: f64) -> String {
    if (quantity - quantity.round()).abs() < 1e-9 {
        format!("{quantity:.0}")
    } else {
        let s = format!("{quantity:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// "1000 g", or just "12" when the unit is unitless.
pub(crate) fn format_qty_unit(quantity: f64, unit: &str) -> String {
    if unit.is_empty() {
        format_qty(quantity)
    } else {
        format!("{} {unit}", format_qty(quantity))
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_none() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(Some("today".to_string())).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday".to_string())).unwrap(),
            today - chrono::Duration::days(1)
        );
        assert_eq!(
            parse_date(Some("tomorrow".to_string())).unwrap(),
            today + chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2025-01-15".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date(Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-01-15 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
        assert_eq!(week_start_for(wednesday), monday);
        assert_eq!(week_start_for(monday), monday);
        // Sunday still belongs to the week that started the previous Monday
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap();
        assert_eq!(week_start_for(sunday), monday);
    }

    #[test]
    fn test_format_qty() {
        assert_eq!(format_qty(2.0), "2");
        assert_eq!(format_qty(2.5), "2.5");
        assert_eq!(format_qty(0.25), "0.25");
        assert_eq!(format_qty(1000.0), "1000");
    }

    #[test]
    fn test_format_qty_unit() {
        assert_eq!(format_qty_unit(1000.0, "g"), "1000 g");
        assert_eq!(format_qty_unit(12.0, ""), "12");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        // Should not panic on multi-byte characters
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }
}
